//! Declaration-time error types.
//!
//! These errors are raised synchronously while an association is being
//! declared. They are never retried and never silently dropped.

use thiserror::Error;

/// Invalid association configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// One or more option keys are not recognized by the builder, the
	/// association kind or any registered extension.
	#[error("Unknown key(s): {}. Valid keys are: {}", .keys.join(", "), .valid.join(", "))]
	UnknownKeys {
		/// Offending keys, in declaration order.
		keys: Vec<String>,
		/// Every key that would have been accepted.
		valid: Vec<String>,
	},

	/// The `dependent` policy is not allowed for this association kind.
	#[error("The :dependent option must be one of [{}], but is :{value}", .allowed.join(", "))]
	InvalidDependent {
		/// Requested policy, as written.
		value: String,
		/// Policies accepted by the association kind.
		allowed: Vec<String>,
	},

	/// The association name cannot be coerced into a canonical name.
	#[error("invalid association name {0:?}: names must be non-empty identifiers")]
	MalformedName(String),

	/// A predicate value is not an absolute URI.
	#[error("invalid predicate URI {uri:?}: {reason}")]
	InvalidPredicate {
		/// Rejected text.
		uri: String,
		/// Parser message.
		reason: String,
	},

	/// An option value has the wrong shape for its key.
	#[error("option :{key} expects {expected}")]
	InvalidOptionValue {
		/// Option key.
		key: String,
		/// Human readable description of the accepted shape.
		expected: &'static str,
	},
}

/// A legacy property could not be mapped to a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no predicate is mapped to property :{property}")]
pub struct LookupError {
	/// The property that was looked up.
	pub property: String,
}

impl LookupError {
	/// Create a lookup error for `property`.
	pub fn new(property: impl Into<String>) -> Self {
		Self {
			property: property.into(),
		}
	}
}
