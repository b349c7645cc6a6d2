//! Association error types.

use thiserror::Error;
use trellis_core::{ConfigError, LookupError, Name};

/// Result type for association operations.
pub type AssociationResult<T> = Result<T, AssociationError>;

/// Errors raised while declaring or using associations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssociationError {
	/// Invalid configuration. Raised at declaration time.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// A legacy property could not be resolved.
	#[error(transparent)]
	Lookup(#[from] LookupError),

	/// An extension build hook failed.
	#[error("extension '{extension}' failed while building :{association}: {source}")]
	Extension {
		/// Extension name.
		extension: String,
		/// Association being declared.
		association: Name,
		/// Underlying failure.
		#[source]
		source: Box<AssociationError>,
	},

	/// An extension with the same name is already registered.
	#[error("extension already registered: {0}")]
	DuplicateExtension(String),

	/// A record has no runtime for the requested association.
	#[error("no association named :{0}")]
	UnknownAssociation(Name),

	/// The owning type has no generated method with this name.
	#[error("undefined method `{method}' for {model}")]
	UndefinedMethod {
		/// Owning type name.
		model: String,
		/// Requested method.
		method: String,
	},

	/// A generated method was called with the wrong number of arguments.
	#[error("wrong number of arguments for `{method}' (given {given}, expected {expected})")]
	ArgumentCount {
		/// Generated method name.
		method: String,
		/// Arguments supplied.
		given: usize,
		/// Arguments accepted.
		expected: usize,
	},

	/// A restrict policy refused the destroy.
	#[error("cannot delete record because dependent :{association} exist")]
	DeleteRestricted {
		/// Association holding dependents.
		association: Name,
	},

	/// The association runtime failed.
	#[error("association :{association} failed: {message}")]
	Runtime {
		/// Association name.
		association: Name,
		/// Failure description.
		message: String,
	},
}

impl AssociationError {
	/// Whether this is a declaration-time configuration error.
	pub fn is_config(&self) -> bool {
		matches!(self, Self::Config(_))
	}
}
