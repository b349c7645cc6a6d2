//! Association option values.

use std::fmt;
use std::sync::Arc;

use crate::predicates::Predicate;

/// Checks whether an object of a given type may be assigned to an
/// association.
///
/// Stored under the `type_validator` option and surfaced through the
/// reflection; the association runtime decides when to call it.
pub trait TypeValidator: fmt::Debug + Send + Sync {
	/// Returns `true` when an object of `type_name` is acceptable.
	fn validate(&self, type_name: &str) -> bool;
}

/// Accepts a fixed list of type names.
///
/// # Examples
///
/// ```
/// use trellis_core::{AllowedTypes, TypeValidator};
///
/// let validator = AllowedTypes::new(["Comment", "Reply"]);
/// assert!(validator.validate("Reply"));
/// assert!(!validator.validate("Post"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedTypes {
	types: Vec<String>,
}

impl AllowedTypes {
	/// Accept exactly the listed type names.
	pub fn new<I, S>(types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			types: types.into_iter().map(Into::into).collect(),
		}
	}
}

impl TypeValidator for AllowedTypes {
	fn validate(&self, type_name: &str) -> bool {
		self.types.iter().any(|t| t == type_name)
	}
}

/// A single association option value.
#[derive(Clone)]
pub enum OptionValue {
	/// Boolean flag, e.g. `required`.
	Bool(bool),
	/// Integer setting, e.g. `solr_page_size`.
	Integer(i64),
	/// Free text, e.g. `class_name`.
	Str(String),
	/// Symbolic value, e.g. `dependent: :destroy`.
	Symbol(String),
	/// Canonical predicate identifier.
	Predicate(Predicate),
	/// Several values, e.g. a list of callback names.
	List(Vec<OptionValue>),
	/// Type validator callable.
	TypeValidator(Arc<dyn TypeValidator>),
}

impl OptionValue {
	/// Build a symbolic value.
	pub fn symbol(value: impl Into<String>) -> Self {
		Self::Symbol(value.into())
	}

	/// Text of a `Str` or `Symbol` value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Str(s) | Self::Symbol(s) => Some(s),
			_ => None,
		}
	}

	/// Value of a `Bool`.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Value of an `Integer`.
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Self::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Value of a `Predicate`.
	pub fn as_predicate(&self) -> Option<&Predicate> {
		match self {
			Self::Predicate(p) => Some(p),
			_ => None,
		}
	}

	/// Items of a `List`.
	pub fn as_list(&self) -> Option<&[OptionValue]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// The validator held by a `TypeValidator` value.
	pub fn as_type_validator(&self) -> Option<&Arc<dyn TypeValidator>> {
		match self {
			Self::TypeValidator(v) => Some(v),
			_ => None,
		}
	}
}

impl fmt::Debug for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(b) => write!(f, "{b}"),
			Self::Integer(i) => write!(f, "{i}"),
			Self::Str(s) => write!(f, "{s:?}"),
			Self::Symbol(s) => write!(f, ":{s}"),
			Self::Predicate(p) => write!(f, "<{p}>"),
			Self::List(items) => f.debug_list().entries(items).finish(),
			Self::TypeValidator(v) => write!(f, "{v:?}"),
		}
	}
}

impl PartialEq for OptionValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Integer(a), Self::Integer(b)) => a == b,
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::Symbol(a), Self::Symbol(b)) => a == b,
			(Self::Predicate(a), Self::Predicate(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::TypeValidator(a), Self::TypeValidator(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl From<bool> for OptionValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for OptionValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<&str> for OptionValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for OptionValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<Predicate> for OptionValue {
	fn from(value: Predicate) -> Self {
		Self::Predicate(value)
	}
}

impl From<Vec<OptionValue>> for OptionValue {
	fn from(value: Vec<OptionValue>) -> Self {
		Self::List(value)
	}
}

impl From<Arc<dyn TypeValidator>> for OptionValue {
	fn from(value: Arc<dyn TypeValidator>) -> Self {
		Self::TypeValidator(value)
	}
}
