//! Canonical association names.
//!
//! A [`Name`] is the symbol form of an association name: a non-empty ASCII
//! identifier. Builders accept either a ready [`Name`] or plain text through
//! [`NameArg`]; text is coerced and the caller is told the form is deprecated.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::exception::ConfigError;

/// Canonical association name.
///
/// # Examples
///
/// ```
/// use trellis_core::Name;
///
/// let name = Name::new("comments").unwrap();
/// assert_eq!(name.as_str(), "comments");
/// assert_eq!(name.writer_name(), "comments=");
/// assert!(Name::new("has space").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(Arc<str>);

impl Name {
	/// Validate `text` and wrap it as a canonical name.
	pub fn new(text: impl AsRef<str>) -> Result<Self, ConfigError> {
		let text = text.as_ref();
		if !is_identifier(text) {
			return Err(ConfigError::MalformedName(text.to_string()));
		}
		Ok(Self(Arc::from(text)))
	}

	/// The name as written.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Name of the generated writer method (`name=`).
	pub fn writer_name(&self) -> String {
		format!("{}=", self.0)
	}

	/// Derive a class name from the association name.
	///
	/// Collection names are singularized before camel-casing, so `comments`
	/// becomes `Comment` and `categories` becomes `Category`.
	///
	/// ```
	/// use trellis_core::Name;
	///
	/// assert_eq!(Name::new("line_items").unwrap().classify(), "LineItem");
	/// assert_eq!(Name::new("author").unwrap().classify(), "Author");
	/// ```
	pub fn classify(&self) -> String {
		singularize(&self.0).to_case(Case::Pascal)
	}
}

impl fmt::Debug for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, ":{}", self.0)
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Name {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for Name {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for Name {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<Name> for String {
	fn from(value: Name) -> Self {
		value.0.to_string()
	}
}

/// An association name as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameArg {
	/// Already canonical.
	Symbol(Name),
	/// Textual form, coerced with a deprecation notice.
	Text(String),
}

impl NameArg {
	/// The name text regardless of representation.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Symbol(name) => name.as_str(),
			Self::Text(text) => text,
		}
	}
}

impl From<Name> for NameArg {
	fn from(value: Name) -> Self {
		Self::Symbol(value)
	}
}

impl From<&Name> for NameArg {
	fn from(value: &Name) -> Self {
		Self::Symbol(value.clone())
	}
}

impl From<&str> for NameArg {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for NameArg {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

fn is_identifier(text: &str) -> bool {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn singularize(word: &str) -> String {
	if let Some(stem) = word.strip_suffix("ies")
		&& !stem.is_empty()
	{
		return format!("{stem}y");
	}
	for suffix in ["sses", "shes", "ches", "xes", "zes"] {
		if word.ends_with(suffix) {
			return word[..word.len() - 2].to_string();
		}
	}
	if word.ends_with("ss") || word.ends_with("us") {
		return word.to_string();
	}
	match word.strip_suffix('s') {
		Some(stem) if !stem.is_empty() => stem.to_string(),
		_ => word.to_string(),
	}
}
