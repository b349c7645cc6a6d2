//! Graph predicates and the legacy property vocabulary.
//!
//! Associations name their relationship with a [`Predicate`], an absolute
//! URI. Older declarations used a symbolic `property` instead; a
//! [`PredicateResolver`] maps those symbols to predicates.

use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::exception::{ConfigError, LookupError};

/// Namespace of the Fedora external relations vocabulary.
pub const FEDORA_RELATIONS_NS: &str = "info:fedora/fedora-system:def/relations-external#";

/// Namespace of the Fedora model vocabulary.
pub const FEDORA_MODEL_NS: &str = "info:fedora/fedora-system:def/model#";

const FEDORA_RELATIONS: &[&str] = &[
	"isPartOf",
	"hasPart",
	"isConstituentOf",
	"hasConstituent",
	"isMemberOf",
	"hasMember",
	"isSubsetOf",
	"hasSubset",
	"isMemberOfCollection",
	"hasCollectionMember",
	"isDerivationOf",
	"hasDerivation",
	"isDependentOf",
	"hasDependent",
	"isDescriptionOf",
	"hasDescription",
	"isMetadataFor",
	"hasMetadata",
	"isAnnotationOf",
	"hasAnnotation",
	"hasEquivalent",
];

/// Canonical relationship predicate (an absolute URI).
///
/// # Examples
///
/// ```
/// use trellis_core::Predicate;
///
/// let p = Predicate::parse("http://purl.org/dc/terms/hasPart").unwrap();
/// assert_eq!(p.as_str(), "http://purl.org/dc/terms/hasPart");
/// assert!(Predicate::parse("hasPart").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Predicate(Arc<str>);

impl Predicate {
	/// Parse and validate an absolute URI.
	pub fn parse(uri: impl AsRef<str>) -> Result<Self, ConfigError> {
		let uri = uri.as_ref();
		url::Url::parse(uri).map_err(|e| ConfigError::InvalidPredicate {
			uri: uri.to_string(),
			reason: e.to_string(),
		})?;
		Ok(Self(Arc::from(uri)))
	}

	/// The URI text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<{}>", self.0)
	}
}

impl fmt::Display for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<String> for Predicate {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl From<Predicate> for String {
	fn from(value: Predicate) -> Self {
		value.0.to_string()
	}
}

/// Maps legacy property keys to predicates.
pub trait PredicateResolver: Send + Sync {
	/// Resolve `property`, failing when it is unknown.
	fn find_graph_predicate(&self, property: &str) -> Result<Predicate, LookupError>;
}

/// Table-backed [`PredicateResolver`].
///
/// # Examples
///
/// ```
/// use trellis_core::{PredicateResolver, PredicateTable};
///
/// let table = PredicateTable::fedora_relations();
/// let predicate = table.find_graph_predicate("is_member_of_collection").unwrap();
/// assert_eq!(
///     predicate.as_str(),
///     "info:fedora/fedora-system:def/relations-external#isMemberOfCollection"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PredicateTable {
	mappings: IndexMap<String, Predicate>,
}

impl PredicateTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Table preloaded with the Fedora external relations and `has_model`.
	pub fn fedora_relations() -> Self {
		let mut table = Self::new();
		for relation in FEDORA_RELATIONS {
			let uri = format!("{FEDORA_RELATIONS_NS}{relation}");
			table
				.mappings
				.insert(relation.to_case(Case::Snake), Predicate(Arc::from(uri)));
		}
		table.mappings.insert(
			"has_model".to_string(),
			Predicate(Arc::from(format!("{FEDORA_MODEL_NS}hasModel"))),
		);
		table
	}

	/// Map `property` to `predicate`, replacing any previous mapping.
	pub fn insert(&mut self, property: impl Into<String>, predicate: Predicate) -> &mut Self {
		self.mappings.insert(property.into(), predicate);
		self
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, property: impl Into<String>, predicate: Predicate) -> Self {
		self.insert(property, predicate);
		self
	}

	/// Mapped predicate for `property`.
	pub fn get(&self, property: &str) -> Option<&Predicate> {
		self.mappings.get(property)
	}

	/// Number of mappings.
	pub fn len(&self) -> usize {
		self.mappings.len()
	}

	/// Whether the table is empty.
	pub fn is_empty(&self) -> bool {
		self.mappings.is_empty()
	}
}

impl PredicateResolver for PredicateTable {
	fn find_graph_predicate(&self, property: &str) -> Result<Predicate, LookupError> {
		self.get(property)
			.cloned()
			.ok_or_else(|| LookupError::new(property))
	}
}
