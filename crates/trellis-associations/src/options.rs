//! Association options and key validation.
//!
//! Options are an insertion-ordered map from key to [`OptionValue`]. Which
//! keys are recognized depends on the association kind and the registered
//! extensions; [`validate_options`] rejects the whole map when any key falls
//! outside that set.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use trellis_core::{ConfigError, OptionValue, Predicate, TypeValidator};

use crate::kinds::DependentPolicy;

pub const CLASS_NAME: &str = "class_name";
pub const PREDICATE: &str = "predicate";
pub const TYPE_VALIDATOR: &str = "type_validator";
/// Deprecated alias of [`PREDICATE`].
pub const PROPERTY: &str = "property";
pub const DEPENDENT: &str = "dependent";
pub const INVERSE_OF: &str = "inverse_of";
pub const REQUIRED: &str = "required";
pub const OPTIONAL: &str = "optional";
pub const AS: &str = "as";
pub const SOLR_PAGE_SIZE: &str = "solr_page_size";
pub const HAS_MEMBER_RELATION: &str = "has_member_relation";
pub const IS_MEMBER_OF_RELATION: &str = "is_member_of_relation";
pub const INSERTED_CONTENT_RELATION: &str = "inserted_content_relation";
pub const THROUGH: &str = "through";
pub const FOREIGN_KEY: &str = "foreign_key";

/// Keys every association kind accepts.
pub const VALID_OPTIONS: &[&str] = &[CLASS_NAME, PREDICATE, TYPE_VALIDATOR];

/// Configuration supplied when declaring an association.
///
/// # Examples
///
/// ```
/// use trellis_associations::options::AssociationOptions;
/// use trellis_associations::kinds::DependentPolicy;
///
/// let options = AssociationOptions::new()
///     .class_name("Comment")
///     .dependent(DependentPolicy::Destroy);
///
/// assert_eq!(options.len(), 2);
/// assert_eq!(options.get("class_name").and_then(|v| v.as_text()), Some("Comment"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationOptions {
	entries: IndexMap<String, OptionValue>,
}

impl AssociationOptions {
	/// Create an empty option map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
		self.insert(key, value);
		self
	}

	/// Insert or replace `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
		self.entries.insert(key.into(), value.into());
	}

	/// Remove `key`, keeping the order of the remaining entries.
	pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
		self.entries.shift_remove(key)
	}

	pub fn get(&self, key: &str) -> Option<&OptionValue> {
		self.entries.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Set `class_name`.
	pub fn class_name(self, class_name: impl Into<String>) -> Self {
		self.with(CLASS_NAME, OptionValue::Str(class_name.into()))
	}

	/// Set `predicate`.
	pub fn predicate(self, predicate: Predicate) -> Self {
		self.with(PREDICATE, predicate)
	}

	/// Set the deprecated `property` alias.
	pub fn property(self, property: impl Into<String>) -> Self {
		self.with(PROPERTY, OptionValue::symbol(property))
	}

	/// Set `dependent`.
	pub fn dependent(self, policy: DependentPolicy) -> Self {
		self.with(DEPENDENT, OptionValue::symbol(policy.as_str()))
	}

	/// Set `type_validator`.
	pub fn type_validator(self, validator: Arc<dyn TypeValidator>) -> Self {
		self.with(TYPE_VALIDATOR, validator)
	}
}

impl<K: Into<String>> FromIterator<(K, OptionValue)> for AssociationOptions {
	fn from_iter<T: IntoIterator<Item = (K, OptionValue)>>(iter: T) -> Self {
		Self {
			entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
		}
	}
}

/// Check every key of `options` against `valid`.
///
/// The legacy [`PROPERTY`] key is never checked; it is translated into
/// [`PREDICATE`] afterwards. On failure every unrecognized key is reported at
/// once and nothing is modified.
pub fn validate_options(
	options: &AssociationOptions,
	valid: &IndexSet<String>,
) -> Result<(), ConfigError> {
	let unknown: Vec<String> = options
		.keys()
		.filter(|key| *key != PROPERTY && !valid.contains(*key))
		.map(str::to_string)
		.collect();

	if unknown.is_empty() {
		return Ok(());
	}

	Err(ConfigError::UnknownKeys {
		keys: unknown,
		valid: valid.iter().cloned().collect(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn base_keys() -> IndexSet<String> {
		VALID_OPTIONS.iter().map(|k| k.to_string()).collect()
	}

	#[rstest]
	fn test_base_keys_pass(base_keys: IndexSet<String>) {
		let options = AssociationOptions::new()
			.class_name("Comment")
			.predicate(Predicate::parse("http://example.org/ns#comment").unwrap());

		assert!(validate_options(&options, &base_keys).is_ok());
	}

	#[rstest]
	fn test_unknown_keys_are_all_reported(base_keys: IndexSet<String>) {
		let options = AssociationOptions::new()
			.with("foo", true)
			.class_name("Comment")
			.with("bar", 1_i64);

		let err = validate_options(&options, &base_keys).unwrap_err();

		assert_eq!(
			err,
			ConfigError::UnknownKeys {
				keys: vec!["foo".to_string(), "bar".to_string()],
				valid: vec![
					"class_name".to_string(),
					"predicate".to_string(),
					"type_validator".to_string(),
				],
			}
		);
	}

	#[rstest]
	fn test_legacy_property_is_not_checked(base_keys: IndexSet<String>) {
		let options = AssociationOptions::new().property("has_part");
		assert!(validate_options(&options, &base_keys).is_ok());
	}

	#[rstest]
	fn test_remove_keeps_order() {
		let mut options = AssociationOptions::new()
			.with("a", true)
			.with("b", true)
			.with("c", true);

		options.remove("b");

		assert_eq!(options.keys().collect::<Vec<_>>(), vec!["a", "c"]);
	}

	#[rstest]
	fn test_dependent_is_stored_as_symbol() {
		let options = AssociationOptions::new().dependent(DependentPolicy::DeleteAll);
		assert_eq!(
			options.get(DEPENDENT),
			Some(&OptionValue::symbol("delete_all"))
		);
	}
}
