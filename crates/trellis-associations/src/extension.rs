//! Builder extensions.
//!
//! An extension contributes extra option keys, a build hook that runs once per
//! declaration and a scope wrapper. Extensions are registered into an
//! [`ExtensionRegistry`] which is handed to every builder; registration order
//! is invocation order.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis_associations::extension::{Extension, ExtensionRegistry};
//!
//! struct Autosave;
//!
//! impl Extension for Autosave {
//!     fn name(&self) -> &str {
//!         "autosave"
//!     }
//!
//!     fn valid_options(&self) -> Vec<String> {
//!         vec!["autosave".to_string()]
//!     }
//! }
//!
//! let registry = ExtensionRegistry::new();
//! registry.register(Arc::new(Autosave)).unwrap();
//! assert_eq!(registry.valid_options(), vec!["autosave".to_string()]);
//! ```

use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;

use crate::error::{AssociationError, AssociationResult};
use crate::model::ModelClass;
use crate::reflection::Reflection;
use crate::scope::Scope;

/// A pluggable contribution to every association declaration.
pub trait Extension: Send + Sync {
	/// Unique extension name.
	fn name(&self) -> &str;

	/// Additional option keys this extension recognizes.
	fn valid_options(&self) -> Vec<String> {
		Vec::new()
	}

	/// Called once per declaration after accessors and dependent callbacks
	/// are installed.
	///
	/// # Errors
	///
	/// Any error aborts the declaration and the owning type is restored.
	fn build(&self, _model: &mut ModelClass, _reflection: &Arc<Reflection>) -> AssociationResult<()> {
		Ok(())
	}

	/// Transform a composed scope. Identity by default.
	fn wrap_scope(&self, scope: Scope) -> Scope {
		scope
	}
}

/// Ordered, append-only list of extensions.
#[derive(Default)]
pub struct ExtensionRegistry {
	extensions: RwLock<Vec<Arc<dyn Extension>>>,
}

impl ExtensionRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an extension.
	///
	/// # Errors
	///
	/// Returns [`AssociationError::DuplicateExtension`] when an extension with
	/// the same name is already registered.
	pub fn register(&self, extension: Arc<dyn Extension>) -> AssociationResult<()> {
		let mut extensions = self.extensions.write();
		if extensions.iter().any(|e| e.name() == extension.name()) {
			return Err(AssociationError::DuplicateExtension(
				extension.name().to_string(),
			));
		}
		tracing::debug!(
			target: "trellis::associations",
			extension = extension.name(),
			position = extensions.len(),
			"registered association extension"
		);
		extensions.push(extension);
		Ok(())
	}

	/// Builder-style [`register`](Self::register).
	pub fn with(self, extension: Arc<dyn Extension>) -> AssociationResult<Self> {
		self.register(extension)?;
		Ok(self)
	}

	/// Copy of the current list. Declarations work against a snapshot so the
	/// lock is never held while extension code runs.
	pub fn snapshot(&self) -> Vec<Arc<dyn Extension>> {
		self.extensions.read().clone()
	}

	/// Flattened option keys of every extension, duplicates collapsed.
	pub fn valid_options(&self) -> Vec<String> {
		self.extensions
			.read()
			.iter()
			.flat_map(|e| e.valid_options())
			.collect::<IndexSet<_>>()
			.into_iter()
			.collect()
	}

	pub fn names(&self) -> Vec<String> {
		self.extensions
			.read()
			.iter()
			.map(|e| e.name().to_string())
			.collect()
	}

	pub fn len(&self) -> usize {
		self.extensions.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.extensions.read().is_empty()
	}
}

impl std::fmt::Debug for ExtensionRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExtensionRegistry")
			.field("extensions", &self.names())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Keys(&'static str, &'static [&'static str]);

	impl Extension for Keys {
		fn name(&self) -> &str {
			self.0
		}

		fn valid_options(&self) -> Vec<String> {
			self.1.iter().map(|k| k.to_string()).collect()
		}
	}

	#[rstest]
	fn test_registration_order_is_kept() {
		let registry = ExtensionRegistry::new()
			.with(Arc::new(Keys("first", &[])))
			.unwrap()
			.with(Arc::new(Keys("second", &[])))
			.unwrap();

		assert_eq!(registry.names(), vec!["first", "second"]);
		assert_eq!(registry.len(), 2);
	}

	#[rstest]
	fn test_duplicate_name_is_rejected() {
		let registry = ExtensionRegistry::new();
		registry.register(Arc::new(Keys("autosave", &[]))).unwrap();

		let err = registry
			.register(Arc::new(Keys("autosave", &[])))
			.unwrap_err();

		assert!(matches!(err, AssociationError::DuplicateExtension(ref n) if n == "autosave"));
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_valid_options_are_flattened_and_deduplicated() {
		let registry = ExtensionRegistry::new()
			.with(Arc::new(Keys("a", &["autosave", "counter_cache"])))
			.unwrap()
			.with(Arc::new(Keys("b", &["counter_cache", "touch"])))
			.unwrap();

		assert_eq!(
			registry.valid_options(),
			vec!["autosave", "counter_cache", "touch"]
		);
	}

	#[rstest]
	fn test_empty_registry() {
		let registry = ExtensionRegistry::new();
		assert!(registry.is_empty());
		assert!(registry.valid_options().is_empty());
		assert!(registry.snapshot().is_empty());
	}
}
