//! # Trellis
//!
//! Declarative associations for object-graph models.
//!
//! An owning type declares its relationships (`belongs_to`, `has_many`,
//! `has_and_belongs_to_many`, `directly_contains`, `indirectly_contains`)
//! through an [`AssociationBuilder`]. Each declaration validates its options,
//! records an immutable [`Reflection`] and installs reader and writer methods
//! that delegate to a per-instance association runtime.
//!
//! ## Crates
//!
//! - [`core`]: names, option values, predicates, deprecation notices
//! - [`conf`]: settings from TOML and the environment (feature `conf`)
//! - [`associations`]: the builder, kinds, reflections and runtimes
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use trellis::prelude::*;
//!
//! let builder = AssociationBuilder::new(
//!     Arc::new(ExtensionRegistry::new()),
//!     Arc::new(PredicateTable::fedora_relations()),
//!     Arc::new(TracingDeprecator::default()),
//! );
//!
//! let mut post = ModelClass::new("Post");
//! builder
//!     .build::<HasMany>(
//!         &mut post,
//!         Name::new("comments").unwrap(),
//!         AssociationOptions::new().dependent(DependentPolicy::Destroy),
//!     )
//!     .unwrap();
//!
//! let mut record = MemoryRecord::for_model(&post, 1);
//! post.write(&mut record, "comments", json!([{"id": 7}])).unwrap();
//! record.destroy(&post).unwrap();
//! assert_eq!(post.read(&mut record, "comments", &[]).unwrap(), json!([]));
//! ```

pub mod associations;
#[cfg(feature = "conf")]
pub mod conf;
pub mod core;

pub use trellis_associations::{
	AssociationBuilder, AssociationError, AssociationKind, AssociationResult, Extension,
	ExtensionRegistry, ModelClass, Reflection,
};
#[cfg(feature = "conf")]
pub use trellis_conf::{AssociationSettings, SettingsError};
pub use trellis_core::{ConfigError, LookupError, Name};

/// Everything needed to declare associations.
pub mod prelude {
	pub use trellis_associations::memory::{MemoryAssociation, MemoryRecord};
	pub use trellis_associations::prelude::*;
	pub use trellis_core::{
		Deprecator, Name, OptionValue, Predicate, PredicateResolver, PredicateTable,
		TracingDeprecator,
	};

	#[cfg(feature = "conf")]
	pub use trellis_conf::AssociationSettings;
}
