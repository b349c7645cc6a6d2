//! # Trellis Associations
//!
//! Declarative associations for owning types.
//!
//! An association is declared through an [`AssociationBuilder`] parameterized
//! by its kind ([`BelongsTo`], [`HasMany`], [`HasAndBelongsToMany`],
//! [`DirectlyContains`], [`IndirectlyContains`]). A declaration produces an
//! immutable [`Reflection`] and wires the owning [`ModelClass`]:
//!
//! - reader `name` and writer `name=` in the generated-methods table
//! - a before-destroy hook when a `dependent` policy is requested
//! - whatever registered [`Extension`]s add in their build hooks
//! - collection add/remove callbacks and kind validations
//!
//! Generated methods delegate to the per-instance [`AssociationRuntime`]
//! found through [`Record::association`]. [`memory`] provides an in-memory
//! runtime.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis_associations::prelude::*;
//! use trellis_core::{Name, PredicateTable, TracingDeprecator};
//!
//! let builder = AssociationBuilder::new(
//!     Arc::new(ExtensionRegistry::new()),
//!     Arc::new(PredicateTable::fedora_relations()),
//!     Arc::new(TracingDeprecator::default()),
//! );
//!
//! let mut post = ModelClass::new("Post");
//! builder
//!     .build::<BelongsTo>(
//!         &mut post,
//!         Name::new("author").unwrap(),
//!         AssociationOptions::new().class_name("Person"),
//!     )
//!     .unwrap();
//!
//! let reflection = post.reflect_on_association("author").unwrap();
//! assert_eq!(reflection.class_name(), "Person");
//! assert!(post.generated_association_methods().contains("author="));
//! ```

pub mod builder;
pub mod error;
pub mod extension;
pub mod kinds;
pub mod memory;
pub mod model;
pub mod options;
pub mod reflection;
pub mod runtime;
pub mod scope;

pub use builder::AssociationBuilder;
pub use error::{AssociationError, AssociationResult};
pub use extension::{Extension, ExtensionRegistry};
pub use kinds::{
	AssociationKind, BelongsTo, CollectionEvent, DependentPolicy, DirectlyContains,
	HasAndBelongsToMany, HasMany, IndirectlyContains, Macro,
};
pub use model::{Accessor, GeneratedMethods, ModelClass, ValidationErrors};
pub use options::AssociationOptions;
pub use reflection::Reflection;
pub use runtime::{AssociationRuntime, DependencyHandler, Record};
pub use scope::{Condition, RawScope, Relation, Scope, ScopeContext};

/// Re-exports for declaring associations.
pub mod prelude {
	pub use crate::builder::AssociationBuilder;
	pub use crate::error::{AssociationError, AssociationResult};
	pub use crate::extension::{Extension, ExtensionRegistry};
	pub use crate::kinds::{
		BelongsTo, DependentPolicy, DirectlyContains, HasAndBelongsToMany, HasMany,
		IndirectlyContains,
	};
	pub use crate::model::ModelClass;
	pub use crate::options::AssociationOptions;
	pub use crate::reflection::Reflection;
	pub use crate::runtime::{AssociationRuntime, Record};
	pub use crate::scope::{RawScope, Relation};
}
