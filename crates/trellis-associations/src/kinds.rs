//! Association kinds.
//!
//! Every builder is parameterized by exactly one [`AssociationKind`]. The
//! trait is sealed: the set of kinds is closed and each one must name its
//! macro and its allowed dependent policies.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use trellis_core::Name;

use crate::error::AssociationResult;
use crate::model::ModelClass;
use crate::reflection::Reflection;

mod belongs_to;
mod collection;
mod contains;
mod has_and_belongs_to_many;
mod has_many;

pub use belongs_to::BelongsTo;
pub use collection::CollectionEvent;
pub use contains::{DirectlyContains, IndirectlyContains};
pub use has_and_belongs_to_many::HasAndBelongsToMany;
pub use has_many::HasMany;

/// Tag identifying the kind of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
	BelongsTo,
	HasMany,
	HasAndBelongsToMany,
	DirectlyContains,
	IndirectlyContains,
}

impl Macro {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::BelongsTo => "belongs_to",
			Self::HasMany => "has_many",
			Self::HasAndBelongsToMany => "has_and_belongs_to_many",
			Self::DirectlyContains => "directly_contains",
			Self::IndirectlyContains => "indirectly_contains",
		}
	}

	/// Whether the association holds many related objects.
	pub fn is_collection(&self) -> bool {
		!matches!(self, Self::BelongsTo)
	}
}

impl fmt::Display for Macro {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Destroy-time cleanup requested for an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependentPolicy {
	Destroy,
	Delete,
	DeleteAll,
	Nullify,
	RestrictWithException,
	RestrictWithError,
}

impl DependentPolicy {
	pub const ALL: [Self; 6] = [
		Self::Destroy,
		Self::Delete,
		Self::DeleteAll,
		Self::Nullify,
		Self::RestrictWithException,
		Self::RestrictWithError,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Destroy => "destroy",
			Self::Delete => "delete",
			Self::DeleteAll => "delete_all",
			Self::Nullify => "nullify",
			Self::RestrictWithException => "restrict_with_exception",
			Self::RestrictWithError => "restrict_with_error",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|p| p.as_str() == name)
	}

	/// Whether the policy refuses the destroy while dependents exist.
	pub fn is_restrict(&self) -> bool {
		matches!(self, Self::RestrictWithException | Self::RestrictWithError)
	}
}

impl fmt::Display for DependentPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

mod sealed {
	pub trait Sealed {}

	impl Sealed for super::BelongsTo {}
	impl Sealed for super::HasMany {}
	impl Sealed for super::HasAndBelongsToMany {}
	impl Sealed for super::DirectlyContains {}
	impl Sealed for super::IndirectlyContains {}
}

/// Behavior fixed by a concrete association kind.
pub trait AssociationKind: sealed::Sealed {
	/// Macro recorded on every reflection this kind creates.
	const MACRO: Macro;

	/// Option keys recognized by this kind on top of the base keys.
	fn valid_options() -> Vec<&'static str> {
		Vec::new()
	}

	/// Policies accepted for the `dependent` option.
	fn valid_dependent_options() -> &'static [DependentPolicy];

	/// Adjust the association name before the reflection is created.
	fn better_name(name: Name) -> Name {
		name
	}

	/// Install kind-specific callbacks.
	fn define_callbacks(_model: &mut ModelClass, _reflection: &Arc<Reflection>) -> AssociationResult<()> {
		Ok(())
	}

	/// Install validations derived from the reflection.
	fn define_validations(
		_model: &mut ModelClass,
		_reflection: &Arc<Reflection>,
	) -> AssociationResult<()> {
		Ok(())
	}
}
