//! Association reflections.
//!
//! A [`Reflection`] is the metadata recorded for one declared association. It
//! is built once by the builder, shared as `Arc<Reflection>` and never
//! mutated afterwards.

use std::sync::Arc;

use trellis_core::{Name, Predicate, TypeValidator};

use crate::kinds::{DependentPolicy, Macro};
use crate::options::{AssociationOptions, CLASS_NAME, DEPENDENT, PREDICATE, TYPE_VALIDATOR};
use crate::scope::Scope;

/// Metadata describing one association of an owning type.
///
/// # Examples
///
/// ```
/// use trellis_associations::kinds::Macro;
/// use trellis_associations::options::AssociationOptions;
/// use trellis_associations::reflection::Reflection;
/// use trellis_core::Name;
///
/// let reflection = Reflection::new(
///     Macro::HasMany,
///     Name::new("comments").unwrap(),
///     None,
///     AssociationOptions::new(),
///     "Post",
/// );
///
/// assert_eq!(reflection.class_name(), "Comment");
/// assert!(reflection.is_collection());
/// ```
#[derive(Debug, Clone)]
pub struct Reflection {
	kind: Macro,
	name: Name,
	scope: Option<Scope>,
	options: AssociationOptions,
	model_name: String,
}

impl Reflection {
	pub fn new(
		kind: Macro,
		name: Name,
		scope: Option<Scope>,
		options: AssociationOptions,
		model_name: impl Into<String>,
	) -> Self {
		Self {
			kind,
			name,
			scope,
			options,
			model_name: model_name.into(),
		}
	}

	/// The association kind.
	pub fn macro_kind(&self) -> Macro {
		self.kind
	}

	pub fn name(&self) -> &Name {
		&self.name
	}

	pub fn scope(&self) -> Option<&Scope> {
		self.scope.as_ref()
	}

	pub fn options(&self) -> &AssociationOptions {
		&self.options
	}

	/// Name of the owning type.
	pub fn model_name(&self) -> &str {
		&self.model_name
	}

	/// Related class name: the `class_name` option when given, otherwise
	/// derived from the association name.
	pub fn class_name(&self) -> String {
		self.options
			.get(CLASS_NAME)
			.and_then(|v| v.as_text())
			.map(str::to_string)
			.unwrap_or_else(|| self.name.classify())
	}

	pub fn predicate(&self) -> Option<&Predicate> {
		self.options.get(PREDICATE).and_then(|v| v.as_predicate())
	}

	/// The requested dependent policy. Values are checked when the
	/// association is declared, so an unparsable value never gets here.
	pub fn dependent(&self) -> Option<DependentPolicy> {
		self.options
			.get(DEPENDENT)
			.and_then(|v| v.as_text())
			.and_then(DependentPolicy::from_name)
	}

	pub fn type_validator(&self) -> Option<&Arc<dyn TypeValidator>> {
		self.options
			.get(TYPE_VALIDATOR)
			.and_then(|v| v.as_type_validator())
	}

	pub fn is_collection(&self) -> bool {
		self.kind.is_collection()
	}
}
