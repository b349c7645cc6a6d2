//! Container associations backed by LDP direct and indirect containers.

use std::sync::Arc;

use super::collection::{callback_options, define_collection_callbacks};
use super::{AssociationKind, DependentPolicy, Macro};
use crate::error::AssociationResult;
use crate::model::ModelClass;
use crate::options::{
	FOREIGN_KEY, HAS_MEMBER_RELATION, INSERTED_CONTENT_RELATION, IS_MEMBER_OF_RELATION, THROUGH,
};
use crate::reflection::Reflection;

const CONTAINER_OPTIONS: [&str; 4] = [
	HAS_MEMBER_RELATION,
	IS_MEMBER_OF_RELATION,
	INSERTED_CONTENT_RELATION,
	THROUGH,
];

/// Members are stored directly in a container resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectlyContains;

impl AssociationKind for DirectlyContains {
	const MACRO: Macro = Macro::DirectlyContains;

	fn valid_options() -> Vec<&'static str> {
		CONTAINER_OPTIONS
			.into_iter()
			.chain(callback_options())
			.collect()
	}

	fn valid_dependent_options() -> &'static [DependentPolicy] {
		&[]
	}

	fn define_callbacks(model: &mut ModelClass, reflection: &Arc<Reflection>) -> AssociationResult<()> {
		define_collection_callbacks(model, reflection)
	}
}

/// Members are reached through proxy resources in a container.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndirectlyContains;

impl AssociationKind for IndirectlyContains {
	const MACRO: Macro = Macro::IndirectlyContains;

	fn valid_options() -> Vec<&'static str> {
		CONTAINER_OPTIONS
			.into_iter()
			.chain([FOREIGN_KEY])
			.chain(callback_options())
			.collect()
	}

	fn valid_dependent_options() -> &'static [DependentPolicy] {
		&[]
	}

	fn define_callbacks(model: &mut ModelClass, reflection: &Arc<Reflection>) -> AssociationResult<()> {
		define_collection_callbacks(model, reflection)
	}
}
