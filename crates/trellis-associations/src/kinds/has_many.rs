use std::sync::Arc;

use super::collection::{callback_options, define_collection_callbacks};
use super::{AssociationKind, DependentPolicy, Macro};
use crate::error::AssociationResult;
use crate::model::ModelClass;
use crate::options::{AS, DEPENDENT, INVERSE_OF};
use crate::reflection::Reflection;

/// One owner, many related objects that point back at it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasMany;

impl AssociationKind for HasMany {
	const MACRO: Macro = Macro::HasMany;

	fn valid_options() -> Vec<&'static str> {
		[AS, DEPENDENT, INVERSE_OF]
			.into_iter()
			.chain(callback_options())
			.collect()
	}

	fn valid_dependent_options() -> &'static [DependentPolicy] {
		&[
			DependentPolicy::Destroy,
			DependentPolicy::DeleteAll,
			DependentPolicy::Nullify,
			DependentPolicy::RestrictWithException,
			DependentPolicy::RestrictWithError,
		]
	}

	fn define_callbacks(model: &mut ModelClass, reflection: &Arc<Reflection>) -> AssociationResult<()> {
		define_collection_callbacks(model, reflection)
	}
}
