use std::sync::Arc;

use super::collection::{callback_options, define_collection_callbacks};
use super::{AssociationKind, DependentPolicy, Macro};
use crate::error::AssociationResult;
use crate::model::ModelClass;
use crate::options::{INVERSE_OF, SOLR_PAGE_SIZE};
use crate::reflection::Reflection;

/// Many-to-many association stored as a list of ids on the owner.
///
/// Related objects are never destroyed with the owner, so no dependent
/// policy is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasAndBelongsToMany;

impl AssociationKind for HasAndBelongsToMany {
	const MACRO: Macro = Macro::HasAndBelongsToMany;

	fn valid_options() -> Vec<&'static str> {
		[INVERSE_OF, SOLR_PAGE_SIZE]
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
