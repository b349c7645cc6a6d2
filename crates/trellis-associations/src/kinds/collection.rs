//! Add/remove callbacks shared by the collection kinds.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use trellis_core::{ConfigError, Name, OptionValue};

use crate::error::AssociationResult;
use crate::model::ModelClass;
use crate::reflection::Reflection;

/// Collection lifecycle event a callback can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionEvent {
	BeforeAdd,
	AfterAdd,
	BeforeRemove,
	AfterRemove,
}

impl CollectionEvent {
	pub const ALL: [Self; 4] = [
		Self::BeforeAdd,
		Self::AfterAdd,
		Self::BeforeRemove,
		Self::AfterRemove,
	];

	/// Option key the callbacks are declared under.
	pub fn option_key(&self) -> &'static str {
		match self {
			Self::BeforeAdd => "before_add",
			Self::AfterAdd => "after_add",
			Self::BeforeRemove => "before_remove",
			Self::AfterRemove => "after_remove",
		}
	}
}

impl fmt::Display for CollectionEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.option_key())
	}
}

const CALLBACK_SHAPE: &str = "a method name or a list of method names";

pub(super) fn callback_options() -> impl Iterator<Item = &'static str> {
	CollectionEvent::ALL.into_iter().map(|e| e.option_key())
}

/// Store the callbacks declared under the event keys, keyed by
/// `(association, event)`. Events without a key are left empty.
pub(super) fn define_collection_callbacks(
	model: &mut ModelClass,
	reflection: &Arc<Reflection>,
) -> AssociationResult<()> {
	for event in CollectionEvent::ALL {
		let Some(value) = reflection.options().get(event.option_key()) else {
			continue;
		};
		let callbacks = callback_names(event.option_key(), value)?;
		tracing::debug!(
			target: "trellis::associations",
			association = %reflection.name(),
			%event,
			count = callbacks.len(),
			"defining collection callbacks"
		);
		model.set_collection_callbacks(reflection.name().clone(), event, callbacks);
	}
	Ok(())
}

fn callback_names(key: &str, value: &OptionValue) -> Result<Vec<Name>, ConfigError> {
	let invalid = || ConfigError::InvalidOptionValue {
		key: key.to_string(),
		expected: CALLBACK_SHAPE,
	};
	match value {
		OptionValue::List(items) => items
			.iter()
			.map(|item| item.as_text().ok_or_else(invalid).and_then(Name::new))
			.collect(),
		other => {
			let text = other.as_text().ok_or_else(invalid)?;
			Ok(vec![Name::new(text)?])
		}
	}
}
