use std::sync::Arc;

use serde_json::Value;

use super::{AssociationKind, DependentPolicy, Macro};
use crate::error::AssociationResult;
use crate::model::ModelClass;
use crate::options::{DEPENDENT, INVERSE_OF, OPTIONAL, REQUIRED};
use crate::reflection::Reflection;

/// The owner points at a single related object.
#[derive(Debug, Clone, Copy, Default)]
pub struct BelongsTo;

impl AssociationKind for BelongsTo {
	const MACRO: Macro = Macro::BelongsTo;

	fn valid_options() -> Vec<&'static str> {
		vec![DEPENDENT, INVERSE_OF, REQUIRED, OPTIONAL]
	}

	fn valid_dependent_options() -> &'static [DependentPolicy] {
		&[DependentPolicy::Destroy, DependentPolicy::Delete]
	}

	/// `required: true` or `optional: false` adds a presence validation named
	/// after the association.
	fn define_validations(model: &mut ModelClass, reflection: &Arc<Reflection>) -> AssociationResult<()> {
		let options = reflection.options();
		let required = options.get(REQUIRED).and_then(|v| v.as_bool()) == Some(true)
			|| options.get(OPTIONAL).and_then(|v| v.as_bool()) == Some(false);
		if !required {
			return Ok(());
		}

		let name = reflection.name().clone();
		let attribute = name.to_string();
		tracing::debug!(
			target: "trellis::associations",
			association = %name,
			"adding presence validation"
		);
		model.validate_with(name.clone(), attribute, move |record| {
			let value = record.association(&name)?.reader(&[])?;
			Ok(is_blank(&value).then(|| "must exist".to_string()))
		});
		Ok(())
	}
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::Object(fields) => fields.is_empty(),
		_ => false,
	}
}
