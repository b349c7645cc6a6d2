//! In-memory association runtimes.
//!
//! Holds related objects as JSON values. Used for wiring tests and as a
//! reference for storage-backed runtimes.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use trellis_core::Name;

use crate::error::{AssociationError, AssociationResult};
use crate::kinds::DependentPolicy;
use crate::model::ModelClass;
use crate::reflection::Reflection;
use crate::runtime::{AssociationRuntime, DependencyHandler, Record};
use crate::scope::{Relation, ScopeContext};

/// Runtime for one association of one in-memory record.
#[derive(Debug, Clone)]
pub struct MemoryAssociation {
	reflection: Arc<Reflection>,
	owner_id: Value,
	target: Value,
	handles_dependencies: bool,
	handled: Option<DependentPolicy>,
}

impl MemoryAssociation {
	pub fn new(reflection: Arc<Reflection>, owner_id: impl Into<Value>) -> Self {
		let target = if reflection.is_collection() {
			Value::Array(Vec::new())
		} else {
			Value::Null
		};
		Self {
			reflection,
			owner_id: owner_id.into(),
			target,
			handles_dependencies: true,
			handled: None,
		}
	}

	/// Runtime that does not offer destroy-time cleanup.
	pub fn without_dependency_handling(mut self) -> Self {
		self.handles_dependencies = false;
		self
	}

	pub fn reflection(&self) -> &Arc<Reflection> {
		&self.reflection
	}

	/// Loaded target, unscoped.
	pub fn target(&self) -> &Value {
		&self.target
	}

	/// Policy applied by the last [`DependencyHandler::handle_dependency`]
	/// call.
	pub fn handled(&self) -> Option<DependentPolicy> {
		self.handled
	}

	fn has_dependents(&self) -> bool {
		match &self.target {
			Value::Null => false,
			Value::Array(items) => !items.is_empty(),
			_ => true,
		}
	}

	fn clear(&mut self) {
		self.target = if self.reflection.is_collection() {
			Value::Array(Vec::new())
		} else {
			Value::Null
		};
	}

	fn runtime_error(&self, message: impl Into<String>) -> AssociationError {
		AssociationError::Runtime {
			association: self.reflection.name().clone(),
			message: message.into(),
		}
	}

	fn check_type(&self, item: &Value) -> AssociationResult<()> {
		let (Some(validator), Some(type_name)) = (
			self.reflection.type_validator(),
			item.get("type").and_then(Value::as_str),
		) else {
			return Ok(());
		};
		if validator.validate(type_name) {
			Ok(())
		} else {
			Err(self.runtime_error(format!("{type_name} is not an acceptable type")))
		}
	}
}

impl AssociationRuntime for MemoryAssociation {
	/// Collections are filtered through the reflection's scope, if any.
	/// Conditions are matched against object fields and the limit is applied;
	/// ordering is left to storage-backed runtimes.
	fn reader(&mut self, args: &[Value]) -> AssociationResult<Value> {
		let (Some(scope), Value::Array(items)) = (self.reflection.scope(), &self.target) else {
			return Ok(self.target.clone());
		};

		let context = ScopeContext::new(
			self.reflection.name().clone(),
			self.owner_id.clone(),
			Relation::new(),
		);
		let relation = scope.call(&context, args);
		let matching = items
			.iter()
			.filter(|item| {
				relation
					.conditions
					.iter()
					.all(|c| item.get(&c.field) == Some(&c.value))
			})
			.take(relation.limit.unwrap_or(usize::MAX))
			.cloned()
			.collect();
		Ok(Value::Array(matching))
	}

	fn writer(&mut self, value: Value) -> AssociationResult<()> {
		match (&value, self.reflection.is_collection()) {
			(Value::Array(items), true) => {
				for item in items {
					self.check_type(item)?;
				}
			}
			(_, true) => return Err(self.runtime_error("expected an array of objects")),
			(Value::Array(_), false) => return Err(self.runtime_error("expected a single object")),
			(item, false) => self.check_type(item)?,
		}
		self.target = value;
		Ok(())
	}

	fn as_dependency_handler(&mut self) -> Option<&mut dyn DependencyHandler> {
		if self.handles_dependencies {
			Some(self as &mut dyn DependencyHandler)
		} else {
			None
		}
	}
}

impl DependencyHandler for MemoryAssociation {
	fn handle_dependency(&mut self) -> AssociationResult<()> {
		let Some(policy) = self.reflection.dependent() else {
			return Ok(());
		};
		if policy.is_restrict() && self.has_dependents() {
			return Err(AssociationError::DeleteRestricted {
				association: self.reflection.name().clone(),
			});
		}
		tracing::debug!(
			target: "trellis::associations",
			association = %self.reflection.name(),
			%policy,
			"handling dependents"
		);
		if !policy.is_restrict() {
			self.clear();
		}
		self.handled = Some(policy);
		Ok(())
	}
}

/// A record whose associations are all [`MemoryAssociation`]s.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
	model: String,
	id: Value,
	associations: IndexMap<Name, MemoryAssociation>,
	destroyed: bool,
}

impl MemoryRecord {
	/// Create a record with one runtime per declared association of `model`.
	pub fn for_model(model: &ModelClass, id: impl Into<Value>) -> Self {
		let id = id.into();
		let associations = model
			.reflections()
			.map(|r| {
				(
					r.name().clone(),
					MemoryAssociation::new(r.clone(), id.clone()),
				)
			})
			.collect();
		Self {
			model: model.name().to_string(),
			id,
			associations,
			destroyed: false,
		}
	}

	/// Replace the runtime for one association.
	pub fn with_runtime(mut self, runtime: MemoryAssociation) -> Self {
		self.associations
			.insert(runtime.reflection().name().clone(), runtime);
		self
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn id(&self) -> &Value {
		&self.id
	}

	pub fn runtime(&self, name: &str) -> Option<&MemoryAssociation> {
		self.associations.get(name)
	}

	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	/// Run `model`'s before-destroy chain and mark the record destroyed.
	///
	/// # Errors
	///
	/// A failing hook aborts the destroy and the record stays live.
	pub fn destroy(&mut self, model: &ModelClass) -> AssociationResult<()> {
		model.run_before_destroy(self)?;
		self.destroyed = true;
		Ok(())
	}
}

impl Record for MemoryRecord {
	fn association(&mut self, name: &Name) -> AssociationResult<&mut dyn AssociationRuntime> {
		match self.associations.get_mut(name) {
			Some(runtime) => Ok(runtime as &mut dyn AssociationRuntime),
			None => Err(AssociationError::UnknownAssociation(name.clone())),
		}
	}
}
