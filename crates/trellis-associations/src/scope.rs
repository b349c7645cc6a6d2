//! Association scopes.
//!
//! A scope narrows the candidate related objects when an association is read.
//! Callers supply a [`RawScope`]; [`build_scope`] turns it into the [`Scope`]
//! stored on the reflection, binding nullary scopes to the runtime context and
//! piping the result through every extension's scope wrapper.
//!
//! A nullary scope takes no reader arguments but is evaluated against the
//! [`ScopeContext`] of the association runtime reading it, so it can refer to
//! the owning instance:
//!
//! ```rust
//! use serde_json::json;
//! use trellis_associations::scope::{RawScope, Relation, ScopeContext, build_scope};
//! use trellis_core::Name;
//!
//! let raw = RawScope::nullary(|context| {
//!     context.relation().clone().where_eq("post_id", context.owner_id().clone())
//! });
//! let scope = build_scope(Some(raw), &[]).unwrap();
//!
//! let context = ScopeContext::new(Name::new("comments").unwrap(), 42, Relation::new());
//! assert_eq!(scope.call(&context, &[]).condition("post_id"), Some(&json!(42)));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_core::Name;

use crate::extension::Extension;

/// A single equality condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
	pub field: String,
	pub value: Value,
}

/// Description of a query over related objects.
///
/// Scopes only describe the query; running it is the association runtime's
/// business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
	pub conditions: Vec<Condition>,
	pub order: Vec<String>,
	pub limit: Option<usize>,
}

impl Relation {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an equality condition.
	pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.conditions.push(Condition {
			field: field.into(),
			value: value.into(),
		});
		self
	}

	/// Append an ordering field.
	pub fn order(mut self, field: impl Into<String>) -> Self {
		self.order.push(field.into());
		self
	}

	/// Cap the number of results.
	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	/// Value of the first condition on `field`.
	pub fn condition(&self, field: &str) -> Option<&Value> {
		self.conditions
			.iter()
			.find(|c| c.field == field)
			.map(|c| &c.value)
	}
}

/// Runtime context a scope is evaluated in: the association being read and
/// the relation it starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeContext {
	association: Name,
	owner_id: Value,
	relation: Relation,
}

impl ScopeContext {
	pub fn new(association: Name, owner_id: impl Into<Value>, relation: Relation) -> Self {
		Self {
			association,
			owner_id: owner_id.into(),
			relation,
		}
	}

	pub fn association(&self) -> &Name {
		&self.association
	}

	pub fn owner_id(&self) -> &Value {
		&self.owner_id
	}

	pub fn relation(&self) -> &Relation {
		&self.relation
	}
}

type NullaryFn = dyn Fn(&ScopeContext) -> Relation + Send + Sync;
type ScopeFn = dyn Fn(&ScopeContext, &[Value]) -> Relation + Send + Sync;

/// A scope as written at the declaration site.
#[derive(Clone)]
pub enum RawScope {
	/// Takes no reader arguments; runs against the reading runtime's context.
	Nullary(Arc<NullaryFn>),
	/// Receives the runtime context and the reader's arguments explicitly.
	Parameterized(Arc<ScopeFn>),
}

impl RawScope {
	pub fn nullary<F>(f: F) -> Self
	where
		F: Fn(&ScopeContext) -> Relation + Send + Sync + 'static,
	{
		Self::Nullary(Arc::new(f))
	}

	pub fn parameterized<F>(f: F) -> Self
	where
		F: Fn(&ScopeContext, &[Value]) -> Relation + Send + Sync + 'static,
	{
		Self::Parameterized(Arc::new(f))
	}
}

impl fmt::Debug for RawScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Nullary(_) => f.write_str("RawScope::Nullary(..)"),
			Self::Parameterized(_) => f.write_str("RawScope::Parameterized(..)"),
		}
	}
}

/// A composed, callable scope.
#[derive(Clone)]
pub struct Scope {
	call: Arc<ScopeFn>,
	late_bound: bool,
}

impl Scope {
	/// Wrap a context-aware callable.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&ScopeContext, &[Value]) -> Relation + Send + Sync + 'static,
	{
		Self {
			call: Arc::new(f),
			late_bound: false,
		}
	}

	/// Whether the scope was declared without arguments and is evaluated
	/// against the runtime's own context.
	pub fn is_late_bound(&self) -> bool {
		self.late_bound
	}

	/// Evaluate the scope.
	pub fn call(&self, context: &ScopeContext, args: &[Value]) -> Relation {
		(self.call)(context, args)
	}

	/// Post-process the relation this scope produces.
	pub fn map<F>(self, f: F) -> Self
	where
		F: Fn(Relation) -> Relation + Send + Sync + 'static,
	{
		let inner = self.call;
		Self {
			call: Arc::new(move |context: &ScopeContext, args: &[Value]| f(inner(context, args))),
			late_bound: self.late_bound,
		}
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Scope")
			.field("late_bound", &self.late_bound)
			.finish_non_exhaustive()
	}
}

/// Compose the scope stored on a reflection.
///
/// Absent stays absent. Extension wrappers run in registration order and only
/// when a scope exists.
pub fn build_scope(raw: Option<RawScope>, extensions: &[Arc<dyn Extension>]) -> Option<Scope> {
	let scope = match raw? {
		RawScope::Nullary(f) => Scope {
			call: Arc::new(move |context: &ScopeContext, _args: &[Value]| f(context)),
			late_bound: true,
		},
		RawScope::Parameterized(f) => Scope {
			call: f,
			late_bound: false,
		},
	};

	Some(
		extensions
			.iter()
			.fold(scope, |scope, extension| extension.wrap_scope(scope)),
	)
}
