//! Owning types.
//!
//! [`ModelClass`] is the per-type metadata an association declaration writes
//! into: the generated-methods table, the reflection table, the before-destroy
//! hook chain, the collection callback table and the validation chain.
//!
//! Every entry a declaration adds is tagged with the association it came
//! from, so re-declaring an association replaces its entries instead of
//! stacking new ones on top.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
#[cfg(feature = "conf")]
use trellis_conf::ModelSettings;
use trellis_core::Name;

use crate::error::{AssociationError, AssociationResult};
use crate::kinds::CollectionEvent;
use crate::reflection::Reflection;
use crate::runtime::Record;

/// Method names association names must not shadow.
pub const DEFAULT_RESERVED_METHODS: &[&str] = &[
	"association",
	"attributes",
	"class",
	"delete",
	"destroy",
	"errors",
	"freeze",
	"hash",
	"id",
	"inspect",
	"new_record",
	"object_id",
	"persisted",
	"reload",
	"save",
	"send",
	"transaction",
	"update",
	"valid",
];

/// Callable generated method.
pub type MethodFn = dyn Fn(&mut dyn Record, &[Value]) -> AssociationResult<Value> + Send + Sync;
/// Before-destroy hook.
pub type DestroyHook = dyn Fn(&mut dyn Record) -> AssociationResult<()> + Send + Sync;
/// Validation check. `Ok(Some(message))` marks the attribute invalid.
pub type ValidationFn = dyn Fn(&mut dyn Record) -> AssociationResult<Option<String>> + Send + Sync;

/// What a generated method does when called.
#[derive(Clone)]
pub enum Accessor {
	/// Delegates to the runtime's `reader`.
	Reader(Name),
	/// Delegates to the runtime's `writer`. Takes exactly one argument.
	Writer(Name),
	/// Arbitrary method installed by an extension.
	Method(Arc<MethodFn>),
}

impl fmt::Debug for Accessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Reader(name) => f.debug_tuple("Reader").field(name).finish(),
			Self::Writer(name) => f.debug_tuple("Writer").field(name).finish(),
			Self::Method(_) => f.write_str("Method(..)"),
		}
	}
}

#[derive(Debug, Clone)]
struct GeneratedMethod {
	origin: Name,
	accessor: Accessor,
}

/// Methods generated for an owning type's associations.
#[derive(Debug, Clone, Default)]
pub struct GeneratedMethods {
	methods: IndexMap<String, GeneratedMethod>,
}

impl GeneratedMethods {
	/// Define or overwrite `method`.
	pub fn define(&mut self, origin: Name, method: impl Into<String>, accessor: Accessor) {
		self.methods
			.insert(method.into(), GeneratedMethod { origin, accessor });
	}

	pub fn get(&self, method: &str) -> Option<&Accessor> {
		self.methods.get(method).map(|m| &m.accessor)
	}

	pub fn contains(&self, method: &str) -> bool {
		self.methods.contains_key(method)
	}

	/// Method names in definition order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.methods.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.methods.len()
	}

	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}

	fn forget(&mut self, origin: &Name) {
		self.methods.retain(|_, m| &m.origin != origin);
	}
}

#[derive(Clone)]
struct Validation {
	origin: Name,
	attribute: String,
	check: Arc<ValidationFn>,
}

/// Validation failures keyed by attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
	errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
	pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
		self.errors
			.entry(attribute.into())
			.or_default()
			.push(message.into());
	}

	pub fn get(&self, attribute: &str) -> &[String] {
		self.errors.get(attribute).map(Vec::as_slice).unwrap_or(&[])
	}

	/// `"<attribute> <message>"` for every failure.
	pub fn full_messages(&self) -> Vec<String> {
		self.errors
			.iter()
			.flat_map(|(attribute, messages)| messages.iter().map(move |m| format!("{attribute} {m}")))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.errors.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Association metadata of one owning type.
#[derive(Clone)]
pub struct ModelClass {
	name: String,
	reserved_methods: IndexSet<String>,
	reflections: IndexMap<Name, Arc<Reflection>>,
	generated: GeneratedMethods,
	destroy_hooks: Vec<(Name, Arc<DestroyHook>)>,
	collection_callbacks: IndexMap<(Name, CollectionEvent), Vec<Name>>,
	validations: Vec<Validation>,
}

impl ModelClass {
	/// Create an owning type with the default reserved method names.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_associations::model::ModelClass;
	///
	/// let model = ModelClass::new("Post");
	/// assert_eq!(model.name(), "Post");
	/// assert!(model.dangerous_attribute_method("destroy"));
	/// assert!(!model.dangerous_attribute_method("comments"));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			reserved_methods: DEFAULT_RESERVED_METHODS
				.iter()
				.map(|m| m.to_string())
				.collect(),
			reflections: IndexMap::new(),
			generated: GeneratedMethods::default(),
			destroy_hooks: Vec::new(),
			collection_callbacks: IndexMap::new(),
			validations: Vec::new(),
		}
	}

	/// Add reserved method names.
	pub fn with_reserved_methods<I, S>(mut self, methods: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.reserved_methods
			.extend(methods.into_iter().map(Into::into));
		self
	}

	/// Create an owning type using the `[model]` settings.
	#[cfg(feature = "conf")]
	pub fn from_settings(name: impl Into<String>, settings: &ModelSettings) -> Self {
		Self::new(name).with_reserved_methods(settings.reserved_method_names.iter().cloned())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Whether an association called `name` would shadow an existing method.
	pub fn dangerous_attribute_method(&self, name: &str) -> bool {
		self.reserved_methods.contains(name)
	}

	pub fn generated_association_methods(&self) -> &GeneratedMethods {
		&self.generated
	}

	pub fn generated_association_methods_mut(&mut self) -> &mut GeneratedMethods {
		&mut self.generated
	}

	/// Register a hook run before an instance is destroyed.
	pub fn before_destroy<F>(&mut self, origin: Name, hook: F)
	where
		F: Fn(&mut dyn Record) -> AssociationResult<()> + Send + Sync + 'static,
	{
		self.destroy_hooks.push((origin, Arc::new(hook)));
	}

	/// Number of before-destroy hooks registered for `origin`.
	pub fn destroy_hooks_for(&self, origin: &Name) -> usize {
		self.destroy_hooks
			.iter()
			.filter(|(o, _)| o == origin)
			.count()
	}

	pub fn destroy_hook_count(&self) -> usize {
		self.destroy_hooks.len()
	}

	/// Add a validation on `attribute`.
	pub fn validate_with<F>(&mut self, origin: Name, attribute: impl Into<String>, check: F)
	where
		F: Fn(&mut dyn Record) -> AssociationResult<Option<String>> + Send + Sync + 'static,
	{
		self.validations.push(Validation {
			origin,
			attribute: attribute.into(),
			check: Arc::new(check),
		});
	}

	pub fn validation_count(&self) -> usize {
		self.validations.len()
	}

	/// Replace the callbacks attached to `event` of `association`.
	pub fn set_collection_callbacks(
		&mut self,
		association: Name,
		event: CollectionEvent,
		callbacks: Vec<Name>,
	) {
		self.collection_callbacks
			.insert((association, event), callbacks);
	}

	/// Callbacks attached to `event` of `association`, in declaration order.
	pub fn collection_callbacks(&self, association: &Name, event: CollectionEvent) -> &[Name] {
		self.collection_callbacks
			.get(&(association.clone(), event))
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	/// Register a reflection, returning the one it replaces.
	pub fn add_reflection(&mut self, reflection: Arc<Reflection>) -> Option<Arc<Reflection>> {
		self.reflections
			.insert(reflection.name().clone(), reflection)
	}

	pub fn reflect_on_association(&self, name: &str) -> Option<&Arc<Reflection>> {
		self.reflections.get(name)
	}

	/// Reflections in declaration order.
	pub fn reflections(&self) -> impl Iterator<Item = &Arc<Reflection>> {
		self.reflections.values()
	}

	/// Drop everything previously declared for `name`.
	pub fn forget_association(&mut self, name: &Name) -> Option<Arc<Reflection>> {
		self.generated.forget(name);
		self.destroy_hooks.retain(|(origin, _)| origin != name);
		self.validations.retain(|v| &v.origin != name);
		self.collection_callbacks
			.retain(|(association, _), _| association != name);
		self.reflections.shift_remove(name)
	}

	/// Call generated method `method` on `record`.
	///
	/// # Errors
	///
	/// [`AssociationError::UndefinedMethod`] when no such method was
	/// generated, plus whatever the runtime returns.
	pub fn invoke(
		&self,
		record: &mut dyn Record,
		method: &str,
		args: &[Value],
	) -> AssociationResult<Value> {
		let accessor = self
			.generated
			.get(method)
			.ok_or_else(|| AssociationError::UndefinedMethod {
				model: self.name.clone(),
				method: method.to_string(),
			})?;

		match accessor {
			Accessor::Reader(name) => record.association(name)?.reader(args),
			Accessor::Writer(name) => {
				let [value] = args else {
					return Err(AssociationError::ArgumentCount {
						method: method.to_string(),
						given: args.len(),
						expected: 1,
					});
				};
				record.association(name)?.writer(value.clone())?;
				Ok(value.clone())
			}
			Accessor::Method(f) => f(record, args),
		}
	}

	/// Call the reader generated for `association`.
	pub fn read(
		&self,
		record: &mut dyn Record,
		association: &str,
		args: &[Value],
	) -> AssociationResult<Value> {
		self.invoke(record, association, args)
	}

	/// Call the writer generated for `association`.
	pub fn write(
		&self,
		record: &mut dyn Record,
		association: &str,
		value: Value,
	) -> AssociationResult<Value> {
		self.invoke(record, &format!("{association}="), &[value])
	}

	/// Run the before-destroy chain. The first failure stops the chain.
	pub fn run_before_destroy(&self, record: &mut dyn Record) -> AssociationResult<()> {
		for (origin, hook) in &self.destroy_hooks {
			tracing::debug!(
				target: "trellis::associations",
				model = %self.name,
				association = %origin,
				"running before_destroy hook"
			);
			hook(record)?;
		}
		Ok(())
	}

	/// Run every validation and collect the failures.
	pub fn run_validations(&self, record: &mut dyn Record) -> AssociationResult<ValidationErrors> {
		let mut errors = ValidationErrors::default();
		for validation in &self.validations {
			if let Some(message) = (validation.check)(record)? {
				errors.add(validation.attribute.clone(), message);
			}
		}
		Ok(errors)
	}

	/// Run `f`, restoring this type to its prior state if it fails.
	pub fn transaction<T, F>(&mut self, f: F) -> AssociationResult<T>
	where
		F: FnOnce(&mut Self) -> AssociationResult<T>,
	{
		let snapshot = self.clone();
		let result = f(self);
		if result.is_err() {
			tracing::debug!(
				target: "trellis::associations",
				model = %self.name,
				"declaration failed, restoring owning type"
			);
			*self = snapshot;
		}
		result
	}
}

impl fmt::Debug for ModelClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelClass")
			.field("name", &self.name)
			.field("reflections", &self.reflections.keys().collect::<Vec<_>>())
			.field("generated", &self.generated.names().collect::<Vec<_>>())
			.field("destroy_hooks", &self.destroy_hooks.len())
			.field("validations", &self.validations.len())
			.finish_non_exhaustive()
	}
}
