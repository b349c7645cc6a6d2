//! The association builder.
//!
//! [`AssociationBuilder::build`] declares one association on an owning type:
//! it validates and normalizes the configuration, creates the reflection and
//! wires accessors, dependent callbacks, extension hooks, kind callbacks and
//! validations into the [`ModelClass`]. A failure at any step leaves the
//! owning type exactly as it was.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use trellis_associations::builder::AssociationBuilder;
//! use trellis_associations::extension::ExtensionRegistry;
//! use trellis_associations::kinds::HasMany;
//! use trellis_associations::memory::MemoryRecord;
//! use trellis_associations::model::ModelClass;
//! use trellis_associations::options::AssociationOptions;
//! use trellis_core::{Name, PredicateTable, RecordingDeprecator};
//!
//! let builder = AssociationBuilder::new(
//!     Arc::new(ExtensionRegistry::new()),
//!     Arc::new(PredicateTable::fedora_relations()),
//!     Arc::new(RecordingDeprecator::new()),
//! );
//! let mut post = ModelClass::new("Post");
//!
//! let reflection = builder
//!     .build::<HasMany>(&mut post, Name::new("comments").unwrap(), AssociationOptions::new())
//!     .unwrap();
//! assert_eq!(reflection.class_name(), "Comment");
//!
//! let mut record = MemoryRecord::for_model(&post, 1);
//! post.write(&mut record, "comments", json!([{"id": 10}])).unwrap();
//! assert_eq!(post.read(&mut record, "comments", &[]).unwrap(), json!([{"id": 10}]));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
#[cfg(feature = "conf")]
use trellis_conf::{AssociationSettings, SettingsResult};
use trellis_core::{
	ConfigError, Deprecator, Name, NameArg, OptionValue, Predicate, PredicateResolver,
};

use crate::error::{AssociationError, AssociationResult};
use crate::extension::{Extension, ExtensionRegistry};
use crate::kinds::{AssociationKind, DependentPolicy};
use crate::model::{Accessor, ModelClass};
use crate::options::{
	AssociationOptions, DEPENDENT, PREDICATE, PROPERTY, VALID_OPTIONS, validate_options,
};
use crate::reflection::Reflection;
use crate::runtime::Record;
use crate::scope::{RawScope, build_scope};

const PREDICATE_SHAPE: &str = "a predicate URI or a property name";

/// Declares associations on owning types.
#[derive(Clone)]
pub struct AssociationBuilder {
	extensions: Arc<ExtensionRegistry>,
	predicates: Arc<dyn PredicateResolver>,
	deprecator: Arc<dyn Deprecator>,
}

impl AssociationBuilder {
	/// Create a builder from its collaborators.
	pub fn new(
		extensions: Arc<ExtensionRegistry>,
		predicates: Arc<dyn PredicateResolver>,
		deprecator: Arc<dyn Deprecator>,
	) -> Self {
		Self {
			extensions,
			predicates,
			deprecator,
		}
	}

	/// Create a builder whose predicate table and deprecator come from
	/// `settings`.
	///
	/// # Errors
	///
	/// Fails when a configured predicate mapping is not a valid URI.
	#[cfg(feature = "conf")]
	pub fn from_settings(
		settings: &AssociationSettings,
		extensions: Arc<ExtensionRegistry>,
	) -> SettingsResult<Self> {
		Ok(Self::new(
			extensions,
			Arc::new(settings.predicate_table()?),
			Arc::new(settings.deprecator()),
		))
	}

	/// Declare association `name` of kind `K` on `model`.
	///
	/// # Errors
	///
	/// - [`ConfigError`] for unknown keys, a malformed name, a disallowed
	///   dependent policy or a badly shaped option value.
	/// - [`AssociationError::Lookup`] when a legacy `property` cannot be
	///   resolved.
	/// - [`AssociationError::Extension`] when an extension build hook fails.
	///
	/// In every case `model` is left unchanged.
	pub fn build<K: AssociationKind>(
		&self,
		model: &mut ModelClass,
		name: impl Into<NameArg>,
		options: AssociationOptions,
	) -> AssociationResult<Arc<Reflection>> {
		self.build_with_scope::<K>(model, name, None, options)
	}

	/// [`build`](Self::build) with a scope narrowing the related objects.
	pub fn build_with_scope<K: AssociationKind>(
		&self,
		model: &mut ModelClass,
		name: impl Into<NameArg>,
		scope: Option<RawScope>,
		options: AssociationOptions,
	) -> AssociationResult<Arc<Reflection>> {
		let name = name.into();
		if model.dangerous_attribute_method(name.as_str()) {
			self.deprecator.warn(
				model.name(),
				&format!(
					"You tried to define an association named {name} on the model {model}, but this will \
					 conflict with a method {name} already defined by the owning type. Please choose a \
					 different association name.",
					name = name.as_str(),
					model = model.name(),
				),
			);
		}

		let extensions = self.extensions.snapshot();
		model.transaction(|model| {
			let reflection = self.create_reflection::<K>(model, name, scope, options, &extensions)?;

			if let Some(previous) = model.forget_association(reflection.name()) {
				tracing::debug!(
					target: "trellis::associations",
					model = model.name(),
					association = %reflection.name(),
					previous = %previous.macro_kind(),
					current = %reflection.macro_kind(),
					"replacing earlier declaration"
				);
			}

			Self::define_accessors(model, &reflection);
			self.define_callbacks::<K>(model, &reflection, &extensions)?;
			K::define_callbacks(model, &reflection)?;
			K::define_validations(model, &reflection)?;
			model.add_reflection(reflection.clone());

			tracing::debug!(
				target: "trellis::associations",
				model = model.name(),
				association = %reflection.name(),
				kind = %K::MACRO,
				"declared association"
			);
			Ok(reflection)
		})
	}

	/// Normalize the name, check and translate the options, compose the
	/// scope and construct the reflection. `model` is not modified.
	///
	/// Option keys and scope wrappers both come from `extensions`, so a
	/// declaration sees one consistent set of extensions.
	pub fn create_reflection<K: AssociationKind>(
		&self,
		model: &ModelClass,
		name: impl Into<NameArg>,
		scope: Option<RawScope>,
		mut options: AssociationOptions,
		extensions: &[Arc<dyn Extension>],
	) -> AssociationResult<Arc<Reflection>> {
		let name = self.normalize_name(model, name.into())?;
		validate_options(&options, &Self::option_keys::<K>(extensions))?;
		self.translate_property_to_predicate::<K>(model, &name, &mut options)?;

		let scope = build_scope(scope, extensions);
		let name = K::better_name(name);

		tracing::debug!(
			target: "trellis::associations",
			model = model.name(),
			association = %name,
			kind = %K::MACRO,
			scoped = scope.is_some(),
			"creating reflection"
		);
		Ok(Arc::new(Reflection::new(
			K::MACRO,
			name,
			scope,
			options,
			model.name(),
		)))
	}

	/// Keys accepted for kind `K`: base keys, kind keys and the keys of every
	/// currently registered extension.
	pub fn valid_options<K: AssociationKind>(&self) -> IndexSet<String> {
		Self::option_keys::<K>(&self.extensions.snapshot())
	}

	fn option_keys<K: AssociationKind>(extensions: &[Arc<dyn Extension>]) -> IndexSet<String> {
		VALID_OPTIONS
			.iter()
			.copied()
			.chain(K::valid_options())
			.map(str::to_string)
			.chain(extensions.iter().flat_map(|e| e.valid_options()))
			.collect()
	}

	fn normalize_name(&self, model: &ModelClass, name: NameArg) -> Result<Name, ConfigError> {
		match name {
			NameArg::Symbol(name) => Ok(name),
			NameArg::Text(text) => {
				let name = Name::new(text)?;
				self.deprecator
					.warn(model.name(), "association names must be a Symbol");
				Ok(name)
			}
		}
	}

	fn translate_property_to_predicate<K: AssociationKind>(
		&self,
		model: &ModelClass,
		name: &Name,
		options: &mut AssociationOptions,
	) -> AssociationResult<()> {
		let Some(property) = options.remove(PROPERTY) else {
			return Ok(());
		};
		self.deprecator.warn(
			model.name(),
			&format!(
				"the :property option to `{}.{} :{}' is deprecated. Use :predicate instead",
				model.name(),
				K::MACRO,
				name
			),
		);
		let predicate = self.predicate(&property)?;
		options.insert(PREDICATE, predicate);
		Ok(())
	}

	fn predicate(&self, property: &OptionValue) -> AssociationResult<Predicate> {
		if let Some(predicate) = property.as_predicate() {
			return Ok(predicate.clone());
		}
		let property = property
			.as_text()
			.ok_or_else(|| ConfigError::InvalidOptionValue {
				key: PROPERTY.to_string(),
				expected: PREDICATE_SHAPE,
			})?;
		Ok(self.predicates.find_graph_predicate(property)?)
	}

	fn define_accessors(model: &mut ModelClass, reflection: &Arc<Reflection>) {
		let name = reflection.name();
		let methods = model.generated_association_methods_mut();
		methods.define(name.clone(), name.as_str(), Accessor::Reader(name.clone()));
		methods.define(name.clone(), name.writer_name(), Accessor::Writer(name.clone()));
	}

	fn define_callbacks<K: AssociationKind>(
		&self,
		model: &mut ModelClass,
		reflection: &Arc<Reflection>,
		extensions: &[Arc<dyn Extension>],
	) -> AssociationResult<()> {
		if let Some(dependent) = reflection.options().get(DEPENDENT) {
			Self::check_dependent_options::<K>(dependent)?;
			Self::add_destroy_callbacks(model, reflection);
		}

		for extension in extensions {
			tracing::debug!(
				target: "trellis::associations",
				extension = extension.name(),
				association = %reflection.name(),
				"running extension build hook"
			);
			extension
				.build(model, reflection)
				.map_err(|source| AssociationError::Extension {
					extension: extension.name().to_string(),
					association: reflection.name().clone(),
					source: Box::new(source),
				})?;
		}
		Ok(())
	}

	fn check_dependent_options<K: AssociationKind>(
		dependent: &OptionValue,
	) -> Result<DependentPolicy, ConfigError> {
		let allowed = K::valid_dependent_options();
		dependent
			.as_text()
			.and_then(DependentPolicy::from_name)
			.filter(|policy| allowed.contains(policy))
			.ok_or_else(|| ConfigError::InvalidDependent {
				value: dependent
					.as_text()
					.map(str::to_string)
					.unwrap_or_else(|| format!("{dependent:?}")),
				allowed: allowed.iter().map(|p| format!(":{p}")).collect(),
			})
	}

	fn add_destroy_callbacks(model: &mut ModelClass, reflection: &Arc<Reflection>) {
		let name = reflection.name().clone();
		model.before_destroy(name.clone(), move |record: &mut dyn Record| {
			let runtime = record.association(&name)?;
			match runtime.as_dependency_handler() {
				Some(handler) => handler.handle_dependency(),
				None => {
					tracing::debug!(
						target: "trellis::associations",
						association = %name,
						"runtime has no dependency handling, skipping"
					);
					Ok(())
				}
			}
		});
	}
}

impl fmt::Debug for AssociationBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AssociationBuilder")
			.field("extensions", &self.extensions)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::kinds::{BelongsTo, HasAndBelongsToMany, HasMany};
	use rstest::{fixture, rstest};
	use trellis_core::{PredicateTable, RecordingDeprecator};

	struct Fixture {
		builder: AssociationBuilder,
		deprecator: Arc<RecordingDeprecator>,
	}

	#[fixture]
	fn setup() -> Fixture {
		let deprecator = Arc::new(RecordingDeprecator::new());
		let builder = AssociationBuilder::new(
			Arc::new(ExtensionRegistry::new()),
			Arc::new(PredicateTable::fedora_relations()),
			deprecator.clone(),
		);
		Fixture {
			builder,
			deprecator,
		}
	}

	#[rstest]
	fn test_text_name_is_coerced_with_notice(setup: Fixture) {
		let mut model = ModelClass::new("Post");

		let reflection = setup
			.builder
			.build::<HasMany>(&mut model, "comments", AssociationOptions::new())
			.unwrap();

		assert_eq!(reflection.name().as_str(), "comments");
		assert!(setup.deprecator.contains("must be a Symbol"));
	}

	#[rstest]
	fn test_symbol_name_emits_no_notice(setup: Fixture) {
		let mut model = ModelClass::new("Post");

		setup
			.builder
			.build::<HasMany>(&mut model, Name::new("comments").unwrap(), AssociationOptions::new())
			.unwrap();

		assert!(setup.deprecator.is_empty());
	}

	#[rstest]
	#[case("")]
	#[case("has space")]
	#[case("comments=")]
	fn test_malformed_name(setup: Fixture, #[case] text: &str) {
		let mut model = ModelClass::new("Post");

		let err = setup
			.builder
			.build::<HasMany>(&mut model, text, AssociationOptions::new())
			.unwrap_err();

		assert!(matches!(err, AssociationError::Config(ConfigError::MalformedName(_))));
		assert!(model.reflections().next().is_none());
	}

	#[rstest]
	fn test_dangerous_name_warns_but_succeeds(setup: Fixture) {
		let mut model = ModelClass::new("Post");

		let result = setup.builder.build::<BelongsTo>(
			&mut model,
			Name::new("class").unwrap(),
			AssociationOptions::new(),
		);

		assert!(result.is_ok());
		assert!(setup.deprecator.contains("conflict with a method class"));
	}

	struct Tagging;

	impl Extension for Tagging {
		fn name(&self) -> &str {
			"tagging"
		}

		fn valid_options(&self) -> Vec<String> {
			vec!["tags".to_string()]
		}
	}

	#[rstest]
	fn test_option_keys_follow_extension_snapshot() {
		// Arrange
		let registry = Arc::new(ExtensionRegistry::new());
		let builder = AssociationBuilder::new(
			registry.clone(),
			Arc::new(PredicateTable::fedora_relations()),
			Arc::new(RecordingDeprecator::new()),
		);
		let model = ModelClass::new("Post");
		let options = AssociationOptions::new().with("tags", true);
		let snapshot: Vec<Arc<dyn Extension>> = vec![Arc::new(Tagging)];

		// Act
		let with_snapshot = builder.create_reflection::<HasMany>(
			&model,
			Name::new("comments").unwrap(),
			None,
			options.clone(),
			&snapshot,
		);
		registry.register(Arc::new(Tagging)).unwrap();
		let without_snapshot = builder.create_reflection::<HasMany>(
			&model,
			Name::new("comments").unwrap(),
			None,
			options,
			&[],
		);

		// Assert
		assert!(with_snapshot.is_ok());
		match without_snapshot.unwrap_err() {
			AssociationError::Config(ConfigError::UnknownKeys { keys, .. }) => {
				assert_eq!(keys, vec!["tags".to_string()]);
			}
			other => panic!("expected UnknownKeys, got {other:?}"),
		}
	}

	#[rstest]
	fn test_valid_options_union(setup: Fixture) {
		let keys = setup.builder.valid_options::<BelongsTo>();

		for key in ["class_name", "predicate", "type_validator", "dependent", "required"] {
			assert!(keys.contains(key), "missing {key}");
		}
		assert!(!keys.contains("solr_page_size"));
	}

	#[rstest]
	fn test_dependent_is_rejected_for_kind_without_policies(setup: Fixture) {
		let mut model = ModelClass::new("Book");

		let err = setup
			.builder
			.build::<HasAndBelongsToMany>(
				&mut model,
				Name::new("authors").unwrap(),
				AssociationOptions::new().dependent(DependentPolicy::Destroy),
			)
			.unwrap_err();

		assert!(matches!(err, AssociationError::Config(ConfigError::UnknownKeys { .. })));
	}

	#[rstest]
	fn test_check_dependent_message_lists_allowed() {
		let err = AssociationBuilder::check_dependent_options::<BelongsTo>(&OptionValue::symbol(
			"nullify",
		))
		.unwrap_err();

		assert_eq!(
			err.to_string(),
			"The :dependent option must be one of [:destroy, :delete], but is :nullify"
		);
	}

	#[rstest]
	fn test_property_must_be_text_or_predicate(setup: Fixture) {
		let mut model = ModelClass::new("Post");

		let err = setup
			.builder
			.build::<HasMany>(
				&mut model,
				Name::new("parts").unwrap(),
				AssociationOptions::new().with(PROPERTY, true),
			)
			.unwrap_err();

		assert!(matches!(
			err,
			AssociationError::Config(ConfigError::InvalidOptionValue { ref key, .. }) if key == "property"
		));
	}
}
