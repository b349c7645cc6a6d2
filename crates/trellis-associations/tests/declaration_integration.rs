//! Integration tests for declaring associations on owning types.

use std::sync::Arc;

use rstest::{fixture, rstest};
use trellis_associations::prelude::*;
use trellis_associations::{CollectionEvent, Macro};
#[cfg(feature = "conf")]
use trellis_conf::AssociationSettings;
use trellis_core::{
	ConfigError, Name, OptionValue, Predicate, PredicateResolver, PredicateTable,
	RecordingDeprecator,
};

struct Env {
	registry: Arc<ExtensionRegistry>,
	deprecator: Arc<RecordingDeprecator>,
	builder: AssociationBuilder,
}

fn env_with(registry: ExtensionRegistry) -> Env {
	let registry = Arc::new(registry);
	let deprecator = Arc::new(RecordingDeprecator::new());
	let builder = AssociationBuilder::new(
		registry.clone(),
		Arc::new(PredicateTable::fedora_relations()),
		deprecator.clone(),
	);
	Env {
		registry,
		deprecator,
		builder,
	}
}

#[fixture]
fn env() -> Env {
	env_with(ExtensionRegistry::new())
}

fn name(text: &str) -> Name {
	Name::new(text).unwrap()
}

struct Autosave;

impl Extension for Autosave {
	fn name(&self) -> &str {
		"autosave"
	}

	fn valid_options(&self) -> Vec<String> {
		vec!["autosave".to_string()]
	}

	fn build(&self, model: &mut ModelClass, reflection: &Arc<Reflection>) -> AssociationResult<()> {
		if reflection.options().get("autosave").and_then(|v| v.as_bool()) == Some(true) {
			model.before_destroy(reflection.name().clone(), |_| Ok(()));
		}
		Ok(())
	}
}

struct Failing;

impl Extension for Failing {
	fn name(&self) -> &str {
		"failing"
	}

	fn build(&self, model: &mut ModelClass, reflection: &Arc<Reflection>) -> AssociationResult<()> {
		model.validate_with(reflection.name().clone(), "anything", |_| Ok(None));
		Err(AssociationError::Runtime {
			association: reflection.name().clone(),
			message: "refused".to_string(),
		})
	}
}

#[rstest]
fn test_unknown_key_rejects_declaration(env: Env) {
	// Arrange
	let mut post = ModelClass::new("Post");
	let options = AssociationOptions::new().with("foo", true);

	// Act
	let err = env
		.builder
		.build::<HasMany>(&mut post, name("comments"), options)
		.unwrap_err();

	// Assert
	match err {
		AssociationError::Config(ConfigError::UnknownKeys { keys, valid }) => {
			assert_eq!(keys, vec!["foo".to_string()]);
			assert!(valid.contains(&"class_name".to_string()));
		}
		other => panic!("expected UnknownKeys, got {other:?}"),
	}
	assert!(post.reflect_on_association("comments").is_none());
	assert!(post.generated_association_methods().is_empty());
}

#[rstest]
fn test_property_is_translated_to_predicate(env: Env) {
	// Arrange
	let mut book = ModelClass::new("Book");
	let expected = PredicateTable::fedora_relations()
		.find_graph_predicate("has_part")
		.unwrap();

	// Act
	let reflection = env
		.builder
		.build::<HasAndBelongsToMany>(
			&mut book,
			name("parts"),
			AssociationOptions::new().property("has_part"),
		)
		.unwrap();

	// Assert
	assert_eq!(reflection.predicate(), Some(&expected));
	assert!(!reflection.options().contains_key("property"));
	assert_eq!(env.deprecator.len(), 1);
	assert!(env.deprecator.contains(":property option to `Book.has_and_belongs_to_many :parts'"));
}

#[rstest]
fn test_predicate_valued_property_is_used_unchanged(env: Env) {
	let mut book = ModelClass::new("Book");
	let predicate = Predicate::parse("http://example.org/ns#chapter").unwrap();

	let reflection = env
		.builder
		.build::<HasMany>(
			&mut book,
			name("chapters"),
			AssociationOptions::new().with("property", predicate.clone()),
		)
		.unwrap();

	assert_eq!(reflection.predicate(), Some(&predicate));
}

#[rstest]
fn test_unresolvable_property_aborts(env: Env) {
	let mut book = ModelClass::new("Book");

	let err = env
		.builder
		.build::<HasMany>(
			&mut book,
			name("chapters"),
			AssociationOptions::new().property("has_chapter"),
		)
		.unwrap_err();

	assert!(matches!(err, AssociationError::Lookup(ref e) if e.property == "has_chapter"));
	assert!(book.reflect_on_association("chapters").is_none());
}

#[rstest]
fn test_valid_dependent_installs_exactly_one_hook(env: Env) {
	let mut post = ModelClass::new("Post");

	env.builder
		.build::<HasMany>(
			&mut post,
			name("comments"),
			AssociationOptions::new().dependent(DependentPolicy::Destroy),
		)
		.unwrap();

	assert_eq!(post.destroy_hooks_for(&name("comments")), 1);
	assert_eq!(post.destroy_hook_count(), 1);
}

#[rstest]
fn test_invalid_dependent_is_a_config_error(env: Env) {
	// Arrange
	let mut post = ModelClass::new("Post");
	let options = AssociationOptions::new().with("dependent", OptionValue::symbol("explode"));

	// Act
	let err = env
		.builder
		.build::<HasMany>(&mut post, name("comments"), options)
		.unwrap_err();

	// Assert
	assert!(matches!(
		err,
		AssociationError::Config(ConfigError::InvalidDependent { ref value, ref allowed })
			if value == "explode" && allowed.len() == 5
	));
	assert_eq!(post.destroy_hook_count(), 0);
	assert!(post.reflect_on_association("comments").is_none());
}

#[rstest]
fn test_no_dependent_no_hook(env: Env) {
	let mut post = ModelClass::new("Post");

	env.builder
		.build::<HasMany>(&mut post, name("comments"), AssociationOptions::new())
		.unwrap();

	assert_eq!(post.destroy_hook_count(), 0);
}

#[rstest]
fn test_redeclaration_is_idempotent(env: Env) {
	// Arrange
	let mut post = ModelClass::new("Post");
	let options = AssociationOptions::new()
		.dependent(DependentPolicy::Destroy)
		.with("after_add", OptionValue::symbol("log_add"));

	// Act
	for _ in 0..2 {
		env.builder
			.build::<HasMany>(&mut post, name("comments"), options.clone())
			.unwrap();
	}

	// Assert
	assert_eq!(post.reflections().count(), 1);
	assert_eq!(post.destroy_hook_count(), 1);
	assert_eq!(
		post.generated_association_methods().names().collect::<Vec<_>>(),
		vec!["comments", "comments="]
	);
	assert_eq!(
		post.collection_callbacks(&name("comments"), CollectionEvent::AfterAdd),
		[name("log_add")]
	);
}

#[rstest]
fn test_redeclaration_with_another_kind_replaces(env: Env) {
	let mut post = ModelClass::new("Post");
	env.builder
		.build::<HasMany>(
			&mut post,
			name("editors"),
			AssociationOptions::new().dependent(DependentPolicy::Nullify),
		)
		.unwrap();

	env.builder
		.build::<BelongsTo>(&mut post, name("editors"), AssociationOptions::new())
		.unwrap();

	let reflection = post.reflect_on_association("editors").unwrap();
	assert_eq!(reflection.macro_kind(), Macro::BelongsTo);
	assert_eq!(post.destroy_hook_count(), 0);
}

#[rstest]
fn test_extension_key_requires_extension() {
	// Arrange
	let without = env_with(ExtensionRegistry::new());
	let with = env_with(ExtensionRegistry::new().with(Arc::new(Autosave)).unwrap());
	let options = AssociationOptions::new().with("autosave", true);

	// Act
	let rejected = without
		.builder
		.build::<HasMany>(&mut ModelClass::new("Post"), name("comments"), options.clone());
	let mut post = ModelClass::new("Post");
	let accepted = with
		.builder
		.build::<HasMany>(&mut post, name("comments"), options);

	// Assert
	assert!(matches!(
		rejected,
		Err(AssociationError::Config(ConfigError::UnknownKeys { .. }))
	));
	assert!(accepted.is_ok());
	assert_eq!(post.destroy_hooks_for(&name("comments")), 1);
}

/// Contributes a single option key and does nothing else.
struct KeyOnly {
	name: &'static str,
	key: &'static str,
}

impl Extension for KeyOnly {
	fn name(&self) -> &str {
		self.name
	}

	fn valid_options(&self) -> Vec<String> {
		vec![self.key.to_string()]
	}
}

#[rstest]
#[case::both(true, true, None)]
#[case::versioning_only(true, false, Some("cached"))]
#[case::caching_only(false, true, Some("versioned"))]
fn test_extension_keys_need_every_contributor(
	#[case] versioning: bool,
	#[case] caching: bool,
	#[case] missing: Option<&str>,
) {
	// Arrange
	let registry = ExtensionRegistry::new();
	if versioning {
		registry
			.register(Arc::new(KeyOnly {
				name: "versioning",
				key: "versioned",
			}))
			.unwrap();
	}
	if caching {
		registry
			.register(Arc::new(KeyOnly {
				name: "caching",
				key: "cached",
			}))
			.unwrap();
	}
	let env = env_with(registry);
	let mut post = ModelClass::new("Post");
	let options = AssociationOptions::new()
		.with("versioned", true)
		.with("cached", true);

	// Act
	let result = env
		.builder
		.build::<HasMany>(&mut post, name("comments"), options);

	// Assert
	match (missing, result) {
		(None, result) => assert!(result.is_ok()),
		(Some(key), Err(AssociationError::Config(ConfigError::UnknownKeys { keys, .. }))) => {
			assert_eq!(keys, vec![key.to_string()]);
			assert!(post.reflect_on_association("comments").is_none());
		}
		(Some(key), other) => panic!("expected {key} to be rejected, got {other:?}"),
	}
}

#[rstest]
fn test_extension_registered_after_builder_is_seen(env: Env) {
	env.registry.register(Arc::new(Autosave)).unwrap();
	let mut post = ModelClass::new("Post");

	let result = env.builder.build::<HasMany>(
		&mut post,
		name("comments"),
		AssociationOptions::new().with("autosave", false),
	);

	assert!(result.is_ok());
	assert_eq!(post.destroy_hook_count(), 0);
}

#[rstest]
fn test_extension_failure_rolls_back() {
	// Arrange
	let env = env_with(ExtensionRegistry::new().with(Arc::new(Failing)).unwrap());
	let mut post = ModelClass::new("Post");

	// Act
	let err = env
		.builder
		.build::<HasMany>(
			&mut post,
			name("comments"),
			AssociationOptions::new().dependent(DependentPolicy::Destroy),
		)
		.unwrap_err();

	// Assert
	match err {
		AssociationError::Extension {
			extension,
			association,
			..
		} => {
			assert_eq!(extension, "failing");
			assert_eq!(association, name("comments"));
		}
		other => panic!("expected Extension error, got {other:?}"),
	}
	assert!(post.generated_association_methods().is_empty());
	assert_eq!(post.destroy_hook_count(), 0);
	assert_eq!(post.validation_count(), 0);
	assert!(post.reflect_on_association("comments").is_none());
}

#[rstest]
fn test_failed_redeclaration_keeps_previous(env: Env) {
	let mut post = ModelClass::new("Post");
	env.builder
		.build::<HasMany>(
			&mut post,
			name("comments"),
			AssociationOptions::new().dependent(DependentPolicy::Destroy),
		)
		.unwrap();

	let result = env.builder.build::<HasMany>(
		&mut post,
		name("comments"),
		AssociationOptions::new().with("after_add", 42_i64),
	);

	assert!(result.is_err());
	let reflection = post.reflect_on_association("comments").unwrap();
	assert_eq!(reflection.dependent(), Some(DependentPolicy::Destroy));
	assert_eq!(post.destroy_hook_count(), 1);
}

#[rstest]
#[case::has_many(Macro::HasMany)]
#[case::directly_contains(Macro::DirectlyContains)]
fn test_collection_callbacks_are_recorded(env: Env, #[case] kind: Macro) {
	// Arrange
	let mut model = ModelClass::new("Collection");
	let options = AssociationOptions::new()
		.with(
			"before_add",
			vec![OptionValue::symbol("check"), OptionValue::symbol("stamp")],
		)
		.with("after_remove", OptionValue::symbol("reindex"));

	// Act
	let result = match kind {
		Macro::HasMany => env.builder.build::<HasMany>(&mut model, name("members"), options),
		_ => env
			.builder
			.build::<DirectlyContains>(&mut model, name("members"), options),
	};

	// Assert
	assert_eq!(result.unwrap().macro_kind(), kind);
	assert_eq!(
		model.collection_callbacks(&name("members"), CollectionEvent::BeforeAdd),
		[name("check"), name("stamp")]
	);
	assert_eq!(
		model.collection_callbacks(&name("members"), CollectionEvent::AfterRemove),
		[name("reindex")]
	);
	assert!(model
		.collection_callbacks(&name("members"), CollectionEvent::AfterAdd)
		.is_empty());
}

#[rstest]
fn test_container_keys_are_kind_specific(env: Env) {
	let mut model = ModelClass::new("Collection");
	let options = AssociationOptions::new()
		.with("has_member_relation", "http://www.w3.org/ns/ldp#member")
		.with("foreign_key", "proxy_for");

	let direct = env
		.builder
		.build::<DirectlyContains>(&mut model, name("members"), options.clone());
	let indirect = env
		.builder
		.build::<IndirectlyContains>(&mut model, name("members"), options);

	assert!(matches!(
		direct,
		Err(AssociationError::Config(ConfigError::UnknownKeys { ref keys, .. })) if keys == &["foreign_key".to_string()]
	));
	assert!(indirect.is_ok());
}

#[rstest]
#[case(AssociationOptions::new().with("required", true), 1)]
#[case(AssociationOptions::new().with("optional", false), 1)]
#[case(AssociationOptions::new().with("optional", true), 0)]
#[case(AssociationOptions::new(), 0)]
fn test_belongs_to_presence_validation(
	env: Env,
	#[case] options: AssociationOptions,
	#[case] expected: usize,
) {
	let mut post = ModelClass::new("Post");

	env.builder
		.build::<BelongsTo>(&mut post, name("author"), options)
		.unwrap();

	assert_eq!(post.validation_count(), expected);
}

#[cfg(feature = "conf")]
#[rstest]
fn test_builder_from_settings() {
	// Arrange
	let settings = AssociationSettings::from_toml_str(
		r#"
		[deprecation]
		behavior = "silence"

		[predicates.mappings]
		has_editor = "http://example.org/ns#hasEditor"

		[model]
		reserved_method_names = ["lock"]
		"#,
	)
	.unwrap();
	let builder =
		AssociationBuilder::from_settings(&settings, Arc::new(ExtensionRegistry::new())).unwrap();
	let mut post = ModelClass::from_settings("Post", &settings.model);

	// Act
	let reflection = builder
		.build::<BelongsTo>(
			&mut post,
			name("editor"),
			AssociationOptions::new().property("has_editor"),
		)
		.unwrap();

	// Assert
	assert_eq!(
		reflection.predicate().map(Predicate::as_str),
		Some("http://example.org/ns#hasEditor")
	);
	assert!(post.dangerous_attribute_method("lock"));
}
