//! Association builder settings.
//!
//! Sources are applied in priority order: environment variables override the
//! TOML document, which overrides the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use trellis_core::{ConfigError, DeprecationBehavior, Predicate, PredicateTable, TracingDeprecator};

/// Environment variable overriding `deprecation.behavior`.
pub const ENV_DEPRECATION_BEHAVIOR: &str = "TRELLIS_DEPRECATION_BEHAVIOR";

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors raised while loading settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("invalid value {value:?} for {key}")]
	InvalidValue { key: String, value: String },

	#[error("invalid predicate for property :{property}: {source}")]
	InvalidPredicate {
		property: String,
		#[source]
		source: ConfigError,
	},
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssociationSettings {
	/// Deprecation reporting.
	pub deprecation: DeprecationSettings,
	/// Legacy property vocabulary.
	pub predicates: PredicateSettings,
	/// Owning type defaults.
	pub model: ModelSettings,
}

/// `[deprecation]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeprecationSettings {
	/// What happens to deprecation notices.
	pub behavior: DeprecationBehavior,
}

/// `[predicates]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredicateSettings {
	/// Preload the Fedora external relations vocabulary.
	pub include_fedora_relations: bool,
	/// Extra property → predicate URI mappings. Later entries win.
	pub mappings: IndexMap<String, String>,
}

impl Default for PredicateSettings {
	fn default() -> Self {
		Self {
			include_fedora_relations: true,
			mappings: IndexMap::new(),
		}
	}
}

/// `[model]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
	/// Method names that association names should not shadow, in addition to
	/// the built-in reserved names.
	pub reserved_method_names: Vec<String>,
}

impl AssociationSettings {
	/// Parse settings from a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_conf::AssociationSettings;
	/// use trellis_core::DeprecationBehavior;
	///
	/// let settings = AssociationSettings::from_toml_str(
	///     r#"
	///     [deprecation]
	///     behavior = "silence"
	///     "#,
	/// )
	/// .unwrap();
	/// assert_eq!(settings.deprecation.behavior, DeprecationBehavior::Silence);
	/// assert!(settings.predicates.include_fedora_relations);
	/// ```
	pub fn from_toml_str(document: &str) -> SettingsResult<Self> {
		Ok(toml::from_str(document)?)
	}

	/// Read and parse a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = path.as_ref();
		let document = fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "loading association settings");
		Self::from_toml_str(&document)
	}

	/// Apply overrides from the process environment.
	pub fn apply_env(self) -> SettingsResult<Self> {
		self.apply_env_from(std::env::vars())
	}

	/// Apply overrides from an explicit set of variables.
	///
	/// Unrelated variables are ignored.
	pub fn apply_env_from<I, K, V>(mut self, vars: I) -> SettingsResult<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			if key.as_ref() != ENV_DEPRECATION_BEHAVIOR {
				continue;
			}
			let value = value.as_ref();
			self.deprecation.behavior =
				DeprecationBehavior::from_name(value).ok_or_else(|| SettingsError::InvalidValue {
					key: ENV_DEPRECATION_BEHAVIOR.to_string(),
					value: value.to_string(),
				})?;
		}
		Ok(self)
	}

	/// Build the predicate table described by `[predicates]`.
	pub fn predicate_table(&self) -> SettingsResult<PredicateTable> {
		let mut table = if self.predicates.include_fedora_relations {
			PredicateTable::fedora_relations()
		} else {
			PredicateTable::new()
		};
		for (property, uri) in &self.predicates.mappings {
			let predicate =
				Predicate::parse(uri).map_err(|source| SettingsError::InvalidPredicate {
					property: property.clone(),
					source,
				})?;
			table.insert(property.clone(), predicate);
		}
		Ok(table)
	}

	/// Deprecator configured by `[deprecation]`.
	pub fn deprecator(&self) -> TracingDeprecator {
		TracingDeprecator::new(self.deprecation.behavior)
	}
}
