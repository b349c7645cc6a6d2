//! # Trellis Configuration
//!
//! Settings consumed when wiring an association builder: how deprecation
//! notices are reported, which legacy properties map to which predicates, and
//! which method names an owning type reserves.
//!
//! Settings come from TOML and can be overridden from the environment:
//!
//! ```toml
//! [deprecation]
//! behavior = "silence"
//!
//! [predicates]
//! include_fedora_relations = true
//!
//! [predicates.mappings]
//! has_editor = "http://example.org/ns#hasEditor"
//!
//! [model]
//! reserved_method_names = ["owner"]
//! ```
//!
//! ## Module Organization
//!
//! - [`settings`]: [`AssociationSettings`] and its sections

pub mod settings;

pub use settings::{
	AssociationSettings, DeprecationSettings, ENV_DEPRECATION_BEHAVIOR, ModelSettings,
	PredicateSettings, SettingsError, SettingsResult,
};
