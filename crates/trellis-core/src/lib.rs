//! # Trellis Core
//!
//! Shared building blocks for the Trellis association layer.
//!
//! ## Modules
//!
//! - [`name`]: canonical association names ([`Name`]) and the inflection
//!   helpers used to derive class names from them
//! - [`value`]: heterogeneous option values ([`OptionValue`]) and the
//!   [`TypeValidator`] capability
//! - [`exception`]: configuration and lookup errors raised at declaration time
//! - [`deprecation`]: the [`Deprecator`] collaborator and its implementations
//! - [`predicates`]: graph predicates and the legacy property lookup table
//!
//! Everything here is synchronous and in-memory. Nothing in this crate knows
//! about models or reflections; see `trellis-associations` for that.

pub mod deprecation;
pub mod exception;
pub mod name;
pub mod predicates;
pub mod value;

pub use deprecation::{
	DeprecationBehavior, DeprecationNotice, Deprecator, RecordingDeprecator, TracingDeprecator,
};
pub use exception::{ConfigError, LookupError};
pub use name::{Name, NameArg};
pub use predicates::{Predicate, PredicateResolver, PredicateTable};
pub use value::{AllowedTypes, OptionValue, TypeValidator};
