//! Names, option values, predicates and deprecation notices.
//!
//! # Examples
//!
//! ```rust
//! use trellis::core::{Name, PredicateTable};
//!
//! let name = Name::new("members").unwrap();
//! assert_eq!(name.classify(), "Member");
//! assert!(PredicateTable::fedora_relations().get("has_member").is_some());
//! ```

pub use trellis_core::*;
