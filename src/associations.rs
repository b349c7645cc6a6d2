//! Association declaration, reflections and generated accessors.
//!
//! # Examples
//!
//! ```rust
//! use trellis::associations::{CollectionEvent, Macro};
//!
//! assert!(Macro::HasMany.is_collection());
//! assert_eq!(CollectionEvent::AfterAdd.option_key(), "after_add");
//! ```

pub use trellis_associations::*;
