//! Builder settings loaded from TOML with environment overrides.
//!
//! # Examples
//!
//! ```rust,no_run
//! use trellis::conf::AssociationSettings;
//!
//! let settings = AssociationSettings::from_file("trellis.toml")?
//!     .apply_env()?;
//! # Ok::<(), trellis::conf::SettingsError>(())
//! ```

pub use trellis_conf::*;
