//! Deprecation notices.
//!
//! Deprecations are advisory: a [`Deprecator`] is told about them and the
//! declaration carries on regardless. The default implementation logs through
//! `tracing`; [`RecordingDeprecator`] keeps notices in memory so they can be
//! inspected.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Receives deprecation notices. Fire-and-forget.
pub trait Deprecator: Send + Sync {
	/// Report that `context` used a deprecated form.
	fn warn(&self, context: &str, message: &str);
}

/// What [`TracingDeprecator`] does with a notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeprecationBehavior {
	/// Emit a `WARN` event on the `trellis::deprecation` target.
	#[default]
	Log,
	/// Drop the notice.
	Silence,
}

impl DeprecationBehavior {
	/// Parse the textual form used in settings and environment variables.
	pub fn from_name(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"log" => Some(Self::Log),
			"silence" => Some(Self::Silence),
			_ => None,
		}
	}
}

/// Deprecator backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDeprecator {
	behavior: DeprecationBehavior,
}

impl TracingDeprecator {
	/// Create a deprecator with the given behavior.
	pub fn new(behavior: DeprecationBehavior) -> Self {
		Self { behavior }
	}

	/// The configured behavior.
	pub fn behavior(&self) -> DeprecationBehavior {
		self.behavior
	}
}

impl Deprecator for TracingDeprecator {
	fn warn(&self, context: &str, message: &str) {
		match self.behavior {
			DeprecationBehavior::Log => {
				tracing::warn!(target: "trellis::deprecation", context, "DEPRECATION WARNING: {message}");
			}
			DeprecationBehavior::Silence => {}
		}
	}
}

/// A recorded deprecation notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
	/// Where the deprecated form was used.
	pub context: String,
	/// What was deprecated.
	pub message: String,
}

/// Deprecator that keeps every notice in memory.
///
/// # Examples
///
/// ```
/// use trellis_core::{Deprecator, RecordingDeprecator};
///
/// let deprecator = RecordingDeprecator::new();
/// deprecator.warn("Post", "association names must be a Symbol");
///
/// assert_eq!(deprecator.len(), 1);
/// assert!(deprecator.contains("must be a Symbol"));
/// ```
#[derive(Debug, Default)]
pub struct RecordingDeprecator {
	notices: Mutex<Vec<DeprecationNotice>>,
}

impl RecordingDeprecator {
	/// Create an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of the recorded notices, oldest first.
	pub fn notices(&self) -> Vec<DeprecationNotice> {
		self.notices.lock().clone()
	}

	/// Number of recorded notices.
	pub fn len(&self) -> usize {
		self.notices.lock().len()
	}

	/// Whether nothing has been recorded.
	pub fn is_empty(&self) -> bool {
		self.notices.lock().is_empty()
	}

	/// Whether any notice message contains `needle`.
	pub fn contains(&self, needle: &str) -> bool {
		self.notices
			.lock()
			.iter()
			.any(|n| n.message.contains(needle))
	}

	/// Drop every recorded notice.
	pub fn clear(&self) {
		self.notices.lock().clear();
	}
}

impl Deprecator for RecordingDeprecator {
	fn warn(&self, context: &str, message: &str) {
		self.notices.lock().push(DeprecationNotice {
			context: context.to_string(),
			message: message.to_string(),
		});
	}
}
