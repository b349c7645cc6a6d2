//! Per-instance association runtimes.
//!
//! Generated accessors and destroy hooks never touch related objects
//! themselves. They look up the instance's runtime for the association by
//! name and delegate to it.

use serde_json::Value;
use trellis_core::Name;

use crate::error::AssociationResult;

/// An instance of an owning type.
pub trait Record {
	/// The runtime responsible for association `name` on this instance.
	///
	/// # Errors
	///
	/// Returns [`AssociationError::UnknownAssociation`] when the instance has
	/// no such association.
	///
	/// [`AssociationError::UnknownAssociation`]: crate::error::AssociationError::UnknownAssociation
	fn association(&mut self, name: &Name) -> AssociationResult<&mut dyn AssociationRuntime>;
}

/// Reads, writes and cleans up one association of one instance.
pub trait AssociationRuntime: Send {
	/// Backs the generated reader. Readers take zero or more arguments.
	fn reader(&mut self, args: &[Value]) -> AssociationResult<Value>;

	/// Backs the generated `name=` writer.
	fn writer(&mut self, value: Value) -> AssociationResult<()>;

	/// Destroy-time cleanup, for runtimes that support it.
	fn as_dependency_handler(&mut self) -> Option<&mut dyn DependencyHandler> {
		None
	}
}

/// Cleanup performed before the owning instance is destroyed.
pub trait DependencyHandler {
	/// Apply the association's dependent policy.
	///
	/// # Errors
	///
	/// Restrict policies fail while dependents exist, which aborts the
	/// destroy.
	fn handle_dependency(&mut self) -> AssociationResult<()>;
}
