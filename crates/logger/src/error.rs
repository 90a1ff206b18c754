use chainlog_registry::RegistryError;
use thiserror::Error;

/// Errors surfaced by chain traversal and emission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
	/// Registration or lookup failure from the definition registry.
	#[error(transparent)]
	Registry(#[from] RegistryError),
	/// A chain resolved with neither an invoked endpoint nor a recorded
	/// mode.
	#[error("chain has no endpoint and no mode to resolve")]
	NoEndpoint,
	/// A toggle was used as the terminal step of a chain. Toggles only
	/// qualify the mode that follows them.
	#[error("toggle \"{0}\" cannot terminate a chain")]
	ToggleCall(String),
}
