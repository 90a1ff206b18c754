use thiserror::Error;

/// Errors surfaced by definition registration and lookup.
///
/// Registration failures are programming errors and should be treated as
/// fatal at startup; lookup failures indicate caller misuse at emit time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// A registration supplied a kind tag outside the allowed set for
	/// that definition.
	#[error("\"kind\" must be one of [{allowed}] but got \"{got}\"")]
	InvalidKind {
		/// The rejected tag (or `"<empty>"` for an empty kind set).
		got: String,
		/// The allowed tags for the definition being registered.
		allowed: &'static str,
	},
	/// Lookup against a name that was never registered.
	#[error("unable to find \"{0}\"")]
	NotFound(String),
}
