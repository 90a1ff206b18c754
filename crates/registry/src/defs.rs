//! Mode and endpoint definitions and their kind tags.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RegistryError;

/// Message transform carried by a definition.
///
/// Transforms are applied left to right while a chain resolves, each one
/// consuming the previous transform's output.
pub type Transform = Arc<dyn Fn(String) -> String + Send + Sync>;

bitflags::bitflags! {
	/// Capability tags an endpoint definition may carry.
	///
	/// An endpoint may be both a logger and a modifier at once, mirroring
	/// registrations like `{kind: [logger, modifier]}`.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct EndpointKind: u8 {
		/// Terminal endpoint; invoking it names the emitted event.
		const LOGGER = 1 << 0;
		/// Transforms the outgoing message when touched mid-chain.
		const MODIFIER = 1 << 1;
	}
}

impl Default for EndpointKind {
	fn default() -> Self {
		Self::LOGGER
	}
}

impl FromStr for EndpointKind {
	type Err = RegistryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"logger" => Ok(Self::LOGGER),
			"modifier" => Ok(Self::MODIFIER),
			other => Err(RegistryError::InvalidKind {
				got: other.to_string(),
				allowed: Self::ALLOWED,
			}),
		}
	}
}

impl EndpointKind {
	/// Allowed tag names, used in [`RegistryError::InvalidKind`] messages.
	pub const ALLOWED: &'static str = "logger, modifier";
}

bitflags::bitflags! {
	/// Capability tags a mode definition may carry.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct ModeKind: u8 {
		/// Named flag asserted `true` when touched in a chain.
		const MODE = 1 << 0;
		/// Inverts the immediately following mode; never terminates a
		/// chain on its own.
		const TOGGLE = 1 << 1;
	}
}

impl Default for ModeKind {
	fn default() -> Self {
		Self::MODE
	}
}

impl FromStr for ModeKind {
	type Err = RegistryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"mode" => Ok(Self::MODE),
			"toggle" => Ok(Self::TOGGLE),
			other => Err(RegistryError::InvalidKind {
				got: other.to_string(),
				allowed: Self::ALLOWED,
			}),
		}
	}
}

impl ModeKind {
	/// Allowed tag names, used in [`RegistryError::InvalidKind`] messages.
	pub const ALLOWED: &'static str = "mode, toggle";
}

/// Registration options for an endpoint. Defaults to a plain logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointOptions {
	pub kind: EndpointKind,
}

impl EndpointOptions {
	pub fn modifier() -> Self {
		Self {
			kind: EndpointKind::MODIFIER,
		}
	}
}

/// Registration options for a mode. Defaults to a plain mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeOptions {
	pub kind: ModeKind,
}

impl ModeOptions {
	pub fn toggle() -> Self {
		Self {
			kind: ModeKind::TOGGLE,
		}
	}
}

/// A named flag or toggle, immutable once registered.
pub struct ModeDefinition {
	pub name: Box<str>,
	pub kind: ModeKind,
	pub transform: Option<Transform>,
}

impl ModeDefinition {
	/// Toggle behavior wins when a definition carries both tags.
	pub fn is_toggle(&self) -> bool {
		self.kind.contains(ModeKind::TOGGLE)
	}

	/// Run this definition's transform over `message`, if it has one.
	pub fn apply(&self, message: String) -> String {
		match &self.transform {
			Some(transform) => transform(message),
			None => message,
		}
	}
}

impl fmt::Debug for ModeDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModeDefinition")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("transform", &self.transform.is_some())
			.finish()
	}
}

/// A logger or modifier endpoint, immutable once registered.
pub struct EndpointDefinition {
	pub name: Box<str>,
	pub kind: EndpointKind,
	pub transform: Option<Transform>,
}

impl EndpointDefinition {
	pub fn is_logger(&self) -> bool {
		self.kind.contains(EndpointKind::LOGGER)
	}

	/// Run this definition's transform over `message`, if it has one.
	pub fn apply(&self, message: String) -> String {
		match &self.transform {
			Some(transform) => transform(message),
			None => message,
		}
	}
}

impl PartialEq for EndpointDefinition {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
			&& self.kind == other.kind
			&& match (&self.transform, &other.transform) {
				(Some(a), Some(b)) => Arc::ptr_eq(a, b),
				(None, None) => true,
				_ => false,
			}
	}
}

impl fmt::Debug for EndpointDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EndpointDefinition")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("transform", &self.transform.is_some())
			.finish()
	}
}

/// Tagged lookup result over the two definition tables.
#[derive(Debug, Clone)]
pub enum Definition {
	Mode(Arc<ModeDefinition>),
	Endpoint(Arc<EndpointDefinition>),
}

impl Definition {
	pub fn name(&self) -> &str {
		match self {
			Self::Mode(def) => &def.name,
			Self::Endpoint(def) => &def.name,
		}
	}
}
