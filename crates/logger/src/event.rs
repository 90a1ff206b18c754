//! Transport payloads and the topics the facade publishes on.

use std::sync::Arc;

use chainlog_registry::{EndpointDefinition, ModeDefinition};

use crate::descriptor::EmissionDescriptor;

/// Topic receiving every emission, ahead of the name-specific publish.
pub const TOPIC_WILDCARD: &str = "*";
/// Topic receiving a signal for each completed `add_logger`.
pub const TOPIC_ENDPOINT_REGISTERED: &str = "endpointRegistered";
/// Topic receiving a signal for each completed `add_mode`.
pub const TOPIC_MODE_REGISTERED: &str = "modeRegistered";

/// Everything the facade publishes over its transport.
///
/// Emissions go to [`TOPIC_WILDCARD`] and then to the topic named after
/// the event; registration signals go only to their own topics so
/// wildcard listeners see emissions exclusively.
#[derive(Debug, Clone)]
pub enum LogEvent {
	/// A resolved chain was dispatched.
	Emission(Arc<EmissionDescriptor>),
	/// An endpoint finished registering.
	EndpointRegistered {
		name: Box<str>,
		def: Arc<EndpointDefinition>,
	},
	/// A mode finished registering.
	ModeRegistered {
		name: Box<str>,
		def: Arc<ModeDefinition>,
	},
}

impl LogEvent {
	/// The emission descriptor, when this event is an emission.
	pub fn descriptor(&self) -> Option<&EmissionDescriptor> {
		match self {
			Self::Emission(descriptor) => Some(descriptor),
			_ => None,
		}
	}

	/// The event name for emissions, or the registered name for signals.
	pub fn name(&self) -> &str {
		match self {
			Self::Emission(descriptor) => &descriptor.event_name,
			Self::EndpointRegistered { name, .. } | Self::ModeRegistered { name, .. } => name,
		}
	}
}
