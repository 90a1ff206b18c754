//! The chain engine: records accessor touches and resolves them into one
//! emission descriptor.
//!
//! One engine instance backs one facade instance exclusively. Its entry
//! sequence is scoped to the current unresolved traversal: [`resolve`]
//! drains it, and [`begin`] discards residue an abandoned traversal left
//! behind, so no entry ever leaks into the next traversal.
//!
//! [`resolve`]: ChainEngine::resolve
//! [`begin`]: ChainEngine::begin

use std::mem;
use std::sync::Arc;

use chainlog_registry::{EndpointDefinition, ModeDefinition};
use indexmap::IndexMap;
use tracing::trace;

use crate::DEFAULT_LOGGER;
use crate::descriptor::EmissionDescriptor;
use crate::error::LogError;

/// One step recorded while a fluent traversal walks the chain, in access
/// order. Entries of the same kind compound; none replaces a prior one.
#[derive(Debug, Clone)]
pub enum ChainEntry {
	/// A mode touched mid-chain, asserted `true` unless toggled.
	Mode(Arc<ModeDefinition>),
	/// A toggle; inverts the immediately following mode entry.
	Toggle(Arc<ModeDefinition>),
	/// A modifier endpoint; its transform runs during resolution.
	Modifier(Arc<EndpointDefinition>),
	/// A logger endpoint touched on the chain.
	Logger(Arc<EndpointDefinition>),
}

/// Accumulates chain entries and resolves them on terminal invocation.
#[derive(Debug, Default)]
pub struct ChainEngine {
	entries: Vec<ChainEntry>,
	invoked: Option<Arc<EndpointDefinition>>,
}

impl ChainEngine {
	/// Start a fresh traversal, discarding anything an abandoned one left.
	pub fn begin(&mut self) {
		self.entries.clear();
		self.invoked = None;
	}

	/// Record a mode touch. Toggle-kind definitions record as toggles.
	pub fn record_mode(&mut self, def: Arc<ModeDefinition>) {
		let entry = if def.is_toggle() {
			ChainEntry::Toggle(def)
		} else {
			ChainEntry::Mode(def)
		};
		self.entries.push(entry);
	}

	/// Record an endpoint touch. Logger-kind definitions record as
	/// loggers, everything else as modifiers.
	pub fn record_endpoint(&mut self, def: Arc<EndpointDefinition>) {
		let entry = if def.is_logger() {
			ChainEntry::Logger(def)
		} else {
			ChainEntry::Modifier(def)
		};
		self.entries.push(entry);
	}

	/// Mark the endpoint whose bound method was actually called. Its name
	/// becomes the event name at resolution.
	pub fn set_invoked(&mut self, def: Arc<EndpointDefinition>) {
		self.invoked = Some(def);
	}

	/// Number of entries recorded by the current traversal.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Resolve the recorded entries into one [`EmissionDescriptor`] and
	/// reset the engine to empty.
	///
	/// The event name is the invoked endpoint's; without an invoked
	/// endpoint it falls back to the last recorded logger entry, then to
	/// `"log"` when the invocation came through a mode-only path. Fails
	/// with [`LogError::NoEndpoint`] when none of those exist.
	///
	/// The message starts from the first raw argument and flows through
	/// each recorded entry's transform left to right; a mode toggled off
	/// contributes neither its flag as `true` nor its transform.
	pub fn resolve(&mut self, args: Vec<String>) -> Result<EmissionDescriptor, LogError> {
		let entries = mem::take(&mut self.entries);
		let invoked = self.invoked.take();

		let event_name = resolve_event_name(invoked.as_deref(), &entries)?;

		let mut mode_flags = IndexMap::new();
		let mut message = args.first().cloned();
		let mut i = 0;
		while i < entries.len() {
			match &entries[i] {
				ChainEntry::Toggle(_) => {
					// A toggle flips only the immediately following mode;
					// anything else leaves it inert.
					if let Some(ChainEntry::Mode(next)) = entries.get(i + 1) {
						mode_flags.insert(next.name.clone(), false);
						i += 2;
					} else {
						i += 1;
					}
				}
				ChainEntry::Mode(def) => {
					mode_flags.insert(def.name.clone(), true);
					message = message.map(|msg| def.apply(msg));
					i += 1;
				}
				ChainEntry::Modifier(def) | ChainEntry::Logger(def) => {
					message = message.map(|msg| def.apply(msg));
					i += 1;
				}
			}
		}

		trace!(event = %event_name, entries = entries.len(), "chain resolved");
		Ok(EmissionDescriptor {
			event_name,
			message,
			mode_flags,
			raw_args: args,
		})
	}
}

fn resolve_event_name(
	invoked: Option<&EndpointDefinition>,
	entries: &[ChainEntry],
) -> Result<Box<str>, LogError> {
	if let Some(def) = invoked {
		return Ok(def.name.clone());
	}
	let last_logger = entries.iter().rev().find_map(|entry| match entry {
		ChainEntry::Logger(def) => Some(def.name.clone()),
		_ => None,
	});
	if let Some(name) = last_logger {
		return Ok(name);
	}
	let has_mode = entries
		.iter()
		.any(|entry| matches!(entry, ChainEntry::Mode(_) | ChainEntry::Toggle(_)));
	if has_mode {
		return Ok(Box::from(DEFAULT_LOGGER));
	}
	Err(LogError::NoEndpoint)
}
