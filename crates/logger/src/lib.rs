//! Chainable event logger.
//!
//! Callers register named loggers, message-transforming modifiers, and
//! mode flags, then compose them through a fluent chain that ends in one
//! structured emission:
//!
//! ```
//! use std::sync::Arc;
//! use chainlog::{EndpointOptions, Logger, ModeOptions};
//!
//! let log = Logger::new();
//! log.add_mode("verbose")?
//! 	.add_mode_with("not", ModeOptions::toggle(), None)?
//! 	.add_logger_with(
//! 		"red",
//! 		EndpointOptions::modifier(),
//! 		Some(Arc::new(|msg| format!("\x1b[31m{msg}\x1b[0m"))),
//! 	)?
//! 	.add_logger("write")?;
//!
//! log.on("write", Arc::new(|_, event| {
//! 	let descriptor = event.descriptor().unwrap();
//! 	assert_eq!(descriptor.mode("verbose"), Some(false));
//! }));
//!
//! // verbose is toggled off, red colors the message, write names the event.
//! log.chain("not")?.chain("verbose")?.chain("red")?.call("write", ["msg"])?;
//! # Ok::<(), chainlog::LogError>(())
//! ```
//!
//! Each traversal is recorded by a [`ChainEngine`] owned exclusively by
//! its [`Logger`]; the terminal call resolves the recorded entries into
//! an [`EmissionDescriptor`] and publishes it on the wildcard topic `"*"`
//! and then on the event's own topic. Definitions live in a
//! [`DefinitionRegistry`]; delivery goes through the
//! [`Transport`] owned by the facade (an in-memory [`EventBus`] by
//! default).

mod descriptor;
mod engine;
mod error;
mod event;
mod facade;

/// Event name used when a chain is invoked through a mode-only path;
/// registered on every facade at construction.
pub const DEFAULT_LOGGER: &str = "log";

pub use chainlog_registry::{
	Definition, DefinitionRegistry, EndpointDefinition, EndpointKind, EndpointOptions,
	ModeDefinition, ModeKind, ModeOptions, RegistryError, Transform,
};
pub use chainlog_transport::{Callback, EventBus, SubscriberId, Transport};

pub use crate::descriptor::EmissionDescriptor;
pub use crate::engine::{ChainEngine, ChainEntry};
pub use crate::error::LogError;
pub use crate::event::{
	LogEvent, TOPIC_ENDPOINT_REGISTERED, TOPIC_MODE_REGISTERED, TOPIC_WILDCARD,
};
pub use crate::facade::{Chain, DispatchFn, Logger};
