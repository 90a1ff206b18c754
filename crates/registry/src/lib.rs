//! Definition registry for the chainlog facade.
//!
//! Holds the named [`ModeDefinition`]s and [`EndpointDefinition`]s a
//! facade exposes as chain accessors, and validates their kind tags at
//! registration time. The registry is transport-free; the facade publishes
//! registration signals after these calls return.

mod defs;
mod error;
mod registry;

pub use defs::{
	Definition, EndpointDefinition, EndpointKind, EndpointOptions, ModeDefinition, ModeKind,
	ModeOptions, Transform,
};
pub use error::RegistryError;
pub use registry::DefinitionRegistry;
