//! The definition registry: named mode and endpoint tables.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use tracing::debug;

use crate::defs::{
	Definition, EndpointDefinition, EndpointOptions, ModeDefinition, ModeOptions, Transform,
};
use crate::error::RegistryError;

/// Stores mode and endpoint definitions by name.
///
/// Shared read-mostly state: registrations and lookups take `&self` so one
/// registry can back every traversal of a facade instance. Re-registering
/// a name overwrites the previous definition in its table.
pub struct DefinitionRegistry {
	modes: Mutex<HashMap<Box<str>, Arc<ModeDefinition>>>,
	endpoints: Mutex<HashMap<Box<str>, Arc<EndpointDefinition>>>,
}

impl DefinitionRegistry {
	pub fn new() -> Self {
		Self {
			modes: Mutex::new(HashMap::default()),
			endpoints: Mutex::new(HashMap::default()),
		}
	}

	/// Register a logger/modifier endpoint under `name`.
	///
	/// Fails with [`RegistryError::InvalidKind`] when the kind set is
	/// empty.
	pub fn register_endpoint(
		&self,
		name: &str,
		options: EndpointOptions,
		transform: Option<Transform>,
	) -> Result<Arc<EndpointDefinition>, RegistryError> {
		if options.kind.is_empty() {
			return Err(RegistryError::InvalidKind {
				got: "<empty>".to_string(),
				allowed: crate::defs::EndpointKind::ALLOWED,
			});
		}
		let def = Arc::new(EndpointDefinition {
			name: Box::from(name),
			kind: options.kind,
			transform,
		});
		self.endpoints.lock().insert(def.name.clone(), def.clone());
		debug!(name, kind = ?options.kind, "endpoint registered");
		Ok(def)
	}

	/// Register a mode under `name`.
	///
	/// Fails with [`RegistryError::InvalidKind`] when the kind set is
	/// empty.
	pub fn register_mode(
		&self,
		name: &str,
		options: ModeOptions,
		transform: Option<Transform>,
	) -> Result<Arc<ModeDefinition>, RegistryError> {
		if options.kind.is_empty() {
			return Err(RegistryError::InvalidKind {
				got: "<empty>".to_string(),
				allowed: crate::defs::ModeKind::ALLOWED,
			});
		}
		let def = Arc::new(ModeDefinition {
			name: Box::from(name),
			kind: options.kind,
			transform,
		});
		self.modes.lock().insert(def.name.clone(), def.clone());
		debug!(name, kind = ?options.kind, "mode registered");
		Ok(def)
	}

	/// Look up an endpoint by name.
	pub fn endpoint(&self, name: &str) -> Result<Arc<EndpointDefinition>, RegistryError> {
		self.endpoints
			.lock()
			.get(name)
			.cloned()
			.ok_or_else(|| RegistryError::NotFound(name.to_string()))
	}

	/// Look up a mode by name.
	pub fn mode(&self, name: &str) -> Result<Arc<ModeDefinition>, RegistryError> {
		self.modes
			.lock()
			.get(name)
			.cloned()
			.ok_or_else(|| RegistryError::NotFound(name.to_string()))
	}

	/// Look up `name` in either table; the endpoint table wins when the
	/// same name was registered in both.
	pub fn find(&self, name: &str) -> Result<Definition, RegistryError> {
		if let Some(def) = self.endpoints.lock().get(name) {
			return Ok(Definition::Endpoint(def.clone()));
		}
		if let Some(def) = self.modes.lock().get(name) {
			return Ok(Definition::Mode(def.clone()));
		}
		Err(RegistryError::NotFound(name.to_string()))
	}

	/// Whether `name` is registered in either table.
	pub fn contains(&self, name: &str) -> bool {
		self.endpoints.lock().contains_key(name) || self.modes.lock().contains_key(name)
	}
}

impl Default for DefinitionRegistry {
	fn default() -> Self {
		Self::new()
	}
}
