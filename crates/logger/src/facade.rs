//! The dispatch facade: registration, chain accessors, and emission.

use std::sync::Arc;

use chainlog_registry::{
	Definition, DefinitionRegistry, EndpointOptions, ModeOptions, Transform,
};
use chainlog_transport::{Callback, EventBus, SubscriberId, Transport};
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::DEFAULT_LOGGER;
use crate::descriptor::EmissionDescriptor;
use crate::engine::ChainEngine;
use crate::error::LogError;
use crate::event::{LogEvent, TOPIC_ENDPOINT_REGISTERED, TOPIC_MODE_REGISTERED, TOPIC_WILDCARD};

/// Caller-supplied replacement for the default dispatcher of one name.
///
/// Receives the facade and the terminal call's arguments; the chain entry
/// for the name is already recorded when this runs, so an override that
/// wants the default behavior can finish through [`Logger::emit`].
pub type DispatchFn = Arc<dyn Fn(&Logger, &[String]) -> Result<(), LogError> + Send + Sync>;

/// The object callers interact with: registers definitions, exposes chain
/// accessors over one exclusively-owned [`ChainEngine`], and performs the
/// final emit over its transport.
///
/// ```
/// use chainlog::Logger;
///
/// let log = Logger::new();
/// log.add_mode("verbose")?.add_logger("info")?;
/// log.chain("verbose")?.call("info", ["hello"])?;
/// # Ok::<(), chainlog::LogError>(())
/// ```
pub struct Logger {
	registry: DefinitionRegistry,
	engine: Mutex<ChainEngine>,
	methods: Mutex<HashMap<Box<str>, DispatchFn>>,
	transport: Box<dyn Transport<LogEvent> + Send + Sync>,
}

impl Logger {
	/// A facade owning a fresh [`EventBus`], with the default `"log"`
	/// endpoint pre-registered.
	pub fn new() -> Self {
		Self::with_transport(Box::new(EventBus::new()))
	}

	/// A facade publishing over the given transport; lets tests inject
	/// recording doubles.
	pub fn with_transport(transport: Box<dyn Transport<LogEvent> + Send + Sync>) -> Self {
		let logger = Self {
			registry: DefinitionRegistry::new(),
			engine: Mutex::new(ChainEngine::default()),
			methods: Mutex::new(HashMap::default()),
			transport,
		};
		// Default endpoint options always carry a valid kind set.
		let _ = logger.add_logger(DEFAULT_LOGGER);
		logger
	}

	/// The definition registry backing this facade.
	pub fn registry(&self) -> &DefinitionRegistry {
		&self.registry
	}

	/// Register a plain logger endpoint under `name`.
	pub fn add_logger(&self, name: &str) -> Result<&Self, LogError> {
		self.add_logger_with(name, EndpointOptions::default(), None)
	}

	/// Register an endpoint with explicit kind tags and an optional
	/// message transform.
	///
	/// Publishes an [`LogEvent::EndpointRegistered`] signal on
	/// [`TOPIC_ENDPOINT_REGISTERED`] before returning.
	pub fn add_logger_with(
		&self,
		name: &str,
		options: EndpointOptions,
		transform: Option<Transform>,
	) -> Result<&Self, LogError> {
		let def = self.registry.register_endpoint(name, options, transform)?;
		self.transport.publish(
			TOPIC_ENDPOINT_REGISTERED,
			&LogEvent::EndpointRegistered {
				name: def.name.clone(),
				def,
			},
		);
		Ok(self)
	}

	/// Register a plain mode under `name`.
	pub fn add_mode(&self, name: &str) -> Result<&Self, LogError> {
		self.add_mode_with(name, ModeOptions::default(), None)
	}

	/// Register a mode with explicit kind tags and an optional message
	/// transform.
	///
	/// Publishes an [`LogEvent::ModeRegistered`] signal on
	/// [`TOPIC_MODE_REGISTERED`] before returning.
	pub fn add_mode_with(
		&self,
		name: &str,
		options: ModeOptions,
		transform: Option<Transform>,
	) -> Result<&Self, LogError> {
		let def = self.registry.register_mode(name, options, transform)?;
		self.transport.publish(
			TOPIC_MODE_REGISTERED,
			&LogEvent::ModeRegistered {
				name: def.name.clone(),
				def,
			},
		);
		Ok(self)
	}

	/// Begin a fluent traversal at the accessor named `name`.
	///
	/// Residue from an abandoned traversal is discarded first, so two
	/// independent traversals never observe each other's entries.
	pub fn chain(&self, name: &str) -> Result<Chain<'_>, LogError> {
		self.engine.lock().begin();
		Chain { log: self }.chain(name)
	}

	/// Invoke the accessor named `name` as a one-step chain.
	pub fn call<I, S>(&self, name: &str, args: I) -> Result<&Self, LogError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.engine.lock().begin();
		Chain { log: self }.call(name, args)
	}

	/// Resolve the current chain against the registered endpoint `name`
	/// and publish the result: the advanced entry point behind every
	/// default terminal dispatch.
	///
	/// Fails with [`RegistryError::NotFound`] when `name` was never
	/// registered as an endpoint; nothing is published in that case.
	///
	/// [`RegistryError::NotFound`]: chainlog_registry::RegistryError::NotFound
	pub fn emit<I, S>(&self, name: &str, args: I) -> Result<&Self, LogError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let args: Vec<String> = args.into_iter().map(Into::into).collect();
		let def = self.registry.endpoint(name)?;
		let descriptor = {
			let mut engine = self.engine.lock();
			engine.record_endpoint(def.clone());
			engine.set_invoked(def);
			engine.resolve(args)?
		};
		self.dispatch(descriptor);
		Ok(self)
	}

	/// Replace the default dispatcher for `name`, facade-wide. The chain
	/// entry for `name` is still recorded before the override runs.
	pub fn set_method(&self, name: &str, method: DispatchFn) -> &Self {
		self.methods.lock().insert(Box::from(name), method);
		self
	}

	/// Remove an override installed by [`set_method`], restoring the
	/// default dispatcher. Returns `false` if none was installed.
	///
	/// [`set_method`]: Logger::set_method
	pub fn clear_method(&self, name: &str) -> bool {
		self.methods.lock().remove(name).is_some()
	}

	/// Subscribe to a transport topic: an event name, [`TOPIC_WILDCARD`],
	/// or a registration signal topic.
	pub fn on(&self, topic: &str, callback: Callback<LogEvent>) -> SubscriberId {
		self.transport.subscribe(topic, callback)
	}

	/// Drop a subscription made through [`on`](Logger::on).
	pub fn off(&self, topic: &str, id: SubscriberId) -> bool {
		self.transport.unsubscribe(topic, id)
	}

	fn method(&self, name: &str) -> Option<DispatchFn> {
		self.methods.lock().get(name).cloned()
	}

	// Publishes after all chain locks are released; subscribers may
	// re-enter the facade.
	fn dispatch(&self, descriptor: EmissionDescriptor) {
		let name = descriptor.event_name.clone();
		let event = LogEvent::Emission(Arc::new(descriptor));
		self.transport.publish(TOPIC_WILDCARD, &event);
		self.transport.publish(&name, &event);
	}
}

impl Default for Logger {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Logger {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Logger")
			.field("pending_entries", &self.engine.lock().len())
			.finish_non_exhaustive()
	}
}

/// Handle over one in-progress traversal. Every step returns a new handle
/// referencing the same underlying engine; the handle is consumed by each
/// step so a traversal cannot fork.
pub struct Chain<'log> {
	log: &'log Logger,
}

impl<'log> Chain<'log> {
	/// Continue the traversal through the accessor named `name`,
	/// recording a mode, toggle, modifier, or logger entry according to
	/// the definition's kind.
	pub fn chain(self, name: &str) -> Result<Self, LogError> {
		match self.log.registry.find(name)? {
			Definition::Mode(def) => self.log.engine.lock().record_mode(def),
			Definition::Endpoint(def) => self.log.engine.lock().record_endpoint(def),
		}
		Ok(self)
	}

	/// Terminate the traversal by invoking the accessor named `name`.
	///
	/// Endpoints resolve under their own name; a plain mode resolves
	/// under `"log"` (or the last logger touched on the chain); a toggle
	/// cannot terminate and fails with [`LogError::ToggleCall`]. An
	/// override installed via [`Logger::set_method`] replaces the default
	/// resolve-and-publish.
	pub fn call<I, S>(self, name: &str, args: I) -> Result<&'log Logger, LogError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let args: Vec<String> = args.into_iter().map(Into::into).collect();
		match self.log.registry.find(name)? {
			Definition::Mode(def) => {
				if def.is_toggle() {
					return Err(LogError::ToggleCall(def.name.to_string()));
				}
				self.log.engine.lock().record_mode(def);
				if let Some(method) = self.log.method(name) {
					method(self.log, &args)?;
					return Ok(self.log);
				}
				let descriptor = self.log.engine.lock().resolve(args)?;
				self.log.dispatch(descriptor);
				Ok(self.log)
			}
			Definition::Endpoint(def) => {
				{
					let mut engine = self.log.engine.lock();
					engine.record_endpoint(def.clone());
					engine.set_invoked(def);
				}
				if let Some(method) = self.log.method(name) {
					method(self.log, &args)?;
					return Ok(self.log);
				}
				let descriptor = self.log.engine.lock().resolve(args)?;
				self.log.dispatch(descriptor);
				Ok(self.log)
			}
		}
	}
}
