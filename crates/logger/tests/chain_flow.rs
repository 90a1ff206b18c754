//! End-to-end traversal, resolution, and delivery behavior.

use std::sync::Arc;

use chainlog::{
	Callback, EndpointOptions, EventBus, LogError, LogEvent, Logger, ModeOptions, RegistryError,
	SubscriberId, TOPIC_WILDCARD, Transport,
};
use parking_lot::Mutex;

/// Transport double recording every publish in order.
struct RecordingTransport {
	inner: EventBus<LogEvent>,
	published: Arc<Mutex<Vec<(String, LogEvent)>>>,
}

impl RecordingTransport {
	fn new() -> (Box<Self>, Arc<Mutex<Vec<(String, LogEvent)>>>) {
		let published = Arc::new(Mutex::new(Vec::new()));
		let transport = Box::new(Self {
			inner: EventBus::new(),
			published: published.clone(),
		});
		(transport, published)
	}
}

impl Transport<LogEvent> for RecordingTransport {
	fn subscribe(&self, topic: &str, callback: Callback<LogEvent>) -> SubscriberId {
		self.inner.subscribe(topic, callback)
	}

	fn unsubscribe(&self, topic: &str, id: SubscriberId) -> bool {
		self.inner.unsubscribe(topic, id)
	}

	fn publish(&self, topic: &str, payload: &LogEvent) {
		self.published.lock().push((topic.to_string(), payload.clone()));
		self.inner.publish(topic, payload);
	}
}

fn emissions(published: &Mutex<Vec<(String, LogEvent)>>) -> Vec<(String, String)> {
	published
		.lock()
		.iter()
		.filter(|(_, event)| event.descriptor().is_some())
		.map(|(topic, event)| (topic.clone(), event.name().to_string()))
		.collect()
}

#[test]
fn emission_publishes_wildcard_then_specific_exactly_once() {
	let (transport, published) = RecordingTransport::new();
	let log = Logger::with_transport(transport);
	log.add_logger("info").unwrap();

	log.call("info", ["hello"]).unwrap();

	assert_eq!(
		emissions(&published),
		vec![
			("*".to_string(), "info".to_string()),
			("info".to_string(), "info".to_string()),
		]
	);
}

#[test]
fn concrete_descriptor_shape_matches_the_wire_contract() {
	let (transport, published) = RecordingTransport::new();
	let log = Logger::with_transport(transport);
	log.add_logger("info").unwrap();

	log.call("info", ["hello"]).unwrap();

	let published = published.lock();
	let (topic, event) = &published[published.len() - 2];
	assert_eq!(topic, "*");
	let value = serde_json::to_value(event.descriptor().unwrap()).unwrap();
	assert_eq!(
		value,
		serde_json::json!({
			"eventName": "info",
			"message": "hello",
			"modeFlags": {},
			"rawArgs": ["hello"],
		})
	);
}

#[test]
fn modifiers_compose_in_access_order() {
	let log = Logger::new();
	log.add_logger_with(
		"a",
		EndpointOptions::modifier(),
		Some(Arc::new(|m| format!("fa({m})"))),
	)
	.unwrap()
	.add_logger_with(
		"b",
		EndpointOptions::modifier(),
		Some(Arc::new(|m| format!("fb({m})"))),
	)
	.unwrap()
	.add_logger("write")
	.unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	log.on(
		"write",
		Arc::new(move |_, event: &LogEvent| {
			sink.lock()
				.push(event.descriptor().unwrap().message.clone());
		}),
	);

	log.chain("a").unwrap().chain("b").unwrap().call("write", ["x"]).unwrap();

	assert_eq!(*seen.lock(), vec![Some("fb(fa(x))".to_string())]);
}

#[test]
fn toggle_flips_the_following_mode_and_plain_mode_asserts_true() {
	let log = Logger::new();
	log.add_mode("verbose")
		.unwrap()
		.add_mode_with("not", ModeOptions::toggle(), None)
		.unwrap()
		.add_logger("info")
		.unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	log.on(
		"info",
		Arc::new(move |_, event: &LogEvent| {
			sink.lock()
				.push(event.descriptor().unwrap().mode("verbose"));
		}),
	);

	log.chain("not").unwrap().chain("verbose").unwrap().call("info", ["m"]).unwrap();
	log.chain("verbose").unwrap().call("info", ["m"]).unwrap();

	assert_eq!(*seen.lock(), vec![Some(false), Some(true)]);
}

#[test]
fn sequential_calls_never_share_chain_state() {
	let log = Logger::new();
	log.add_mode("verbose").unwrap().add_logger("info").unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	log.on(
		"info",
		Arc::new(move |_, event: &LogEvent| {
			sink.lock()
				.push(event.descriptor().unwrap().mode_flags.len());
		}),
	);

	log.chain("verbose").unwrap().call("info", ["first"]).unwrap();
	log.call("info", ["second"]).unwrap();

	assert_eq!(*seen.lock(), vec![1, 0]);
}

#[test]
fn unregistered_name_fails_without_publishing() {
	let (transport, published) = RecordingTransport::new();
	let log = Logger::with_transport(transport);
	published.lock().clear();

	let err = log.emit("nope", ["x"]).unwrap_err();
	assert_eq!(
		err,
		LogError::Registry(RegistryError::NotFound("nope".to_string()))
	);
	assert!(matches!(
		log.chain("nope"),
		Err(LogError::Registry(RegistryError::NotFound(_)))
	));
	assert!(published.lock().is_empty());
}

#[test]
fn registration_signals_publish_synchronously() {
	let (transport, published) = RecordingTransport::new();
	let log = Logger::with_transport(transport);
	published.lock().clear();

	log.add_logger("info").unwrap();
	log.add_mode("verbose").unwrap();

	let published = published.lock();
	assert_eq!(published.len(), 2);
	assert_eq!(published[0].0, "endpointRegistered");
	assert_eq!(published[0].1.name(), "info");
	assert_eq!(published[1].0, "modeRegistered");
	assert_eq!(published[1].1.name(), "verbose");
}

#[test]
fn dual_kind_endpoint_acts_as_logger_when_invoked() {
	let log = Logger::new();
	log.add_logger_with(
		"loud",
		EndpointOptions {
			kind: chainlog::EndpointKind::LOGGER | chainlog::EndpointKind::MODIFIER,
		},
		Some(Arc::new(|m| m.to_uppercase())),
	)
	.unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	log.on(
		"loud",
		Arc::new(move |_, event: &LogEvent| {
			sink.lock()
				.push(event.descriptor().unwrap().message.clone());
		}),
	);

	log.call("loud", ["hello"]).unwrap();
	assert_eq!(*seen.lock(), vec![Some("HELLO".to_string())]);
}

#[test]
fn mode_invocation_defaults_to_the_log_event() {
	let (transport, published) = RecordingTransport::new();
	let log = Logger::with_transport(transport);
	log.add_mode("verbose").unwrap();
	published.lock().clear();

	log.call("verbose", ["msg"]).unwrap();

	assert_eq!(
		emissions(&published),
		vec![
			("*".to_string(), "log".to_string()),
			("log".to_string(), "log".to_string()),
		]
	);
}

#[test]
fn wildcard_receives_emissions_but_not_registration_signals() {
	let log = Logger::new();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	log.on(
		TOPIC_WILDCARD,
		Arc::new(move |_, event: &LogEvent| sink.lock().push(event.name().to_string())),
	);

	log.add_logger("info").unwrap();
	log.call("info", ["x"]).unwrap();

	assert_eq!(*seen.lock(), vec!["info"]);
}

#[test]
fn unsubscribed_listener_stops_receiving() {
	let log = Logger::new();
	log.add_logger("info").unwrap();

	let seen = Arc::new(Mutex::new(0u32));
	let sink = seen.clone();
	let id = log.on(
		"info",
		Arc::new(move |_, _: &LogEvent| *sink.lock() += 1),
	);

	log.call("info", ["x"]).unwrap();
	assert!(log.off("info", id));
	log.call("info", ["y"]).unwrap();

	assert_eq!(*seen.lock(), 1);
}

#[test]
fn subscriber_can_start_a_new_traversal_reentrantly() {
	let log = Arc::new(Logger::new());
	log.add_logger("first").unwrap().add_logger("second").unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	log.on(
		"second",
		Arc::new(move |_, event: &LogEvent| {
			sink.lock()
				.push(event.descriptor().unwrap().message.clone());
		}),
	);

	let reentrant = log.clone();
	log.on(
		"first",
		Arc::new(move |_, _: &LogEvent| {
			reentrant.call("second", ["nested"]).unwrap();
		}),
	);

	log.call("first", ["outer"]).unwrap();
	assert_eq!(*seen.lock(), vec![Some("nested".to_string())]);
}
