//! Synchronous topic-based publish/subscribe.
//!
//! The facade in `chainlog` publishes every emission to the wildcard topic
//! `"*"` and then to the topic named after the event, so `"*"` is an
//! ordinary topic here rather than a pattern. Delivery is synchronous and
//! in subscription order; subscribers may re-enter the bus (subscribe,
//! unsubscribe, or publish) from inside a callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use tracing::trace;

/// Callback invoked with `(topic, payload)` for each publish on its topic.
pub type Callback<T> = Arc<dyn Fn(&str, &T) + Send + Sync>;

/// Token identifying one subscription, returned by [`Transport::subscribe`].
///
/// Rust closures have no usable identity, so unsubscription goes through
/// this token instead of the callback itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// The transport contract consumed by the dispatch facade.
///
/// [`EventBus`] is the default implementation; tests substitute recording
/// doubles to assert on publish order without wiring real subscribers.
pub trait Transport<T> {
	/// Register `callback` for `topic`. Callbacks on one topic fire in
	/// subscription order.
	fn subscribe(&self, topic: &str, callback: Callback<T>) -> SubscriberId;

	/// Remove the subscription identified by `id` from `topic`.
	///
	/// Returns `false` if no such subscription exists.
	fn unsubscribe(&self, topic: &str, id: SubscriberId) -> bool;

	/// Deliver `payload` to every subscriber of exactly `topic`.
	fn publish(&self, topic: &str, payload: &T);
}

/// In-memory synchronous event bus.
pub struct EventBus<T> {
	topics: Mutex<HashMap<Box<str>, Vec<(SubscriberId, Callback<T>)>>>,
	next_id: AtomicU64,
}

impl<T> EventBus<T> {
	pub fn new() -> Self {
		Self {
			topics: Mutex::new(HashMap::default()),
			next_id: AtomicU64::new(0),
		}
	}

	/// Number of live subscriptions on `topic`.
	pub fn subscriber_count(&self, topic: &str) -> usize {
		self.topics.lock().get(topic).map_or(0, Vec::len)
	}
}

impl<T> Default for EventBus<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Transport<T> for EventBus<T> {
	fn subscribe(&self, topic: &str, callback: Callback<T>) -> SubscriberId {
		let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.topics
			.lock()
			.entry(Box::from(topic))
			.or_default()
			.push((id, callback));
		id
	}

	fn unsubscribe(&self, topic: &str, id: SubscriberId) -> bool {
		let mut topics = self.topics.lock();
		let Some(subs) = topics.get_mut(topic) else {
			return false;
		};
		let before = subs.len();
		subs.retain(|(sub_id, _)| *sub_id != id);
		before != subs.len()
	}

	fn publish(&self, topic: &str, payload: &T) {
		// Snapshot the callbacks so re-entrant subscribe/unsubscribe from
		// inside a callback cannot deadlock; such changes take effect on
		// the next publish.
		let subs: Vec<Callback<T>> = {
			let topics = self.topics.lock();
			match topics.get(topic) {
				Some(subs) => subs.iter().map(|(_, cb)| cb.clone()).collect(),
				None => return,
			}
		};
		trace!(topic, subscribers = subs.len(), "publish");
		for cb in subs {
			cb(topic, payload);
		}
	}
}
