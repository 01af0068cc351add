//! Meta event intake.
//!
//! The adapter subscribes to `create`/`merge` broadcasts from the `meta` producer, delivered
//! to one member of the adapter pool. Only `origin_url` is inspected; delivery is
//! at-least-once and handling has no side effects, so redelivery is harmless.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	http::EndpointHttpClient,
	oauth::TransportErrorMapper,
	obs::{FlowKind, FlowSpan},
	service::TwitterService,
};

/// Producer whose events the adapter consumes.
pub const META_PRODUCER: &str = "meta";
/// Event names the adapter subscribes to.
pub const META_EVENTS: [&str; 2] = ["create", "merge"];
/// Payload field holding the content URL.
pub const META_KEY_ORIGIN_URL: &str = "origin_url";

/// How a broadcast reaches the adapter's instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDelivery {
	/// Every instance receives the event.
	Broadcast,
	/// Exactly one instance of the pool receives the event.
	Pool,
}

/// Event-bus subscription declared by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventSubscription {
	/// Producing service.
	pub producer: &'static str,
	/// Event names.
	pub events: &'static [&'static str],
	/// Delivery mode.
	pub delivery: EventDelivery,
}
impl EventSubscription {
	/// Subscription to `meta` `create`/`merge` events, pool-distributed.
	pub const fn meta() -> Self {
		Self { producer: META_PRODUCER, events: &META_EVENTS, delivery: EventDelivery::Pool }
	}
}

/// Result of handling one meta event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetaEventOutcome {
	/// The event carries a string `origin_url`.
	Accepted {
		/// Content URL named by the event.
		origin_url: String,
	},
	/// The payload lacks a string `origin_url`; dropped without error.
	Discarded,
}

/// Classifies a raw meta event payload.
pub fn classify_meta_event(event: &Value) -> MetaEventOutcome {
	match event.get(META_KEY_ORIGIN_URL).and_then(Value::as_str) {
		Some(origin_url) => MetaEventOutcome::Accepted { origin_url: origin_url.to_owned() },
		None => MetaEventOutcome::Discarded,
	}
}

impl<C, M> TwitterService<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Subscriptions the host should register for this adapter.
	pub fn subscriptions(&self) -> Vec<EventSubscription> {
		vec![EventSubscription::meta()]
	}

	/// Handles one delivery of a `meta` event. Never fails and never touches adapter state.
	pub fn handle_meta_event(&self, event: &Value) -> MetaEventOutcome {
		let _guard = FlowSpan::new(FlowKind::MetaEvent, "handle_meta_event").entered();

		classify_meta_event(event)
	}
}
