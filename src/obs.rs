//! Optional observability helpers for adapter flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `twitter_adapter.flow` with the `flow`
//!   (operation) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `twitter_adapter_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// First OAuth1 leg: request token + authorization URL.
	BeginAuthorization,
	/// Final OAuth1 leg: verifier exchange for an access token.
	CompleteAuthorization,
	/// App credential provisioning.
	Provisioning,
	/// App credential lookup on a cache miss.
	CredentialLookup,
	/// Service path lookup on a cache miss.
	ServiceDiscovery,
	/// Delivery of a `meta` event.
	MetaEvent,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::BeginAuthorization => "begin_authorization",
			FlowKind::CompleteAuthorization => "complete_authorization",
			FlowKind::Provisioning => "provisioning",
			FlowKind::CredentialLookup => "credential_lookup",
			FlowKind::ServiceDiscovery => "service_discovery",
			FlowKind::MetaEvent => "meta_event",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an adapter operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
