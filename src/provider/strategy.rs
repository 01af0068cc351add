//! Provider strategy hooks that customize OAuth1 endpoint calls.
//!
//! Implementations decorate outgoing requests and normalize error mapping without tying
//! flows to any particular HTTP client.

// self
use crate::_prelude::*;

/// Strategy hook that allows providers to decorate requests and classify errors.
///
/// Override only what you need; `augment_request` defaults to a no-op.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a failed endpoint call into the adapter taxonomy.
	fn classify_endpoint_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;

	/// Adds provider-specific query parameters before the request is signed.
	///
	/// Parameters end up in the request URL and are covered by the OAuth1 signature.
	fn augment_request(&self, _stage: EndpointStage, _params: &mut BTreeMap<String, String>) {}
}

/// OAuth1 endpoint being called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointStage {
	/// Temporary credential request.
	RequestToken,
	/// Verifier exchange for token credentials.
	AccessToken,
}
impl EndpointStage {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EndpointStage::RequestToken => "request_token",
			EndpointStage::AccessToken => "access_token",
		}
	}
}
impl Display for EndpointStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider refused the request (bad verifier, unknown token, bad signature).
	Rejected,
	/// Failure is temporary and may be retried.
	Transient,
}

/// Context passed to provider strategies when classifying endpoint errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Endpoint that failed.
	pub stage: EndpointStage,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Preview of the response body.
	pub body_preview: Option<String>,
	/// Marks failures raised before any response arrived.
	pub network_failure: bool,
}
impl ProviderErrorContext {
	/// Creates an empty context for `stage`.
	pub fn new(stage: EndpointStage) -> Self {
		Self { stage, http_status: None, body_preview: None, network_failure: false }
	}

	/// Context for a failure raised before a response arrived.
	pub fn network_failure(stage: EndpointStage) -> Self {
		Self { network_failure: true, ..Self::new(stage) }
	}

	/// Attaches the HTTP status.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Attaches a body preview, truncated to a bounded length.
	pub fn with_body_preview(mut self, body: impl AsRef<str>) -> Self {
		self.body_preview = Some(body.as_ref().chars().take(BODY_PREVIEW_LEN).collect());

		self
	}
}

const BODY_PREVIEW_LEN: usize = 256;

/// Status-driven classification shared by every built-in strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProviderStrategy;
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_endpoint_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.network_failure {
			return ProviderErrorKind::Transient;
		}

		match ctx.http_status {
			Some(408 | 425 | 429) => ProviderErrorKind::Transient,
			Some(status) if status >= 500 => ProviderErrorKind::Transient,
			Some(status) if status >= 400 => ProviderErrorKind::Rejected,
			_ => match ctx.body_preview.as_deref() {
				Some(body) if body.contains("oauth_problem=") => ProviderErrorKind::Rejected,
				_ => ProviderErrorKind::Transient,
			},
		}
	}
}

/// Access level requested through Twitter's `x_auth_access_type` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterAccessType {
	/// Read-only access, even when the app is configured for more.
	Read,
	/// Read + write access.
	Write,
}
impl TwitterAccessType {
	/// Parameter value sent to Twitter.
	pub const fn as_str(self) -> &'static str {
		match self {
			TwitterAccessType::Read => "read",
			TwitterAccessType::Write => "write",
		}
	}
}

/// Twitter strategy: default classification plus an optional access-type override.
#[derive(Clone, Copy, Debug, Default)]
pub struct TwitterProviderStrategy {
	/// Access level requested while minting request tokens.
	pub access_type: Option<TwitterAccessType>,
}
impl TwitterProviderStrategy {
	/// Requests `access_type` on every authorization.
	pub fn with_access_type(access_type: TwitterAccessType) -> Self {
		Self { access_type: Some(access_type) }
	}
}
impl ProviderStrategy for TwitterProviderStrategy {
	fn classify_endpoint_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		DefaultProviderStrategy.classify_endpoint_error(ctx)
	}

	fn augment_request(&self, stage: EndpointStage, params: &mut BTreeMap<String, String>) {
		if let (EndpointStage::RequestToken, Some(access_type)) = (stage, self.access_type) {
			params.insert("x_auth_access_type".into(), access_type.as_str().into());
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_strategy_rejects_client_errors() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::new(EndpointStage::AccessToken).with_http_status(401);

		assert_eq!(strategy.classify_endpoint_error(&ctx), ProviderErrorKind::Rejected);

		let ctx = ProviderErrorContext::new(EndpointStage::RequestToken).with_http_status(403);

		assert_eq!(strategy.classify_endpoint_error(&ctx), ProviderErrorKind::Rejected);
	}

	#[test]
	fn default_strategy_treats_throttling_and_outages_as_transient() {
		let strategy = DefaultProviderStrategy;

		for status in [408, 429, 500, 503] {
			let ctx =
				ProviderErrorContext::new(EndpointStage::RequestToken).with_http_status(status);

			assert_eq!(strategy.classify_endpoint_error(&ctx), ProviderErrorKind::Transient);
		}

		let ctx = ProviderErrorContext::network_failure(EndpointStage::AccessToken);

		assert_eq!(strategy.classify_endpoint_error(&ctx), ProviderErrorKind::Transient);
	}

	#[test]
	fn default_strategy_reads_oauth_problem_without_status() {
		let ctx = ProviderErrorContext::new(EndpointStage::AccessToken)
			.with_body_preview("oauth_problem=token_rejected");

		assert_eq!(
			DefaultProviderStrategy.classify_endpoint_error(&ctx),
			ProviderErrorKind::Rejected
		);
	}

	#[test]
	fn body_preview_is_truncated() {
		let ctx = ProviderErrorContext::new(EndpointStage::AccessToken)
			.with_body_preview("x".repeat(BODY_PREVIEW_LEN * 2));

		assert_eq!(ctx.body_preview.map(|b| b.len()), Some(BODY_PREVIEW_LEN));
	}

	#[test]
	fn twitter_strategy_adds_access_type_to_request_token_only() {
		let strategy = TwitterProviderStrategy::with_access_type(TwitterAccessType::Read);
		let mut params = BTreeMap::new();

		strategy.augment_request(EndpointStage::RequestToken, &mut params);

		assert_eq!(params.get("x_auth_access_type").map(String::as_str), Some("read"));

		let mut params = BTreeMap::new();

		strategy.augment_request(EndpointStage::AccessToken, &mut params);

		assert!(params.is_empty());
	}
}
