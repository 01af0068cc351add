//! Deserializable adapter configuration.
//!
//! Loading the configuration (files, environment) is left to the host process; this module
//! only validates an [`AdapterConfig`] into the pieces the flow controller needs.

// self
use crate::{
	_prelude::*,
	auth::ServiceName,
	error::ConfigError,
	provider::{AuthorizationVariant, Oauth1Endpoints, TwitterAccessType, TwitterProviderStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{
	flows::{Oauth1Flow, ReqwestOauth1Flow},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	store::SecretStore,
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Adapter settings as they appear in the host's configuration source.
///
/// ```
/// use twitter_adapter::config::AdapterConfig;
///
/// let config: AdapterConfig = serde_json::from_str(
/// 	r#"{ "callback_url": "https://ingest.example.com/twitter/callback" }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.name.as_ref(), "twitter");
/// assert!(config.endpoints().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
	/// Registry name and secret-store namespace.
	#[serde(default = "ServiceName::twitter")]
	pub name: ServiceName,
	/// Callback URL the provider redirects users to after approval.
	pub callback_url: String,
	/// Authorization endpoint variant.
	#[serde(default)]
	pub variant: AuthorizationVariant,
	/// Per-endpoint overrides of the Twitter defaults.
	#[serde(default)]
	pub endpoints: EndpointOverrides,
	/// Access level requested through `x_auth_access_type`.
	#[serde(default)]
	pub access_type: Option<TwitterAccessType>,
	/// Whole-request timeout for provider calls, in seconds.
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,
}
impl AdapterConfig {
	/// Creates a configuration using Twitter's endpoints and the given callback.
	pub fn new(callback_url: impl Into<String>) -> Self {
		Self {
			name: ServiceName::twitter(),
			callback_url: callback_url.into(),
			variant: AuthorizationVariant::default(),
			endpoints: EndpointOverrides::default(),
			access_type: None,
			request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
		}
	}

	/// Parses the callback URL.
	pub fn callback(&self) -> Result<Url, ConfigError> {
		Url::parse(&self.callback_url).map_err(|source| ConfigError::InvalidCallback { source })
	}

	/// Builds the validated endpoint set: Twitter's defaults, then overrides, then the variant.
	pub fn endpoints(&self) -> Result<Oauth1Endpoints, ConfigError> {
		let defaults = Oauth1Endpoints::twitter()?;
		let overrides = &self.endpoints;
		let mut builder = Oauth1Endpoints::builder()
			.request_token_endpoint(
				overrides.request_token.clone().unwrap_or(defaults.request_token),
			)
			.authorize_endpoint(overrides.authorize.clone().unwrap_or(defaults.authorize))
			.access_token_endpoint(
				overrides.access_token.clone().unwrap_or(defaults.access_token),
			)
			.variant(self.variant);

		if let Some(authenticate) = overrides.authenticate.clone().or(defaults.authenticate) {
			builder = builder.authenticate_endpoint(authenticate);
		}

		Ok(builder.build()?)
	}

	/// Strategy applying the configured access type.
	pub fn strategy(&self) -> TwitterProviderStrategy {
		TwitterProviderStrategy { access_type: self.access_type }
	}

	/// Request timeout as a std duration.
	pub fn request_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.request_timeout_secs)
	}

	/// Validates the configuration and assembles a reqwest-backed flow controller.
	#[cfg(feature = "reqwest")]
	pub fn build_flow(&self, store: Arc<dyn SecretStore>) -> Result<ReqwestOauth1Flow> {
		let http_client = ReqwestHttpClient::new(self.request_timeout())?;

		Ok(Oauth1Flow::with_http_client(
			self.name.clone(),
			store,
			self.endpoints()?,
			Arc::new(self.strategy()),
			self.callback()?,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}

/// Optional replacements for individual provider endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverrides {
	/// Request-token endpoint.
	#[serde(default)]
	pub request_token: Option<Url>,
	/// Authorize endpoint.
	#[serde(default)]
	pub authorize: Option<Url>,
	/// Sign-in endpoint.
	#[serde(default)]
	pub authenticate: Option<Url>,
	/// Access-token endpoint.
	#[serde(default)]
	pub access_token: Option<Url>,
}

fn default_request_timeout_secs() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_SECS
}
