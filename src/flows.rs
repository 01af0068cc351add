//! OAuth1 three-legged flow controller.
//!
//! [`Oauth1Flow`] owns the transport, the secret store, the provider endpoints, and the
//! per-instance app credential memo. The two legs live in `authorization`: the first
//! mints a request token and parks its secret in the shared store, the second redeems it
//! (possibly on another instance) for a long-lived access token.

/// Authorization session handed back by the first leg.
pub mod session;

mod authorization;

pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::ServiceName,
	credentials::AppCredentials,
	http::EndpointHttpClient,
	oauth::{SignedFacade, TransportErrorMapper},
	provider::{Oauth1Endpoints, ProviderStrategy},
	store::SecretStore,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Request timeout applied by [`Oauth1Flow::new`].
#[cfg(feature = "reqwest")]
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[cfg(feature = "reqwest")]
/// Flow controller specialized for the crate's default reqwest transport stack.
pub type ReqwestOauth1Flow = Oauth1Flow<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Coordinates the OAuth1 handshake for one adapter namespace.
pub struct Oauth1Flow<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Secret store shared with every other instance of the adapter.
	pub store: Arc<dyn SecretStore>,
	/// Strategy responsible for provider-specific request tweaks and error classification.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// Callback URL the provider redirects users to after approval.
	pub callback: Url,
	credentials: AppCredentials,
	facade: SignedFacade<C, M>,
}
impl<C, M> Oauth1Flow<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a flow that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		name: ServiceName,
		store: Arc<dyn SecretStore>,
		endpoints: Oauth1Endpoints,
		strategy: Arc<dyn ProviderStrategy>,
		callback: Url,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			credentials: AppCredentials::new(name, store.clone()),
			facade: SignedFacade::new(endpoints, http_client, mapper),
			store,
			strategy,
			callback,
		}
	}

	/// Namespace every record of this flow is written under.
	pub fn service_name(&self) -> &ServiceName {
		self.credentials.service_name()
	}

	/// Provider endpoints used by both legs.
	pub fn endpoints(&self) -> &Oauth1Endpoints {
		self.facade.endpoints()
	}

	/// App credential accessor shared with provisioning.
	pub fn credentials(&self) -> &AppCredentials {
		&self.credentials
	}
}
#[cfg(feature = "reqwest")]
impl Oauth1Flow<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a flow with its own reqwest transport.
	///
	/// The client disables redirects and applies [`DEFAULT_REQUEST_TIMEOUT`].
	pub fn new(
		name: ServiceName,
		store: Arc<dyn SecretStore>,
		endpoints: Oauth1Endpoints,
		strategy: Arc<dyn ProviderStrategy>,
		callback: Url,
	) -> Result<Self> {
		let http_client = ReqwestHttpClient::new(DEFAULT_REQUEST_TIMEOUT)?;

		Ok(Self::with_http_client(
			name,
			store,
			endpoints,
			strategy,
			callback,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<C, M> Debug for Oauth1Flow<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Oauth1Flow")
			.field("name", self.service_name())
			.field("endpoints", self.endpoints())
			.field("callback", &self.callback.as_str())
			.field("credentials", &self.credentials)
			.finish()
	}
}
