//! RPC-facing facade of the adapter.
//!
//! [`TwitterService`] exposes one method per RPC (`setup_app`, `get_oauth1_url`,
//! `oauth1_get_access_token`, `fetch`, `download_media`) plus the service-path accessor and
//! the meta-event handler. Wiring it to an actual RPC framework is left to the host.

pub mod events;

pub use events::*;

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenSecret, AppCredential, AppMeta, AppName},
	credentials::AppCredentials,
	discovery::{ServiceDirectory, ServiceLocation, ServiceRegistry},
	flows::Oauth1Flow,
	http::EndpointHttpClient,
	oauth::TransportErrorMapper,
};

/// Status code returned by a successful `setup_app`.
pub const SETUP_APP_OK: i32 = 0;

/// Twitter adapter instance: flow controller plus the service discovery cache.
pub struct TwitterService<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	flow: Oauth1Flow<C, M>,
	directory: ServiceDirectory,
}
impl<C, M> TwitterService<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a service around `flow`, resolving its own location through `registry`.
	pub fn new(flow: Oauth1Flow<C, M>, registry: Arc<dyn ServiceRegistry>) -> Self {
		Self { flow, directory: ServiceDirectory::new(registry) }
	}

	/// Flow controller backing the OAuth1 RPCs.
	pub fn flow(&self) -> &Oauth1Flow<C, M> {
		&self.flow
	}

	/// App credential accessor (per-instance memo).
	pub fn credentials(&self) -> &AppCredentials {
		self.flow.credentials()
	}

	/// Service discovery cache.
	pub fn directory(&self) -> &ServiceDirectory {
		&self.directory
	}

	/// `setup_app`: writes app credentials, returning [`SETUP_APP_OK`].
	pub async fn setup_app(&self, meta: AppMeta) -> Result<i32> {
		self.flow.credentials().provision(meta).await?;

		Ok(SETUP_APP_OK)
	}

	/// Resolves the memoized app credential for `app`.
	pub async fn get_app_credential(&self, app: &AppName) -> Result<AppCredential> {
		self.flow.credentials().get(app).await
	}

	/// `get_oauth1_url`: starts authorization for `app` and returns the URL to visit.
	pub async fn get_oauth1_url(&self, app: &AppName) -> Result<String> {
		Ok(self.flow.begin_authorization(app).await?.url_string())
	}

	/// `oauth1_get_access_token`: redeems `oauth_token` with `oauth_verifier`.
	pub async fn oauth1_get_access_token(
		&self,
		oauth_token: &str,
		oauth_verifier: &str,
	) -> Result<AccessTokenSecret> {
		self.flow.complete_authorization(oauth_token, oauth_verifier).await
	}

	/// Location registered for this adapter, resolved once per instance.
	pub async fn service_path(&self) -> Result<ServiceLocation> {
		self.directory.resolve(self.flow.service_name()).await
	}

	/// `fetch`: not provided by this adapter.
	pub async fn fetch(&self, _meta: &Value) -> Result<Value> {
		Err(Error::Unsupported { operation: "fetch" })
	}

	/// `download_media`: not provided by this adapter.
	pub async fn download_media(&self, _meta: &Value) -> Result<Value> {
		Err(Error::Unsupported { operation: "download_media" })
	}
}
impl<C, M> Debug for TwitterService<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TwitterService")
			.field("flow", &self.flow)
			.field("directory", &self.directory)
			.finish()
	}
}
