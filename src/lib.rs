//! Twitter ingestion adapter: OAuth1 three-legged authorization, secret-store backed app
//! credentials, and service discovery caching for a horizontally scaled content-ingestion cluster.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod credentials;
pub mod discovery;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod service;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ServiceName,
		discovery::{ServiceLocation, ServiceRegistry, StaticServiceRegistry},
		flows::Oauth1Flow,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{DefaultProviderStrategy, Oauth1Endpoints, ProviderStrategy},
		service::TwitterService,
		store::{MemorySecretStore, SecretStore},
	};

	/// Service type alias used by reqwest-backed integration tests.
	pub type ReqwestTestService = TwitterService<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Namespace used by every test fixture.
	pub const TEST_SERVICE_NAME: &str = "twitter";

	/// Callback URL registered for test fixtures.
	pub const TEST_CALLBACK_URL: &str = "https://ingest.example.com/twitter/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Registry seeded with a location for [`TEST_SERVICE_NAME`].
	pub fn test_service_registry() -> StaticServiceRegistry {
		let name = ServiceName::new(TEST_SERVICE_NAME).expect("Test service name should be valid.");

		StaticServiceRegistry::default().with_location(
			name,
			ServiceLocation::new("/services/twitter", "/storage/twitter"),
		)
	}

	/// Constructs a [`TwitterService`] backed by an in-memory secret store, a static registry,
	/// and the reqwest transport used across integration tests.
	pub fn build_reqwest_test_service(
		endpoints: Oauth1Endpoints,
	) -> (ReqwestTestService, Arc<MemorySecretStore>, Arc<StaticServiceRegistry>) {
		let store_backend = Arc::new(MemorySecretStore::default());
		let store: Arc<dyn SecretStore> = store_backend.clone();
		let registry_backend = Arc::new(test_service_registry());
		let registry: Arc<dyn ServiceRegistry> = registry_backend.clone();
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);
		let name = ServiceName::new(TEST_SERVICE_NAME).expect("Test service name should be valid.");
		let callback =
			Url::parse(TEST_CALLBACK_URL).expect("Test callback URL should parse successfully.");
		let flow = Oauth1Flow::with_http_client(
			name,
			store,
			endpoints,
			strategy,
			callback,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		);
		let service = TwitterService::new(flow, registry);

		(service, store_backend, registry_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
