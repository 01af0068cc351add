//! App credential accessor memoized per instance.
//!
//! [`AppCredentials`] reads `app_{app}_key` records from the secret store on first use and
//! keeps the decoded credential for the life of the instance. Fills are check-then-set with
//! no lock held across the store call: racing first callers may each read the store, the
//! first value written to the memo wins, and everyone returns that value. Provisioning
//! through the same instance replaces the memo entry for its app.

pub mod provisioning;

// self
use crate::{
	_prelude::*,
	auth::{AppCredential, AppName, ConsumerKeys, ServiceName},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{SecretKey, SecretStore},
};

/// Per-instance accessor for app-level API credentials.
pub struct AppCredentials {
	name: ServiceName,
	store: Arc<dyn SecretStore>,
	cache: RwLock<HashMap<AppName, AppCredential>>,
}
impl AppCredentials {
	/// Creates an empty accessor reading records under namespace `name`.
	pub fn new(name: ServiceName, store: Arc<dyn SecretStore>) -> Self {
		Self { name, store, cache: Default::default() }
	}

	/// Namespace the accessor reads from and provisioning writes to.
	pub fn service_name(&self) -> &ServiceName {
		&self.name
	}

	/// Returns the memoized credential without touching the store.
	pub fn cached(&self, app: &AppName) -> Option<AppCredential> {
		self.cache.read().get(app).cloned()
	}

	/// Resolves the credential for `app`, reading the store only on a memo miss.
	///
	/// Fails with [`Error::CredentialMissing`] when the record is absent or its payload is
	/// not a well-formed credential mapping.
	pub async fn get(&self, app: &AppName) -> Result<AppCredential> {
		const KIND: FlowKind = FlowKind::CredentialLookup;

		if let Some(credential) = self.cached(app) {
			return Ok(credential);
		}

		let span = FlowSpan::new(KIND, "get_app_credential");

		span.record_app(app);
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let fetched = match span.instrument(self.fetch(app)).await {
			Ok(credential) => credential,
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				return Err(e);
			},
		};

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		let mut cache = self.cache.write();

		Ok(cache.entry(app.clone()).or_insert(fetched).clone())
	}

	/// Resolves the OAuth1 consumer pair for `app`.
	///
	/// A stored credential without both `api_key` and `api_secret` cannot sign OAuth1
	/// requests and is reported as [`Error::CredentialMissing`].
	pub async fn consumer(&self, app: &AppName) -> Result<ConsumerKeys> {
		let credential = self.get(app).await?;

		credential.consumer().ok_or_else(|| {
			Error::credential_missing(SecretKey::app(app), "api_key and api_secret are required")
		})
	}

	pub(crate) fn replace(&self, credential: AppCredential) {
		self.cache.write().insert(credential.name.clone(), credential);
	}

	async fn fetch(&self, app: &AppName) -> Result<AppCredential> {
		let key = SecretKey::app(app);
		let record = self
			.store
			.get(&self.name, &key)
			.await?
			.ok_or_else(|| Error::credential_missing(&key, "record is absent"))?;
		let credential = record.decode::<AppCredential>()?;

		if credential.name != *app {
			return Err(Error::credential_missing(
				&key,
				format!("payload belongs to app `{}`", credential.name),
			));
		}

		Ok(credential)
	}
}
impl Debug for AppCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppCredentials")
			.field("name", &self.name)
			.field("cached", &self.cache.read().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::AppMeta,
		store::{MemorySecretStore, SecretRecord},
	};

	fn twitter() -> ServiceName {
		ServiceName::new("twitter").expect("Service fixture should be valid.")
	}

	fn app(name: &str) -> AppName {
		AppName::new(name).expect("App fixture should be valid.")
	}

	fn accessor() -> (AppCredentials, MemorySecretStore) {
		let store = MemorySecretStore::default();

		(AppCredentials::new(twitter(), Arc::new(store.clone())), store)
	}

	async fn seed(store: &MemorySecretStore, meta: AppMeta) {
		let credential = meta.into_credential().expect("Seed credential should be valid.");
		let record =
			SecretRecord::encode(&twitter(), &credential).expect("Seed credential should encode.");

		store.put(record).await.expect("Seeding the store should succeed.");
	}

	#[tokio::test]
	async fn absent_record_is_credential_missing() {
		let (credentials, _) = accessor();
		let err = credentials
			.get(&AppName::default())
			.await
			.expect_err("An empty store should have no credential.");

		assert!(matches!(err, Error::CredentialMissing { ref key, .. } if key == "app_default_key"));
		assert!(credentials.cached(&AppName::default()).is_none());
	}

	#[tokio::test]
	async fn lookups_are_memoized_per_app() {
		let (credentials, store) = accessor();

		seed(&store, AppMeta::new(app("default")).with_consumer("K", "S")).await;

		let first = credentials.get(&app("default")).await.expect("Lookup should succeed.");

		// A later out-of-band write is invisible to an instance that already memoized the app.
		seed(&store, AppMeta::new(app("default")).with_consumer("K2", "S2")).await;

		let second = credentials.get(&app("default")).await.expect("Lookup should succeed.");

		assert_eq!(first, second);
		assert_eq!(second.api_key.as_ref().map(|k| k.expose()), Some("K"));
	}

	#[tokio::test]
	async fn non_mapping_payload_is_credential_missing() {
		let (credentials, store) = accessor();

		store
			.put(SecretRecord {
				name: twitter(),
				key: SecretKey::app(&app("default")),
				data: serde_json::json!("not a mapping"),
			})
			.await
			.expect("Seeding the store should succeed.");

		let err = credentials
			.get(&app("default"))
			.await
			.expect_err("Non-mapping payloads should be rejected.");

		assert!(matches!(err, Error::CredentialMissing { .. }));
	}

	#[tokio::test]
	async fn consumer_requires_both_halves() {
		let (credentials, store) = accessor();

		seed(&store, AppMeta::new(app("bearer")).with_bearer_token("B")).await;

		let err = credentials
			.consumer(&app("bearer"))
			.await
			.expect_err("Bearer-only apps cannot sign OAuth1 requests.");

		assert!(matches!(err, Error::CredentialMissing { ref reason, .. } if reason.contains("api_key")));
	}
}
