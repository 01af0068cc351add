//! App credential provisioning (`setup_app`).

// self
use crate::{
	_prelude::*,
	auth::{AppCredential, AppMeta},
	credentials::AppCredentials,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::SecretRecord,
};

impl AppCredentials {
	/// Writes the credential described by `meta`, replacing any stored record wholesale.
	///
	/// Empty strings count as "not supplied". A request with no supplied field fails with
	/// [`Error::EmptyAppCredential`] and nothing is written. On success the local memo entry
	/// for the app is replaced; other instances keep whatever they already memoized.
	pub async fn provision(&self, meta: AppMeta) -> Result<AppCredential> {
		const KIND: FlowKind = FlowKind::Provisioning;

		let span = FlowSpan::new(KIND, "setup_app");

		span.record_app(&meta.name);
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let credential = meta.into_credential()?;
				let record = SecretRecord::encode(self.service_name(), &credential)?;

				self.store.put(record).await?;
				self.replace(credential.clone());

				Ok(credential)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{AppName, ServiceName},
		store::{MemorySecretStore, SecretKey},
	};

	fn twitter() -> ServiceName {
		ServiceName::new("twitter").expect("Service fixture should be valid.")
	}

	#[tokio::test]
	async fn provision_then_get_returns_last_written_fields() {
		let store = MemorySecretStore::default();
		let credentials = AppCredentials::new(twitter(), Arc::new(store.clone()));

		credentials
			.provision(AppMeta::default().with_consumer("K", "S"))
			.await
			.expect("First provisioning should succeed.");

		let before = credentials.get(&AppName::default()).await.expect("Lookup should succeed.");

		assert_eq!(before.api_key.as_ref().map(|v| v.expose()), Some("K"));

		credentials
			.provision(AppMeta::default().with_bearer_token("B"))
			.await
			.expect("Second provisioning should succeed.");

		let after = credentials.get(&AppName::default()).await.expect("Lookup should succeed.");

		assert_eq!(after.bearer_token.as_ref().map(|v| v.expose()), Some("B"));
		assert!(after.api_key.is_none(), "Provisioning replaces records wholesale.");

		let records = store.records(&twitter());

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].key, SecretKey::app(&AppName::default()));
		assert_eq!(records[0].data["bearer_token"], "B");
		assert_eq!(records[0].data["name"], "default");
	}

	#[tokio::test]
	async fn empty_meta_writes_nothing() {
		let store = MemorySecretStore::default();
		let credentials = AppCredentials::new(twitter(), Arc::new(store.clone()));
		let err = credentials
			.provision(AppMeta::default().with_consumer("", ""))
			.await
			.expect_err("A meta without values should be refused.");

		assert!(matches!(err, Error::EmptyAppCredential { ref app } if app == "default"));
		assert!(store.is_empty());
		assert!(credentials.cached(&AppName::default()).is_none());
	}
}
