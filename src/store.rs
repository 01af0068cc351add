//! Secret-store contract and built-in store implementations.
//!
//! The remote secret service is modeled as a [`SecretStore`] capability with
//! last-write-wins `put` and an Option-returning `get`, so an unknown key (`None`) is
//! always distinguishable from a present-but-empty record (`Some` with `{}` data).

pub mod file;
pub mod key;
pub mod memory;

pub use file::FileSecretStore;
pub use key::*;
pub use memory::MemorySecretStore;

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{_prelude::*, auth::ServiceName};

/// Boxed future returned by [`SecretStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Remote key/value secret service.
pub trait SecretStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the record at `(record.name, record.key)`.
	fn put(&self, record: SecretRecord) -> StoreFuture<'_, ()>;

	/// Fetches the record stored at `(name, key)`, if present.
	fn get<'a>(
		&'a self,
		name: &'a ServiceName,
		key: &'a SecretKey,
	) -> StoreFuture<'a, Option<SecretRecord>>;
}

/// Payload types that know the key they are stored under.
pub trait SecretPayload
where
	Self: Serialize + DeserializeOwned,
{
	/// Key the payload is written to.
	fn secret_key(&self) -> SecretKey;
}

/// Wire form of a secret record: `{ name, key, data }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecretRecord {
	/// Namespace (adapter name) owning the record.
	pub name: ServiceName,
	/// Key inside the namespace.
	pub key: SecretKey,
	/// Arbitrary payload; this adapter always writes a mapping.
	pub data: Value,
}
impl SecretRecord {
	/// Serializes `payload` into a record under its own key.
	pub fn encode<P>(name: &ServiceName, payload: &P) -> Result<Self, StoreError>
	where
		P: SecretPayload,
	{
		let data = serde_json::to_value(payload).map_err(|e| StoreError::Serialization {
			message: format!("Failed to encode payload for {}: {e}", payload.secret_key()),
		})?;

		Ok(Self { name: name.clone(), key: payload.secret_key(), data })
	}

	/// Decodes the payload, reporting a structurally invalid record as a missing credential.
	pub fn decode<P>(&self) -> Result<P>
	where
		P: DeserializeOwned,
	{
		if !self.data.is_object() {
			return Err(Error::credential_missing(&self.key, "payload is not a mapping"));
		}

		serde_path_to_error::deserialize(&self.data).map_err(|e| {
			Error::credential_missing(
				&self.key,
				format!("payload field `{}` is invalid: {}", e.path(), e.inner()),
			)
		})
	}

	/// Returns the namespace + key locator for the record.
	pub fn locator(&self) -> SecretLocator {
		SecretLocator::new(&self.name, &self.key)
	}
}

/// Error type produced by [`SecretStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
