//! Secret-store key taxonomy shared by every record this adapter writes.
//!
//! Keys are platform-global inside a namespace: `app_{app}_key` for app credentials,
//! `request_{token}_token` for transient request-token secrets, and
//! `access_{token}_key` for user access tokens.

// self
use crate::{
	_prelude::*,
	auth::{AppName, ServiceName},
};

/// Key of a secret record inside its namespace.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);
impl SecretKey {
	/// Key of the app credential record for `app`.
	pub fn app(app: &AppName) -> Self {
		Self(format!("app_{app}_key"))
	}

	/// Key of the transient record for an OAuth1 request token.
	pub fn request(request_token: &str) -> Self {
		Self(format!("request_{request_token}_token"))
	}

	/// Key of the persistent record for an OAuth1 access token.
	pub fn access(access_token: &str) -> Self {
		Self(format!("access_{access_token}_key"))
	}

	/// Returns the key as written to the store.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Debug for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SecretKey({})", self.0)
	}
}
impl Display for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Namespace + key pair identifying one record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretLocator {
	/// Namespace the record belongs to.
	pub name: ServiceName,
	/// Key inside the namespace.
	pub key: SecretKey,
}
impl SecretLocator {
	/// Builds a locator from borrowed parts.
	pub fn new(name: &ServiceName, key: &SecretKey) -> Self {
		Self { name: name.clone(), key: key.clone() }
	}
}
