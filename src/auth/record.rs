//! Payloads persisted in the secret store: app credentials and OAuth1 token secrets.

// self
use crate::{
	_prelude::*,
	auth::{AppName, Secret},
	store::{SecretKey, SecretPayload},
};

/// App-level API credentials provisioned for a platform application.
///
/// Every field except `name` is optional because platforms hand out different subsets
/// (OAuth1 consumer pair, app-only bearer token, OAuth2 client pair).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredential {
	/// App the credentials belong to.
	pub name: AppName,
	/// OAuth1 consumer key.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<Secret>,
	/// OAuth1 consumer secret.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_secret: Option<Secret>,
	/// App-only bearer token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bearer_token: Option<Secret>,
	/// OAuth2 client identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	/// OAuth2 client secret.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<Secret>,
}
impl AppCredential {
	/// Returns the OAuth1 consumer pair when both halves are present and non-empty.
	pub fn consumer(&self) -> Option<ConsumerKeys> {
		let key = self.api_key.as_ref().filter(|value| !value.is_empty())?;
		let secret = self.api_secret.as_ref().filter(|value| !value.is_empty())?;

		Some(ConsumerKeys { key: key.clone(), secret: secret.clone() })
	}

	/// Returns `true` when no credential field carries a value.
	pub fn is_empty(&self) -> bool {
		self.api_key.is_none()
			&& self.api_secret.is_none()
			&& self.bearer_token.is_none()
			&& self.client_id.is_none()
			&& self.client_secret.is_none()
	}
}
impl SecretPayload for AppCredential {
	fn secret_key(&self) -> SecretKey {
		SecretKey::app(&self.name)
	}
}

/// OAuth1 consumer key + secret used to sign every request of the three-legged exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerKeys {
	/// Consumer key (`oauth_consumer_key`).
	pub key: Secret,
	/// Consumer secret (first half of the HMAC key).
	pub secret: Secret,
}

/// Provisioning request accepted by `setup_app`.
///
/// Empty strings are treated as "not supplied" so callers can send sparse forms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMeta {
	/// Target app; defaults to `default`.
	#[serde(default)]
	pub name: AppName,
	/// OAuth1 consumer key.
	#[serde(default)]
	pub api_key: Option<String>,
	/// OAuth1 consumer secret.
	#[serde(default)]
	pub api_secret: Option<String>,
	/// App-only bearer token.
	#[serde(default)]
	pub bearer_token: Option<String>,
	/// OAuth2 client identifier.
	#[serde(default)]
	pub client_id: Option<String>,
	/// OAuth2 client secret.
	#[serde(default)]
	pub client_secret: Option<String>,
}
impl AppMeta {
	/// Starts a provisioning request for the provided app.
	pub fn new(name: AppName) -> Self {
		Self { name, ..Default::default() }
	}

	/// Sets the OAuth1 consumer pair.
	pub fn with_consumer(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self.api_secret = Some(secret.into());

		self
	}

	/// Sets the app-only bearer token.
	pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
		self.bearer_token = Some(token.into());

		self
	}

	/// Sets the OAuth2 client pair.
	pub fn with_client(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
		self.client_id = Some(id.into());
		self.client_secret = Some(secret.into());

		self
	}

	/// Converts the request into the record that replaces any stored credential.
	pub fn into_credential(self) -> Result<AppCredential> {
		let credential = AppCredential {
			api_key: supplied(self.api_key).map(Secret::new),
			api_secret: supplied(self.api_secret).map(Secret::new),
			bearer_token: supplied(self.bearer_token).map(Secret::new),
			client_id: supplied(self.client_id),
			client_secret: supplied(self.client_secret).map(Secret::new),
			name: self.name,
		};

		if credential.is_empty() {
			return Err(Error::EmptyAppCredential { app: credential.name.to_string() });
		}

		Ok(credential)
	}
}

/// Transient record binding a request token to its secret and owning app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTokenSecret {
	/// App whose consumer keys minted the request token.
	pub app_name: AppName,
	/// Request token (`oauth_token`) returned by the request-token endpoint.
	pub request_token: String,
	/// Request token secret (`oauth_token_secret`).
	pub request_secret: Secret,
}
impl SecretPayload for RequestTokenSecret {
	fn secret_key(&self) -> SecretKey {
		SecretKey::request(&self.request_token)
	}
}

/// Long-lived user access token minted by the access-token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenSecret {
	/// App whose consumer keys minted the access token.
	pub app_name: AppName,
	/// Access token (`oauth_token`).
	pub access_token: String,
	/// Access token secret (`oauth_token_secret`).
	pub access_secret: Secret,
	/// Platform user id, when returned.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Platform handle, when returned.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub screen_name: Option<String>,
}
impl AccessTokenSecret {
	/// Returns the `(access_token, access_secret)` pair.
	pub fn pair(&self) -> (&str, &str) {
		(&self.access_token, self.access_secret.expose())
	}
}
impl SecretPayload for AccessTokenSecret {
	fn secret_key(&self) -> SecretKey {
		SecretKey::access(&self.access_token)
	}
}

fn supplied(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}
