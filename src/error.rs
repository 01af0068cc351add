//! Adapter-level error types shared across flows, stores, and the service facade.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Secret-store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Control-plane failure while resolving a service path.
	#[error(transparent)]
	Registry(#[from] crate::discovery::RegistryError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller supplied an invalid identifier.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A secret record is absent or its payload is malformed.
	#[error("Credential `{key}` is missing or malformed: {reason}.")]
	CredentialMissing {
		/// Secret-store key that was looked up.
		key: String,
		/// Why the record could not be used.
		reason: String,
	},
	/// The third-party endpoint rejected the request (bad verifier, revoked consumer key, etc.).
	#[error("Provider rejected the request: {reason}.")]
	Rejected {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Provider- or adapter-supplied reason string.
		reason: String,
	},
	/// Provisioning request carried no credential field.
	#[error("App `{app}` provisioning supplied no credential field.")]
	EmptyAppCredential {
		/// App whose provisioning was refused.
		app: String,
	},
	/// Operation is exposed on the RPC surface but not implemented by this adapter.
	#[error("Operation `{operation}` is not supported by this adapter.")]
	Unsupported {
		/// RPC operation name.
		operation: &'static str,
	},
}
impl Error {
	pub(crate) fn credential_missing(key: impl Display, reason: impl Into<String>) -> Self {
		Self::CredentialMissing { key: key.to_string(), reason: reason.into() }
	}
}

/// Configuration and validation failures raised by the adapter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint descriptor failed validation.
	#[error(transparent)]
	Endpoints(#[from] crate::provider::EndpointsError),
	/// Callback URL cannot be parsed.
	#[error("Callback URL is invalid.")]
	InvalidCallback {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HMAC key could not be initialized.
	#[error("OAuth1 signing key is invalid.")]
	SigningKey,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("OAuth1 endpoint returned an unexpected response: {message}.")]
	Endpoint {
		/// Provider- or adapter-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Provider responded with a form body that lacks required fields.
	#[error("OAuth1 endpoint response is missing `{field}`.")]
	MalformedResponse {
		/// Form field that was absent or empty.
		field: &'static str,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the OAuth1 endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the OAuth1 endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
