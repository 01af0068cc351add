//! RFC 5849 request signing with HMAC-SHA1.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::{ConsumerKeys, Secret},
	error::ConfigError,
};

/// Signature method advertised in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

// RFC 3986 unreserved characters stay literal; everything else is escaped.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const NONCE_LEN: usize = 32;

type HmacSha1 = Hmac<Sha1>;

/// Per-request uniqueness values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Oauth1Nonce {
	/// Random `oauth_nonce`.
	pub nonce: String,
	/// Seconds since the Unix epoch (`oauth_timestamp`).
	pub timestamp: i64,
}
impl Oauth1Nonce {
	/// Draws a fresh nonce stamped with the current time.
	pub fn generate() -> Self {
		let nonce = rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();

		Self { nonce, timestamp: OffsetDateTime::now_utc().unix_timestamp() }
	}

	/// Uses caller-supplied values (replayable signatures for tests and debugging).
	pub fn fixed(nonce: impl Into<String>, timestamp: i64) -> Self {
		Self { nonce: nonce.into(), timestamp }
	}
}

/// Signs requests on behalf of a consumer and, once known, a token.
#[derive(Clone, Debug)]
pub struct Oauth1Signer {
	consumer: ConsumerKeys,
	token: Option<(String, Secret)>,
}
impl Oauth1Signer {
	/// Creates a signer holding only consumer credentials (request-token leg).
	pub fn new(consumer: ConsumerKeys) -> Self {
		Self { consumer, token: None }
	}

	/// Adds the token credentials used by later legs.
	pub fn with_token(mut self, token: impl Into<String>, secret: Secret) -> Self {
		self.token = Some((token.into(), secret));

		self
	}

	/// Computes the `Authorization: OAuth ...` header value for a request.
	///
	/// `protocol_params` carries leg-specific `oauth_*` parameters such as `oauth_callback`
	/// or `oauth_verifier`. Query parameters are read from `url`; form-encoded body
	/// parameters are passed through `body_params`.
	pub fn authorization_header(
		&self,
		method: &str,
		url: &Url,
		protocol_params: &[(&str, &str)],
		body_params: &[(String, String)],
		nonce: &Oauth1Nonce,
	) -> Result<String, ConfigError> {
		let mut oauth_params = self.protocol_params(nonce);

		oauth_params
			.extend(protocol_params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));

		let signature = self.sign(method, url, &oauth_params, body_params)?;

		oauth_params.push(("oauth_signature".into(), signature));
		oauth_params.sort();

		let fields = oauth_params
			.iter()
			.map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
			.collect::<Vec<_>>()
			.join(", ");

		Ok(format!("OAuth {fields}"))
	}

	fn protocol_params(&self, nonce: &Oauth1Nonce) -> Vec<(String, String)> {
		let mut params = vec![
			("oauth_consumer_key".to_owned(), self.consumer.key.expose().to_owned()),
			("oauth_nonce".to_owned(), nonce.nonce.clone()),
			("oauth_signature_method".to_owned(), SIGNATURE_METHOD.to_owned()),
			("oauth_timestamp".to_owned(), nonce.timestamp.to_string()),
			("oauth_version".to_owned(), OAUTH_VERSION.to_owned()),
		];

		if let Some((token, _)) = &self.token {
			params.push(("oauth_token".to_owned(), token.clone()));
		}

		params
	}

	fn sign(
		&self,
		method: &str,
		url: &Url,
		oauth_params: &[(String, String)],
		body_params: &[(String, String)],
	) -> Result<String, ConfigError> {
		let base = signature_base_string(method, url, oauth_params, body_params);
		let token_secret = self.token.as_ref().map(|(_, secret)| secret.expose()).unwrap_or("");
		let key = format!(
			"{}&{}",
			percent_encode(self.consumer.secret.expose()),
			percent_encode(token_secret)
		);
		let mut mac =
			<HmacSha1 as Mac>::new_from_slice(key.as_bytes()).map_err(|_| ConfigError::SigningKey)?;

		mac.update(base.as_bytes());

		Ok(STANDARD.encode(mac.finalize().into_bytes()))
	}
}

/// Escapes `value` per RFC 3986 as required by RFC 5849 §3.6.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, RFC3986).to_string()
}

fn signature_base_string(
	method: &str,
	url: &Url,
	oauth_params: &[(String, String)],
	body_params: &[(String, String)],
) -> String {
	let mut encoded: Vec<(String, String)> = oauth_params
		.iter()
		.cloned()
		.chain(url.query_pairs().into_owned())
		.chain(body_params.iter().cloned())
		.map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
		.collect();

	encoded.sort();

	let normalized =
		encoded.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		method.to_ascii_uppercase(),
		percent_encode(&base_string_uri(url)),
		percent_encode(&normalized)
	)
}

fn base_string_uri(url: &Url) -> String {
	format!("{}{}", url.origin().ascii_serialization(), url.path())
}
