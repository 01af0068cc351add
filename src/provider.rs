//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! [`Oauth1Endpoints`] carries the validated, HTTPS-only endpoint set of an OAuth1
//! provider together with the authorization variant the adapter sends users to.
//! `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook used by flows to
//! decorate outgoing requests and map endpoint failures into the adapter error taxonomy.

/// Builder and validation for [`Oauth1Endpoints`].
pub mod builder;
/// Endpoint error classification and request decoration hooks.
pub mod strategy;

pub use builder::*;
pub use strategy::*;

// self
use crate::_prelude::*;

/// Which user-facing endpoint the authorization URL points at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationVariant {
	/// Always prompts the user to approve the app.
	Authorize,
	#[default]
	/// "Sign in with" flow; skips the prompt for users who already approved the app.
	SignIn,
}

/// Endpoint set of a three-legged OAuth1 provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oauth1Endpoints {
	/// Endpoint minting temporary request tokens.
	pub request_token: Url,
	/// User-facing approval endpoint.
	pub authorize: Url,
	/// User-facing sign-in endpoint, when the provider has one.
	pub authenticate: Option<Url>,
	/// Endpoint exchanging a verified request token for an access token.
	pub access_token: Url,
	/// Variant used when building authorization URLs.
	pub variant: AuthorizationVariant,
}
impl Oauth1Endpoints {
	/// Creates a new builder.
	pub fn builder() -> Oauth1EndpointsBuilder {
		Oauth1EndpointsBuilder::default()
	}

	/// Twitter's OAuth1 endpoints with the sign-in variant.
	pub fn twitter() -> Result<Self, EndpointsError> {
		Self::builder()
			.request_token_endpoint(parse_static("request_token", TWITTER_REQUEST_TOKEN)?)
			.authorize_endpoint(parse_static("authorize", TWITTER_AUTHORIZE)?)
			.authenticate_endpoint(parse_static("authenticate", TWITTER_AUTHENTICATE)?)
			.access_token_endpoint(parse_static("access_token", TWITTER_ACCESS_TOKEN)?)
			.build()
	}

	/// Returns a copy using `variant` for authorization URLs.
	pub fn with_variant(mut self, variant: AuthorizationVariant) -> Result<Self, EndpointsError> {
		self.variant = variant;
		self.validate()?;

		Ok(self)
	}

	/// Builds the URL the user must visit to approve `request_token`.
	pub fn authorization_url(&self, request_token: &str) -> Url {
		let mut url = match (self.variant, self.authenticate.as_ref()) {
			(AuthorizationVariant::SignIn, Some(authenticate)) => authenticate.clone(),
			_ => self.authorize.clone(),
		};

		url.query_pairs_mut().append_pair("oauth_token", request_token);

		url
	}
}

const TWITTER_REQUEST_TOKEN: &str = "https://api.twitter.com/oauth/request_token";
const TWITTER_AUTHORIZE: &str = "https://api.twitter.com/oauth/authorize";
const TWITTER_AUTHENTICATE: &str = "https://api.twitter.com/oauth/authenticate";
const TWITTER_ACCESS_TOKEN: &str = "https://api.twitter.com/oauth/access_token";

fn parse_static(endpoint: &'static str, raw: &str) -> Result<Url, EndpointsError> {
	Url::parse(raw).map_err(|source| EndpointsError::InvalidUrl { endpoint, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn twitter_preset_signs_in_by_default() {
		let endpoints = Oauth1Endpoints::twitter().expect("Twitter preset should validate.");

		assert_eq!(endpoints.variant, AuthorizationVariant::SignIn);
		assert_eq!(
			endpoints.authorization_url("abc123").as_str(),
			"https://api.twitter.com/oauth/authenticate?oauth_token=abc123"
		);
	}

	#[test]
	fn authorize_variant_uses_authorize_endpoint() {
		let endpoints = Oauth1Endpoints::twitter()
			.and_then(|e| e.with_variant(AuthorizationVariant::Authorize))
			.expect("Twitter preset should validate.");

		assert_eq!(
			endpoints.authorization_url("abc123").as_str(),
			"https://api.twitter.com/oauth/authorize?oauth_token=abc123"
		);
	}

	#[test]
	fn authorization_url_escapes_token() {
		let endpoints = Oauth1Endpoints::twitter().expect("Twitter preset should validate.");
		let url = endpoints.authorization_url("a b&c");
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("oauth_token").map(String::as_str), Some("a b&c"));
	}

	#[test]
	fn variant_serializes_in_snake_case() {
		let payload = serde_json::to_string(&AuthorizationVariant::SignIn)
			.expect("Variant should serialize to JSON.");

		assert_eq!(payload, "\"sign_in\"");
	}
}
