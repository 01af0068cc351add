// self
use crate::{_prelude::*, auth::AppName};

/// Outcome of the first OAuth1 leg, returned by [`crate::flows::Oauth1Flow::begin_authorization`].
///
/// The request-token secret is not part of the session: it is parked in the secret store so
/// whichever instance receives the callback can redeem it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationSession {
	/// App whose consumer keys minted the request token.
	pub app: AppName,
	/// Request token (`oauth_token`) embedded in the authorization URL.
	pub request_token: String,
	/// URL the user must visit to approve (or sign in with) the app.
	pub authorization_url: Url,
}
impl AuthorizationSession {
	/// Returns the authorization URL as sent over the RPC surface.
	pub fn url_string(&self) -> String {
		self.authorization_url.to_string()
	}
}
