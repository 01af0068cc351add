//! Both legs of the three-legged handshake.
//!
//! The first leg stores `{app_name, request_token, request_secret}` under
//! `request_{token}_token`; the second leg reads it back by token alone, so the callback can
//! land on any instance sharing the store. Request-token records are never deleted and carry
//! no TTL. A failed exchange leaves the parked record in place.

// self
use crate::{
	_prelude::*,
	auth::{AccessTokenSecret, AppName, RequestTokenSecret},
	flows::{AuthorizationSession, Oauth1Flow},
	http::EndpointHttpClient,
	oauth::{Oauth1Facade, TemporaryCredentials, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{SecretKey, SecretRecord},
};

impl<C, M> Oauth1Flow<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Mints a fresh request token for `app` and returns the URL the user must visit.
	///
	/// Every call mints and stores a new token, so concurrent calls for one app never share
	/// a record.
	pub async fn begin_authorization(&self, app: &AppName) -> Result<AuthorizationSession> {
		const KIND: FlowKind = FlowKind::BeginAuthorization;

		let span = FlowSpan::new(KIND, "begin_authorization");

		span.record_app(app);
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let consumer = self.credentials.consumer(app).await?;
				let temporary = self
					.facade
					.request_token(self.strategy.as_ref(), &consumer, &self.callback)
					.await?;
				let parked = RequestTokenSecret {
					app_name: app.clone(),
					request_token: temporary.token,
					request_secret: temporary.secret,
				};

				self.store.put(SecretRecord::encode(self.service_name(), &parked)?).await?;

				let authorization_url = self.endpoints().authorization_url(&parked.request_token);

				Ok(AuthorizationSession {
					app: parked.app_name,
					request_token: parked.request_token,
					authorization_url,
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Redeems a parked request token with the verifier delivered to the callback.
	///
	/// An unknown, consumed, or forged token yields [`Error::CredentialMissing`]; a verifier
	/// refused by the provider surfaces as [`Error::Rejected`].
	pub async fn complete_authorization(
		&self,
		request_token: &str,
		verifier: &str,
	) -> Result<AccessTokenSecret> {
		const KIND: FlowKind = FlowKind::CompleteAuthorization;

		let span = FlowSpan::new(KIND, "complete_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let parked = self.parked_request_token(request_token).await?;

				span.record_app(&parked.app_name);

				let consumer = self.credentials.consumer(&parked.app_name).await?;
				let temporary = TemporaryCredentials {
					token: parked.request_token,
					secret: parked.request_secret,
				};
				let token = self
					.facade
					.access_token(self.strategy.as_ref(), &consumer, &temporary, verifier)
					.await?;
				let access = AccessTokenSecret {
					app_name: parked.app_name,
					access_token: token.token,
					access_secret: token.secret,
					user_id: token.user_id,
					screen_name: token.screen_name,
				};

				self.store.put(SecretRecord::encode(self.service_name(), &access)?).await?;

				Ok(access)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn parked_request_token(&self, request_token: &str) -> Result<RequestTokenSecret> {
		let key = SecretKey::request(request_token);
		let parked = self
			.store
			.get(self.service_name(), &key)
			.await?
			.ok_or_else(|| Error::credential_missing(&key, "record is absent"))?
			.decode::<RequestTokenSecret>()?;

		if parked.request_token != request_token {
			return Err(Error::credential_missing(&key, "payload token does not match its key"));
		}

		Ok(parked)
	}
}
