//! OAuth1 endpoint facade: signs and dispatches the request-token and access-token legs.

pub mod signature;

pub use oauth2;
pub use signature::{Oauth1Nonce, Oauth1Signer, percent_encode};

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{ConsumerKeys, Secret},
	error::{ConfigError, TransientError, TransportError},
	http::{EndpointHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{
		EndpointStage, Oauth1Endpoints, ProviderErrorContext, ProviderErrorKind, ProviderStrategy,
	},
};

type FacadeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into adapter [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an adapter error.
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		stage: EndpointStage,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		stage: EndpointStage,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(strategy, stage, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransientError::Endpoint {
				message: format!("HTTP client error while calling the {stage} endpoint: {message}"),
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			}
			.into(),
			_ => TransientError::Endpoint {
				message: format!("HTTP client error while calling the {stage} endpoint"),
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			}
			.into(),
		}
	}
}

/// Temporary credentials minted by the request-token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporaryCredentials {
	/// Request token (`oauth_token`).
	pub token: String,
	/// Request token secret (`oauth_token_secret`).
	pub secret: Secret,
}

/// Token credentials minted by the access-token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenCredentials {
	/// Access token (`oauth_token`).
	pub token: String,
	/// Access token secret (`oauth_token_secret`).
	pub secret: Secret,
	/// Platform user id (`user_id`), when returned.
	pub user_id: Option<String>,
	/// Platform handle (`screen_name`), when returned.
	pub screen_name: Option<String>,
}

pub(crate) trait Oauth1Facade {
	fn request_token<'a, 'strategy, 'consumer, 'callback>(
		&'a self,
		strategy: &'strategy dyn ProviderStrategy,
		consumer: &'consumer ConsumerKeys,
		callback: &'callback Url,
	) -> FacadeFuture<'a, TemporaryCredentials>
	where
		'strategy: 'a,
		'consumer: 'a,
		'callback: 'a;

	fn access_token<'a, 'strategy, 'consumer, 'token, 'verifier>(
		&'a self,
		strategy: &'strategy dyn ProviderStrategy,
		consumer: &'consumer ConsumerKeys,
		request: &'token TemporaryCredentials,
		verifier: &'verifier str,
	) -> FacadeFuture<'a, TokenCredentials>
	where
		'strategy: 'a,
		'consumer: 'a,
		'token: 'a,
		'verifier: 'a;
}

/// Facade that signs each leg with HMAC-SHA1 and sends it through an [`EndpointHttpClient`].
pub(crate) struct SignedFacade<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	endpoints: Oauth1Endpoints,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> SignedFacade<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(
		endpoints: Oauth1Endpoints,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { endpoints, http_client: http_client.into(), error_mapper: error_mapper.into() }
	}

	pub(crate) fn endpoints(&self) -> &Oauth1Endpoints {
		&self.endpoints
	}

	async fn post_signed(
		&self,
		strategy: &dyn ProviderStrategy,
		stage: EndpointStage,
		signer: &Oauth1Signer,
		protocol_params: &[(&str, &str)],
	) -> Result<FormResponse> {
		let mut url = match stage {
			EndpointStage::RequestToken => self.endpoints.request_token.clone(),
			EndpointStage::AccessToken => self.endpoints.access_token.clone(),
		};
		let mut extra = BTreeMap::new();

		strategy.augment_request(stage, &mut extra);

		if !extra.is_empty() {
			url.query_pairs_mut().extend_pairs(extra.iter());
		}

		let header = signer.authorization_header(
			Method::POST.as_str(),
			&url,
			protocol_params,
			&[],
			&Oauth1Nonce::generate(),
		)?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(AUTHORIZATION, header)
			.header(ACCEPT, FORM_CONTENT_TYPE)
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.error_mapper.map_transport_error(strategy, stage, meta.take().as_ref(), err)
		})?;
		let status = response.status().as_u16();
		let body = String::from_utf8_lossy(response.body()).into_owned();

		if !response.status().is_success() {
			return Err(map_status_error(strategy, stage, status, &body, meta.take().as_ref()));
		}

		Ok(FormResponse::parse(status, &body))
	}
}
impl<C, M> Oauth1Facade for SignedFacade<C, M>
where
	C: ?Sized + EndpointHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn request_token<'a, 'strategy, 'consumer, 'callback>(
		&'a self,
		strategy: &'strategy dyn ProviderStrategy,
		consumer: &'consumer ConsumerKeys,
		callback: &'callback Url,
	) -> FacadeFuture<'a, TemporaryCredentials>
	where
		'strategy: 'a,
		'consumer: 'a,
		'callback: 'a,
	{
		Box::pin(async move {
			let signer = Oauth1Signer::new(consumer.clone());
			let form = self
				.post_signed(
					strategy,
					EndpointStage::RequestToken,
					&signer,
					&[("oauth_callback", callback.as_str())],
				)
				.await?;

			// Providers that ignore the callback would send the user to an out-of-band PIN page.
			if form.get("oauth_callback_confirmed").is_some_and(|value| value != "true") {
				return Err(Error::Rejected {
					status: Some(form.status),
					reason: "request-token endpoint did not confirm the callback URL".into(),
				});
			}

			Ok(TemporaryCredentials {
				token: form.require("oauth_token")?,
				secret: Secret::new(form.require("oauth_token_secret")?),
			})
		})
	}

	fn access_token<'a, 'strategy, 'consumer, 'token, 'verifier>(
		&'a self,
		strategy: &'strategy dyn ProviderStrategy,
		consumer: &'consumer ConsumerKeys,
		request: &'token TemporaryCredentials,
		verifier: &'verifier str,
	) -> FacadeFuture<'a, TokenCredentials>
	where
		'strategy: 'a,
		'consumer: 'a,
		'token: 'a,
		'verifier: 'a,
	{
		Box::pin(async move {
			let signer = Oauth1Signer::new(consumer.clone())
				.with_token(request.token.clone(), request.secret.clone());
			let form = self
				.post_signed(
					strategy,
					EndpointStage::AccessToken,
					&signer,
					&[("oauth_verifier", verifier)],
				)
				.await?;

			Ok(TokenCredentials {
				token: form.require("oauth_token")?,
				secret: Secret::new(form.require("oauth_token_secret")?),
				user_id: form.get("user_id").map(str::to_owned),
				screen_name: form.get("screen_name").map(str::to_owned),
			})
		})
	}
}

struct FormResponse {
	status: u16,
	fields: HashMap<String, String>,
}
impl FormResponse {
	fn parse(status: u16, body: &str) -> Self {
		let fields = url::form_urlencoded::parse(body.trim().as_bytes()).into_owned().collect();

		Self { status, fields }
	}

	fn get(&self, field: &str) -> Option<&str> {
		self.fields.get(field).map(String::as_str).filter(|value| !value.is_empty())
	}

	fn require(&self, field: &'static str) -> Result<String> {
		self.get(field)
			.map(str::to_owned)
			.ok_or_else(|| TransientError::MalformedResponse { field, status: Some(self.status) }.into())
	}
}

fn map_status_error(
	strategy: &dyn ProviderStrategy,
	stage: EndpointStage,
	status: u16,
	body: &str,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let ctx = ProviderErrorContext::new(stage).with_http_status(status).with_body_preview(body);
	let message = match ctx.body_preview.as_deref().map(str::trim) {
		Some(preview) if !preview.is_empty() =>
			format!("{stage} endpoint returned HTTP {status}: {preview}"),
		_ => format!("{stage} endpoint returned HTTP {status}"),
	};

	match strategy.classify_endpoint_error(&ctx) {
		ProviderErrorKind::Rejected => Error::Rejected { status: Some(status), reason: message },
		ProviderErrorKind::Transient => TransientError::Endpoint {
			message,
			status: Some(status),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	strategy: &dyn ProviderStrategy,
	stage: EndpointStage,
	meta: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		let ctx = ProviderErrorContext::network_failure(stage);

		if matches!(strategy.classify_endpoint_error(&ctx), ProviderErrorKind::Transient) {
			return TransientError::Endpoint {
				message: format!("Request timed out while calling the {stage} endpoint"),
				status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
				retry_after: meta_retry_after(meta),
			}
			.into();
		}
	}

	TransportError::from(err).into()
}

#[cfg(feature = "reqwest")]
fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
