// self
use crate::{
	_prelude::*,
	provider::{AuthorizationVariant, Oauth1Endpoints},
};

/// Errors raised while constructing or validating endpoint descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum EndpointsError {
	/// A required endpoint was not supplied.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// An endpoint could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Builder for [`Oauth1Endpoints`] values.
#[derive(Debug, Default)]
pub struct Oauth1EndpointsBuilder {
	/// Request-token endpoint.
	pub request_token: Option<Url>,
	/// Authorize endpoint.
	pub authorize: Option<Url>,
	/// Optional sign-in endpoint; required by [`AuthorizationVariant::SignIn`].
	pub authenticate: Option<Url>,
	/// Access-token endpoint.
	pub access_token: Option<Url>,
	/// Authorization variant.
	pub variant: AuthorizationVariant,
}
impl Oauth1EndpointsBuilder {
	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token = Some(url);

		self
	}

	/// Sets the authorize endpoint.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize = Some(url);

		self
	}

	/// Sets the sign-in endpoint.
	pub fn authenticate_endpoint(mut self, url: Url) -> Self {
		self.authenticate = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token = Some(url);

		self
	}

	/// Overrides the authorization variant.
	pub fn variant(mut self, variant: AuthorizationVariant) -> Self {
		self.variant = variant;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<Oauth1Endpoints, EndpointsError> {
		let request_token = self
			.request_token
			.ok_or(EndpointsError::MissingEndpoint { endpoint: "request_token" })?;
		let authorize =
			self.authorize.ok_or(EndpointsError::MissingEndpoint { endpoint: "authorize" })?;
		let access_token =
			self.access_token.ok_or(EndpointsError::MissingEndpoint { endpoint: "access_token" })?;
		let endpoints = Oauth1Endpoints {
			request_token,
			authorize,
			authenticate: self.authenticate,
			access_token,
			variant: self.variant,
		};

		endpoints.validate()?;

		Ok(endpoints)
	}
}

impl Oauth1Endpoints {
	/// Validates invariants for the descriptor.
	pub(crate) fn validate(&self) -> Result<(), EndpointsError> {
		validate_endpoint("request_token", &self.request_token)?;
		validate_endpoint("authorize", &self.authorize)?;
		validate_endpoint("access_token", &self.access_token)?;

		match (self.variant, self.authenticate.as_ref()) {
			(_, Some(authenticate)) => validate_endpoint("authenticate", authenticate),
			(AuthorizationVariant::SignIn, None) =>
				Err(EndpointsError::MissingEndpoint { endpoint: "authenticate" }),
			(AuthorizationVariant::Authorize, None) => Ok(()),
		}
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), EndpointsError> {
	if url.scheme() != "https" {
		Err(EndpointsError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}
