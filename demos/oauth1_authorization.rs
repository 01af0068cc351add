//! Interactive three-legged OAuth1 walkthrough against Twitter.
//!
//! The demo provisions an app credential into an in-memory secret store, prints the
//! authorization URL, waits for the `oauth_token` and `oauth_verifier` the callback would
//! receive, exchanges them for an access token, and optionally calls
//! `account/verify_credentials` so the stored token is exercised end-to-end.

// std
use std::{
	io::{self, Write},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use twitter_adapter::{
	auth::{AccessTokenSecret, AppMeta, AppName, ConsumerKeys, Secret, ServiceName},
	config::AdapterConfig,
	discovery::{ServiceLocation, ServiceRegistry, StaticServiceRegistry},
	oauth::{Oauth1Nonce, Oauth1Signer},
	provider::AuthorizationVariant,
	reqwest::{Client, header::AUTHORIZATION},
	service::TwitterService,
	store::{MemorySecretStore, SecretStore},
};

const VERIFY_CREDENTIALS: &str = "https://api.twitter.com/1.1/account/verify_credentials.json";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let consumer_key = prompt_with_default("Enter your Twitter API key", None)?;
	let consumer_secret = prompt_with_default("Enter your Twitter API secret", None)?;
	let callback = prompt_with_default(
		"Enter the callback URL registered with Twitter",
		Some("https://ingest.example.com/twitter/callback"),
	)?;
	let mut config = AdapterConfig::new(callback);

	config.variant = AuthorizationVariant::Authorize;

	let store: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::default());
	let registry: Arc<dyn ServiceRegistry> = Arc::new(
		StaticServiceRegistry::default().with_location(
			ServiceName::twitter(),
			ServiceLocation::new("/services/twitter", "/storage/twitter"),
		),
	);
	let service = TwitterService::new(config.build_flow(store)?, registry);

	service
		.setup_app(AppMeta::new(AppName::default()).with_consumer(&consumer_key, &consumer_secret))
		.await?;

	let url = service.get_oauth1_url(&AppName::default()).await?;

	println!("Authorize URL: {url}");
	println!(
		"After Twitter redirects to your callback, copy the `oauth_token` and `oauth_verifier` query parameters and paste them here."
	);

	let request_token = prompt_with_default("oauth_token", None)?;
	let Some(verifier) = prompt_optional("oauth_verifier (leave blank to stop here)")? else {
		println!("Verifier not provided; the request token stays parked in the store.");

		return Ok(());
	};
	let access = service.oauth1_get_access_token(&request_token, &verifier).await?;

	println!("Access token: {}", access.access_token);
	println!("Screen name: {}", access.screen_name.as_deref().unwrap_or("<not returned>"));

	if prompt_optional("Call verify_credentials with the new token? (y/N)")?.as_deref() == Some("y")
	{
		let consumer =
			ConsumerKeys { key: Secret::new(consumer_key), secret: Secret::new(consumer_secret) };

		verify_credentials(consumer, &access).await?;
	}

	Ok(())
}

fn prompt_with_default(message: &str, default: Option<&str>) -> Result<String> {
	loop {
		if let Some(value) = default {
			print!("{message} [{value}]: ");
		} else {
			print!("{message}: ");
		}

		io::stdout().flush()?;

		let mut input = String::new();

		io::stdin().read_line(&mut input)?;

		let trimmed = input.trim();

		if trimmed.is_empty() {
			if let Some(value) = default {
				return Ok(value.to_owned());
			}
		} else {
			return Ok(trimmed.to_owned());
		}
	}
}

fn prompt_optional(message: &str) -> Result<Option<String>> {
	print!("{message}: ");

	io::stdout().flush()?;

	let mut input = String::new();

	io::stdin().read_line(&mut input)?;

	let trimmed = input.trim();

	if trimmed.is_empty() { Ok(None) } else { Ok(Some(trimmed.to_owned())) }
}

async fn verify_credentials(consumer: ConsumerKeys, access: &AccessTokenSecret) -> Result<()> {
	let url = Url::parse(VERIFY_CREDENTIALS)?;
	let (token, secret) = access.pair();
	let header = Oauth1Signer::new(consumer)
		.with_token(token, Secret::new(secret))
		.authorization_header("GET", &url, &[], &[], &Oauth1Nonce::generate())?;
	let response = Client::new().get(url).header(AUTHORIZATION, header).send().await?;
	let status = response.status();
	let body = response.text().await?;

	println!("verify_credentials response ({status}): {body}");

	Ok(())
}
