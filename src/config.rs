//! Process configuration loaded from the environment (and an optional `.env` file).

// std
use std::net::SocketAddr;
// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	error::ConfigError,
	flows::Relay,
	provider::{self, ProviderDescriptor},
	state::StateStore,
};

/// Runtime configuration for the relay binary.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// Socket the HTTP server binds to.
	pub listen_addr: SocketAddr,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: ClientSecret,
	/// Fixed callback URL registered with the provider.
	pub redirect_uri: Url,
	/// Scopes requested during authorization.
	pub scopes: Vec<String>,
	/// `User-Agent` sent to the user endpoint.
	pub user_agent: String,
	/// Provider endpoints.
	pub descriptor: ProviderDescriptor,
	/// Retention window for consumed codes; `None` keeps them for the process lifetime.
	pub code_ttl: Option<Duration>,
	/// Whether callbacks must return a state issued by this process.
	pub verify_state: bool,
	/// Lifetime of issued states when verification is on.
	pub state_ttl: Duration,
}
impl RelayConfig {
	/// Callback URL used when `RELAY_REDIRECT_URI` is unset.
	pub const DEFAULT_REDIRECT_URI: &'static str = "http://localhost:3000/callback";
	/// Bind address used when `RELAY_LISTEN_ADDR` is unset.
	pub const DEFAULT_LISTEN_ADDR: &'static str = "0.0.0.0:5001";

	/// Loads `.env` when present, then reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds configuration from an arbitrary key lookup; blank values count as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let client_id = get("GITHUB_CLIENT_ID").ok_or(ConfigError::Missing("GITHUB_CLIENT_ID"))?;
		let client_secret = get("GITHUB_CLIENT_SECRET")
			.map(ClientSecret::new)
			.ok_or(ConfigError::Missing("GITHUB_CLIENT_SECRET"))?;
		let listen_addr = get("RELAY_LISTEN_ADDR")
			.unwrap_or_else(|| Self::DEFAULT_LISTEN_ADDR.to_owned())
			.parse::<SocketAddr>()
			.map_err(|e| invalid("RELAY_LISTEN_ADDR", e))?;
		let redirect_uri = Url::parse(
			&get("RELAY_REDIRECT_URI").unwrap_or_else(|| Self::DEFAULT_REDIRECT_URI.to_owned()),
		)
		.map_err(|e| invalid("RELAY_REDIRECT_URI", e))?;
		let scopes = get("RELAY_SCOPES")
			.map(|raw| {
				raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
			})
			.unwrap_or_else(|| vec![Relay::DEFAULT_SCOPE.to_owned()]);
		let user_agent =
			get("RELAY_USER_AGENT").unwrap_or_else(|| Relay::DEFAULT_USER_AGENT.to_owned());
		let endpoint = |key: &'static str, name: &'static str, fallback: &str| {
			provider::parse_endpoint(name, &get(key).unwrap_or_else(|| fallback.to_owned()))
		};
		let descriptor = ProviderDescriptor::builder("github")
			.authorization_endpoint(endpoint(
				"RELAY_AUTHORIZE_URL",
				"authorization",
				ProviderDescriptor::GITHUB_AUTHORIZE_URL,
			)?)
			.token_endpoint(endpoint("RELAY_TOKEN_URL", "token", ProviderDescriptor::GITHUB_TOKEN_URL)?)
			.user_endpoint(endpoint("RELAY_USER_URL", "user", ProviderDescriptor::GITHUB_USER_URL)?)
			.build()?;
		let code_ttl = get("RELAY_CODE_TTL_SECS")
			.map(|raw| parse_seconds("RELAY_CODE_TTL_SECS", &raw))
			.transpose()?;
		let verify_state = get("RELAY_VERIFY_STATE")
			.map(|raw| parse_bool("RELAY_VERIFY_STATE", &raw))
			.transpose()?
			.unwrap_or(false);
		let state_ttl = get("RELAY_STATE_TTL_SECS")
			.map(|raw| parse_seconds("RELAY_STATE_TTL_SECS", &raw))
			.transpose()?
			.unwrap_or(StateStore::DEFAULT_TTL);

		Ok(Self {
			listen_addr,
			client_id,
			client_secret,
			redirect_uri,
			scopes,
			user_agent,
			descriptor,
			code_ttl,
			verify_state,
			state_ttl,
		})
	}
}

fn invalid(name: &'static str, reason: impl Display) -> ConfigError {
	ConfigError::Invalid { name, reason: reason.to_string() }
}

fn parse_seconds(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
	let secs = raw.parse::<u32>().map_err(|e| invalid(name, e))?;

	if secs == 0 {
		return Err(invalid(name, "must be greater than zero"));
	}

	Ok(Duration::seconds(secs.into()))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
	match raw.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		other => Err(invalid(name, format!("`{other}` is not a boolean"))),
	}
}
