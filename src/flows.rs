//! Relay flows: the authorization redirect and the code-for-profile exchange.

pub mod authorize;
pub mod exchange;

mod token;

pub use authorize::*;
pub use exchange::*;

// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	config::RelayConfig,
	http::ReqwestHttpClient,
	provider::ProviderDescriptor,
	registry::{CodeRegistry, MemoryCodeRegistry},
	state::StateStore,
};

/// Coordinates the authorization-code relay against a single provider descriptor.
///
/// The relay owns the HTTP client, provider descriptor, client credentials, and the injected
/// replay registry so the individual flows only deal with request/response handling. Clones
/// share the registry and state store.
#[derive(Clone)]
pub struct Relay {
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<ReqwestHttpClient>,
	/// Provider descriptor that defines the OAuth endpoints.
	pub descriptor: ProviderDescriptor,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret sent to the token endpoint.
	pub client_secret: ClientSecret,
	/// Fixed callback URL registered with the provider.
	pub redirect_uri: Url,
	/// Scopes requested during authorization.
	pub scopes: Vec<String>,
	/// `User-Agent` sent to the user endpoint.
	pub user_agent: String,
	/// Replay guard for consumed authorization codes.
	pub registry: Arc<dyn CodeRegistry>,
	/// Issued states awaiting a callback; `None` leaves `state` unverified.
	pub states: Option<Arc<StateStore>>,
}
impl Relay {
	/// Scope requested when none is configured.
	pub const DEFAULT_SCOPE: &'static str = "user";
	/// `User-Agent` sent when none is configured.
	pub const DEFAULT_USER_AGENT: &'static str = "oauth2-relay";

	/// Creates a relay that provisions its own redirect-free reqwest transport.
	pub fn new(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: Url,
		registry: Arc<dyn CodeRegistry>,
	) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Ok(Self::with_http_client(
			descriptor,
			client_id,
			client_secret,
			redirect_uri,
			registry,
			http_client,
		))
	}

	/// Creates a relay that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: Url,
		registry: Arc<dyn CodeRegistry>,
		http_client: impl Into<Arc<ReqwestHttpClient>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			client_id: client_id.into(),
			client_secret: ClientSecret::new(client_secret),
			redirect_uri,
			scopes: vec![Self::DEFAULT_SCOPE.to_owned()],
			user_agent: Self::DEFAULT_USER_AGENT.to_owned(),
			registry,
			states: None,
		}
	}

	/// Builds a relay from loaded configuration, wiring the registry TTL and state verification.
	pub fn from_config(config: &RelayConfig) -> Result<Self> {
		let registry: Arc<dyn CodeRegistry> = match config.code_ttl {
			Some(ttl) => Arc::new(MemoryCodeRegistry::with_ttl(ttl)),
			None => Arc::new(MemoryCodeRegistry::default()),
		};
		let relay = Self::new(
			config.descriptor.clone(),
			config.client_id.clone(),
			config.client_secret.expose(),
			config.redirect_uri.clone(),
			registry,
		)?
		.with_scopes(config.scopes.iter().cloned())
		.with_user_agent(config.user_agent.clone());

		if config.verify_state {
			Ok(relay.with_state_store(Arc::new(StateStore::new(config.state_ttl))))
		} else {
			Ok(relay)
		}
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the `User-Agent` sent to the user endpoint.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Turns on callback `state` verification backed by `states`.
	pub fn with_state_store(mut self, states: Arc<StateStore>) -> Self {
		self.states = Some(states);

		self
	}

	/// Whether callbacks must present a previously issued `state`.
	pub fn verifies_state(&self) -> bool {
		self.states.is_some()
	}
}
impl Debug for Relay {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Relay")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("scopes", &self.scopes)
			.field("user_agent", &self.user_agent)
			.field("codes_retained", &self.registry.len())
			.field("verifies_state", &self.verifies_state())
			.finish()
	}
}
