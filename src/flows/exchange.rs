//! Callback exchange: replay guard, token request, and user profile fetch.

// crates.io
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::UpstreamError,
	flows::{
		Relay,
		token::{self, TokenRequest},
	},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	registry::{ClaimOutcome, CodeFingerprint},
};

/// Media type GitHub expects for the versioned REST API.
pub const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";

/// Payload posted by the client after the provider redirected back to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackRequest {
	/// Authorization code issued by the provider.
	#[serde(default)]
	pub code: Option<String>,
	/// State returned alongside the code; only checked when the relay verifies state.
	#[serde(default)]
	pub state: Option<String>,
}
impl CallbackRequest {
	/// Builds a request carrying only a code.
	pub fn with_code(code: impl Into<String>) -> Self {
		Self { code: Some(code.into()), state: None }
	}

	/// Attaches the returned state.
	pub fn and_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}
}

/// Successful exchange: the provider's raw user profile and the access token that fetched it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayOutcome {
	/// User profile exactly as returned by the provider.
	pub user: Value,
	/// Access token issued for the exchanged code.
	pub access_token: AccessToken,
}

impl Relay {
	/// Exchanges a single-use authorization code for an access token and the user's profile.
	///
	/// The code is claimed in the registry before any provider call, so a failed exchange burns
	/// it as surely as a successful one. Either both the token and the profile come back, or
	/// neither does.
	pub async fn exchange_code(&self, request: CallbackRequest) -> Result<RelayOutcome> {
		let span = FlowSpan::new(FlowKind::Exchange, "exchange_code");

		obs::record_flow_outcome(FlowKind::Exchange, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange_code_inner(request)).await;
		let outcome = match &result {
			Ok(_) => FlowOutcome::Success,
			Err(e) if e.is_client_error() => FlowOutcome::Rejected,
			Err(_) => FlowOutcome::Failure,
		};

		obs::record_flow_outcome(FlowKind::Exchange, outcome);

		result
	}

	async fn exchange_code_inner(&self, request: CallbackRequest) -> Result<RelayOutcome> {
		let CallbackRequest { code, state } = request;
		let code = code.filter(|code| !code.is_empty()).ok_or_else(|| {
			tracing::warn!("callback rejected: no code provided");

			Error::MissingCode
		})?;

		self.verify_state(state.as_deref())?;

		let fingerprint = CodeFingerprint::of(&code);

		let claim = self.registry.claim(&code);

		obs::record_code_claim(claim);

		if claim == ClaimOutcome::AlreadyUsed {
			tracing::warn!(code = %fingerprint, "callback rejected: code already used");

			return Err(Error::CodeReused);
		}

		match self.exchange_claimed(&code).await {
			Ok(outcome) => {
				tracing::info!(code = %fingerprint, "authorization code exchanged");

				Ok(outcome)
			},
			Err(e) => {
				tracing::error!(
					code = %fingerprint,
					error = %e,
					provider_body = e.provider_body(),
					detail = ?e,
					"authentication failed"
				);

				Err(e.into())
			},
		}
	}

	fn verify_state(&self, state: Option<&str>) -> Result<()> {
		let Some(states) = &self.states else {
			return Ok(());
		};

		if state.is_some_and(|state| states.consume(state)) {
			Ok(())
		} else {
			tracing::warn!(state_present = state.is_some(), "callback rejected: invalid state");

			Err(Error::InvalidState)
		}
	}

	async fn exchange_claimed(&self, code: &str) -> Result<RelayOutcome, UpstreamError> {
		let access_token = self.request_access_token(code).await?;
		let user = self.fetch_profile(&access_token).await?;

		Ok(RelayOutcome { user, access_token })
	}

	async fn request_access_token(&self, code: &str) -> Result<AccessToken, UpstreamError> {
		let body = TokenRequest {
			client_id: &self.client_id,
			client_secret: self.client_secret.expose(),
			code,
			redirect_uri: self.redirect_uri.as_str(),
		};
		let request = self
			.http_client
			.post(self.descriptor.endpoints.token.clone())
			.header(ACCEPT, "application/json")
			.json(&body);
		let response = self.http_client.send(request).await?;

		tracing::debug!(status = response.status, "token endpoint responded");

		token::parse_token_response(&response)
	}

	async fn fetch_profile(&self, access_token: &AccessToken) -> Result<Value, UpstreamError> {
		let request = self
			.http_client
			.get(self.descriptor.endpoints.user.clone())
			.header(AUTHORIZATION, format!("token {}", access_token.expose()))
			.header(ACCEPT, GITHUB_V3_ACCEPT)
			.header(USER_AGENT, self.user_agent.as_str());
		let response = self.http_client.send(request).await?;

		tracing::debug!(status = response.status, "user endpoint responded");

		if !response.is_success() {
			return Err(UpstreamError::ProfileEndpoint {
				status: response.status,
				body: response.body_preview(),
			});
		}

		serde_json::from_slice(&response.body).map_err(|source| UpstreamError::ProfileParse { source })
	}
}
