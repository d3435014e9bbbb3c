//! Authorization redirect: state generation and authorize URL construction.

// crates.io
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope, basic::BasicClient};
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	flows::Relay,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const STATE_LEN: usize = 32;

/// Result of [`Relay::start_authorization`]: where to send the browser and the state it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Fully-formed authorize URL that callers should redirect end-users to.
	pub url: Url,
	/// Opaque state embedded in [`url`](Self::url).
	pub state: String,
}

impl Relay {
	/// Builds the provider authorization URL for a fresh, unpredictable state.
	///
	/// The state is only remembered when a [`StateStore`](crate::state::StateStore) is attached;
	/// otherwise it is advisory and never checked on callback.
	pub fn start_authorization(&self) -> AuthorizationRedirect {
		let _span = FlowSpan::new(FlowKind::Authorize, "start_authorization").entered();

		obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Attempt);

		let state = random_state();
		let url = self.authorize_url(&state);

		if let Some(states) = &self.states {
			states.issue(&state);
		}

		tracing::info!(verifies_state = self.verifies_state(), "redirecting to provider");
		obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Success);

		AuthorizationRedirect { url, state }
	}

	fn authorize_url(&self, state: &str) -> Url {
		let client = BasicClient::new(ClientId::new(self.client_id.clone()))
			.set_auth_uri(AuthUrl::from_url(self.descriptor.endpoints.authorization.clone()))
			.set_redirect_uri(RedirectUrl::from_url(self.redirect_uri.clone()));
		let csrf = CsrfToken::new(state.to_owned());
		let (url, _) = client
			.authorize_url(move || csrf)
			.add_scopes(self.scopes.iter().cloned().map(Scope::new))
			.url();

		url
	}
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
