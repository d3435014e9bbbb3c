//! Token endpoint wire format.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::UpstreamError,
	http::ProviderResponse,
};

/// JSON body posted to the token endpoint.
#[derive(Debug, Serialize)]
pub(super) struct TokenRequest<'a> {
	pub(super) client_id: &'a str,
	pub(super) client_secret: &'a str,
	pub(super) code: &'a str,
	pub(super) redirect_uri: &'a str,
}

/// Token endpoint response; GitHub reports OAuth errors with a 200 status, so both shapes share
/// one struct.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenResponse {
	access_token: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}

/// Classifies a buffered token endpoint response into an access token or an upstream failure.
pub(super) fn parse_token_response(
	response: &ProviderResponse,
) -> Result<AccessToken, UpstreamError> {
	if !response.is_success() {
		return Err(UpstreamError::TokenEndpoint {
			status: response.status,
			body: response.body_preview(),
		});
	}

	let de = &mut serde_json::Deserializer::from_slice(&response.body);
	let parsed: TokenResponse = serde_path_to_error::deserialize(de)
		.map_err(|source| UpstreamError::TokenResponseParse { source, status: response.status })?;

	if let Some(error) = parsed.error {
		return Err(UpstreamError::ProviderRejected {
			error,
			description: parsed.error_description,
			body: response.body_preview(),
		});
	}

	parsed
		.access_token
		.filter(|token| !token.is_empty())
		.map(AccessToken::new)
		.ok_or(UpstreamError::MissingAccessToken)
}
