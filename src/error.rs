//! Relay-level error types shared across flows, registries, and the HTTP surface.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider call failed (network, status, or provider-reported error).
	#[error(transparent)]
	Upstream(#[from] UpstreamError),

	/// Callback arrived without an authorization code.
	#[error("No code provided")]
	MissingCode,
	/// Authorization code was already claimed by an earlier callback.
	#[error("Code has already been used")]
	CodeReused,
	/// Callback state was unknown, expired, or already consumed.
	#[error("Invalid state")]
	InvalidState,
}
impl Error {
	/// Returns `true` for failures caused by the caller's input rather than the provider.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::MissingCode | Self::CodeReused | Self::InvalidState)
	}
}

/// Configuration and validation failures raised while assembling the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variable is absent or empty.
	#[error("Missing environment variable `{0}`.")]
	Missing(&'static str),
	/// Environment variable is present but cannot be interpreted.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	Invalid {
		/// Variable name.
		name: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Failures raised while talking to the provider's token or user endpoints.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}.")]
	TokenEndpoint {
		/// HTTP status code.
		status: u16,
		/// Preview of the response body.
		body: String,
	},
	/// Token endpoint answered successfully but reported an OAuth error in the body.
	#[error("{}", .description.as_deref().unwrap_or(.error))]
	ProviderRejected {
		/// Provider-supplied `error` field.
		error: String,
		/// Provider-supplied `error_description` field.
		description: Option<String>,
		/// Preview of the response body, including any `error_uri`.
		body: String,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint response carried neither an error nor an access token.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// User endpoint answered with a non-success status.
	#[error("User endpoint returned HTTP {status}.")]
	ProfileEndpoint {
		/// HTTP status code.
		status: u16,
		/// Preview of the response body.
		body: String,
	},
	/// User endpoint responded with a body that is not JSON.
	#[error("User endpoint returned malformed JSON.")]
	ProfileParse {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl UpstreamError {
	/// Provider-supplied body associated with the failure, if any, for operator logs.
	pub fn provider_body(&self) -> Option<&str> {
		match self {
			Self::TokenEndpoint { body, .. }
			| Self::ProviderRejected { body, .. }
			| Self::ProfileEndpoint { body, .. } => Some(body.as_str()),
			_ => None,
		}
	}
}
impl From<ReqwestError> for UpstreamError {
	fn from(e: ReqwestError) -> Self {
		Self::Transport(e.into())
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
