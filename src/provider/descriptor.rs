//! Provider descriptor data structures shared by the relay flows.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint browsers are redirected to.
	pub authorization: Url,
	/// Token endpoint used to exchange authorization codes.
	pub token: Url,
	/// User-profile endpoint queried with the issued access token.
	pub user: Url,
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: String,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
}
impl ProviderDescriptor {
	/// Public GitHub authorization endpoint.
	pub const GITHUB_AUTHORIZE_URL: &'static str = "https://github.com/login/oauth/authorize";
	/// Public GitHub token endpoint.
	pub const GITHUB_TOKEN_URL: &'static str = "https://github.com/login/oauth/access_token";
	/// Public GitHub user endpoint.
	pub const GITHUB_USER_URL: &'static str = "https://api.github.com/user";

	/// Creates a new builder for the provided identifier.
	pub fn builder(id: impl Into<String>) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Descriptor for github.com.
	pub fn github() -> Result<Self, ProviderDescriptorError> {
		Self::builder("github")
			.authorization_endpoint(parse_endpoint("authorization", Self::GITHUB_AUTHORIZE_URL)?)
			.token_endpoint(parse_endpoint("token", Self::GITHUB_TOKEN_URL)?)
			.user_endpoint(parse_endpoint("user", Self::GITHUB_USER_URL)?)
			.build()
	}
}

/// Parses an endpoint URL, reporting which endpoint was malformed.
pub fn parse_endpoint(
	endpoint: &'static str,
	raw: &str,
) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw).map_err(|source| ProviderDescriptorError::InvalidUrl {
		endpoint,
		url: raw.to_owned(),
		reason: source.to_string(),
	})
}
