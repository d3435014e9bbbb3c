// self
use crate::{
	_prelude::*,
	provider::{ProviderDescriptor, ProviderEndpoints},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required for the redirect step.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is required for code exchanges.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// User endpoint is required for profile lookups.
	#[error("Missing user endpoint.")]
	MissingUserEndpoint,
	/// Endpoint string could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL ({url}): {reason}.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Raw value that failed to parse.
		url: String,
		/// Parser message.
		reason: String,
	},
	/// Endpoints must use HTTPS unless they target a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: String,
	/// Authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint.
	pub token_endpoint: Option<Url>,
	/// User-profile endpoint.
	pub user_endpoint: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			authorization_endpoint: None,
			token_endpoint: None,
			user_endpoint: None,
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the user-profile endpoint.
	pub fn user_endpoint(mut self, url: Url) -> Self {
		self.user_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let user = self.user_endpoint.ok_or(ProviderDescriptorError::MissingUserEndpoint)?;
		let descriptor =
			ProviderDescriptor { id: self.id, endpoints: ProviderEndpoints { authorization, token, user } };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("user", &self.endpoints.user)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse descriptor fixture URL.")
	}

	#[test]
	fn rejects_missing_endpoints() {
		let err = ProviderDescriptor::builder("partial")
			.authorization_endpoint(url("https://example.com/auth"))
			.token_endpoint(url("https://example.com/token"))
			.build()
			.expect_err("Descriptor builder should reject a missing user endpoint.");

		assert_eq!(err, ProviderDescriptorError::MissingUserEndpoint);
	}

	#[test]
	fn rejects_plain_http_on_public_hosts() {
		let err = ProviderDescriptor::builder("insecure")
			.authorization_endpoint(url("https://example.com/auth"))
			.token_endpoint(url("http://example.com/token"))
			.user_endpoint(url("https://example.com/user"))
			.build()
			.expect_err("Descriptor builder should reject insecure token endpoints.");

		assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint { endpoint: "token", .. }));
	}

	#[test]
	fn allows_plain_http_on_loopback() {
		let descriptor = ProviderDescriptor::builder("local")
			.authorization_endpoint(url("http://localhost:8080/auth"))
			.token_endpoint(url("http://127.0.0.1:8080/token"))
			.user_endpoint(url("http://[::1]:8080/user"))
			.build()
			.expect("Loopback endpoints should be accepted over plain HTTP.");

		assert_eq!(descriptor.endpoints.token.as_str(), "http://127.0.0.1:8080/token");
	}
}
