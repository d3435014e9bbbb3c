//! Transport primitives for provider calls.
//!
//! The relay talks to the provider through [`ReqwestHttpClient`], which hands back a fully
//! buffered [`ProviderResponse`] so flows can classify status codes, OAuth error bodies, and
//! parse failures in one place without holding a streaming body open.

// std
use std::ops::Deref;
// crates.io
use reqwest::{RequestBuilder, redirect::Policy};
// self
use crate::{_prelude::*, error::ConfigError};

/// Maximum number of characters retained when previewing provider bodies for logs and errors.
pub const BODY_PREVIEW_LIMIT: usize = 256;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints return results directly instead of delegating to another URI, so the client
/// built by [`ReqwestHttpClient::new`] never follows redirects. Custom clients passed through
/// [`ReqwestHttpClient::with_client`] should be configured the same way.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds the relay's default client with redirect following disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Sends the request and buffers the full response body.
	pub async fn send(&self, request: RequestBuilder) -> Result<ProviderResponse, ReqwestError> {
		let response = request.send().await?;
		let status = response.status().as_u16();
		let body = response.bytes().await?.to_vec();

		Ok(ProviderResponse { status, body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Buffered provider response.
#[derive(Clone, Debug)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ProviderResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Lossy, length-capped rendering of the body for logs and error payloads.
	pub fn body_preview(&self) -> String {
		let text = String::from_utf8_lossy(&self.body);

		if text.chars().count() <= BODY_PREVIEW_LIMIT {
			return text.into_owned();
		}

		let mut preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();

		preview.push('…');

		preview
	}
}
