//! Minimal OAuth 2.0 authorization-code relay: redirect browsers to the provider, exchange
//! single-use codes for an access token, and hand back the token alongside the user profile.

#![deny(clippy::all, missing_docs)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod registry;
pub mod server;
pub mod state;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		flows::Relay,
		http::ReqwestHttpClient,
		provider::ProviderDescriptor,
		registry::{CodeRegistry, MemoryCodeRegistry},
		state::StateStore,
	};

	/// Client identifier used by test relays.
	pub const TEST_CLIENT_ID: &str = "client-it";
	/// Client secret used by test relays.
	pub const TEST_CLIENT_SECRET: &str = "secret-it";
	/// Fixed callback URL used by test relays.
	pub const TEST_REDIRECT_URI: &str = "http://localhost:3000/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor whose endpoints all live on the provided mock base URL.
	pub fn mock_descriptor(base_url: &str) -> ProviderDescriptor {
		let url = |path: &str| {
			Url::parse(&format!("{base_url}{path}"))
				.expect("Mock provider endpoint should parse successfully.")
		};

		ProviderDescriptor::builder("mock-github")
			.authorization_endpoint(url("/login/oauth/authorize"))
			.token_endpoint(url("/login/oauth/access_token"))
			.user_endpoint(url("/user"))
			.build()
			.expect("Mock provider descriptor should build successfully.")
	}

	/// Constructs a [`Relay`] backed by an isolated in-memory registry and the test transport.
	pub fn build_test_relay(descriptor: ProviderDescriptor) -> (Relay, Arc<MemoryCodeRegistry>) {
		let registry_backend = Arc::new(MemoryCodeRegistry::default());
		let registry: Arc<dyn CodeRegistry> = registry_backend.clone();
		let redirect_uri =
			Url::parse(TEST_REDIRECT_URI).expect("Test redirect URI should parse successfully.");
		let relay = Relay::with_http_client(
			descriptor,
			TEST_CLIENT_ID,
			TEST_CLIENT_SECRET,
			redirect_uri,
			registry,
			test_reqwest_http_client(),
		);

		(relay, registry_backend)
	}

	/// Same as [`build_test_relay`] but with state verification switched on.
	pub fn build_verifying_test_relay(
		descriptor: ProviderDescriptor,
	) -> (Relay, Arc<MemoryCodeRegistry>, Arc<StateStore>) {
		let (relay, registry) = build_test_relay(descriptor);
		let states = Arc::new(StateStore::new(Duration::minutes(10)));
		let relay = relay.with_state_store(states.clone());

		(relay, registry, states)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// Only the binary reports through color-eyre.
use color_eyre as _;
