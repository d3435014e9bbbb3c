//! HTTP surface: the axum router exposing the relay flows, plus listener bootstrap.

pub mod error;
pub mod extractors;
pub mod handlers;

pub use error::*;
pub use extractors::*;

// std
use std::{io, net::SocketAddr};
// crates.io
use axum::{
	Router,
	http::Method,
	routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
// self
use crate::flows::Relay;

/// Path that starts the authorization redirect.
pub const AUTHORIZE_PATH: &str = "/api/auth/github";
/// Path the client posts authorization codes to.
pub const CALLBACK_PATH: &str = "/api/auth/callback";
/// Liveness probe path.
pub const HEALTH_PATH: &str = "/health";

/// Builds the relay router with tracing and permissive CORS layers.
pub fn build_router(relay: Relay) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers(Any);

	Router::new()
		.route(HEALTH_PATH, get(handlers::health))
		.route(AUTHORIZE_PATH, get(handlers::authorize))
		.route(CALLBACK_PATH, post(handlers::callback))
		.layer(TraceLayer::new_for_http())
		.layer(cors)
		.with_state(relay)
}

/// Binds `addr` and serves the relay until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, relay: Relay) -> io::Result<()> {
	let listener = TcpListener::bind(addr).await?;
	let local = listener.local_addr()?;

	tracing::info!(address = %local, verifies_state = relay.verifies_state(), "relay listening");

	axum::serve(listener, build_router(relay)).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::error!(error = %e, "failed to listen for ctrl-c");
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(e) => {
				tracing::error!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("shutdown signal received");
}
