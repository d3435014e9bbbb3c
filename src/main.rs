//! `oauth2-relay` binary: loads configuration, builds the relay, and serves it.

// crates.io
use color_eyre::Result;
// self
use oauth2_relay::{config::RelayConfig, flows::Relay, obs, server};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	// Loads `.env` first so `RUST_LOG` from it reaches the subscriber.
	let config = RelayConfig::from_env()?;

	obs::init_tracing();

	let relay = Relay::from_config(&config)?;

	tracing::info!(?relay, "relay configured");

	server::serve(config.listen_addr, relay).await?;

	Ok(())
}
