//! Axum handlers for the relay endpoints.

// crates.io
use axum::{Json, extract::State, response::Redirect};
use serde_json::{Value, json};
// self
use crate::{
	flows::{Relay, RelayOutcome},
	server::{CallbackPayload, HttpError},
};

/// `GET /health`
pub async fn health() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

/// `GET /api/auth/github`: 303 to the provider's authorization page.
pub async fn authorize(State(relay): State<Relay>) -> Redirect {
	let redirect = relay.start_authorization();

	Redirect::to(redirect.url.as_str())
}

/// `POST /api/auth/callback`: exchange `{ code }` for `{ user, accessToken }`.
pub async fn callback(
	State(relay): State<Relay>,
	CallbackPayload(request): CallbackPayload,
) -> Result<Json<RelayOutcome>, HttpError> {
	let outcome = relay.exchange_code(request).await?;

	Ok(Json(outcome))
}
