//! Request extractors for the relay endpoints.

// crates.io
use axum::{
	body::Bytes,
	extract::{FromRequest, Request},
	http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
// self
use crate::{flows::CallbackRequest, server::HttpError};

/// Callback body, lenient about how the code is missing.
///
/// A request without a JSON content type, or with an empty body, reads as `{}` so it reaches
/// the relay and is rejected as "No code provided". Only a JSON body that fails to parse is
/// refused here.
#[derive(Clone, Debug)]
pub struct CallbackPayload(pub CallbackRequest);
impl<S> FromRequest<S> for CallbackPayload
where
	S: Send + Sync,
{
	type Rejection = HttpError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let json = has_json_content_type(req.headers());
		let body = Bytes::from_request(req, state)
			.await
			.map_err(|rejection| HttpError::new(rejection.status(), rejection.body_text()))?;

		parse_callback(json, &body).map(Self)
	}
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
	headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.map(|mime| {
			let mime = mime.trim().to_ascii_lowercase();

			mime == "application/json" || mime.ends_with("+json")
		})
		.unwrap_or(false)
}

fn parse_callback(json: bool, body: &[u8]) -> Result<CallbackRequest, HttpError> {
	if !json || body.iter().all(u8::is_ascii_whitespace) {
		return Ok(CallbackRequest::default());
	}

	serde_json::from_slice(body).map_err(|e| {
		HttpError::new(
			StatusCode::BAD_REQUEST,
			format!("Failed to parse the request body as JSON: {e}"),
		)
	})
}
