//! Mapping from relay errors to HTTP responses.

// crates.io
use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
// self
use crate::_prelude::*;

/// Generic message returned for every upstream failure.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// JSON error response: `{ "error": ..., "details": ... }`.
#[derive(Debug)]
pub struct HttpError {
	status: StatusCode,
	body: ErrorBody,
}
impl HttpError {
	/// Creates an error response without details.
	pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
		Self { status, body: ErrorBody { error: error.into(), details: None } }
	}

	/// Attaches a short detail message.
	pub fn with_details(mut self, details: impl Into<String>) -> Self {
		self.body.details = Some(details.into());

		self
	}

	/// HTTP status of the response.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// JSON body of the response.
	pub fn body(&self) -> &ErrorBody {
		&self.body
	}
}
impl From<Error> for HttpError {
	fn from(err: Error) -> Self {
		match err {
			Error::MissingCode | Error::CodeReused | Error::InvalidState =>
				Self::new(StatusCode::BAD_REQUEST, err.to_string()),
			Error::Upstream(_) | Error::Config(_) =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, AUTHENTICATION_FAILED)
					.with_details(err.to_string()),
		}
	}
}
impl IntoResponse for HttpError {
	fn into_response(self) -> Response {
		(self.status, Json(self.body)).into_response()
	}
}

/// Serialized error payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Stable, caller-facing error message.
	pub error: String,
	/// Short failure detail for upstream errors.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}
