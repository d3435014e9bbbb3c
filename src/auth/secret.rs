//! Secure secret wrappers that redact sensitive material.

// self
use crate::_prelude::*;

macro_rules! redacted_secret {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

redacted_secret! {
	/// Access token issued by the provider.
	///
	/// Serialization is transparent because the relay hands the raw token back to its caller.
	AccessToken
}

redacted_secret! {
	/// OAuth client secret sent to the token endpoint.
	ClientSecret
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let token = AccessToken::new("tok_xyz");
		let secret = ClientSecret::new("super-secret");

		assert_eq!(format!("{token:?}"), "AccessToken(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(token.expose(), "tok_xyz");
	}

	#[test]
	fn access_token_serializes_raw_value() {
		let payload = serde_json::to_string(&AccessToken::new("tok_xyz"))
			.expect("Access token should serialize to JSON.");

		assert_eq!(payload, "\"tok_xyz\"");
	}
}
