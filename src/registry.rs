//! Replay guard contracts and the built-in in-memory registry for consumed authorization codes.

pub mod memory;

pub use memory::MemoryCodeRegistry;

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Registry of authorization codes that have already been handed to the token endpoint.
///
/// Implementations must make [`claim`](CodeRegistry::claim) a single atomic step: two callers
/// racing on the same unused code must observe exactly one [`ClaimOutcome::Claimed`].
pub trait CodeRegistry
where
	Self: Send + Sync,
{
	/// Records `code` as consumed unless it was recorded before.
	fn claim(&self, code: &str) -> ClaimOutcome;

	/// Number of codes currently retained.
	fn len(&self) -> usize;

	/// Returns `true` when no codes are retained.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Result of a [`CodeRegistry::claim`] attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
	/// The code was unseen and is now recorded; the caller may exchange it.
	Claimed,
	/// The code was recorded earlier; the caller must not exchange it.
	AlreadyUsed,
}
impl ClaimOutcome {
	/// Returns a stable label suitable for log or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClaimOutcome::Claimed => "claimed",
			ClaimOutcome::AlreadyUsed => "already_used",
		}
	}
}

/// SHA-256 digest of an authorization code.
///
/// Registries key on the digest so raw codes never linger in memory, and logs only ever carry
/// the short [`Display`] form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeFingerprint([u8; 32]);
impl CodeFingerprint {
	const DISPLAY_BYTES: usize = 6;

	/// Fingerprints the provided code.
	pub fn of(code: &str) -> Self {
		let digest = Sha256::digest(code.as_bytes());
		let mut bytes = [0; 32];

		bytes.copy_from_slice(&digest);

		Self(bytes)
	}

	/// Raw digest bytes.
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}
impl Debug for CodeFingerprint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CodeFingerprint").field(&format_args!("{self}")).finish()
	}
}
impl Display for CodeFingerprint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&URL_SAFE_NO_PAD.encode(&self.0[..Self::DISPLAY_BYTES]))
	}
}
