//! Thread-safe in-memory [`CodeRegistry`] implementation.

// self
use crate::{
	_prelude::*,
	registry::{ClaimOutcome, CodeFingerprint, CodeRegistry},
};

type ClaimMap = Arc<Mutex<HashMap<CodeFingerprint, OffsetDateTime>>>;

/// Process-local registry of consumed codes.
///
/// Without a TTL entries are never evicted, so the set grows for the lifetime of the process.
/// With a TTL, entries older than the TTL are pruned on the next claim; providers expire codes
/// within minutes, so a TTL comfortably above that keeps the replay guarantee intact.
#[derive(Clone, Debug, Default)]
pub struct MemoryCodeRegistry {
	claims: ClaimMap,
	ttl: Option<Duration>,
}
impl MemoryCodeRegistry {
	/// Creates a registry that forgets codes once `ttl` has elapsed since they were claimed.
	pub fn with_ttl(ttl: Duration) -> Self {
		Self { claims: Default::default(), ttl: Some(ttl) }
	}

	/// Configured retention window, if any.
	pub fn ttl(&self) -> Option<Duration> {
		self.ttl
	}

	/// Claims `code` as of `now`; exposed so eviction can be exercised deterministically.
	pub fn claim_at(&self, code: &str, now: OffsetDateTime) -> ClaimOutcome {
		let fingerprint = CodeFingerprint::of(code);
		let mut guard = self.claims.lock();

		if let Some(ttl) = self.ttl {
			guard.retain(|_, claimed_at| *claimed_at + ttl > now);
		}
		if guard.contains_key(&fingerprint) {
			return ClaimOutcome::AlreadyUsed;
		}

		guard.insert(fingerprint, now);

		ClaimOutcome::Claimed
	}
}
impl CodeRegistry for MemoryCodeRegistry {
	fn claim(&self, code: &str) -> ClaimOutcome {
		self.claim_at(code, OffsetDateTime::now_utc())
	}

	fn len(&self) -> usize {
		self.claims.lock().len()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{sync::Barrier, thread};
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn second_claim_is_rejected() {
		let registry = MemoryCodeRegistry::default();

		assert_eq!(registry.claim("abc123"), ClaimOutcome::Claimed);
		assert_eq!(registry.claim("abc123"), ClaimOutcome::AlreadyUsed);
		assert_eq!(registry.claim("other"), ClaimOutcome::Claimed);
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn entries_never_expire_without_ttl() {
		let registry = MemoryCodeRegistry::default();
		let start = macros::datetime!(2025-11-10 12:00 UTC);

		assert_eq!(registry.claim_at("abc123", start), ClaimOutcome::Claimed);
		assert_eq!(
			registry.claim_at("abc123", start + Duration::days(365)),
			ClaimOutcome::AlreadyUsed
		);
	}

	#[test]
	fn ttl_prunes_stale_entries() {
		let registry = MemoryCodeRegistry::with_ttl(Duration::minutes(10));
		let start = macros::datetime!(2025-11-10 12:00 UTC);

		assert_eq!(registry.claim_at("abc123", start), ClaimOutcome::Claimed);
		assert_eq!(
			registry.claim_at("abc123", start + Duration::minutes(9)),
			ClaimOutcome::AlreadyUsed
		);
		assert_eq!(registry.claim_at("other", start + Duration::minutes(11)), ClaimOutcome::Claimed);
		assert_eq!(registry.len(), 1, "The stale entry should have been pruned.");
		assert_eq!(
			registry.claim_at("abc123", start + Duration::minutes(11)),
			ClaimOutcome::Claimed
		);
	}

	#[test]
	fn concurrent_claims_admit_exactly_one() {
		const RACERS: usize = 16;

		let registry = MemoryCodeRegistry::default();
		let barrier = Arc::new(Barrier::new(RACERS));
		let handles = (0..RACERS)
			.map(|_| {
				let registry = registry.clone();
				let barrier = barrier.clone();

				thread::spawn(move || {
					barrier.wait();

					registry.claim("contested")
				})
			})
			.collect::<Vec<_>>();
		let claimed = handles
			.into_iter()
			.map(|handle| handle.join().expect("Racing thread should not panic."))
			.filter(|outcome| *outcome == ClaimOutcome::Claimed)
			.count();

		assert_eq!(claimed, 1);
	}
}
