//! Server-side registry of issued `state` tokens for relays that verify callbacks.

// self
use crate::_prelude::*;

/// Pending authorization states keyed by their opaque token.
///
/// Each state can be consumed once, within `ttl` of being issued.
#[derive(Debug)]
pub struct StateStore {
	pending: Mutex<HashMap<String, OffsetDateTime>>,
	ttl: Duration,
}
impl StateStore {
	/// Default lifetime of an issued state.
	pub const DEFAULT_TTL: Duration = Duration::minutes(10);

	/// Creates an empty store whose states live for `ttl`.
	pub fn new(ttl: Duration) -> Self {
		Self { pending: Default::default(), ttl }
	}

	/// Configured state lifetime.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Records a freshly issued state.
	pub fn issue(&self, state: &str) {
		self.issue_at(state, OffsetDateTime::now_utc());
	}

	/// Records a state as issued at `now`.
	pub fn issue_at(&self, state: &str, now: OffsetDateTime) {
		let mut guard = self.pending.lock();

		guard.retain(|_, issued_at| *issued_at + self.ttl > now);
		guard.insert(state.to_owned(), now);
	}

	/// Consumes `state`, returning `true` only if it was issued, unexpired, and unused.
	pub fn consume(&self, state: &str) -> bool {
		self.consume_at(state, OffsetDateTime::now_utc())
	}

	/// Consumes `state` as of `now`.
	pub fn consume_at(&self, state: &str, now: OffsetDateTime) -> bool {
		match self.pending.lock().remove(state) {
			Some(issued_at) => issued_at + self.ttl > now,
			None => false,
		}
	}

	/// Number of states awaiting a callback (including expired ones not yet pruned).
	pub fn len(&self) -> usize {
		self.pending.lock().len()
	}

	/// Returns `true` when no states are pending.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl Default for StateStore {
	fn default() -> Self {
		Self::new(Self::DEFAULT_TTL)
	}
}
