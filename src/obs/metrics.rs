// self
use crate::{
	obs::{FlowKind, FlowOutcome},
	registry::ClaimOutcome,
};

/// Increments `oauth2_relay_flow_total{flow, outcome}` (when the `metrics` feature is on).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth2_relay_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Increments `oauth2_relay_code_claims_total{outcome}` for every replay-guard decision.
pub fn record_code_claim(outcome: ClaimOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!("oauth2_relay_code_claims_total", "outcome" => outcome.as_str()).increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = outcome;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_a_noop() {
		record_flow_outcome(FlowKind::Exchange, FlowOutcome::Rejected);
		record_code_claim(ClaimOutcome::Claimed);
		record_code_claim(ClaimOutcome::AlreadyUsed);
	}

	#[test]
	fn claim_labels_are_stable() {
		assert_eq!(ClaimOutcome::Claimed.as_str(), "claimed");
		assert_eq!(ClaimOutcome::AlreadyUsed.as_str(), "already_used");
	}
}
