use time::OffsetDateTime;

use tape_config::DecayRates;

use crate::model::ImpactTier;

const SECONDS_PER_HOUR: f32 = 3_600.0;

/// Select the per-hour decay rate for a document's impact tier.
pub fn decay_rate(tier: ImpactTier, rates: &DecayRates) -> f32 {
	match tier {
		ImpactTier::Platinum => rates.platinum,
		ImpactTier::Gold => rates.gold,
		ImpactTier::Silver => rates.silver,
		ImpactTier::Bronze => rates.bronze,
		ImpactTier::Standard => rates.standard,
	}
}

/// Recency sub-score: normalized impact weighted by exponential age decay.
///
/// Documents stamped in the future are treated as age zero rather than
/// amplified.
pub fn recency_score(
	impact_score: f32,
	created_at: OffsetDateTime,
	now: OffsetDateTime,
	rate_per_hour: f32,
) -> f32 {
	let hours = ((now - created_at).as_seconds_f32() / SECONDS_PER_HOUR).max(0.0);
	let impact = (impact_score / 100.0).clamp(0.0, 1.0);

	impact * (-rate_per_hour * hours).exp()
}

#[cfg(test)]
mod tests {
	use time::Duration;

	use super::*;

	fn rates() -> DecayRates {
		DecayRates { platinum: 0.002, gold: 0.005, silver: 0.01, bronze: 0.02, standard: 0.04 }
	}

	#[test]
	fn rate_selection_follows_tier_ordering() {
		let rates = rates();
		let ordered = [
			ImpactTier::Platinum,
			ImpactTier::Gold,
			ImpactTier::Silver,
			ImpactTier::Bronze,
			ImpactTier::Standard,
		];

		for window in ordered.windows(2) {
			assert!(
				decay_rate(window[0], &rates) < decay_rate(window[1], &rates),
				"{:?} must decay slower than {:?}",
				window[0],
				window[1]
			);
		}
	}

	#[test]
	fn older_document_scores_strictly_lower() {
		let now = OffsetDateTime::UNIX_EPOCH + Duration::days(400);
		let newer = now - Duration::hours(2);
		let older = now - Duration::hours(30);
		let rate = decay_rate(ImpactTier::Gold, &rates());

		assert!(recency_score(80.0, older, now, rate) < recency_score(80.0, newer, now, rate));
	}

	#[test]
	fn zero_rate_ignores_age() {
		let now = OffsetDateTime::UNIX_EPOCH + Duration::days(400);
		let newer = now - Duration::hours(2);
		let older = now - Duration::hours(300);

		assert_eq!(recency_score(50.0, older, now, 0.0), recency_score(50.0, newer, now, 0.0));
	}

	#[test]
	fn fresh_document_scores_normalized_impact() {
		let now = OffsetDateTime::UNIX_EPOCH + Duration::days(400);
		let score = recency_score(75.0, now, now, 0.01);

		assert!((score - 0.75).abs() < 1e-6);
	}

	#[test]
	fn future_timestamp_is_clamped_to_age_zero() {
		let now = OffsetDateTime::UNIX_EPOCH + Duration::days(400);
		let future = now + Duration::hours(6);
		let score = recency_score(100.0, future, now, 0.05);

		assert!((score - 1.0).abs() < 1e-6);
	}

	#[test]
	fn impact_is_clamped_to_valid_range() {
		let now = OffsetDateTime::UNIX_EPOCH + Duration::days(400);

		assert!(recency_score(140.0, now, now, 0.0) <= 1.0);
		assert_eq!(recency_score(-10.0, now, now, 0.0), 0.0);
	}
}
