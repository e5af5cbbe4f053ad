use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use tape_domain::{Client, Document, policy};

use super::candidates::Candidate;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilterStats {
	pub below_trust_floor: u32,
	pub excluded_sector: u32,
	pub esg_excluded: u32,
	pub missing_document: u32,
}

/// Apply the trust floor and IPS exclusions. Pure and deterministic: the
/// same client configuration and candidate set always yield the same
/// surviving membership.
pub fn apply_policy(
	candidates: Vec<Candidate>,
	docs_by_id: &HashMap<Uuid, Document>,
	client: &Client,
) -> (Vec<Candidate>, FilterStats) {
	let mut survivors = Vec::with_capacity(candidates.len());
	let mut stats = FilterStats::default();

	for candidate in candidates {
		let Some(doc) = docs_by_id.get(&candidate.doc_id) else {
			warn!(doc_id = %candidate.doc_id, "Candidate document metadata missing; dropping.");
			stats.missing_document += 1;

			continue;
		};

		match policy::policy_gate(doc, client) {
			Ok(()) => survivors.push(candidate),
			Err(policy::ExclusionReason::BelowTrustFloor) => stats.below_trust_floor += 1,
			Err(policy::ExclusionReason::ExcludedSector) => stats.excluded_sector += 1,
			Err(policy::ExclusionReason::EsgExcluded) => stats.esg_excluded += 1,
		}
	}

	(survivors, stats)
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;

	use tape_domain::{
		AffectEdge, Direction, Holding, ImpactTier, InvestmentPolicy, Magnitude, Source,
	};

	use super::*;

	fn candidate(doc_id: Uuid) -> Candidate {
		Candidate { doc_id, graph: None, semantic: Some(0.5) }
	}

	fn doc(doc_id: Uuid, trust_level: i16, sector: &str) -> Document {
		Document {
			doc_id,
			title: "headline".to_string(),
			event_type: "earnings_beat".to_string(),
			impact_tier: ImpactTier::Silver,
			impact_score: 50.0,
			created_at: OffsetDateTime::UNIX_EPOCH,
			source: Source { source_id: Uuid::new_v4(), name: "wire".to_string(), trust_level },
			affects: vec![AffectEdge {
				instrument_id: Uuid::new_v4(),
				ticker: "GTX".to_string(),
				sector: sector.to_string(),
				direction: Direction::Up,
				magnitude: Magnitude::High,
			}],
			mentions: Vec::new(),
		}
	}

	fn client(min_trust: i16, excluded_sectors: Vec<String>) -> Client {
		Client {
			client_id: Uuid::new_v4(),
			groups: Vec::new(),
			portfolio: vec![Holding {
				instrument_id: Uuid::new_v4(),
				ticker: "GTX".to_string(),
				weight: 0.05,
				sentiment: 0.0,
			}],
			watchlist: Vec::new(),
			mandate_text: String::new(),
			mandate_embedding: Vec::new(),
			min_trust,
			risk_tier: "balanced".to_string(),
			ips: InvestmentPolicy {
				excluded_sectors,
				esg_exclusions: Vec::new(),
				themes: Vec::new(),
			},
		}
	}

	#[test]
	fn exact_surviving_membership_is_deterministic() {
		let keep_id = Uuid::new_v4();
		let drop_trust_id = Uuid::new_v4();
		let drop_sector_id = Uuid::new_v4();
		let docs_by_id: HashMap<Uuid, Document> = [
			(keep_id, doc(keep_id, 9, "Semiconductors")),
			(drop_trust_id, doc(drop_trust_id, 2, "Semiconductors")),
			(drop_sector_id, doc(drop_sector_id, 9, "Tobacco")),
		]
		.into_iter()
		.collect();
		let client = client(5, vec!["Tobacco".to_string()]);
		let input =
			vec![candidate(keep_id), candidate(drop_trust_id), candidate(drop_sector_id)];

		let (survivors, stats) = apply_policy(input, &docs_by_id, &client);

		assert_eq!(
			survivors.iter().map(|candidate| candidate.doc_id).collect::<Vec<_>>(),
			vec![keep_id]
		);
		assert_eq!(stats.below_trust_floor, 1);
		assert_eq!(stats.excluded_sector, 1);
		assert_eq!(stats.esg_excluded, 0);
	}

	#[test]
	fn missing_document_is_dropped_and_counted() {
		let docs_by_id = HashMap::new();
		let client = client(1, Vec::new());

		let (survivors, stats) = apply_policy(vec![candidate(Uuid::new_v4())], &docs_by_id, &client);

		assert!(survivors.is_empty());
		assert_eq!(stats.missing_document, 1);
	}
}
