use crate::model::{Client, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
	BelowTrustFloor,
	ExcludedSector,
	EsgExcluded,
}

/// Hard trust-floor and IPS gate. The two checks are independent drop
/// conditions, so their evaluation order never changes the surviving set.
/// Theme alignment is a scoring concern, never applied here.
pub fn policy_gate(doc: &Document, client: &Client) -> Result<(), ExclusionReason> {
	if doc.source.trust_level < client.min_trust {
		return Err(ExclusionReason::BelowTrustFloor);
	}
	if doc.affects.iter().any(|edge| sector_excluded(client, &edge.sector)) {
		return Err(ExclusionReason::ExcludedSector);
	}
	if client
		.ips
		.esg_exclusions
		.iter()
		.any(|flag| flag.eq_ignore_ascii_case(&doc.event_type))
	{
		return Err(ExclusionReason::EsgExcluded);
	}

	Ok(())
}

fn sector_excluded(client: &Client, sector: &str) -> bool {
	client.ips.excluded_sectors.iter().any(|excluded| excluded.eq_ignore_ascii_case(sector))
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;
	use uuid::Uuid;

	use super::*;
	use crate::model::{
		AffectEdge, Direction, ImpactTier, InvestmentPolicy, Magnitude, Source,
	};

	fn doc(trust_level: i16, sector: &str, event_type: &str) -> Document {
		Document {
			doc_id: Uuid::new_v4(),
			title: "Test headline".to_string(),
			event_type: event_type.to_string(),
			impact_tier: ImpactTier::Silver,
			impact_score: 60.0,
			created_at: OffsetDateTime::UNIX_EPOCH,
			source: Source {
				source_id: Uuid::new_v4(),
				name: "wire".to_string(),
				trust_level,
			},
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

	fn client(min_trust: i16, excluded_sectors: Vec<String>, esg_exclusions: Vec<String>) -> Client {
		Client {
			client_id: Uuid::new_v4(),
			groups: Vec::new(),
			portfolio: Vec::new(),
			watchlist: Vec::new(),
			mandate_text: String::new(),
			mandate_embedding: Vec::new(),
			min_trust,
			risk_tier: "balanced".to_string(),
			ips: InvestmentPolicy { excluded_sectors, esg_exclusions, themes: Vec::new() },
		}
	}

	#[test]
	fn passes_when_no_rule_matches() {
		let doc = doc(7, "Semiconductors", "earnings_beat");
		let client = client(3, vec!["Tobacco".to_string()], vec!["emissions_scandal".to_string()]);

		assert_eq!(policy_gate(&doc, &client), Ok(()));
	}

	#[test]
	fn trust_floor_is_a_hard_gate() {
		let doc = doc(2, "Semiconductors", "earnings_beat");
		let client = client(8, Vec::new(), Vec::new());

		assert_eq!(policy_gate(&doc, &client), Err(ExclusionReason::BelowTrustFloor));
	}

	#[test]
	fn trust_exactly_at_floor_passes() {
		let doc = doc(8, "Semiconductors", "earnings_beat");
		let client = client(8, Vec::new(), Vec::new());

		assert_eq!(policy_gate(&doc, &client), Ok(()));
	}

	#[test]
	fn excluded_sector_drops_document() {
		let doc = doc(9, "Tobacco", "earnings_beat");
		let client = client(2, vec!["tobacco".to_string()], Vec::new());

		assert_eq!(policy_gate(&doc, &client), Err(ExclusionReason::ExcludedSector));
	}

	#[test]
	fn esg_exclusion_matches_event_category() {
		let doc = doc(9, "Energy", "emissions_scandal");
		let client = client(2, Vec::new(), vec!["Emissions_Scandal".to_string()]);

		assert_eq!(policy_gate(&doc, &client), Err(ExclusionReason::EsgExcluded));
	}

	#[test]
	fn any_affected_instrument_in_excluded_sector_drops() {
		let mut doc = doc(9, "Semiconductors", "earnings_beat");

		doc.affects.push(AffectEdge {
			instrument_id: Uuid::new_v4(),
			ticker: "PUFF".to_string(),
			sector: "Tobacco".to_string(),
			direction: Direction::Down,
			magnitude: Magnitude::Low,
		});

		let client = client(2, vec!["Tobacco".to_string()], Vec::new());

		assert_eq!(policy_gate(&doc, &client), Err(ExclusionReason::ExcludedSector));
	}
}
