use time::OffsetDateTime;
use uuid::Uuid;

use tape_domain::{Direction, ImpactTier, Magnitude};

use crate::Error;

#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
	pub doc_id: Uuid,
	pub title: String,
	pub event_type: String,
	pub impact_tier: String,
	pub impact_score: f32,
	pub created_at: OffsetDateTime,
	pub source_id: Uuid,
	pub source_name: String,
	pub trust_level: i16,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AffectRow {
	pub doc_id: Uuid,
	pub instrument_id: Uuid,
	pub ticker: String,
	pub sector: String,
	pub direction: String,
	pub magnitude: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MentionRow {
	pub doc_id: Uuid,
	pub mention: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ClientRow {
	pub client_id: Uuid,
	pub mandate_text: String,
	pub mandate_embedding: Vec<f32>,
	pub min_trust: i16,
	pub risk_tier: String,
	pub excluded_sectors: Vec<String>,
	pub esg_exclusions: Vec<String>,
	pub themes: Vec<String>,
	pub member_groups: Vec<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct HoldingRow {
	pub instrument_id: Uuid,
	pub ticker: String,
	pub weight: f32,
	pub sentiment: f32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct WatchRow {
	pub instrument_id: Uuid,
	pub ticker: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct InstrumentRefRow {
	pub instrument_id: Uuid,
	pub ticker: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct EdgeRow {
	pub from_instrument: Uuid,
	pub to_instrument: Uuid,
	pub kind: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct FactorNeighborRow {
	pub origin_id: Uuid,
	pub origin_beta: f32,
	pub instrument_id: Uuid,
	pub ticker: String,
	pub beta: f32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AffectedDocRow {
	pub instrument_id: Uuid,
	pub doc_id: Uuid,
}

pub const EDGE_KIND_SUPPLIES_TO: &str = "supplies_to";
pub const EDGE_KIND_COMPETES_WITH: &str = "competes_with";

pub fn parse_impact_tier(raw: &str) -> Result<ImpactTier, Error> {
	match raw {
		"platinum" => Ok(ImpactTier::Platinum),
		"gold" => Ok(ImpactTier::Gold),
		"silver" => Ok(ImpactTier::Silver),
		"bronze" => Ok(ImpactTier::Bronze),
		"standard" => Ok(ImpactTier::Standard),
		other => Err(Error::InvalidArgument(format!("unknown impact tier {other:?}"))),
	}
}

pub fn parse_direction(raw: &str) -> Result<Direction, Error> {
	match raw {
		"up" => Ok(Direction::Up),
		"down" => Ok(Direction::Down),
		"neutral" => Ok(Direction::Neutral),
		other => Err(Error::InvalidArgument(format!("unknown affect direction {other:?}"))),
	}
}

pub fn parse_magnitude(raw: &str) -> Result<Magnitude, Error> {
	match raw {
		"high" => Ok(Magnitude::High),
		"medium" => Ok(Magnitude::Medium),
		"low" => Ok(Magnitude::Low),
		other => Err(Error::InvalidArgument(format!("unknown affect magnitude {other:?}"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_known_tiers() {
		assert_eq!(parse_impact_tier("platinum").expect("parse"), ImpactTier::Platinum);
		assert_eq!(parse_impact_tier("standard").expect("parse"), ImpactTier::Standard);
	}

	#[test]
	fn rejects_unknown_tier() {
		assert!(parse_impact_tier("diamond").is_err());
	}

	#[test]
	fn parses_direction_and_magnitude() {
		assert_eq!(parse_direction("down").expect("parse"), Direction::Down);
		assert_eq!(parse_magnitude("medium").expect("parse"), Magnitude::Medium);
	}
}
