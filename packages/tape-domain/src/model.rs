use std::collections::HashSet;

use time::OffsetDateTime;
use uuid::Uuid;

/// Ordinal market-significance classification of a document. The tier only
/// selects the temporal decay bucket; it is never recomputed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactTier {
	Platinum,
	Gold,
	Silver,
	Bronze,
	Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
	Up,
	Down,
	Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Magnitude {
	High,
	Medium,
	Low,
}

/// How a candidate document was found for a particular client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryPath {
	Direct,
	SupplyChain,
	Competitor,
	Factor,
	Semantic,
}
impl DiscoveryPath {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Direct => "direct",
			Self::SupplyChain => "supply-chain",
			Self::Competitor => "competitor",
			Self::Factor => "factor",
			Self::Semantic => "semantic",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
	Maintenance,
	Opportunity,
}
impl Channel {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Maintenance => "MAINTENANCE",
			Self::Opportunity => "OPPORTUNITY",
		}
	}
}

#[derive(Debug, Clone)]
pub struct Source {
	pub source_id: Uuid,
	pub name: String,
	pub trust_level: i16,
}

#[derive(Debug, Clone)]
pub struct AffectEdge {
	pub instrument_id: Uuid,
	pub ticker: String,
	pub sector: String,
	pub direction: Direction,
	pub magnitude: Magnitude,
}

/// A news document as the ranking engine reads it. Immutable here; owned by
/// the ingestion subsystem.
#[derive(Debug, Clone)]
pub struct Document {
	pub doc_id: Uuid,
	pub title: String,
	pub event_type: String,
	pub impact_tier: ImpactTier,
	pub impact_score: f32,
	pub created_at: OffsetDateTime,
	pub source: Source,
	pub affects: Vec<AffectEdge>,
	pub mentions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Holding {
	pub instrument_id: Uuid,
	pub ticker: String,
	pub weight: f32,
	pub sentiment: f32,
}

#[derive(Debug, Clone)]
pub struct WatchItem {
	pub instrument_id: Uuid,
	pub ticker: String,
}

/// Client-specific exclusion rules and thematic preferences (the IPS).
#[derive(Debug, Clone)]
pub struct InvestmentPolicy {
	pub excluded_sectors: Vec<String>,
	pub esg_exclusions: Vec<String>,
	pub themes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Client {
	pub client_id: Uuid,
	pub groups: Vec<String>,
	pub portfolio: Vec<Holding>,
	pub watchlist: Vec<WatchItem>,
	pub mandate_text: String,
	pub mandate_embedding: Vec<f32>,
	pub min_trust: i16,
	pub risk_tier: String,
	pub ips: InvestmentPolicy,
}
impl Client {
	pub fn held_tickers(&self) -> HashSet<&str> {
		self.portfolio.iter().map(|holding| holding.ticker.as_str()).collect()
	}

	pub fn holding(&self, ticker: &str) -> Option<&Holding> {
		self.portfolio.iter().find(|holding| holding.ticker == ticker)
	}

	pub fn watches(&self, ticker: &str) -> bool {
		self.watchlist.iter().any(|item| item.ticker == ticker)
	}
}

/// One document reached by the graph traversal, with its provenance.
#[derive(Debug, Clone)]
pub struct GraphHit {
	pub doc_id: Uuid,
	pub instrument_id: Uuid,
	pub ticker: String,
	pub hop_distance: u8,
	pub path: DiscoveryPath,
	pub origin_ticker: String,
	pub beta: Option<f32>,
}

/// One document returned by the nearest-neighbor search.
#[derive(Debug, Clone, Copy)]
pub struct VectorHit {
	pub doc_id: Uuid,
	pub similarity: f32,
}
