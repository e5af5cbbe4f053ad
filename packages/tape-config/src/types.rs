use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub security: Security,
	pub storage: Storage,
	pub feed: Feed,
	pub traversal: Traversal,
	pub scoring: Scoring,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Feed {
	pub default_limit: u32,
	pub max_limit: u32,
	#[serde(default = "default_overshoot_factor")]
	pub overshoot_factor: u32,
	#[serde(default = "default_source_timeout_ms")]
	pub source_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Traversal {
	pub max_hops: u8,
	pub max_fanout: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scoring {
	pub weights: ScoreWeights,
	#[serde(default)]
	pub proximity: GraphProximity,
	pub decay_per_hour: DecayRates,
	#[serde(default = "default_theme_boost_weight")]
	pub theme_boost_weight: f32,
}

/// Weights of the four relevance sub-scores. Must sum to 1.0.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreWeights {
	pub semantic: f32,
	pub graph: f32,
	pub trust: f32,
	pub recency: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphProximity {
	pub one_hop: f32,
	pub two_hop: f32,
}
impl Default for GraphProximity {
	fn default() -> Self {
		Self { one_hop: 0.6, two_hop: 0.3 }
	}
}

/// Per-tier exponential decay rates, in units of 1/hour. Lower tiers (more
/// impactful documents) must decay strictly slower than higher ones.
#[derive(Debug, Clone, Deserialize)]
pub struct DecayRates {
	pub platinum: f32,
	pub gold: f32,
	pub silver: f32,
	pub bronze: f32,
	pub standard: f32,
}

fn default_overshoot_factor() -> u32 {
	4
}

fn default_source_timeout_ms() -> u64 {
	1_500
}

fn default_theme_boost_weight() -> f32 {
	0.1
}
