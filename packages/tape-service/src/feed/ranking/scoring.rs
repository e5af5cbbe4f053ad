use std::cmp::Ordering;

use time::OffsetDateTime;

use tape_config::{DecayRates, GraphProximity, ScoreWeights, Scoring};
use tape_domain::{DiscoveryPath, Document, decay};

use super::candidates::{Candidate, GraphSignal};

/// The four normalized sub-scores and the resulting final score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreBreakdown {
	pub semantic: f32,
	pub graph: f32,
	pub trust: f32,
	pub recency: f32,
	pub theme_boost: f32,
	pub final_score: f32,
}

/// Relevance scoring with an explicit, pre-validated configuration object.
/// Weight-sum and decay-monotonicity invariants are enforced at
/// configuration-load time, not here.
pub struct RelevanceScorer {
	weights: ScoreWeights,
	proximity: GraphProximity,
	decay: DecayRates,
	theme_boost_weight: f32,
}
impl RelevanceScorer {
	pub fn new(cfg: &Scoring) -> Self {
		Self {
			weights: cfg.weights.clone(),
			proximity: cfg.proximity.clone(),
			decay: cfg.decay_per_hour.clone(),
			theme_boost_weight: cfg.theme_boost_weight,
		}
	}

	pub fn score(
		&self,
		candidate: &Candidate,
		doc: &Document,
		theme_score: f32,
		now: OffsetDateTime,
	) -> ScoreBreakdown {
		let semantic = candidate.semantic.unwrap_or(0.0).clamp(0.0, 1.0);
		let graph = graph_proximity(candidate.graph.as_ref(), &self.proximity);
		let trust = (f32::from(doc.source.trust_level) / 10.0).clamp(0.0, 1.0);
		let recency = decay::recency_score(
			doc.impact_score,
			doc.created_at,
			now,
			decay::decay_rate(doc.impact_tier, &self.decay),
		);
		let base = self.weights.semantic * semantic
			+ self.weights.graph * graph
			+ self.weights.trust * trust
			+ self.weights.recency * recency;
		let theme_boost = self.theme_boost_weight * theme_score.clamp(0.0, 1.0);
		let final_score = (base + theme_boost).clamp(0.0, 1.0);

		ScoreBreakdown { semantic, graph, trust, recency, theme_boost, final_score }
	}
}

/// Graph-proximity sub-score: 1.0 for a direct hit, per-hop penalties down
/// the chain, and |beta| (capped at 1.0) for factor exposure.
pub fn graph_proximity(signal: Option<&GraphSignal>, proximity: &GraphProximity) -> f32 {
	let Some(signal) = signal else {
		return 0.0;
	};

	match signal.path {
		DiscoveryPath::Factor =>
			signal.beta.map(|beta| beta.abs()).unwrap_or(0.0).clamp(0.0, 1.0),
		DiscoveryPath::Semantic => 0.0,
		DiscoveryPath::Direct | DiscoveryPath::SupplyChain | DiscoveryPath::Competitor =>
			match signal.hop_distance {
				0 => 1.0,
				1 => proximity.one_hop,
				_ => proximity.two_hop,
			},
	}
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
