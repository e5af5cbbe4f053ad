use tape_domain::{AffectEdge, Channel, Client, DiscoveryPath, Document, themes};

use super::candidates::{Candidate, GraphSignal};

/// Assign a candidate to exactly one channel, or drop it.
///
/// MAINTENANCE covers everything tied to the client's current holdings or
/// watchlist, whether discovered by traversal or by a semantic hit that
/// affects a held name. OPPORTUNITY requires a mandate-theme match and no
/// affected ticker in the portfolio. MAINTENANCE wins when both apply, so a
/// document guid can never appear in both channels.
pub fn classify(
	candidate: &Candidate,
	doc: &Document,
	client: &Client,
	theme_score: f32,
) -> Option<(Channel, String)> {
	let held = client.held_tickers();
	let holding_edge = doc
		.affects
		.iter()
		.find(|edge| held.contains(edge.ticker.as_str()) || client.watches(&edge.ticker));

	if let Some(signal) = candidate.graph.as_ref() {
		return Some((Channel::Maintenance, maintenance_rationale(signal, client)));
	}
	if let Some(edge) = holding_edge {
		return Some((Channel::Maintenance, direct_rationale(edge, client)));
	}

	// Reaching here means no affected ticker is held or watched, so the
	// opportunity no-overlap requirement is already satisfied.
	if theme_score > 0.0 {
		return Some((Channel::Opportunity, opportunity_rationale(doc, client)));
	}

	None
}

fn maintenance_rationale(signal: &GraphSignal, client: &Client) -> String {
	match signal.path {
		DiscoveryPath::Direct => match client.holding(&signal.ticker) {
			Some(holding) => format!(
				"Directly affects held {} (portfolio weight {:.1}%).",
				signal.ticker,
				holding.weight * 100.0
			),
			None => format!("Directly affects watchlist name {}.", signal.ticker),
		},
		DiscoveryPath::SupplyChain => format!(
			"{} sits in the supply chain of {} ({} hop{}).",
			signal.ticker,
			signal.origin_ticker,
			signal.hop_distance,
			if signal.hop_distance == 1 { "" } else { "s" }
		),
		DiscoveryPath::Competitor =>
			format!("{} competes with {}.", signal.ticker, signal.origin_ticker),
		DiscoveryPath::Factor => format!(
			"{} shares factor exposure with {} (beta {:.2}).",
			signal.ticker,
			signal.origin_ticker,
			signal.beta.unwrap_or(0.0)
		),
		DiscoveryPath::Semantic =>
			format!("Semantically related to holdings via {}.", signal.origin_ticker),
	}
}

fn direct_rationale(edge: &AffectEdge, client: &Client) -> String {
	match client.holding(&edge.ticker) {
		Some(holding) => format!(
			"Directly affects held {} (portfolio weight {:.1}%).",
			edge.ticker,
			holding.weight * 100.0
		),
		None => format!("Directly affects watchlist name {}.", edge.ticker),
	}
}

fn opportunity_rationale(doc: &Document, client: &Client) -> String {
	let matched = themes::matched_themes(&themes::theme_text(doc), &client.ips.themes);

	format!("Matches mandate theme{} {}; not currently held.", if matched.len() == 1 { "" } else { "s" }, matched.join(", "))
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;
	use uuid::Uuid;

	use tape_domain::{
		Direction, Holding, ImpactTier, InvestmentPolicy, Magnitude, Source, WatchItem,
	};

	use super::*;

	fn doc_affecting(ticker: &str, title: &str) -> Document {
		Document {
			doc_id: Uuid::new_v4(),
			title: title.to_string(),
			event_type: "earnings_beat".to_string(),
			impact_tier: ImpactTier::Gold,
			impact_score: 70.0,
			created_at: OffsetDateTime::UNIX_EPOCH,
			source: Source { source_id: Uuid::new_v4(), name: "wire".to_string(), trust_level: 8 },
			affects: vec![AffectEdge {
				instrument_id: Uuid::new_v4(),
				ticker: ticker.to_string(),
				sector: "Semiconductors".to_string(),
				direction: Direction::Up,
				magnitude: Magnitude::High,
			}],
			mentions: Vec::new(),
		}
	}

	fn client_holding(ticker: &str, themes: Vec<String>) -> Client {
		Client {
			client_id: Uuid::new_v4(),
			groups: Vec::new(),
			portfolio: vec![Holding {
				instrument_id: Uuid::new_v4(),
				ticker: ticker.to_string(),
				weight: 0.05,
				sentiment: 0.0,
			}],
			watchlist: vec![WatchItem {
				instrument_id: Uuid::new_v4(),
				ticker: "WTCH".to_string(),
			}],
			mandate_text: String::new(),
			mandate_embedding: Vec::new(),
			min_trust: 1,
			risk_tier: "balanced".to_string(),
			ips: InvestmentPolicy {
				excluded_sectors: Vec::new(),
				esg_exclusions: Vec::new(),
				themes,
			},
		}
	}

	fn graph_candidate(doc_id: Uuid, hop_distance: u8, path: DiscoveryPath) -> Candidate {
		Candidate {
			doc_id,
			graph: Some(GraphSignal {
				hop_distance,
				path,
				ticker: "QNTM".to_string(),
				origin_ticker: "GTX".to_string(),
				beta: None,
			}),
			semantic: None,
		}
	}

	#[test]
	fn graph_discovery_is_maintenance() {
		let doc = doc_affecting("QNTM", "Supplier news");
		let client = client_holding("GTX", Vec::new());
		let candidate = graph_candidate(doc.doc_id, 1, DiscoveryPath::SupplyChain);

		let (channel, rationale) =
			classify(&candidate, &doc, &client, 0.0).expect("channel expected");

		assert_eq!(channel, Channel::Maintenance);
		assert!(rationale.contains("supply chain"), "rationale: {rationale}");
	}

	#[test]
	fn maintenance_wins_over_opportunity() {
		// Theme-matching news on a held name must never surface as an
		// opportunity.
		let doc = doc_affecting("VELO", "Clean energy pivot at VELO");
		let client = client_holding("VELO", vec!["clean energy".to_string()]);
		let candidate = Candidate { doc_id: doc.doc_id, graph: None, semantic: Some(0.9) };

		let (channel, _) = classify(&candidate, &doc, &client, 1.0).expect("channel expected");

		assert_eq!(channel, Channel::Maintenance);
	}

	#[test]
	fn theme_match_on_unheld_name_is_opportunity() {
		let doc = doc_affecting("SOLR", "Clean energy capacity doubles");
		let client = client_holding("GTX", vec!["clean energy".to_string()]);
		let candidate = Candidate { doc_id: doc.doc_id, graph: None, semantic: Some(0.8) };

		let (channel, rationale) =
			classify(&candidate, &doc, &client, 0.5).expect("channel expected");

		assert_eq!(channel, Channel::Opportunity);
		assert!(rationale.contains("clean energy"), "rationale: {rationale}");
	}

	#[test]
	fn watchlist_affect_is_maintenance() {
		let doc = doc_affecting("WTCH", "Watchlist mover");
		let client = client_holding("GTX", Vec::new());
		let candidate = Candidate { doc_id: doc.doc_id, graph: None, semantic: Some(0.7) };

		let (channel, rationale) =
			classify(&candidate, &doc, &client, 0.0).expect("channel expected");

		assert_eq!(channel, Channel::Maintenance);
		assert!(rationale.contains("watchlist"), "rationale: {rationale}");
	}

	#[test]
	fn no_channel_means_dropped() {
		let doc = doc_affecting("RAND", "Unrelated news");
		let client = client_holding("GTX", vec!["clean energy".to_string()]);
		let candidate = Candidate { doc_id: doc.doc_id, graph: None, semantic: Some(0.6) };

		assert!(classify(&candidate, &doc, &client, 0.0).is_none());
	}
}
