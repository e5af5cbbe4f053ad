use std::collections::HashMap;

use uuid::Uuid;

use tape_domain::{DiscoveryPath, GraphHit, VectorHit};

/// Graph provenance kept on a merged candidate: the best (lowest-hop)
/// traversal result for the document.
#[derive(Debug, Clone)]
pub struct GraphSignal {
	pub hop_distance: u8,
	pub path: DiscoveryPath,
	pub ticker: String,
	pub origin_ticker: String,
	pub beta: Option<f32>,
}

/// A document found by at least one source. When both sources find it, both
/// signals are retained for scoring rather than one discarding the other.
#[derive(Debug, Clone)]
pub struct Candidate {
	pub doc_id: Uuid,
	pub graph: Option<GraphSignal>,
	pub semantic: Option<f32>,
}

pub fn merge_candidates(graph_hits: Vec<GraphHit>, vector_hits: Vec<VectorHit>) -> Vec<Candidate> {
	let mut by_doc: HashMap<Uuid, Candidate> = HashMap::new();

	for hit in graph_hits {
		let entry = by_doc
			.entry(hit.doc_id)
			.or_insert_with(|| Candidate { doc_id: hit.doc_id, graph: None, semantic: None });
		let replace = match entry.graph.as_ref() {
			Some(existing) => hit.hop_distance < existing.hop_distance,
			None => true,
		};

		if replace {
			entry.graph = Some(GraphSignal {
				hop_distance: hit.hop_distance,
				path: hit.path,
				ticker: hit.ticker,
				origin_ticker: hit.origin_ticker,
				beta: hit.beta,
			});
		}
	}

	for hit in vector_hits {
		let entry = by_doc
			.entry(hit.doc_id)
			.or_insert_with(|| Candidate { doc_id: hit.doc_id, graph: None, semantic: None });
		let similarity = match entry.semantic {
			Some(existing) => existing.max(hit.similarity),
			None => hit.similarity,
		};

		entry.semantic = Some(similarity);
	}

	let mut out: Vec<Candidate> = by_doc.into_values().collect();

	out.sort_by_key(|candidate| candidate.doc_id);

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn graph_hit(doc_id: Uuid, hop_distance: u8, path: DiscoveryPath) -> GraphHit {
		GraphHit {
			doc_id,
			instrument_id: Uuid::new_v4(),
			ticker: "QNTM".to_string(),
			hop_distance,
			path,
			origin_ticker: "GTX".to_string(),
			beta: None,
		}
	}

	#[test]
	fn merges_by_document_id() {
		let doc_id = Uuid::new_v4();
		let merged = merge_candidates(
			vec![graph_hit(doc_id, 1, DiscoveryPath::SupplyChain)],
			vec![VectorHit { doc_id, similarity: 0.8 }],
		);

		assert_eq!(merged.len(), 1);

		let candidate = &merged[0];

		assert_eq!(candidate.graph.as_ref().map(|signal| signal.hop_distance), Some(1));
		assert_eq!(candidate.semantic, Some(0.8));
	}

	#[test]
	fn keeps_lowest_hop_graph_signal() {
		let doc_id = Uuid::new_v4();
		let merged = merge_candidates(
			vec![
				graph_hit(doc_id, 2, DiscoveryPath::Competitor),
				graph_hit(doc_id, 0, DiscoveryPath::Direct),
				graph_hit(doc_id, 1, DiscoveryPath::SupplyChain),
			],
			Vec::new(),
		);

		assert_eq!(merged.len(), 1);

		let signal = merged[0].graph.as_ref().expect("graph signal");

		assert_eq!(signal.hop_distance, 0);
		assert_eq!(signal.path, DiscoveryPath::Direct);
	}

	#[test]
	fn keeps_highest_similarity() {
		let doc_id = Uuid::new_v4();
		let merged = merge_candidates(
			Vec::new(),
			vec![
				VectorHit { doc_id, similarity: 0.4 },
				VectorHit { doc_id, similarity: 0.9 },
				VectorHit { doc_id, similarity: 0.7 },
			],
		);

		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].semantic, Some(0.9));
	}

	#[test]
	fn distinct_documents_stay_distinct() {
		let merged = merge_candidates(
			vec![graph_hit(Uuid::new_v4(), 0, DiscoveryPath::Direct)],
			vec![VectorHit { doc_id: Uuid::new_v4(), similarity: 0.5 }],
		);

		assert_eq!(merged.len(), 2);
	}
}
