mod ranking;

use std::{collections::HashMap, time::Duration};

use tracing::{debug, warn};
use uuid::Uuid;

use tape_domain::{Channel, Client, DiscoveryPath, Document};

use crate::{Error, Result, TapeService};

use self::ranking::{
	Candidate, RankedCandidate, RelevanceScorer, apply_policy, assemble_items, classify,
	merge_candidates,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedRequest {
	pub client_id: Uuid,
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub query_embedding: Option<Vec<f32>>,
	#[serde(default)]
	pub limit: Option<u32>,
	#[serde(default)]
	pub channel: Option<Channel>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedItem {
	pub doc_id: Uuid,
	pub title: String,
	pub channel: Channel,
	pub relevance_score: f32,
	pub discovered_via: DiscoveryPath,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expanded_from: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rationale: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedResponse {
	pub items: Vec<FeedItem>,
	pub total_candidates_considered: u32,
	pub total_after_filter: u32,
}

impl TapeService {
	/// Build a client's personalized feed. Stateless per request; the client
	/// profile, portfolio, and watchlist are read fresh every call.
	pub async fn feed(&self, req: FeedRequest) -> Result<FeedResponse> {
		if req.limit == Some(0) {
			return Err(Error::InvalidRequest {
				message: "limit must be greater than zero.".to_string(),
			});
		}
		if req.query_embedding.as_ref().is_some_and(Vec::is_empty) {
			return Err(Error::InvalidRequest {
				message: "query_embedding must be non-empty when supplied.".to_string(),
			});
		}

		let limit = req.limit.unwrap_or(self.cfg.feed.default_limit).min(self.cfg.feed.max_limit);
		let client = self
			.adapters
			.clients
			.get_client(req.client_id)
			.await?
			.ok_or(Error::ClientNotFound { client_id: req.client_id })?;
		let embedding =
			req.query_embedding.as_deref().unwrap_or(client.mandate_embedding.as_slice());
		let candidate_k = limit.saturating_mul(self.cfg.feed.overshoot_factor);

		let candidates = self.generate_candidates(&client, embedding, candidate_k).await?;
		let total_candidates_considered = candidates.len() as u32;

		let mut doc_ids: Vec<Uuid> = candidates.iter().map(|candidate| candidate.doc_id).collect();

		doc_ids.sort();

		let documents = self.adapters.documents.get_documents(&doc_ids).await?;
		let docs_by_id: HashMap<Uuid, Document> =
			documents.into_iter().map(|doc| (doc.doc_id, doc)).collect();

		let (survivors, stats) = apply_policy(candidates, &docs_by_id, &client);
		let total_after_filter = survivors.len() as u32;

		debug!(
			client_id = %client.client_id,
			query = ?req.query,
			considered = total_candidates_considered,
			after_filter = total_after_filter,
			below_trust_floor = stats.below_trust_floor,
			excluded_sector = stats.excluded_sector,
			esg_excluded = stats.esg_excluded,
			"Candidate filtering complete."
		);

		let scorer = RelevanceScorer::new(&self.cfg.scoring);
		let now = time::OffsetDateTime::now_utc();
		let mut ranked = Vec::with_capacity(survivors.len());

		for candidate in survivors {
			let Some(doc) = docs_by_id.get(&candidate.doc_id) else {
				continue;
			};
			let theme_score = self.themes.match_themes(doc, &client.ips.themes);
			let Some((channel, rationale)) = classify(&candidate, doc, &client, theme_score)
			else {
				continue;
			};
			let breakdown = scorer.score(&candidate, doc, theme_score, now);

			ranked.push(RankedCandidate {
				candidate,
				title: doc.title.clone(),
				created_at: doc.created_at,
				channel,
				rationale,
				breakdown,
			});
		}

		let items = assemble_items(ranked, req.channel, limit);

		Ok(FeedResponse { items, total_candidates_considered, total_after_filter })
	}

	/// Fan out to the graph store and the vector index concurrently. One
	/// failing source degrades generation to the surviving one; both failing
	/// is a `ServiceUnavailable` error. Dropping the returned future cancels
	/// both in-flight queries.
	async fn generate_candidates(
		&self,
		client: &Client,
		embedding: &[f32],
		candidate_k: u32,
	) -> Result<Vec<Candidate>> {
		let timeout = Duration::from_millis(self.cfg.feed.source_timeout_ms);
		let graph_query = async {
			match tokio::time::timeout(
				timeout,
				self.adapters.graph.traverse(
					client.client_id,
					self.cfg.traversal.max_hops,
					self.cfg.traversal.max_fanout,
				),
			)
			.await
			{
				Ok(Ok(hits)) => Ok(hits),
				Ok(Err(err)) => Err(err.to_string()),
				Err(_) => Err("graph traversal timed out".to_string()),
			}
		};
		let vector_query = async {
			if embedding.is_empty() {
				debug!(client_id = %client.client_id, "No mandate or query embedding; skipping similarity search.");

				return Ok(Vec::new());
			}

			match tokio::time::timeout(
				timeout,
				self.adapters.vectors.similarity_search(embedding, candidate_k),
			)
			.await
			{
				Ok(Ok(hits)) => Ok(hits),
				Ok(Err(err)) => Err(err.to_string()),
				Err(_) => Err("similarity search timed out".to_string()),
			}
		};

		let (graph_result, vector_result) = tokio::join!(graph_query, vector_query);
		let (graph_hits, vector_hits) = match (graph_result, vector_result) {
			(Ok(graph_hits), Ok(vector_hits)) => (graph_hits, vector_hits),
			(Err(graph_err), Ok(vector_hits)) => {
				warn!(
					client_id = %client.client_id,
					error = %graph_err,
					"Graph store unavailable; degrading to vector-only candidates."
				);

				(Vec::new(), vector_hits)
			},
			(Ok(graph_hits), Err(vector_err)) => {
				warn!(
					client_id = %client.client_id,
					error = %vector_err,
					"Vector index unavailable; degrading to graph-only candidates."
				);

				(graph_hits, Vec::new())
			},
			(Err(graph_err), Err(vector_err)) =>
				return Err(Error::ServiceUnavailable {
					message: format!(
						"graph store failed ({graph_err}); vector index failed ({vector_err})"
					),
				}),
		};

		Ok(merge_candidates(graph_hits, vector_hits))
	}
}
