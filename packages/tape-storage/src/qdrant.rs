pub const DENSE_VECTOR_NAME: &str = "dense";

use qdrant_client::qdrant::{PointId, Query, QueryPointsBuilder, point_id::PointIdOptions};
use uuid::Uuid;

use tape_domain::VectorHit;

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &tape_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Dense nearest-neighbor search over the document-embedding index.
	pub async fn similarity_search(&self, embedding: &[f32], top_n: u32) -> Result<Vec<VectorHit>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(embedding.to_vec()))
			.using(DENSE_VECTOR_NAME)
			.limit(u64::from(top_n));
		let response = self.client.query(search).await?;
		let mut out = Vec::with_capacity(response.result.len());

		for point in response.result {
			let Some(doc_id) = point.id.as_ref().and_then(point_id_to_uuid) else {
				tracing::warn!("Similarity hit is missing a UUID point id.");

				continue;
			};

			out.push(VectorHit { doc_id, similarity: point.score });
		}

		Ok(out)
	}
}

fn point_id_to_uuid(point_id: &PointId) -> Option<Uuid> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Uuid(id)) => Uuid::parse_str(id).ok(),
		_ => None,
	}
}
