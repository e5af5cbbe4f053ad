use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use tape_domain::{AffectEdge, Document, Source};

use crate::{
	Result,
	models::{AffectRow, DocumentRow, MentionRow, parse_direction, parse_impact_tier, parse_magnitude},
};

/// Batch-fetch documents with their sources, affect edges, and mentions.
/// Unknown ids are silently absent from the result.
pub async fn fetch_documents(pool: &PgPool, doc_ids: &[Uuid]) -> Result<Vec<Document>> {
	if doc_ids.is_empty() {
		return Ok(Vec::new());
	}

	let doc_ids = doc_ids.to_vec();
	let rows = sqlx::query_as::<_, DocumentRow>(
		"\
SELECT
	d.doc_id,
	d.title,
	d.event_type,
	d.impact_tier,
	d.impact_score,
	d.created_at,
	s.source_id,
	s.name AS source_name,
	s.trust_level
FROM documents d
JOIN sources s ON s.source_id = d.source_id
WHERE d.doc_id = ANY($1)",
	)
	.bind(&doc_ids)
	.fetch_all(pool)
	.await?;

	let affect_rows = sqlx::query_as::<_, AffectRow>(
		"\
SELECT
	da.doc_id,
	da.instrument_id,
	i.ticker,
	i.sector,
	da.direction,
	da.magnitude
FROM document_affects da
JOIN instruments i ON i.instrument_id = da.instrument_id
WHERE da.doc_id = ANY($1)",
	)
	.bind(&doc_ids)
	.fetch_all(pool)
	.await?;

	let mention_rows = sqlx::query_as::<_, MentionRow>(
		"\
SELECT doc_id, mention
FROM document_mentions
WHERE doc_id = ANY($1)
ORDER BY mention",
	)
	.bind(&doc_ids)
	.fetch_all(pool)
	.await?;

	let mut affects_by_doc: HashMap<Uuid, Vec<AffectEdge>> = HashMap::new();

	for row in affect_rows {
		affects_by_doc.entry(row.doc_id).or_default().push(AffectEdge {
			instrument_id: row.instrument_id,
			ticker: row.ticker,
			sector: row.sector,
			direction: parse_direction(&row.direction)?,
			magnitude: parse_magnitude(&row.magnitude)?,
		});
	}

	let mut mentions_by_doc: HashMap<Uuid, Vec<String>> = HashMap::new();

	for row in mention_rows {
		mentions_by_doc.entry(row.doc_id).or_default().push(row.mention);
	}

	let mut out = Vec::with_capacity(rows.len());

	for row in rows {
		out.push(Document {
			doc_id: row.doc_id,
			title: row.title,
			event_type: row.event_type,
			impact_tier: parse_impact_tier(&row.impact_tier)?,
			impact_score: row.impact_score,
			created_at: row.created_at,
			source: Source {
				source_id: row.source_id,
				name: row.source_name,
				trust_level: row.trust_level,
			},
			affects: affects_by_doc.remove(&row.doc_id).unwrap_or_default(),
			mentions: mentions_by_doc.remove(&row.doc_id).unwrap_or_default(),
		});
	}

	Ok(out)
}
