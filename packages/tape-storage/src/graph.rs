use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use tape_domain::{DiscoveryPath, GraphHit};

use crate::{
	Result,
	models::{
		AffectedDocRow, EDGE_KIND_COMPETES_WITH, EDGE_KIND_SUPPLIES_TO, EdgeRow,
		FactorNeighborRow, InstrumentRefRow,
	},
};

const SUPPLY_HOP_COST: u8 = 1;
const COMPETITOR_HOP_COST: u8 = 2;

#[derive(Debug, Clone)]
struct ReachedInstrument {
	ticker: String,
	hop_distance: u8,
	path: DiscoveryPath,
	origin_ticker: String,
	beta: Option<f32>,
}

/// Walk the instrument graph outward from the client's current holdings and
/// watchlist and return every document affecting a reached instrument,
/// tagged with its provenance.
///
/// Holdings and watchlist are re-read on every call; portfolio mutations
/// must be visible to the very next feed request.
///
/// The walk is an explicit frontier/visited expansion: an instrument is only
/// re-expanded when rediscovered at a strictly lower hop distance, which
/// guarantees termination on cyclic relationship graphs.
pub async fn traverse(
	pool: &PgPool,
	client_id: Uuid,
	max_hops: u8,
	max_fanout: u32,
) -> Result<Vec<GraphHit>> {
	let origins = fetch_origins(pool, client_id).await?;

	if origins.is_empty() {
		return Ok(Vec::new());
	}

	let mut reached: HashMap<Uuid, ReachedInstrument> = HashMap::new();
	let mut frontier: Vec<Uuid> = Vec::with_capacity(origins.len());

	for origin in &origins {
		reached.insert(
			origin.instrument_id,
			ReachedInstrument {
				ticker: origin.ticker.clone(),
				hop_distance: 0,
				path: DiscoveryPath::Direct,
				origin_ticker: origin.ticker.clone(),
				beta: None,
			},
		);
		frontier.push(origin.instrument_id);
	}

	while !frontier.is_empty() {
		frontier = expand_frontier(pool, &mut reached, &frontier, max_hops, max_fanout).await?;
	}

	let origin_ids: Vec<Uuid> = origins.iter().map(|origin| origin.instrument_id).collect();

	expand_factor_exposure(pool, &mut reached, &origin_ids, max_fanout).await?;

	let mut instrument_ids: Vec<Uuid> = reached.keys().copied().collect();

	instrument_ids.sort();

	let doc_rows = fetch_affected_docs(pool, &instrument_ids, max_fanout).await?;
	let mut hits = Vec::with_capacity(doc_rows.len());

	for row in doc_rows {
		let Some(entry) = reached.get(&row.instrument_id) else {
			continue;
		};

		hits.push(GraphHit {
			doc_id: row.doc_id,
			instrument_id: row.instrument_id,
			ticker: entry.ticker.clone(),
			hop_distance: entry.hop_distance,
			path: entry.path,
			origin_ticker: entry.origin_ticker.clone(),
			beta: entry.beta,
		});
	}

	Ok(hits)
}

async fn expand_frontier(
	pool: &PgPool,
	reached: &mut HashMap<Uuid, ReachedInstrument>,
	frontier: &[Uuid],
	max_hops: u8,
	max_fanout: u32,
) -> Result<Vec<Uuid>> {
	let edges = fetch_edges(pool, frontier).await?;
	let mut adjacency: HashMap<Uuid, Vec<(Uuid, u8, DiscoveryPath)>> = HashMap::new();

	for edge in &edges {
		let (cost, edge_path) = match edge.kind.as_str() {
			EDGE_KIND_SUPPLIES_TO => (SUPPLY_HOP_COST, DiscoveryPath::SupplyChain),
			EDGE_KIND_COMPETES_WITH => (COMPETITOR_HOP_COST, DiscoveryPath::Competitor),
			other => {
				tracing::warn!(kind = other, "Skipping instrument edge with unknown kind.");

				continue;
			},
		};

		// Supply edges are walked both ways (SUPPLIES_TO and SUPPLIED_BY);
		// competitor edges are undirected by definition.
		adjacency.entry(edge.from_instrument).or_default().push((
			edge.to_instrument,
			cost,
			edge_path,
		));
		adjacency.entry(edge.to_instrument).or_default().push((
			edge.from_instrument,
			cost,
			edge_path,
		));
	}

	let mut expansions: Vec<(Uuid, u8, DiscoveryPath, String)> = Vec::new();

	for node in frontier {
		let Some(entry) = reached.get(node) else {
			continue;
		};
		let Some(neighbors) = adjacency.get_mut(node) else {
			continue;
		};

		neighbors.sort_by_key(|(neighbor, _, _)| *neighbor);

		let mut expanded = 0_u32;

		for (neighbor, cost, edge_path) in neighbors.iter() {
			if expanded >= max_fanout {
				break;
			}

			let new_hop = entry.hop_distance.saturating_add(*cost);

			if new_hop > max_hops {
				continue;
			}

			// The first edge away from an origin names the path; deeper
			// expansions inherit the label of the chain they extend.
			let path = if entry.path == DiscoveryPath::Direct { *edge_path } else { entry.path };

			expansions.push((*neighbor, new_hop, path, entry.origin_ticker.clone()));
			expanded += 1;
		}
	}

	if expansions.is_empty() {
		return Ok(Vec::new());
	}

	let neighbor_ids: Vec<Uuid> = expansions.iter().map(|(neighbor, ..)| *neighbor).collect();
	let tickers = fetch_instrument_refs(pool, &neighbor_ids).await?;
	let mut next_frontier = Vec::new();

	for (neighbor, new_hop, path, origin_ticker) in expansions {
		if reached.get(&neighbor).is_some_and(|existing| existing.hop_distance <= new_hop) {
			continue;
		}
		let Some(ticker) = tickers.get(&neighbor) else {
			continue;
		};

		reached.insert(
			neighbor,
			ReachedInstrument {
				ticker: ticker.clone(),
				hop_distance: new_hop,
				path,
				origin_ticker,
				beta: None,
			},
		);
		next_frontier.push(neighbor);
	}

	Ok(next_frontier)
}

async fn expand_factor_exposure(
	pool: &PgPool,
	reached: &mut HashMap<Uuid, ReachedInstrument>,
	origin_ids: &[Uuid],
	max_fanout: u32,
) -> Result<()> {
	let rows = fetch_factor_neighbors(pool, origin_ids).await?;
	let mut expanded_per_origin: HashMap<Uuid, u32> = HashMap::new();

	for row in rows {
		let expanded = expanded_per_origin.entry(row.origin_id).or_insert(0);

		if *expanded >= max_fanout {
			continue;
		}
		if reached.contains_key(&row.instrument_id) {
			continue;
		}
		let Some(origin) = reached.get(&row.origin_id) else {
			continue;
		};
		let origin_ticker = origin.origin_ticker.clone();

		reached.insert(
			row.instrument_id,
			ReachedInstrument {
				ticker: row.ticker,
				hop_distance: 1,
				path: DiscoveryPath::Factor,
				origin_ticker,
				beta: Some(row.origin_beta * row.beta),
			},
		);
		*expanded += 1;
	}

	Ok(())
}

async fn fetch_origins(pool: &PgPool, client_id: Uuid) -> Result<Vec<InstrumentRefRow>> {
	let rows = sqlx::query_as::<_, InstrumentRefRow>(
		"\
SELECT i.instrument_id, i.ticker
FROM client_holdings h
JOIN instruments i ON i.instrument_id = h.instrument_id
WHERE h.client_id = $1
UNION
SELECT i.instrument_id, i.ticker
FROM client_watchlist w
JOIN instruments i ON i.instrument_id = w.instrument_id
WHERE w.client_id = $1
ORDER BY ticker",
	)
	.bind(client_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

async fn fetch_edges(pool: &PgPool, instrument_ids: &[Uuid]) -> Result<Vec<EdgeRow>> {
	let instrument_ids = instrument_ids.to_vec();
	let rows = sqlx::query_as::<_, EdgeRow>(
		"\
SELECT from_instrument, to_instrument, kind
FROM instrument_edges
WHERE from_instrument = ANY($1) OR to_instrument = ANY($1)",
	)
	.bind(&instrument_ids)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

async fn fetch_instrument_refs(
	pool: &PgPool,
	instrument_ids: &[Uuid],
) -> Result<HashMap<Uuid, String>> {
	let instrument_ids = instrument_ids.to_vec();
	let rows = sqlx::query_as::<_, InstrumentRefRow>(
		"\
SELECT instrument_id, ticker
FROM instruments
WHERE instrument_id = ANY($1)",
	)
	.bind(&instrument_ids)
	.fetch_all(pool)
	.await?;

	Ok(rows.into_iter().map(|row| (row.instrument_id, row.ticker)).collect())
}

async fn fetch_factor_neighbors(
	pool: &PgPool,
	origin_ids: &[Uuid],
) -> Result<Vec<FactorNeighborRow>> {
	let origin_ids = origin_ids.to_vec();
	let rows = sqlx::query_as::<_, FactorNeighborRow>(
		"\
SELECT
	o.instrument_id AS origin_id,
	o.beta AS origin_beta,
	e.instrument_id,
	i.ticker,
	e.beta
FROM factor_exposures o
JOIN factor_exposures e ON e.factor_id = o.factor_id AND e.instrument_id <> o.instrument_id
JOIN instruments i ON i.instrument_id = e.instrument_id
WHERE o.instrument_id = ANY($1)
ORDER BY o.instrument_id, e.instrument_id",
	)
	.bind(&origin_ids)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

async fn fetch_affected_docs(
	pool: &PgPool,
	instrument_ids: &[Uuid],
	max_fanout: u32,
) -> Result<Vec<AffectedDocRow>> {
	let instrument_ids = instrument_ids.to_vec();
	let rows = sqlx::query_as::<_, AffectedDocRow>(
		"\
SELECT r.instrument_id, d.doc_id
FROM unnest($1::uuid[]) AS r(instrument_id)
JOIN LATERAL (
	SELECT da.doc_id
	FROM document_affects da
	JOIN documents doc ON doc.doc_id = da.doc_id
	WHERE da.instrument_id = r.instrument_id
	ORDER BY doc.created_at DESC
	LIMIT $2
) d ON TRUE",
	)
	.bind(&instrument_ids)
	.bind(i64::from(max_fanout))
	.fetch_all(pool)
	.await?;

	Ok(rows)
}
