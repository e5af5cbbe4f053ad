use sqlx::PgPool;
use uuid::Uuid;

use tape_domain::{Client, Holding, InvestmentPolicy, WatchItem};

use crate::{
	Result,
	models::{ClientRow, HoldingRow, WatchRow},
};

/// Read a client profile with its current portfolio and watchlist. Always a
/// fresh read; the feed engine must see mutations on the very next request,
/// so nothing here may be cached.
pub async fn fetch_client(pool: &PgPool, client_id: Uuid) -> Result<Option<Client>> {
	let row = sqlx::query_as::<_, ClientRow>(
		"\
SELECT
	client_id,
	mandate_text,
	mandate_embedding,
	min_trust,
	risk_tier,
	excluded_sectors,
	esg_exclusions,
	themes,
	member_groups
FROM clients
WHERE client_id = $1",
	)
	.bind(client_id)
	.fetch_optional(pool)
	.await?;

	let Some(row) = row else {
		return Ok(None);
	};

	let holdings = sqlx::query_as::<_, HoldingRow>(
		"\
SELECT
	h.instrument_id,
	i.ticker,
	h.weight,
	h.sentiment
FROM client_holdings h
JOIN instruments i ON i.instrument_id = h.instrument_id
WHERE h.client_id = $1
ORDER BY i.ticker",
	)
	.bind(client_id)
	.fetch_all(pool)
	.await?;

	let watchlist = sqlx::query_as::<_, WatchRow>(
		"\
SELECT
	w.instrument_id,
	i.ticker
FROM client_watchlist w
JOIN instruments i ON i.instrument_id = w.instrument_id
WHERE w.client_id = $1
ORDER BY i.ticker",
	)
	.bind(client_id)
	.fetch_all(pool)
	.await?;

	Ok(Some(Client {
		client_id: row.client_id,
		groups: row.member_groups,
		portfolio: holdings
			.into_iter()
			.map(|holding| Holding {
				instrument_id: holding.instrument_id,
				ticker: holding.ticker,
				weight: holding.weight,
				sentiment: holding.sentiment,
			})
			.collect(),
		watchlist: watchlist
			.into_iter()
			.map(|watch| WatchItem { instrument_id: watch.instrument_id, ticker: watch.ticker })
			.collect(),
		mandate_text: row.mandate_text,
		mandate_embedding: row.mandate_embedding,
		min_trust: row.min_trust,
		risk_tier: row.risk_tier,
		ips: InvestmentPolicy {
			excluded_sectors: row.excluded_sectors,
			esg_exclusions: row.esg_exclusions,
			themes: row.themes,
		},
	}))
}
