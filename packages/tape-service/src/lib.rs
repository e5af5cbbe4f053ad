pub mod feed;

mod error;

pub use error::{Error, Result};
pub use feed::{FeedItem, FeedRequest, FeedResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use tape_config::Config;
use tape_domain::{Client, Document, GraphHit, VectorHit, themes};
use tape_storage::{clients, db::Db, docs, graph, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Multi-hop traversal over the company/instrument knowledge graph. The
/// implementation must re-read the client's holdings and watchlist on every
/// call; feed requests may never observe a stale portfolio.
pub trait GraphStore
where
	Self: Send + Sync,
{
	fn traverse<'a>(
		&'a self,
		client_id: Uuid,
		max_hops: u8,
		max_fanout: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GraphHit>>>;
}

/// Nearest-neighbor search over the document-embedding index.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn similarity_search<'a>(
		&'a self,
		embedding: &'a [f32],
		top_n: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<VectorHit>>>;
}

/// Batch document metadata fetch. Unknown ids are absent from the result.
pub trait DocumentProvider
where
	Self: Send + Sync,
{
	fn get_documents<'a>(
		&'a self,
		doc_ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>>;
}

pub trait ClientProvider
where
	Self: Send + Sync,
{
	fn get_client<'a>(
		&'a self,
		client_id: Uuid,
	) -> BoxFuture<'a, color_eyre::Result<Option<Client>>>;
}

/// Theme alignment between a document and a client's mandate themes,
/// returning a score in [0, 1]. Pluggable so an embedding-based matcher can
/// replace the keyword one without touching the scorer.
pub trait ThemeMatcher
where
	Self: Send + Sync,
{
	fn match_themes(&self, doc: &Document, mandate_themes: &[String]) -> f32;
}

pub struct KeywordThemeMatcher;
impl ThemeMatcher for KeywordThemeMatcher {
	fn match_themes(&self, doc: &Document, mandate_themes: &[String]) -> f32 {
		themes::theme_score(&themes::theme_text(doc), mandate_themes)
	}
}

#[derive(Clone)]
pub struct Adapters {
	pub graph: Arc<dyn GraphStore>,
	pub vectors: Arc<dyn VectorIndex>,
	pub documents: Arc<dyn DocumentProvider>,
	pub clients: Arc<dyn ClientProvider>,
}
impl Adapters {
	pub fn new(
		graph: Arc<dyn GraphStore>,
		vectors: Arc<dyn VectorIndex>,
		documents: Arc<dyn DocumentProvider>,
		clients: Arc<dyn ClientProvider>,
	) -> Self {
		Self { graph, vectors, documents, clients }
	}
}

struct StoreAdapters {
	pool: sqlx::PgPool,
	qdrant: QdrantStore,
}

impl GraphStore for StoreAdapters {
	fn traverse<'a>(
		&'a self,
		client_id: Uuid,
		max_hops: u8,
		max_fanout: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GraphHit>>> {
		Box::pin(async move {
			Ok(graph::traverse(&self.pool, client_id, max_hops, max_fanout).await?)
		})
	}
}

impl VectorIndex for StoreAdapters {
	fn similarity_search<'a>(
		&'a self,
		embedding: &'a [f32],
		top_n: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<VectorHit>>> {
		Box::pin(async move { Ok(self.qdrant.similarity_search(embedding, top_n).await?) })
	}
}

impl DocumentProvider for StoreAdapters {
	fn get_documents<'a>(
		&'a self,
		doc_ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		Box::pin(async move { Ok(docs::fetch_documents(&self.pool, doc_ids).await?) })
	}
}

impl ClientProvider for StoreAdapters {
	fn get_client<'a>(
		&'a self,
		client_id: Uuid,
	) -> BoxFuture<'a, color_eyre::Result<Option<Client>>> {
		Box::pin(async move { Ok(clients::fetch_client(&self.pool, client_id).await?) })
	}
}

pub struct TapeService {
	pub cfg: Config,
	pub adapters: Adapters,
	pub themes: Arc<dyn ThemeMatcher>,
}
impl TapeService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		let store = Arc::new(StoreAdapters { pool: db.pool, qdrant });
		let adapters = Adapters {
			graph: store.clone(),
			vectors: store.clone(),
			documents: store.clone(),
			clients: store,
		};

		Self { cfg, adapters, themes: Arc::new(KeywordThemeMatcher) }
	}

	pub fn with_adapters(cfg: Config, adapters: Adapters) -> Self {
		Self { cfg, adapters, themes: Arc::new(KeywordThemeMatcher) }
	}

	pub fn with_theme_matcher(mut self, themes: Arc<dyn ThemeMatcher>) -> Self {
		self.themes = themes;

		self
	}
}
