use std::sync::Arc;

use tape_service::TapeService;
use tape_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TapeService>,
}
impl AppState {
	pub async fn new(config: tape_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = TapeService::new(config, db, qdrant);

		Ok(Self { service: Arc::new(service) })
	}
}
