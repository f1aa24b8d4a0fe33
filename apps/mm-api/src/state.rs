use std::sync::Arc;

use mm_service::MatchService;
use mm_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MatchService>,
}
impl AppState {
	pub fn new(config: mm_config::Config) -> color_eyre::Result<Self> {
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = MatchService::new(config, Arc::new(qdrant));

		Ok(Self { service: Arc::new(service) })
	}

	pub fn from_service(service: MatchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
