use crate::adapters::store::{JsonFileStore, MemoryStore};
use crate::config::{ServerConfig, StorageBackend};
use crate::core::service::ParkingService;
use crate::domain::ports::ParkingStore;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ParkingService>,
}

impl AppState {
    pub fn new(service: ParkingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// 依設定建立儲存層與服務，並完成車位初始化
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let store: Arc<dyn ParkingStore> = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("💾 Using in-memory store");
                Arc::new(MemoryStore::new())
            }
            StorageBackend::File => {
                let path = validate_required_field("storage.path", &config.storage.path)?;
                tracing::info!("💾 Using JSON snapshot store at {}", path);
                Arc::new(JsonFileStore::open(path).await?)
            }
        };

        let service = ParkingService::new(store, config);
        service.initialize().await?;

        Ok(Self::new(service))
    }
}
