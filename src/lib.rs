pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::client::ParkingClient;
pub use adapters::http::{build_router, serve, AppState};
pub use adapters::store::{JsonFileStore, MemoryStore};
pub use app::ParkingScreen;
pub use config::ServerConfig;
pub use core::service::ParkingService;
pub use utils::error::{ParkingError, Result};
