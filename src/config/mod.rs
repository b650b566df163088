pub mod toml_config;

pub use toml_config::{ServerConfig, StorageBackend};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "parking-api")]
#[command(about = "REST service for a fixed pool of numbered parking slots")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listen host from config
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port from config
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the storage snapshot path (switches to the file backend)
    #[arg(long)]
    pub data_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔並套用命令列覆蓋
    pub fn load(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.data_file {
            config.storage.backend = StorageBackend::File;
            config.storage.path = Some(path.clone());
        }

        Ok(config)
    }
}
