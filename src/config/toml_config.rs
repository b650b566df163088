use crate::core::fee::DEFAULT_HOURLY_RATE;
use crate::domain::model::MaintenancePolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CAPACITY: u32 = 10;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub lot: LotSection,
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LotSection {
    pub capacity: u32,
    pub hourly_rate: u64,
    pub retain_history: bool,
    pub maintenance_policy: MaintenancePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub json: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for LotSection {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hourly_rate: DEFAULT_HOURLY_RATE,
            retain_history: true,
            maintenance_policy: MaintenancePolicy::Keep,
        }
    }
}

impl ServerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ParkingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ParkingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PARKING_PORT})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ParkingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_positive_number("server.port", self.server.port, 1)?;
        validation::validate_range("lot.capacity", self.lot.capacity, 1, 1000)?;
        validation::validate_positive_number("lot.hourly_rate", self.lot.hourly_rate, 1)?;

        if self.storage.backend == StorageBackend::File {
            let path = validation::validate_required_field("storage.path", &self.storage.path)?;
            validation::validate_path("storage.path", path)?;
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ConfigProvider for ServerConfig {
    fn capacity(&self) -> u32 {
        self.lot.capacity
    }

    fn hourly_rate(&self) -> u64 {
        self.lot.hourly_rate
    }

    fn retain_history(&self) -> bool {
        self.lot.retain_history
    }

    fn maintenance_policy(&self) -> MaintenancePolicy {
        self.lot.maintenance_policy
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
