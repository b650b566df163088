use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkingError {
    #[error("No parking slot available!")]
    NoSlotAvailable,

    #[error("Vehicle not found in the parking lot")]
    VehicleNotFound { vehicle_number: String },

    #[error("Parking slot {slot_number} not found.")]
    SlotNotFound { slot_number: u32 },

    #[error("Vehicle with number {vehicle_number} is already parked.")]
    VehicleAlreadyParked { vehicle_number: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API responded with {status}: {message}")]
    ApiResponseError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Configuration,
    Network,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ParkingError {
    pub fn validation(message: impl Into<String>) -> Self {
        ParkingError::ValidationError {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        ParkingError::StoreError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ParkingError::ValidationError { .. } => ErrorCategory::Validation,
            ParkingError::VehicleNotFound { .. } | ParkingError::SlotNotFound { .. } => {
                ErrorCategory::NotFound
            }
            ParkingError::NoSlotAvailable | ParkingError::VehicleAlreadyParked { .. } => {
                ErrorCategory::Conflict
            }
            ParkingError::ConfigError { .. }
            | ParkingError::ConfigValidationError { .. }
            | ParkingError::InvalidConfigValueError { .. }
            | ParkingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ParkingError::ApiError(_) | ParkingError::ApiResponseError { .. } => {
                ErrorCategory::Network
            }
            ParkingError::IoError(_)
            | ParkingError::SerializationError(_)
            | ParkingError::StoreError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::Conflict => {
                ErrorSeverity::Low
            }
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 給操作人員的處理建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ParkingError::NoSlotAvailable => "Wait for a vehicle to leave or end maintenance on a slot",
            ParkingError::VehicleNotFound { .. } => "Check the vehicle number against the current parking status",
            ParkingError::SlotNotFound { .. } => "Use a slot number listed by the slots endpoint",
            ParkingError::VehicleAlreadyParked { .. } => "Unpark the vehicle before parking it again",
            ParkingError::ValidationError { .. } => "Provide a non-empty vehicle number in the request body",
            ParkingError::ApiError(_) | ParkingError::ApiResponseError { .. } => {
                "Make sure the parking API is running and the base URL is correct"
            }
            ParkingError::IoError(_) | ParkingError::StoreError { .. } => {
                "Check that the storage path exists and is writable"
            }
            ParkingError::SerializationError(_) => "The stored snapshot may be corrupted; restore or remove it",
            ParkingError::ConfigError { .. }
            | ParkingError::ConfigValidationError { .. }
            | ParkingError::InvalidConfigValueError { .. }
            | ParkingError::MissingConfigError { .. } => "Fix the configuration file and restart",
        }
    }

    /// 對外顯示的訊息，內部錯誤不洩漏細節
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Internal => "Internal server error".to_string(),
            ErrorCategory::Network => "Something went wrong, please try again.".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParkingError>;
