//! JSON bodies exchanged by the API and the client screen.
use crate::domain::model::{ParkingRecord, Slot, Statistics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    #[serde(default)]
    pub vehicle_number: Option<String>,
}

impl VehicleRequest {
    pub fn new(vehicle_number: impl Into<String>) -> Self {
        Self {
            vehicle_number: Some(vehicle_number.into()),
        }
    }
}

/// Plain envelope, also used for every failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkResponse {
    pub success: bool,
    pub message: String,
    pub slot_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparkResponse {
    pub success: bool,
    pub message: String,
    pub parking_fee: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub parking_lot: Vec<ParkingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub success: bool,
    pub message: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub records: Vec<ParkingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub statistics: Statistics,
}
