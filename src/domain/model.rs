use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Empty,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub slot_number: u32,
    pub in_maintenance: bool,
    pub status: SlotStatus,
}

impl Slot {
    pub fn new(slot_number: u32) -> Self {
        Self {
            slot_number,
            in_maintenance: false,
            status: SlotStatus::Empty,
        }
    }

    /// 可停車：未維修且空位
    pub fn is_available(&self) -> bool {
        !self.in_maintenance && self.status == SlotStatus::Empty
    }

    pub fn is_booked(&self) -> bool {
        self.status == SlotStatus::Booked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingRecord {
    pub id: Uuid,
    pub slot_number: u32,
    pub vehicle_number: String,
    pub entry_time: DateTime<Utc>,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub charged_amount: u64,
}

impl ParkingRecord {
    pub fn open(slot_number: u32, vehicle_number: impl Into<String>, entry_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slot_number,
            vehicle_number: vehicle_number.into(),
            entry_time,
            exit_time: None,
            charged_amount: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.exit_time.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_slots: usize,
    pub maintenance_slots: usize,
    pub total_parked_vehicles: usize,
    pub total_revenue: u64,
}

/// 維修時遇到已停車車位的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenancePolicy {
    /// Flag the slot and leave the parked vehicle where it is.
    #[default]
    Keep,
    /// Release the parked vehicle (charging its fee) before flagging the slot.
    Evict,
}

/// Result of a successful park.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub record: ParkingRecord,
}

impl Allocation {
    pub fn message(&self) -> String {
        format!("Vehicle parked with ID: {}", self.record.id)
    }
}

/// Result of a successful unpark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub record: ParkingRecord,
    pub hours: i64,
    pub parking_fee: u64,
}
