use crate::core::fee::FeeSchedule;
use crate::domain::model::{MaintenancePolicy, ParkingRecord, Release, Slot, Statistics};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Slot and record persistence.
///
/// Every mutating method is a single atomic step for the implementation:
/// `allocate` picks, books and records in one go, `close_record` only
/// succeeds while the record is still active, and `start_maintenance_evicting`
/// frees and flags a slot without letting an allocation slip in between.
#[async_trait]
pub trait ParkingStore: Send + Sync {
    /// Creates slots `1..=capacity` when the store holds none. Returns whether it seeded.
    async fn seed_slots(&self, capacity: u32) -> Result<bool>;

    /// All slots ordered by slot number.
    async fn slots(&self) -> Result<Vec<Slot>>;

    /// Books the lowest-numbered available slot for `vehicle_number`.
    async fn allocate(&self, vehicle_number: &str, entry_time: DateTime<Utc>)
        -> Result<ParkingRecord>;

    async fn active_record(&self, vehicle_number: &str) -> Result<Option<ParkingRecord>>;

    async fn active_record_for_slot(&self, slot_number: u32) -> Result<Option<ParkingRecord>>;

    /// Closes an active record and empties its slot. `None` when the record is
    /// no longer active. With `retain` false the record is dropped instead of archived.
    async fn close_record(
        &self,
        record_id: Uuid,
        exit_time: DateTime<Utc>,
        charged_amount: u64,
        retain: bool,
    ) -> Result<Option<ParkingRecord>>;

    async fn set_maintenance(&self, slot_number: u32, in_maintenance: bool) -> Result<Slot>;

    /// Closes whatever session occupies the slot, charging it with `fees`, then
    /// puts the slot into maintenance.
    async fn start_maintenance_evicting(
        &self,
        slot_number: u32,
        exit_time: DateTime<Utc>,
        fees: FeeSchedule,
        retain: bool,
    ) -> Result<(Slot, Option<Release>)>;

    /// Active records ordered by slot number.
    async fn active_records(&self) -> Result<Vec<ParkingRecord>>;

    /// Closed records in the order they were closed.
    async fn completed_records(&self) -> Result<Vec<ParkingRecord>>;

    /// Slot, occupancy and revenue counts read from one consistent state.
    async fn statistics(&self) -> Result<Statistics>;
}

pub trait ConfigProvider: Send + Sync {
    fn capacity(&self) -> u32;
    fn hourly_rate(&self) -> u64;
    fn retain_history(&self) -> bool;
    fn maintenance_policy(&self) -> MaintenancePolicy;
}
