use crate::adapters::store::state::LotBook;
use crate::core::fee::FeeSchedule;
use crate::domain::model::{ParkingRecord, Release, Slot, Statistics};
use crate::domain::ports::ParkingStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryStore {
    book: RwLock<LotBook>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParkingStore for MemoryStore {
    async fn seed_slots(&self, capacity: u32) -> Result<bool> {
        Ok(self.book.write().await.lot.seed(capacity))
    }

    async fn slots(&self) -> Result<Vec<Slot>> {
        Ok(self.book.read().await.lot.slots())
    }

    async fn allocate(
        &self,
        vehicle_number: &str,
        entry_time: DateTime<Utc>,
    ) -> Result<ParkingRecord> {
        self.book.write().await.lot.allocate(vehicle_number, entry_time)
    }

    async fn active_record(&self, vehicle_number: &str) -> Result<Option<ParkingRecord>> {
        Ok(self.book.read().await.lot.active_record(vehicle_number).cloned())
    }

    async fn active_record_for_slot(&self, slot_number: u32) -> Result<Option<ParkingRecord>> {
        Ok(self
            .book
            .read()
            .await
            .lot
            .active_record_for_slot(slot_number)
            .cloned())
    }

    async fn close_record(
        &self,
        record_id: Uuid,
        exit_time: DateTime<Utc>,
        charged_amount: u64,
        retain: bool,
    ) -> Result<Option<ParkingRecord>> {
        let mut book = self.book.write().await;
        let closed = book.lot.close_record(record_id, exit_time, charged_amount);
        book.archive(closed.as_ref(), retain);
        Ok(closed)
    }

    async fn set_maintenance(&self, slot_number: u32, in_maintenance: bool) -> Result<Slot> {
        self.book
            .write()
            .await
            .lot
            .set_maintenance(slot_number, in_maintenance)
    }

    async fn start_maintenance_evicting(
        &self,
        slot_number: u32,
        exit_time: DateTime<Utc>,
        fees: FeeSchedule,
        retain: bool,
    ) -> Result<(Slot, Option<Release>)> {
        let mut book = self.book.write().await;
        let (slot, release) = book.lot.evict_for_maintenance(slot_number, exit_time, fees)?;
        book.archive(release.as_ref().map(|r| &r.record), retain);
        Ok((slot, release))
    }

    async fn active_records(&self) -> Result<Vec<ParkingRecord>> {
        Ok(self.book.read().await.lot.active_records())
    }

    async fn completed_records(&self) -> Result<Vec<ParkingRecord>> {
        Ok(self.book.read().await.history.records().to_vec())
    }

    async fn statistics(&self) -> Result<Statistics> {
        Ok(self.book.read().await.statistics())
    }
}
