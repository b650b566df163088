use crate::core::fee::FeeSchedule;
use crate::domain::model::{Allocation, MaintenancePolicy, ParkingRecord, Release, Slot, Statistics};
use crate::domain::ports::{ConfigProvider, ParkingStore};
use crate::utils::error::{ParkingError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Parking rules on top of a [`ParkingStore`].
pub struct ParkingService {
    store: Arc<dyn ParkingStore>,
    fees: FeeSchedule,
    capacity: u32,
    retain_history: bool,
    maintenance_policy: MaintenancePolicy,
}

impl ParkingService {
    pub fn new<C: ConfigProvider + ?Sized>(store: Arc<dyn ParkingStore>, config: &C) -> Self {
        Self {
            store,
            fees: FeeSchedule::new(config.hourly_rate()),
            capacity: config.capacity(),
            retain_history: config.retain_history(),
            maintenance_policy: config.maintenance_policy(),
        }
    }

    /// 啟動時建立車位，已存在則略過
    pub async fn initialize(&self) -> Result<bool> {
        let seeded = self.store.seed_slots(self.capacity).await?;
        if seeded {
            tracing::info!("🅿️ Parking slots initialized successfully ({} slots)", self.capacity);
        } else {
            tracing::info!("🅿️ Parking slots already exist");
        }
        Ok(seeded)
    }

    pub async fn park(&self, vehicle_number: &str) -> Result<Allocation> {
        self.park_at(vehicle_number, Utc::now()).await
    }

    pub async fn park_at(&self, vehicle_number: &str, now: DateTime<Utc>) -> Result<Allocation> {
        let record = self.store.allocate(vehicle_number, now).await?;

        tracing::info!(
            "🚗 Vehicle {} parked in slot {} (record {})",
            record.vehicle_number,
            record.slot_number,
            record.id
        );

        Ok(Allocation { record })
    }

    pub async fn unpark(&self, vehicle_number: &str) -> Result<Release> {
        self.unpark_at(vehicle_number, Utc::now()).await
    }

    pub async fn unpark_at(&self, vehicle_number: &str, now: DateTime<Utc>) -> Result<Release> {
        let not_found = || ParkingError::VehicleNotFound {
            vehicle_number: vehicle_number.to_string(),
        };

        let record = self
            .store
            .active_record(vehicle_number)
            .await?
            .ok_or_else(not_found)?;

        let release = self.release(record, now).await?.ok_or_else(not_found)?;

        tracing::info!(
            "🚙 Vehicle {} left slot {} after {}h, fee {}",
            release.record.vehicle_number,
            release.record.slot_number,
            release.hours,
            release.parking_fee
        );

        Ok(release)
    }

    async fn release(&self, record: ParkingRecord, now: DateTime<Utc>) -> Result<Option<Release>> {
        let (hours, parking_fee) = self.fees.charge(record.entry_time, now);

        let closed = self
            .store
            .close_record(record.id, now, parking_fee, self.retain_history)
            .await?;

        Ok(closed.map(|record| Release {
            record,
            hours,
            parking_fee,
        }))
    }

    pub async fn start_maintenance(&self, slot_number: u32) -> Result<Vec<Slot>> {
        self.set_maintenance_at(slot_number, true, Utc::now()).await
    }

    pub async fn end_maintenance(&self, slot_number: u32) -> Result<Vec<Slot>> {
        self.set_maintenance_at(slot_number, false, Utc::now()).await
    }

    pub async fn set_maintenance_at(
        &self,
        slot_number: u32,
        in_maintenance: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Slot>> {
        let slot = if in_maintenance && self.maintenance_policy == MaintenancePolicy::Evict {
            let (slot, release) = self
                .store
                .start_maintenance_evicting(slot_number, now, self.fees, self.retain_history)
                .await?;
            if let Some(release) = release {
                tracing::warn!(
                    "🔧 Evicted vehicle {} from slot {} for maintenance, fee {}",
                    release.record.vehicle_number,
                    slot_number,
                    release.parking_fee
                );
            }
            slot
        } else {
            self.store.set_maintenance(slot_number, in_maintenance).await?
        };

        tracing::info!(
            "🔧 Parking slot {} is now {}",
            slot.slot_number,
            if slot.in_maintenance {
                "in maintenance"
            } else {
                "not in maintenance"
            }
        );

        self.store.slots().await
    }

    pub async fn slots(&self) -> Result<Vec<Slot>> {
        self.store.slots().await
    }

    /// Vehicles currently in the lot.
    pub async fn status(&self) -> Result<Vec<ParkingRecord>> {
        self.store.active_records().await
    }

    pub async fn history(&self) -> Result<Vec<ParkingRecord>> {
        self.store.completed_records().await
    }

    pub async fn statistics(&self) -> Result<Statistics> {
        let statistics = self.store.statistics().await?;
        tracing::debug!("📊 Total statistics: {:?}", statistics);
        Ok(statistics)
    }
}
