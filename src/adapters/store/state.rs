use crate::core::fee::FeeSchedule;
use crate::domain::model::{ParkingRecord, Release, Slot, SlotStatus, Statistics};
use crate::utils::error::{ParkingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Live lot contents: slots plus the sessions currently parked.
///
/// Slots are keyed by number so iteration is always ascending, which is what
/// makes "lowest free slot" a plain `find`. Active sessions are keyed by
/// vehicle number; closed sessions leave this structure and go to
/// [`RecordHistory`], so the live state stays bounded by the lot capacity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LotState {
    slots: BTreeMap<u32, Slot>,
    #[serde(default)]
    active: HashMap<String, ParkingRecord>,
}

impl LotState {
    pub fn seed(&mut self, capacity: u32) -> bool {
        if !self.slots.is_empty() {
            return false;
        }

        for slot_number in 1..=capacity {
            self.slots.insert(slot_number, Slot::new(slot_number));
        }
        true
    }

    pub fn slots(&self) -> Vec<Slot> {
        self.slots.values().cloned().collect()
    }

    pub fn allocate(&mut self, vehicle_number: &str, entry_time: DateTime<Utc>) -> Result<ParkingRecord> {
        if self.active.contains_key(vehicle_number) {
            return Err(ParkingError::VehicleAlreadyParked {
                vehicle_number: vehicle_number.to_string(),
            });
        }

        let slot = self
            .slots
            .values_mut()
            .find(|slot| slot.is_available())
            .ok_or(ParkingError::NoSlotAvailable)?;

        slot.status = SlotStatus::Booked;
        let record = ParkingRecord::open(slot.slot_number, vehicle_number, entry_time);
        self.active.insert(record.vehicle_number.clone(), record.clone());

        Ok(record)
    }

    pub fn active_record(&self, vehicle_number: &str) -> Option<&ParkingRecord> {
        self.active.get(vehicle_number)
    }

    pub fn active_record_for_slot(&self, slot_number: u32) -> Option<&ParkingRecord> {
        self.active.values().find(|r| r.slot_number == slot_number)
    }

    /// Removes an active record, stamps exit time and amount, and empties its slot.
    pub fn close_record(
        &mut self,
        record_id: Uuid,
        exit_time: DateTime<Utc>,
        charged_amount: u64,
    ) -> Option<ParkingRecord> {
        let vehicle_number = self
            .active
            .values()
            .find(|r| r.id == record_id)
            .map(|r| r.vehicle_number.clone())?;

        let mut record = self.active.remove(&vehicle_number)?;
        record.exit_time = Some(exit_time);
        record.charged_amount = charged_amount;

        if let Some(slot) = self.slots.get_mut(&record.slot_number) {
            slot.status = SlotStatus::Empty;
        }

        Some(record)
    }

    pub fn set_maintenance(&mut self, slot_number: u32, in_maintenance: bool) -> Result<Slot> {
        let slot = self
            .slots
            .get_mut(&slot_number)
            .ok_or(ParkingError::SlotNotFound { slot_number })?;

        slot.in_maintenance = in_maintenance;
        Ok(slot.clone())
    }

    /// 進入維修並請走車位上的車，整個過程不可被其他寫入插隊
    pub fn evict_for_maintenance(
        &mut self,
        slot_number: u32,
        exit_time: DateTime<Utc>,
        fees: FeeSchedule,
    ) -> Result<(Slot, Option<Release>)> {
        if !self.slots.contains_key(&slot_number) {
            return Err(ParkingError::SlotNotFound { slot_number });
        }

        let occupant = self
            .active_record_for_slot(slot_number)
            .map(|r| (r.id, r.entry_time));

        let release = match occupant {
            Some((record_id, entry_time)) => {
                let (hours, parking_fee) = fees.charge(entry_time, exit_time);
                self.close_record(record_id, exit_time, parking_fee)
                    .map(|record| Release {
                        record,
                        hours,
                        parking_fee,
                    })
            }
            None => None,
        };

        let slot = self.set_maintenance(slot_number, true)?;
        Ok((slot, release))
    }

    /// Active sessions ordered by slot number.
    pub fn active_records(&self) -> Vec<ParkingRecord> {
        let mut records: Vec<ParkingRecord> = self.active.values().cloned().collect();
        records.sort_by_key(|r| r.slot_number);
        records
    }

    pub fn statistics(&self, history: &RecordHistory) -> Statistics {
        Statistics {
            total_slots: self.slots.len(),
            maintenance_slots: self.slots.values().filter(|s| s.in_maintenance).count(),
            total_parked_vehicles: self.active.len(),
            total_revenue: history.revenue(),
        }
    }
}

/// Closed sessions, append-only, with a running revenue total.
#[derive(Debug, Clone, Default)]
pub struct RecordHistory {
    records: Vec<ParkingRecord>,
    revenue: u64,
}

impl RecordHistory {
    pub fn from_records(records: Vec<ParkingRecord>) -> Self {
        let revenue = records.iter().map(|r| r.charged_amount).sum();
        Self { records, revenue }
    }

    pub fn push(&mut self, record: ParkingRecord) {
        self.revenue += record.charged_amount;
        self.records.push(record);
    }

    pub fn records(&self) -> &[ParkingRecord] {
        &self.records
    }

    pub fn revenue(&self) -> u64 {
        self.revenue
    }
}

/// Everything a store guards with one lock.
#[derive(Debug, Default)]
pub struct LotBook {
    pub lot: LotState,
    pub history: RecordHistory,
}

impl LotBook {
    pub fn archive(&mut self, closed: Option<&ParkingRecord>, retain: bool) {
        if let Some(record) = closed.filter(|_| retain) {
            self.history.push(record.clone());
        }
    }

    pub fn statistics(&self) -> Statistics {
        self.lot.statistics(&self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded(capacity: u32) -> LotState {
        let mut state = LotState::default();
        assert!(state.seed(capacity));
        state
    }

    #[test]
    fn test_seed_only_once() {
        let mut state = seeded(10);
        assert_eq!(state.slots().len(), 10);

        assert!(!state.seed(4));
        assert_eq!(state.slots().len(), 10);
    }

    #[test]
    fn test_allocate_takes_lowest_available_slot() {
        let mut state = seeded(3);
        state.allocate("A", Utc::now()).unwrap();

        let record = state.allocate("B", Utc::now()).unwrap();
        assert_eq!(record.slot_number, 2);
    }

    #[test]
    fn test_allocate_skips_maintenance_slots() {
        let mut state = seeded(3);
        state.set_maintenance(1, true).unwrap();

        let record = state.allocate("A", Utc::now()).unwrap();
        assert_eq!(record.slot_number, 2);
    }

    #[test]
    fn test_allocate_rejects_duplicate_vehicle() {
        let mut state = seeded(3);
        state.allocate("A", Utc::now()).unwrap();

        let err = state.allocate("A", Utc::now()).unwrap_err();
        assert!(matches!(err, ParkingError::VehicleAlreadyParked { .. }));
        assert_eq!(state.active_records().len(), 1);
    }

    #[test]
    fn test_allocate_fails_when_lot_is_full() {
        let mut state = seeded(2);
        state.allocate("A", Utc::now()).unwrap();
        state.set_maintenance(2, true).unwrap();

        let err = state.allocate("B", Utc::now()).unwrap_err();
        assert!(matches!(err, ParkingError::NoSlotAvailable));
    }

    #[test]
    fn test_close_record_is_guarded() {
        let mut state = seeded(2);
        let record = state.allocate("A", Utc::now()).unwrap();

        let closed = state.close_record(record.id, Utc::now(), 10).unwrap();
        assert_eq!(closed.charged_amount, 10);
        assert!(closed.exit_time.is_some());
        assert_eq!(state.slots()[0].status, SlotStatus::Empty);
        assert!(state.active_record("A").is_none());

        // 第二次關閉同一筆紀錄必須失敗
        assert!(state.close_record(record.id, Utc::now(), 10).is_none());
    }

    #[test]
    fn test_vehicle_can_park_again_after_close() {
        let mut state = seeded(2);
        let first = state.allocate("A", Utc::now()).unwrap();
        state.close_record(first.id, Utc::now(), 10).unwrap();

        let second = state.allocate("A", Utc::now()).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.slot_number, 1);
    }

    #[test]
    fn test_set_maintenance_unknown_slot() {
        let mut state = seeded(2);
        let err = state.set_maintenance(7, true).unwrap_err();
        assert!(matches!(err, ParkingError::SlotNotFound { slot_number: 7 }));
    }

    #[test]
    fn test_maintenance_keeps_booked_status() {
        let mut state = seeded(5);
        for vehicle in ["A", "B", "C", "D", "E"] {
            state.allocate(vehicle, Utc::now()).unwrap();
        }

        let slot = state.set_maintenance(5, true).unwrap();
        assert!(slot.in_maintenance);
        assert_eq!(slot.status, SlotStatus::Booked);
    }

    #[test]
    fn test_evict_for_maintenance_frees_and_flags_in_one_step() {
        let mut state = seeded(1);
        let entry = Utc::now();
        state.allocate("A", entry).unwrap();

        let (slot, release) = state
            .evict_for_maintenance(1, entry + Duration::minutes(61), FeeSchedule::default())
            .unwrap();
        let release = release.unwrap();

        assert!(slot.in_maintenance);
        assert_eq!(slot.status, SlotStatus::Empty);
        assert_eq!(release.record.vehicle_number, "A");
        assert_eq!(release.parking_fee, 20);

        // 維修中的車位不可再被分配
        let err = state.allocate("RACER", Utc::now()).unwrap_err();
        assert!(matches!(err, ParkingError::NoSlotAvailable));
    }

    #[test]
    fn test_evict_for_maintenance_on_empty_and_unknown_slots() {
        let mut state = seeded(2);

        let (slot, release) = state
            .evict_for_maintenance(2, Utc::now(), FeeSchedule::default())
            .unwrap();
        assert!(slot.in_maintenance);
        assert!(release.is_none());

        let err = state
            .evict_for_maintenance(9, Utc::now(), FeeSchedule::default())
            .unwrap_err();
        assert!(matches!(err, ParkingError::SlotNotFound { slot_number: 9 }));
    }

    #[test]
    fn test_book_statistics_from_one_snapshot() {
        let mut book = LotBook::default();
        book.lot.seed(4);
        let a = book.lot.allocate("A", Utc::now()).unwrap();
        book.lot.allocate("B", Utc::now()).unwrap();
        book.lot.set_maintenance(4, true).unwrap();

        let closed = book.lot.close_record(a.id, Utc::now(), 30);
        book.archive(closed.as_ref(), true);

        let stats = book.statistics();
        assert_eq!(stats.total_slots, 4);
        assert_eq!(stats.maintenance_slots, 1);
        assert_eq!(stats.total_parked_vehicles, 1);
        assert_eq!(stats.total_revenue, 30);
        assert_eq!(book.history.records().len(), 1);
    }

    #[test]
    fn test_archive_skipped_without_retention() {
        let mut book = LotBook::default();
        book.lot.seed(1);
        let a = book.lot.allocate("A", Utc::now()).unwrap();

        let closed = book.lot.close_record(a.id, Utc::now(), 30);
        book.archive(closed.as_ref(), false);

        assert_eq!(book.statistics().total_revenue, 0);
        assert!(book.history.records().is_empty());
    }

    #[test]
    fn test_history_revenue_from_loaded_records() {
        let mut record = ParkingRecord::open(1, "A", Utc::now());
        record.exit_time = Some(Utc::now());
        record.charged_amount = 40;

        let history = RecordHistory::from_records(vec![record]);
        assert_eq!(history.revenue(), 40);
    }
}
