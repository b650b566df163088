use crate::adapters::store::state::{LotBook, LotState, RecordHistory};
use crate::core::fee::FeeSchedule;
use crate::domain::model::{ParkingRecord, Release, Slot, Statistics};
use crate::domain::ports::ParkingStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store backed by a JSON snapshot plus an append-only history file.
///
/// The snapshot holds slots and active sessions only. Mutations run against a
/// copy of it; the copy replaces the live state only after the snapshot was
/// written, so a failed write leaves both memory and disk at the previous
/// version. Closed sessions are appended as JSON lines to
/// `<snapshot>.history.jsonl` and never rewritten.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    history_path: PathBuf,
    book: RwLock<LotBook>,
}

impl JsonFileStore {
    /// 開啟快照檔與歷史檔，不存在時視為空停車場
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let history_path = path.with_extension("history.jsonl");

        let lot = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}, starting empty", path.display());
                LotState::default()
            }
            Err(e) => return Err(e.into()),
        };
        let history = Self::load_history(&history_path).await?;

        tracing::debug!(
            "Loaded {} closed records from {}",
            history.records().len(),
            history_path.display()
        );

        Ok(Self {
            path,
            history_path,
            book: RwLock::new(LotBook { lot, history }),
        })
    }

    async fn load_history(history_path: &Path) -> Result<RecordHistory> {
        let content = match tokio::fs::read_to_string(history_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RecordHistory::default()),
            Err(e) => return Err(e.into()),
        };

        let records = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<Vec<ParkingRecord>, _>>()?;

        Ok(RecordHistory::from_records(records))
    }

    async fn persist(&self, lot: &LotState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(lot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Snapshot written ({} bytes) to {}", data.len(), self.path.display());
        Ok(())
    }

    /// Runs `op` on a copy of the lot and swaps it in once the snapshot is on disk.
    async fn commit<T, F>(&self, lot: &mut LotState, op: F) -> Result<T>
    where
        F: FnOnce(&mut LotState) -> Result<T> + Send,
        T: Send,
    {
        let mut next = lot.clone();
        let value = op(&mut next)?;
        self.persist(&next).await?;
        *lot = next;
        Ok(value)
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut LotState) -> Result<T> + Send,
        T: Send,
    {
        let mut book = self.book.write().await;
        self.commit(&mut book.lot, op).await
    }

    async fn append_history(&self, record: &ParkingRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    /// 結案紀錄寫入歷史；快照已落地，寫檔失敗只記錄不回滾
    async fn archive(&self, book: &mut LotBook, closed: Option<&ParkingRecord>, retain: bool) {
        let Some(record) = closed.filter(|_| retain) else {
            return;
        };

        if let Err(e) = self.append_history(record).await {
            tracing::error!(
                "❌ Failed to append record {} to {}: {}",
                record.id,
                self.history_path.display(),
                e
            );
        }
        book.archive(Some(record), retain);
    }
}

#[async_trait]
impl ParkingStore for JsonFileStore {
    async fn seed_slots(&self, capacity: u32) -> Result<bool> {
        self.mutate(|lot| Ok(lot.seed(capacity))).await
    }

    async fn slots(&self) -> Result<Vec<Slot>> {
        Ok(self.book.read().await.lot.slots())
    }

    async fn allocate(
        &self,
        vehicle_number: &str,
        entry_time: DateTime<Utc>,
    ) -> Result<ParkingRecord> {
        self.mutate(|lot| lot.allocate(vehicle_number, entry_time))
            .await
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
        let closed = self
            .commit(&mut book.lot, |lot| {
                Ok(lot.close_record(record_id, exit_time, charged_amount))
            })
            .await?;

        self.archive(&mut book, closed.as_ref(), retain).await;
        Ok(closed)
    }

    async fn set_maintenance(&self, slot_number: u32, in_maintenance: bool) -> Result<Slot> {
        self.mutate(|lot| lot.set_maintenance(slot_number, in_maintenance))
            .await
    }

    async fn start_maintenance_evicting(
        &self,
        slot_number: u32,
        exit_time: DateTime<Utc>,
        fees: FeeSchedule,
        retain: bool,
    ) -> Result<(Slot, Option<Release>)> {
        let mut book = self.book.write().await;
        let (slot, release) = self
            .commit(&mut book.lot, |lot| {
                lot.evict_for_maintenance(slot_number, exit_time, fees)
            })
            .await?;

        self.archive(&mut book, release.as_ref().map(|r| &r.record), retain)
            .await;
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
