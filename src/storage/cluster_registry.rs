use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use crate::common::cluster::ServerRecord;
use crate::common::error::CoordinatorError;

/// Per-cluster append-only record history. Cluster ids are 1-based:
/// cluster `n` lives in slot `n - 1`.
#[derive(Debug)]
pub struct ClusterSlots {
    slots: Vec<Vec<ServerRecord>>,
}

impl ClusterSlots {
    pub fn new(cluster_count: usize) -> Self {
        Self {
            slots: vec![Vec::new(); cluster_count],
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.slots.len()
    }

    fn slot_index(&self, cluster_id: i32) -> Result<usize, CoordinatorError> {
        if cluster_id >= 1 && (cluster_id as usize) <= self.slots.len() {
            Ok(cluster_id as usize - 1)
        } else {
            Err(CoordinatorError::ClusterOutOfRange {
                cluster_id,
                cluster_count: self.slots.len(),
            })
        }
    }

    pub fn register(&mut self, cluster_id: i32, record: ServerRecord) -> Result<(), CoordinatorError> {
        let idx = self.slot_index(cluster_id)?;
        self.slots[idx].push(record);
        Ok(())
    }

    /// Returns `false` when the slot has no record to refresh.
    pub fn refresh_last(&mut self, cluster_id: i32, now: DateTime<Utc>) -> Result<bool, CoordinatorError> {
        let idx = self.slot_index(cluster_id)?;
        match self.slots[idx].last_mut() {
            Some(record) => {
                record.last_heartbeat_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn last_of(&self, cluster_id: i32) -> Result<Option<&ServerRecord>, CoordinatorError> {
        let idx = self.slot_index(cluster_id)?;
        Ok(self.slots[idx].last())
    }

    pub fn history(&self, cluster_id: i32) -> Result<&[ServerRecord], CoordinatorError> {
        let idx = self.slot_index(cluster_id)?;
        Ok(&self.slots[idx])
    }

    /// Every record of every cluster, history included.
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ServerRecord> {
        self.slots.iter_mut().flat_map(|slot| slot.iter_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[ServerRecord])> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| (idx as i32 + 1, slot.as_slice()))
    }
}

/// The coordinator's membership table. One lock covers every cluster.
#[derive(Debug)]
pub struct ClusterRegistry {
    slots: Mutex<ClusterSlots>,
    cluster_count: usize,
}

impl ClusterRegistry {
    pub fn new(cluster_count: usize) -> Self {
        Self {
            slots: Mutex::new(ClusterSlots::new(cluster_count)),
            cluster_count,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Locks all clusters. Hold the guard only for in-memory work.
    pub async fn lock(&self) -> MutexGuard<'_, ClusterSlots> {
        self.slots.lock().await
    }

    pub async fn register(&self, cluster_id: i32, record: ServerRecord) -> Result<(), CoordinatorError> {
        self.lock().await.register(cluster_id, record)
    }

    pub async fn refresh_last(&self, cluster_id: i32, now: DateTime<Utc>) -> Result<bool, CoordinatorError> {
        self.lock().await.refresh_last(cluster_id, now)
    }

    pub async fn last_of(&self, cluster_id: i32) -> Result<Option<ServerRecord>, CoordinatorError> {
        Ok(self.lock().await.last_of(cluster_id)?.cloned())
    }

    pub async fn snapshot(&self) -> Vec<(i32, Vec<ServerRecord>)> {
        self.lock()
            .await
            .iter()
            .map(|(cluster_id, records)| (cluster_id, records.to_vec()))
            .collect()
    }
}
