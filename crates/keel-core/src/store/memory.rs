//! In-memory store for tests and single-run analyses.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{StorageError, StorageResult};
use crate::models::{
    BayesianConfidence, FeedbackLoop, FeedbackLoopFilter, SccRecord, StabilityMetrics,
};
use crate::traits::AnalysisStore;
use crate::types::collections::{BTreeMap, FxHashMap};

type EntityKey = (String, String);

fn key(entity_id: &str, entity_type: &str) -> EntityKey {
    (entity_id.to_string(), entity_type.to_string())
}

/// `RwLock`-guarded maps. Nothing is durable.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisStore {
    scc: RwLock<FxHashMap<EntityKey, SccRecord>>,
    confidence: RwLock<FxHashMap<EntityKey, BayesianConfidence>>,
    stability: RwLock<FxHashMap<EntityKey, StabilityMetrics>>,
    loops: RwLock<BTreeMap<String, FeedbackLoop>>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored confidence records.
    pub fn confidence_count(&self) -> StorageResult<usize> {
        Ok(read(&self.confidence, "confidence")?.len())
    }

    /// Number of stored SCC membership records.
    pub fn scc_count(&self) -> StorageResult<usize> {
        Ok(read(&self.scc, "scc")?.len())
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, resource: &str) -> StorageResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| StorageError::LockPoisoned {
        resource: resource.to_string(),
    })
}

fn write<'a, T>(lock: &'a RwLock<T>, resource: &str) -> StorageResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| StorageError::LockPoisoned {
        resource: resource.to_string(),
    })
}

impl AnalysisStore for InMemoryAnalysisStore {
    fn get_scc_by_entity(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> StorageResult<Option<SccRecord>> {
        Ok(read(&self.scc, "scc")?.get(&key(entity_id, entity_type)).cloned())
    }

    fn store_scc_records(&self, records: &[SccRecord]) -> StorageResult<()> {
        let mut scc = write(&self.scc, "scc")?;
        for record in records {
            scc.insert(key(&record.entity_id, &record.entity_type), record.clone());
        }
        Ok(())
    }

    fn get_bayesian_confidence(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> StorageResult<Option<BayesianConfidence>> {
        Ok(read(&self.confidence, "confidence")?
            .get(&key(entity_id, entity_type))
            .cloned())
    }

    fn upsert_bayesian_confidence(&self, record: &BayesianConfidence) -> StorageResult<()> {
        write(&self.confidence, "confidence")?
            .insert(key(&record.entity_id, &record.entity_type), record.clone());
        Ok(())
    }

    fn get_stability_metrics(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> StorageResult<Option<StabilityMetrics>> {
        Ok(read(&self.stability, "stability")?
            .get(&key(entity_id, entity_type))
            .cloned())
    }

    fn upsert_stability_metrics(&self, metrics: &StabilityMetrics) -> StorageResult<()> {
        write(&self.stability, "stability")?
            .insert(key(&metrics.entity_id, &metrics.entity_type), metrics.clone());
        Ok(())
    }

    fn get_feedback_loops(&self, filter: &FeedbackLoopFilter) -> StorageResult<Vec<FeedbackLoop>> {
        Ok(read(&self.loops, "feedback_loops")?
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }

    fn store_feedback_loops(&self, loops: &[FeedbackLoop]) -> StorageResult<()> {
        let mut stored = write(&self.loops, "feedback_loops")?;
        for feedback_loop in loops {
            let mut record = feedback_loop.clone();
            if let Some(previous) = stored.get(&record.id) {
                record.resolved = record.resolved || previous.resolved;
            }
            stored.insert(record.id.clone(), record);
        }
        Ok(())
    }

    fn resolve_feedback_loop(&self, loop_id: &str) -> StorageResult<()> {
        let mut stored = write(&self.loops, "feedback_loops")?;
        match stored.get_mut(loop_id) {
            Some(feedback_loop) => {
                feedback_loop.resolved = true;
                Ok(())
            }
            None => Err(StorageError::NotFound {
                kind: "feedback_loop".to_string(),
                id: loop_id.to_string(),
            }),
        }
    }
}
