use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use roicalc_core::{SessionId, SubmissionId};
use roicalc_estimator::ProductLine;

use super::{BenchmarkStore, ResponseStore, StoreError};
use crate::records::{benchmark_key, Benchmark, CalculationRecord, ModuleResponseRecord};

/// In-memory backend for dev and tests. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    calculations: RwLock<Vec<CalculationRecord>>,
    responses: RwLock<Vec<ModuleResponseRecord>>,
    benchmarks: RwLock<HashMap<String, Benchmark>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::backend(operation, "lock poisoned")
}

#[async_trait::async_trait]
impl ResponseStore for InMemoryStore {
    async fn save_calculation(
        &self,
        record: CalculationRecord,
    ) -> Result<SubmissionId, StoreError> {
        let id = record.id;
        self.calculations
            .write()
            .map_err(|_| poisoned("save_calculation"))?
            .push(record);
        Ok(id)
    }

    async fn save_response(
        &self,
        record: ModuleResponseRecord,
    ) -> Result<SubmissionId, StoreError> {
        let id = record.id;
        self.responses
            .write()
            .map_err(|_| poisoned("save_response"))?
            .push(record);
        Ok(id)
    }

    async fn calculation_history(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<CalculationRecord>, StoreError> {
        let calculations = self
            .calculations
            .read()
            .map_err(|_| poisoned("calculation_history"))?;
        Ok(calculations
            .iter()
            .rev()
            .filter(|c| c.session_id == session_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn responses(&self) -> Result<Vec<ModuleResponseRecord>, StoreError> {
        Ok(self
            .responses
            .read()
            .map_err(|_| poisoned("responses"))?
            .clone())
    }
}

#[async_trait::async_trait]
impl BenchmarkStore for InMemoryStore {
    async fn get(
        &self,
        job_title: &str,
        module: ProductLine,
    ) -> Result<Option<Benchmark>, StoreError> {
        let map = self.benchmarks.read().map_err(|_| poisoned("get_benchmark"))?;
        Ok(map.get(&benchmark_key(job_title, module)).cloned())
    }

    async fn record(
        &self,
        job_title: &str,
        module: ProductLine,
        weekly_hours: f64,
        satisfaction: f64,
        confidence: f64,
    ) -> Result<Benchmark, StoreError> {
        let now = Utc::now();
        let mut map = self
            .benchmarks
            .write()
            .map_err(|_| poisoned("record_benchmark"))?;
        let entry = map
            .entry(benchmark_key(job_title, module))
            .and_modify(|b| b.fold(weekly_hours, now))
            .or_insert_with(|| {
                Benchmark::first(job_title, module, weekly_hours, satisfaction, confidence, now)
            });
        Ok(entry.clone())
    }
}
