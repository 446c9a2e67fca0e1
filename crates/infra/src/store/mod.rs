//! Storage abstractions for calculations, survey responses and benchmarks.
//!
//! Both traits are async (Postgres is a network hop away). Every backend is
//! `Send + Sync` and shared behind an `Arc`.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

use std::sync::Arc;

use roicalc_core::{SessionId, SubmissionId};
use roicalc_estimator::ProductLine;

use crate::records::{Benchmark, CalculationRecord, ModuleResponseRecord};

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the statement.
    #[error("storage error in {operation}: {message}")]
    Backend { operation: &'static str, message: String },
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Append-only store of wizard calculations and per-line responses.
#[async_trait::async_trait]
pub trait ResponseStore: Send + Sync {
    async fn save_calculation(&self, record: CalculationRecord) -> Result<SubmissionId, StoreError>;

    async fn save_response(&self, record: ModuleResponseRecord) -> Result<SubmissionId, StoreError>;

    /// Most recent first.
    async fn calculation_history(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<CalculationRecord>, StoreError>;

    /// Every stored response, oldest first.
    async fn responses(&self) -> Result<Vec<ModuleResponseRecord>, StoreError>;
}

/// Rolling peer statistics keyed by `(job title, product line)`.
#[async_trait::async_trait]
pub trait BenchmarkStore: Send + Sync {
    async fn get(
        &self,
        job_title: &str,
        module: ProductLine,
    ) -> Result<Option<Benchmark>, StoreError>;

    /// Create the entry or fold `weekly_hours` into its rolling average.
    async fn record(
        &self,
        job_title: &str,
        module: ProductLine,
        weekly_hours: f64,
        satisfaction: f64,
        confidence: f64,
    ) -> Result<Benchmark, StoreError>;
}

#[async_trait::async_trait]
impl<S> ResponseStore for Arc<S>
where
    S: ResponseStore + ?Sized,
{
    async fn save_calculation(
        &self,
        record: CalculationRecord,
    ) -> Result<SubmissionId, StoreError> {
        (**self).save_calculation(record).await
    }

    async fn save_response(
        &self,
        record: ModuleResponseRecord,
    ) -> Result<SubmissionId, StoreError> {
        (**self).save_response(record).await
    }

    async fn calculation_history(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<CalculationRecord>, StoreError> {
        (**self).calculation_history(session_id, limit).await
    }

    async fn responses(&self) -> Result<Vec<ModuleResponseRecord>, StoreError> {
        (**self).responses().await
    }
}

#[async_trait::async_trait]
impl<S> BenchmarkStore for Arc<S>
where
    S: BenchmarkStore + ?Sized,
{
    async fn get(
        &self,
        job_title: &str,
        module: ProductLine,
    ) -> Result<Option<Benchmark>, StoreError> {
        (**self).get(job_title, module).await
    }

    async fn record(
        &self,
        job_title: &str,
        module: ProductLine,
        weekly_hours: f64,
        satisfaction: f64,
        confidence: f64,
    ) -> Result<Benchmark, StoreError> {
        (**self).record(job_title, module, weekly_hours, satisfaction, confidence).await
    }
}
