//! Postgres backend.
//!
//! Structured parts of a record (company profile, inputs, results, answers)
//! are stored as JSONB; everything queried on gets its own column.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database | `Backend` with the database message |
//! | PoolClosed / PoolTimedOut / Io / Tls | `Backend` |
//! | ColumnDecode / Decode / ColumnNotFound | `Serialization` |
//! | Other | `Backend` |

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use roicalc_core::{SessionId, SubmissionId};
use roicalc_estimator::{ProductLine, ProductLineInput, TotalResult};
use roicalc_wizard::CompanyProfile;

use super::{BenchmarkStore, ResponseStore, StoreError};
use crate::records::{
    benchmark_key, Benchmark, CalculationRecord, ModuleResponseRecord, SurveyResponses,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS roi_calculations (
    id UUID PRIMARY KEY,
    session_id UUID NOT NULL,
    company_info JSONB NOT NULL,
    selected_modules JSONB NOT NULL,
    module_data JSONB NOT NULL,
    results JSONB NOT NULL,
    calculated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS roi_calculations_session_idx
    ON roi_calculations (session_id, calculated_at DESC);

CREATE TABLE IF NOT EXISTS questionnaire_responses (
    id UUID PRIMARY KEY,
    module_id TEXT NOT NULL,
    session_id UUID,
    responses JSONB NOT NULL,
    estimated_hours_saved DOUBLE PRECISION NOT NULL,
    estimated_cost_saved DOUBLE PRECISION NOT NULL,
    confidence_score DOUBLE PRECISION,
    submitted_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS job_role_benchmarks (
    benchmark_key TEXT PRIMARY KEY,
    job_title TEXT NOT NULL,
    module_id TEXT NOT NULL,
    avg_hours_saved_weekly DOUBLE PRECISION NOT NULL,
    median_satisfaction_score DOUBLE PRECISION NOT NULL,
    response_count BIGINT NOT NULL,
    confidence DOUBLE PRECISION NOT NULL,
    last_updated TIMESTAMPTZ NOT NULL
);
"#;

/// Postgres-backed response and benchmark store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clones share the pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they do not exist yet. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::backend(operation, db_err.message().to_string())
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Serialization(format!("{operation}: {err}"))
        }
        other => StoreError::backend(operation, other.to_string()),
    }
}

fn parse_line(raw: &str) -> Result<ProductLine, StoreError> {
    ProductLine::from_str(raw).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn calculation_from_row(row: &PgRow) -> Result<CalculationRecord, sqlx::Error> {
    let id: uuid::Uuid = row.try_get("id")?;
    let session_id: uuid::Uuid = row.try_get("session_id")?;
    let Json(company_info): Json<CompanyProfile> = row.try_get("company_info")?;
    let Json(selected_modules): Json<Vec<ProductLine>> = row.try_get("selected_modules")?;
    let Json(module_data): Json<Vec<ProductLineInput>> = row.try_get("module_data")?;
    let Json(results): Json<TotalResult> = row.try_get("results")?;
    let calculated_at: DateTime<Utc> = row.try_get("calculated_at")?;

    Ok(CalculationRecord {
        id: SubmissionId::from_uuid(id),
        session_id: SessionId::from_uuid(session_id),
        company_info,
        selected_modules,
        module_data,
        results,
        calculated_at,
    })
}

fn response_from_row(row: &PgRow) -> Result<ModuleResponseRecord, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("responses", e);
    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let module_id: String = row.try_get("module_id").map_err(decode)?;
    let session_id: Option<uuid::Uuid> = row.try_get("session_id").map_err(decode)?;
    let Json(responses): Json<SurveyResponses> = row.try_get("responses").map_err(decode)?;

    Ok(ModuleResponseRecord {
        id: SubmissionId::from_uuid(id),
        module_id: parse_line(&module_id)?,
        session_id: session_id.map(SessionId::from_uuid),
        responses,
        estimated_hours_saved: row.try_get("estimated_hours_saved").map_err(decode)?,
        estimated_cost_saved: row.try_get("estimated_cost_saved").map_err(decode)?,
        confidence_score: row.try_get("confidence_score").map_err(decode)?,
        submitted_at: row.try_get("submitted_at").map_err(decode)?,
    })
}

fn benchmark_from_row(row: &PgRow) -> Result<Benchmark, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("benchmark", e);
    let module_id: String = row.try_get("module_id").map_err(decode)?;
    let response_count: i64 = row.try_get("response_count").map_err(decode)?;

    Ok(Benchmark {
        job_title: row.try_get("job_title").map_err(decode)?,
        module_id: parse_line(&module_id)?,
        avg_hours_saved_weekly: row.try_get("avg_hours_saved_weekly").map_err(decode)?,
        median_satisfaction_score: row.try_get("median_satisfaction_score").map_err(decode)?,
        response_count: response_count.max(0) as u64,
        confidence: row.try_get("confidence").map_err(decode)?,
        last_updated: row.try_get("last_updated").map_err(decode)?,
    })
}

#[async_trait::async_trait]
impl ResponseStore for PostgresStore {
    #[instrument(skip(self, record), fields(session_id = %record.session_id), err)]
    async fn save_calculation(
        &self,
        record: CalculationRecord,
    ) -> Result<SubmissionId, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO roi_calculations (
                id, session_id, company_info, selected_modules, module_data, results, calculated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.session_id.as_uuid())
        .bind(Json(&record.company_info))
        .bind(Json(&record.selected_modules))
        .bind(Json(&record.module_data))
        .bind(Json(&record.results))
        .bind(record.calculated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_calculation", e))?;

        Ok(record.id)
    }

    #[instrument(skip(self, record), fields(module_id = %record.module_id), err)]
    async fn save_response(
        &self,
        record: ModuleResponseRecord,
    ) -> Result<SubmissionId, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO questionnaire_responses (
                id, module_id, session_id, responses,
                estimated_hours_saved, estimated_cost_saved, confidence_score, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.module_id.as_str())
        .bind(record.session_id.map(uuid::Uuid::from))
        .bind(Json(&record.responses))
        .bind(record.estimated_hours_saved)
        .bind(record.estimated_cost_saved)
        .bind(record.confidence_score)
        .bind(record.submitted_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_response", e))?;

        Ok(record.id)
    }

    async fn calculation_history(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<CalculationRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, company_info, selected_modules, module_data, results,
                   calculated_at
            FROM roi_calculations
            WHERE session_id = $1
            ORDER BY calculated_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("calculation_history", e))?;

        rows.iter()
            .map(|row| {
                calculation_from_row(row).map_err(|e| map_sqlx_error("calculation_history", e))
            })
            .collect()
    }

    async fn responses(&self) -> Result<Vec<ModuleResponseRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, module_id, session_id, responses,
                   estimated_hours_saved, estimated_cost_saved, confidence_score, submitted_at
            FROM questionnaire_responses
            ORDER BY submitted_at ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("responses", e))?;

        rows.iter().map(response_from_row).collect()
    }
}

#[async_trait::async_trait]
impl BenchmarkStore for PostgresStore {
    async fn get(
        &self,
        job_title: &str,
        module: ProductLine,
    ) -> Result<Option<Benchmark>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT job_title, module_id, avg_hours_saved_weekly, median_satisfaction_score,
                   response_count, confidence, last_updated
            FROM job_role_benchmarks
            WHERE benchmark_key = $1
            "#,
        )
        .bind(benchmark_key(job_title, module))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_benchmark", e))?;

        row.as_ref().map(benchmark_from_row).transpose()
    }

    /// The rolling average is folded inside the upsert so concurrent writers
    /// cannot lose an update.
    #[instrument(skip(self), err)]
    async fn record(
        &self,
        job_title: &str,
        module: ProductLine,
        weekly_hours: f64,
        satisfaction: f64,
        confidence: f64,
    ) -> Result<Benchmark, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO job_role_benchmarks (
                benchmark_key, job_title, module_id, avg_hours_saved_weekly,
                median_satisfaction_score, response_count, confidence, last_updated
            )
            VALUES ($1, $2, $3, $4, $5, 1, $6, $7)
            ON CONFLICT (benchmark_key) DO UPDATE SET
                avg_hours_saved_weekly = ROUND((
                    (job_role_benchmarks.avg_hours_saved_weekly * job_role_benchmarks.response_count
                        + EXCLUDED.avg_hours_saved_weekly)
                    / (job_role_benchmarks.response_count + 1)
                )::numeric)::double precision,
                response_count = job_role_benchmarks.response_count + 1,
                last_updated = EXCLUDED.last_updated
            RETURNING job_title, module_id, avg_hours_saved_weekly, median_satisfaction_score,
                      response_count, confidence, last_updated
            "#,
        )
        .bind(benchmark_key(job_title, module))
        .bind(job_title.trim())
        .bind(module.as_str())
        .bind(weekly_hours)
        .bind(satisfaction)
        .bind(confidence)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("record_benchmark", e))?;

        benchmark_from_row(&row)
    }
}
