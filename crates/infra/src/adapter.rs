//! Persistence/reporting adapter.
//!
//! The wizard hands its finished result here. Writes go to the configured
//! [`ResponseStore`]; failures come back as `Result` from the `try_*` methods,
//! and the plain methods log them at `warn` and discard them so a visitor
//! always sees their numbers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use roicalc_core::{SessionId, SubmissionId};
use roicalc_estimator::{
    AssessmentResponses, PersonalEstimate, ProductLine, ProductLineInput, TotalResult,
};
use roicalc_wizard::{CompanyProfile, WizardState};

use crate::records::{Benchmark, CalculationRecord, ModuleResponseRecord, SurveyResponses};
use crate::stats::CommunityStats;
use crate::store::{BenchmarkStore, InMemoryStore, ResponseStore, StoreError};

/// Satisfaction recorded for a new benchmark when the visitor skipped the question.
pub const DEFAULT_SATISFACTION: f64 = 7.0;

#[derive(Clone)]
pub struct ReportingAdapter {
    responses: Arc<dyn ResponseStore>,
    benchmarks: Arc<dyn BenchmarkStore>,
}

impl core::fmt::Debug for ReportingAdapter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReportingAdapter").finish_non_exhaustive()
    }
}

impl ReportingAdapter {
    pub fn new(responses: Arc<dyn ResponseStore>, benchmarks: Arc<dyn BenchmarkStore>) -> Self {
        Self {
            responses,
            benchmarks,
        }
    }

    /// One backend serving both traits.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: ResponseStore + BenchmarkStore + 'static,
    {
        Self::new(store.clone(), store)
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    /// Store the calculation, then one response record per product line.
    ///
    /// Returns the calculation's id. A failed per-line write is logged and does
    /// not fail the call; the calculation write is the one that counts.
    pub async fn try_submit(
        &self,
        session_id: SessionId,
        company: &CompanyProfile,
        selection: &[ProductLine],
        inputs: &[ProductLineInput],
        total: &TotalResult,
    ) -> Result<SubmissionId, StoreError> {
        let calculated_at = Utc::now();
        let record = CalculationRecord {
            id: SubmissionId::new(),
            session_id,
            company_info: company.clone(),
            selected_modules: selection.to_vec(),
            module_data: inputs.to_vec(),
            results: total.clone(),
            calculated_at,
        };
        let id = self.responses.save_calculation(record).await?;

        for result in &total.products {
            let Some(input) = inputs.iter().find(|i| i.line() == result.product) else {
                continue;
            };
            let response = ModuleResponseRecord {
                id: SubmissionId::new(),
                module_id: result.product,
                session_id: Some(session_id),
                responses: SurveyResponses::Calculator(input.clone()),
                estimated_hours_saved: result.time_saved_hours,
                estimated_cost_saved: result.cost_saved,
                confidence_score: None,
                submitted_at: calculated_at,
            };
            if let Err(err) = self.responses.save_response(response).await {
                warn!(
                    operation = "save_response",
                    product = %result.product,
                    error = %err,
                    "response write failed"
                );
            }
        }

        info!(
            %session_id,
            submission_id = %id,
            products = total.products.len(),
            "calculation stored"
        );
        Ok(id)
    }

    /// [`ReportingAdapter::try_submit`] with the error logged and dropped.
    pub async fn submit(
        &self,
        session_id: SessionId,
        company: &CompanyProfile,
        selection: &[ProductLine],
        inputs: &[ProductLineInput],
        total: &TotalResult,
    ) -> Option<SubmissionId> {
        self.try_submit(session_id, company, selection, inputs, total)
            .await
            .map_err(|err| {
                warn!(operation = "submit", %session_id, error = %err, "calculation not stored")
            })
            .ok()
    }

    /// Submit a wizard that reached `Results`; `None` if it has not.
    pub async fn submit_wizard(
        &self,
        session_id: SessionId,
        state: &WizardState,
    ) -> Option<SubmissionId> {
        let total = state.result()?;
        let inputs: Vec<ProductLineInput> = state.inputs().into_iter().cloned().collect();
        let company = state.company().cloned().unwrap_or_default();
        self.submit(session_id, &company, state.selection(), &inputs, total)
            .await
    }

    pub async fn try_fetch_benchmark(
        &self,
        job_title: &str,
        module: ProductLine,
    ) -> Result<Option<Benchmark>, StoreError> {
        self.benchmarks.get(job_title, module).await
    }

    /// Peer benchmark, or `None` when unknown or the store failed (logged).
    pub async fn fetch_benchmark(&self, job_title: &str, module: ProductLine) -> Option<Benchmark> {
        match self.try_fetch_benchmark(job_title, module).await {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    operation = "fetch_benchmark",
                    product = %module,
                    error = %err,
                    "benchmark unavailable"
                );
                None
            }
        }
    }

    /// Store a quick-assessment response and fold it into the peer benchmark.
    pub async fn try_record_assessment(
        &self,
        session_id: Option<SessionId>,
        module: ProductLine,
        responses: &AssessmentResponses,
        estimate: &PersonalEstimate,
    ) -> Result<SubmissionId, StoreError> {
        let record = ModuleResponseRecord::from_assessment(
            module,
            session_id,
            responses.clone(),
            estimate,
            Utc::now(),
        );
        let id = self.responses.save_response(record).await?;

        let benchmark = self
            .benchmarks
            .record(
                &responses.job_title,
                module,
                estimate.weekly_hours_saved,
                responses.willingness_to_adopt.unwrap_or(DEFAULT_SATISFACTION),
                estimate.confidence_score,
            )
            .await?;
        debug!(
            product = %module,
            response_count = benchmark.response_count,
            avg_hours_saved_weekly = benchmark.avg_hours_saved_weekly,
            "benchmark updated"
        );
        Ok(id)
    }

    pub async fn record_assessment(
        &self,
        session_id: Option<SessionId>,
        module: ProductLine,
        responses: &AssessmentResponses,
        estimate: &PersonalEstimate,
    ) -> Option<SubmissionId> {
        self.try_record_assessment(session_id, module, responses, estimate)
            .await
            .map_err(|err| {
                warn!(
                    operation = "record_assessment",
                    product = %module,
                    error = %err,
                    "assessment not stored"
                )
            })
            .ok()
    }

    /// Most recent quick-assessment responses for `module` from people with the
    /// same job title (case-insensitive), newest first.
    pub async fn try_similar_responses(
        &self,
        job_title: &str,
        module: ProductLine,
        limit: usize,
    ) -> Result<Vec<ModuleResponseRecord>, StoreError> {
        let wanted = job_title.trim();
        let mut peers: Vec<ModuleResponseRecord> = self
            .responses
            .responses()
            .await?
            .into_iter()
            .filter(|r| r.module_id == module)
            .filter(|r| match &r.responses {
                SurveyResponses::Assessment(a) => a.job_title.trim().eq_ignore_ascii_case(wanted),
                SurveyResponses::Calculator(_) => false,
            })
            .collect();
        peers.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        peers.truncate(limit);
        Ok(peers)
    }

    /// Peer responses, or none when the store failed (logged).
    pub async fn similar_responses(
        &self,
        job_title: &str,
        module: ProductLine,
        limit: usize,
    ) -> Vec<ModuleResponseRecord> {
        self.try_similar_responses(job_title, module, limit)
            .await
            .unwrap_or_else(|err| {
                warn!(
                    operation = "similar_responses",
                    product = %module,
                    error = %err,
                    "peer responses unavailable"
                );
                Vec::new()
            })
    }

    pub async fn history(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<CalculationRecord>, StoreError> {
        self.responses.calculation_history(session_id, limit).await
    }

    /// Statistics over every stored response; empty when the store fails (logged).
    pub async fn community_stats(&self, now: DateTime<Utc>) -> CommunityStats {
        match self.responses.responses().await {
            Ok(responses) => CommunityStats::compute(&responses, now),
            Err(err) => {
                warn!(operation = "community_stats", error = %err, "stats unavailable");
                CommunityStats::empty(now)
            }
        }
    }
}
