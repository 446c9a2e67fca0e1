//! Shapes written to and read from the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use roicalc_core::{SessionId, SubmissionId};
use roicalc_estimator::{
    AssessmentResponses, PersonalEstimate, ProductLine, ProductLineInput, TotalResult,
};
use roicalc_wizard::CompanyProfile;

/// One finished wizard run: the aggregate write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: SubmissionId,
    pub session_id: SessionId,
    pub company_info: CompanyProfile,
    pub selected_modules: Vec<ProductLine>,
    /// In selection order.
    pub module_data: Vec<ProductLineInput>,
    pub results: TotalResult,
    pub calculated_at: DateTime<Utc>,
}

/// Answers behind a [`ModuleResponseRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "answers", rename_all = "snake_case")]
pub enum SurveyResponses {
    /// A survey step of the calculator wizard.
    Calculator(ProductLineInput),
    /// The per-person quick assessment.
    Assessment(AssessmentResponses),
}

/// Per product line write, appended once per line on wizard completion and
/// once per quick assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleResponseRecord {
    pub id: SubmissionId,
    pub module_id: ProductLine,
    pub session_id: Option<SessionId>,
    pub responses: SurveyResponses,
    pub estimated_hours_saved: f64,
    pub estimated_cost_saved: f64,
    /// Only quick assessments carry a confidence.
    pub confidence_score: Option<f64>,
    pub submitted_at: DateTime<Utc>,
}

impl ModuleResponseRecord {
    pub fn from_assessment(
        module_id: ProductLine,
        session_id: Option<SessionId>,
        responses: AssessmentResponses,
        estimate: &PersonalEstimate,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SubmissionId::new(),
            module_id,
            session_id,
            responses: SurveyResponses::Assessment(responses),
            estimated_hours_saved: estimate.estimated_hours_saved,
            estimated_cost_saved: estimate.cost_saved,
            confidence_score: Some(estimate.confidence_score),
            submitted_at,
        }
    }
}

/// Peer statistics for one (job title, product line) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub job_title: String,
    pub module_id: ProductLine,
    pub avg_hours_saved_weekly: f64,
    pub median_satisfaction_score: f64,
    pub response_count: u64,
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

/// Storage key: `"{job_title}_{module}"`, whitespace runs → `_`, lowercase.
pub fn benchmark_key(job_title: &str, module: ProductLine) -> String {
    let raw = format!("{}_{}", job_title.trim(), module.as_str());
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

impl Benchmark {
    pub fn first(
        job_title: &str,
        module_id: ProductLine,
        weekly_hours: f64,
        satisfaction: f64,
        confidence: f64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_title: job_title.trim().to_string(),
            module_id,
            avg_hours_saved_weekly: weekly_hours,
            median_satisfaction_score: satisfaction,
            response_count: 1,
            confidence,
            last_updated: at,
        }
    }

    /// Fold one more response into the rolling average (rounded to whole hours).
    ///
    /// The satisfaction and confidence of the first response are kept.
    pub fn fold(&mut self, weekly_hours: f64, at: DateTime<Utc>) {
        let count = self.response_count + 1;
        let total = self.avg_hours_saved_weekly * self.response_count as f64 + weekly_hours;
        self.avg_hours_saved_weekly = (total / count as f64).round();
        self.response_count = count;
        self.last_updated = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_normalisation() {
        assert_eq!(
            benchmark_key("Senior  Software\tEngineer", ProductLine::CodeAssist),
            "senior_software_engineer_code-assist"
        );
        assert_eq!(benchmark_key(" Analyst ", ProductLine::Security), "analyst_security");
    }

    #[test]
    fn rolling_average() {
        let at = Utc::now();
        let mut b = Benchmark::first("Analyst", ProductLine::Security, 10.0, 7.0, 0.8, at);
        b.fold(13.0, at);
        assert_eq!(b.response_count, 2);
        // (10 + 13) / 2 = 11.5 → 12
        assert_eq!(b.avg_hours_saved_weekly, 12.0);
        b.fold(3.0, at);
        // (12 × 2 + 3) / 3 = 9
        assert_eq!(b.avg_hours_saved_weekly, 9.0);
        assert_eq!(b.median_satisfaction_score, 7.0);
    }

    #[test]
    fn responses_serialize_with_source_tag() {
        let json = serde_json::to_value(SurveyResponses::Calculator(ProductLineInput::empty(
            ProductLine::Crm,
        )))
        .unwrap();
        assert_eq!(json["source"], "calculator");
        assert_eq!(json["answers"]["product"], "crm");
    }
}
