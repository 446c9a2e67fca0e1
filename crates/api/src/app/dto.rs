use serde::Deserialize;
use serde_json::json;

use roicalc_core::SessionId;
use roicalc_estimator::{AssessmentResponses, Insight, PersonalEstimate, ProductLine};
use roicalc_infra::{Benchmark, CalculationRecord, ModuleResponseRecord};
use roicalc_reporting::{Page, Report, Slide};
use roicalc_wizard::{Transition, WizardState};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub products: Vec<ProductLine>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartQuery {
    /// Product line chosen from a landing page before the wizard opened.
    pub preselect: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkQuery {
    pub job_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssessmentQuery {
    pub session_id: Option<String>,
}

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 100;

// -------------------------
// Response mapping
// -------------------------

pub fn wizard_to_json(id: SessionId, state: &WizardState) -> serde_json::Value {
    json!({
        "session_id": id.to_string(),
        "step": state.step(),
        "step_index": state.current_step(),
        "progress": state.progress(),
        "selection": state.selection(),
        "company": state.company(),
        "inputs": state.inputs(),
        "result": state.result(),
        "complete": state.is_complete(),
    })
}

pub fn transition_to_json(
    id: SessionId,
    transition: &Transition,
    state: &WizardState,
) -> serde_json::Value {
    let outcome = match transition {
        Transition::Advanced(_) => "advanced",
        Transition::Completed(_) => "completed",
        Transition::Unchanged => "unchanged",
    };
    json!({
        "outcome": outcome,
        "wizard": wizard_to_json(id, state),
    })
}

pub fn document_to_json(report: &Report, pages: &[Page]) -> serde_json::Value {
    json!({
        "report": report,
        "pages": pages,
        "text": pages.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n\n"),
    })
}

pub fn slides_to_json(report: &Report, slides: &[Slide]) -> serde_json::Value {
    json!({
        "report": report,
        "slides": slides,
    })
}

pub fn calculation_to_json(record: &CalculationRecord) -> serde_json::Value {
    json!({
        "id": record.id.to_string(),
        "session_id": record.session_id.to_string(),
        "company_info": record.company_info,
        "selected_modules": record.selected_modules,
        "module_data": record.module_data,
        "results": record.results,
        "calculated_at": record.calculated_at.to_rfc3339(),
    })
}

pub fn peer_to_json(record: &ModuleResponseRecord) -> serde_json::Value {
    json!({
        "estimated_hours_saved": record.estimated_hours_saved,
        "estimated_cost_saved": record.estimated_cost_saved,
        "confidence_score": record.confidence_score,
        "submitted_at": record.submitted_at.to_rfc3339(),
    })
}

pub fn assessment_to_json(
    estimate: &PersonalEstimate,
    insights: &[Insight],
    benchmark: Option<&Benchmark>,
    suggestions: &AssessmentResponses,
    peers: &[ModuleResponseRecord],
) -> serde_json::Value {
    json!({
        "estimate": estimate,
        "insights": insights,
        "benchmark": benchmark,
        "suggestions": suggestions,
        "peers": peers.iter().map(peer_to_json).collect::<Vec<_>>(),
    })
}
