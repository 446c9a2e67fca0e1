//! Formula library: survey record → annual time and cost saved.
//!
//! Each line is a headcount times a sum of weighted activity terms:
//!
//! `hours = round(headcount × Σ count × periods_per_year × hours_saved_per_unit)`
//!
//! `cost = hours × hourly_rate`

use serde::{Deserialize, Serialize};

use crate::aggregate::ProductResult;
use crate::config::EstimatorConfig;
use crate::input::{
    non_negative, CodeAssistInput, CrmInput, LowCodeInput, M365Input, ProductLineInput,
    SecurityInput,
};

/// How often an activity count recurs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Per working day (5 days × 52 weeks).
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    pub fn periods_per_year(self) -> f64 {
        match self {
            Cadence::Daily => 5.0 * 52.0,
            Cadence::Weekly => 52.0,
            Cadence::Monthly => 12.0,
        }
    }
}

/// One weighted activity of a product line formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityTerm {
    pub label: &'static str,
    /// Activity count per seat per cadence period (already clamped to ≥ 0).
    pub count: f64,
    pub cadence: Cadence,
    pub hours_saved_per_unit: f64,
}

impl ActivityTerm {
    fn new(
        label: &'static str,
        count: Option<f64>,
        cadence: Cadence,
        hours_saved_per_unit: f64,
    ) -> Self {
        Self {
            label,
            count: non_negative(count),
            cadence,
            hours_saved_per_unit,
        }
    }

    /// Hours saved per seat per year by this activity.
    pub fn annual_hours_per_seat(&self) -> f64 {
        self.count * self.cadence.periods_per_year() * self.hours_saved_per_unit
    }
}

/// Pre-score output of a formula.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub time_saved_hours: f64,
    pub cost_saved: f64,
}

impl Savings {
    fn from_terms(headcount: f64, terms: &[ActivityTerm], hourly_rate: f64) -> Self {
        let per_seat: f64 = terms.iter().map(ActivityTerm::annual_hours_per_seat).sum();
        let time_saved_hours = (headcount * per_seat).round();
        Self {
            time_saved_hours,
            cost_saved: time_saved_hours * hourly_rate,
        }
    }
}

pub fn m365_terms(input: &M365Input) -> Vec<ActivityTerm> {
    vec![
        ActivityTerm::new("Email handling", input.emails_per_day, Cadence::Daily, 0.1),
        ActivityTerm::new("Meeting preparation", input.meetings_per_week, Cadence::Weekly, 0.5),
        ActivityTerm::new("Document creation", input.documents_per_week, Cadence::Weekly, 2.0),
        ActivityTerm::new(
            "Presentation building",
            input.presentations_per_month,
            Cadence::Monthly,
            3.0,
        ),
    ]
}

pub fn code_assist_terms(input: &CodeAssistInput) -> Vec<ActivityTerm> {
    vec![
        ActivityTerm::new("Code review", input.code_reviews_per_week, Cadence::Weekly, 1.5),
        ActivityTerm::new("Bug fixing", input.bugs_per_month, Cadence::Monthly, 2.0),
        ActivityTerm::new("Feature development", input.features_per_month, Cadence::Monthly, 4.0),
    ]
}

pub fn low_code_terms(input: &LowCodeInput) -> Vec<ActivityTerm> {
    vec![
        ActivityTerm::new("App development", input.apps_per_month, Cadence::Monthly, 8.0),
        ActivityTerm::new("Flow creation", input.flows_per_month, Cadence::Monthly, 4.0),
        ActivityTerm::new("Report generation", input.reports_per_week, Cadence::Weekly, 2.0),
    ]
}

pub fn crm_terms(input: &CrmInput) -> Vec<ActivityTerm> {
    vec![
        ActivityTerm::new("Lead processing", input.leads_per_week, Cadence::Weekly, 0.5),
        ActivityTerm::new(
            "Customer interaction logging",
            input.customer_interactions,
            Cadence::Weekly,
            0.25,
        ),
        ActivityTerm::new("Report generation", input.reports_per_month, Cadence::Monthly, 1.5),
    ]
}

pub fn security_terms(input: &SecurityInput) -> Vec<ActivityTerm> {
    vec![
        ActivityTerm::new("Incident response", input.incidents_per_month, Cadence::Monthly, 3.0),
        ActivityTerm::new("Threat analysis", input.threats_per_week, Cadence::Weekly, 1.0),
        ActivityTerm::new("Compliance checks", input.compliance_checks, Cadence::Monthly, 2.0),
    ]
}

pub fn m365_savings(input: &M365Input, hourly_rate: f64) -> Savings {
    Savings::from_terms(non_negative(input.employees), &m365_terms(input), hourly_rate)
}

pub fn code_assist_savings(input: &CodeAssistInput, hourly_rate: f64) -> Savings {
    Savings::from_terms(non_negative(input.developers), &code_assist_terms(input), hourly_rate)
}

pub fn low_code_savings(input: &LowCodeInput, hourly_rate: f64) -> Savings {
    Savings::from_terms(non_negative(input.business_users), &low_code_terms(input), hourly_rate)
}

pub fn crm_savings(input: &CrmInput, hourly_rate: f64) -> Savings {
    Savings::from_terms(non_negative(input.sales_reps), &crm_terms(input), hourly_rate)
}

pub fn security_savings(input: &SecurityInput, hourly_rate: f64) -> Savings {
    Savings::from_terms(non_negative(input.security_analysts), &security_terms(input), hourly_rate)
}

/// Activity terms of any line (used by the report breakdown).
pub fn activity_terms(input: &ProductLineInput) -> Vec<ActivityTerm> {
    match input {
        ProductLineInput::M365(i) => m365_terms(i),
        ProductLineInput::CodeAssist(i) => code_assist_terms(i),
        ProductLineInput::LowCode(i) => low_code_terms(i),
        ProductLineInput::Crm(i) => crm_terms(i),
        ProductLineInput::Security(i) => security_terms(i),
    }
}

/// Rate precedence: the survey's own rate, then the company override, then the
/// line default. Zero or invalid rates are treated as absent.
pub fn resolve_hourly_rate(
    input: &ProductLineInput,
    company_rate: Option<f64>,
    config: &EstimatorConfig,
) -> f64 {
    let usable = |r: &f64| r.is_finite() && *r > 0.0;
    input
        .hourly_rate()
        .filter(usable)
        .or(company_rate.filter(usable))
        .unwrap_or_else(|| config.line(input.line()).default_hourly_rate)
}

pub fn savings(input: &ProductLineInput, hourly_rate: f64) -> Savings {
    match input {
        ProductLineInput::M365(i) => m365_savings(i, hourly_rate),
        ProductLineInput::CodeAssist(i) => code_assist_savings(i, hourly_rate),
        ProductLineInput::LowCode(i) => low_code_savings(i, hourly_rate),
        ProductLineInput::Crm(i) => crm_savings(i, hourly_rate),
        ProductLineInput::Security(i) => security_savings(i, hourly_rate),
    }
}

/// Run the line's formula and score it against the line threshold.
pub fn estimate(
    input: &ProductLineInput,
    company_rate: Option<f64>,
    config: &EstimatorConfig,
) -> ProductResult {
    let line = input.line();
    let hourly_rate = resolve_hourly_rate(input, company_rate, config);
    let Savings {
        time_saved_hours,
        cost_saved,
    } = savings(input, hourly_rate);

    let threshold = config.line(line).score_threshold_hours;
    ProductResult {
        product: line,
        time_saved_hours,
        cost_saved,
        hourly_rate,
        seats: input.headcount(),
        score: clamp_score(time_saved_hours / threshold * 100.0),
    }
}

/// Scores live in [0, 100]; NaN (0/0 with a zero threshold) maps to 0.
pub(crate) fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 100.0) }
}
