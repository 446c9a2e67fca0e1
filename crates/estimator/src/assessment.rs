//! Quick assessment: a per-person estimate from a short questionnaire.
//!
//! Unlike the organisation wizard this answers "what would *I* save", feeds the
//! peer benchmarks and carries a confidence score derived from the profile.

use serde::{Deserialize, Serialize};

use roicalc_core::{DomainError, DomainResult};

use crate::input::non_negative;
use crate::product::ProductLine;

/// Hourly rate applied to personal estimates.
pub const ASSESSMENT_HOURLY_RATE: f64 = 60.0;

const BASE_CONFIDENCE: f64 = 0.7;
const MAX_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportingFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    AdHoc,
}

/// Answers to the quick assessment.
///
/// Profile fields are shared by every line; the remaining fields are only read
/// by the line they belong to. Bracketed answers ("21-50", "8+ hours") are kept
/// as text and reduced to their lower bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentResponses {
    pub job_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Years of experience bracket, e.g. "5-10 years", "15+ years".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<f64>,
    /// Current AI tool usage, 1..=5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tool_usage: Option<f64>,
    /// Willingness to adopt, 1..=10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willingness_to_adopt: Option<f64>,

    // m365
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meetings_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_per_week: Option<f64>,

    // code-assist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding_hours_per_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_reviews_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bugs_per_month: Option<f64>,

    // low-code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflows_to_automate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_frequency: Option<ReportingFrequency>,

    // crm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_interactions: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reporting_tasks: Vec<String>,

    // security
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_per_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents_per_month: Option<f64>,
    /// Compliance reporting burden, 1..=10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_reporting: Option<f64>,
}

impl AssessmentResponses {
    pub fn validate(&self) -> DomainResult<()> {
        if self.job_title.trim().is_empty() {
            return Err(DomainError::validation("job_title is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalEstimate {
    pub product: ProductLine,
    pub estimated_hours_saved: f64,
    pub weekly_hours_saved: f64,
    pub cost_saved: f64,
    /// 0.7..=0.95
    pub confidence_score: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Info,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Leading number of a bracket answer: "21-50" → 21, "200+" → 200, "8+ hours" → 8.
pub fn bracket_lower_bound(answer: &str) -> Option<f64> {
    let digits: String = answer
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn annual_hours(line: ProductLine, r: &AssessmentResponses) -> f64 {
    let n = non_negative;
    match line {
        ProductLine::M365 => {
            let emails = r.email_volume.as_deref().and_then(bracket_lower_bound).unwrap_or(25.0);
            emails * 0.1 * 5.0 * 52.0
                + n(r.meetings_per_week) * 0.5 * 52.0
                + n(r.documents_per_week) * 1.5 * 52.0
        }
        ProductLine::CodeAssist => {
            let hours = r
                .coding_hours_per_day
                .as_deref()
                .and_then(bracket_lower_bound)
                .unwrap_or(5.0);
            hours * 0.3 * 5.0 * 52.0
                + n(r.code_reviews_per_week) * 0.5 * 52.0
                + n(r.bugs_per_month) * 1.2 * 12.0
        }
        ProductLine::LowCode => {
            let reporting = if r.reporting_frequency == Some(ReportingFrequency::Daily) {
                260.0
            } else {
                52.0
            };
            n(r.apps_per_month) * 20.0 * 12.0 + n(r.workflows_to_automate) * 8.0 + reporting
        }
        ProductLine::Crm => {
            n(r.leads_per_week) * 0.3 * 52.0
                + n(r.customer_interactions) * 0.2 * 52.0
                + r.reporting_tasks.len() as f64 * 4.0 * 12.0
        }
        ProductLine::Security => {
            let alerts = r.alerts_per_day.as_deref().and_then(bracket_lower_bound).unwrap_or(15.0);
            alerts * 0.4 * 365.0
                + n(r.incidents_per_month) * 2.0 * 12.0
                + n(r.compliance_reporting) * 10.0 * 12.0
        }
    }
}

fn confidence(r: &AssessmentResponses) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if r.experience.as_deref().is_some_and(|e| e.contains("15+")) {
        confidence += 0.1;
    }
    if r.current_tool_usage.is_some_and(|u| u >= 4.0) {
        confidence += 0.1;
    }
    if r.team_size.is_some_and(|t| t > 50.0) {
        confidence += 0.05;
    }
    confidence.min(MAX_CONFIDENCE)
}

/// Personal estimate for `line`.
pub fn assess(line: ProductLine, responses: &AssessmentResponses) -> PersonalEstimate {
    let hours = annual_hours(line, responses);
    PersonalEstimate {
        product: line,
        estimated_hours_saved: hours.round(),
        weekly_hours_saved: (hours / 52.0).round(),
        cost_saved: (hours * ASSESSMENT_HOURLY_RATE).round(),
        confidence_score: confidence(responses),
    }
}

/// Narrative insights; `benchmark_weekly_hours` is the peer average, if known.
pub fn insights(
    responses: &AssessmentResponses,
    estimate: &PersonalEstimate,
    benchmark_weekly_hours: Option<f64>,
) -> Vec<Insight> {
    let mut out = Vec::new();
    let weekly = estimate.weekly_hours_saved;

    if weekly > 10.0 {
        out.push(Insight {
            kind: InsightKind::Success,
            title: "High Impact Potential".to_string(),
            message: format!(
                "You could save {weekly} hours per week - that's {}% of a work week!",
                (weekly / 40.0 * 100.0).round()
            ),
        });
    }

    if let Some(avg) = benchmark_weekly_hours.filter(|a| *a > 0.0) {
        if weekly > avg {
            out.push(Insight {
                kind: InsightKind::Info,
                title: "Above Average Impact".to_string(),
                message: format!(
                    "Your potential savings are {}% higher than similar professionals.",
                    ((weekly - avg) / avg * 100.0).round()
                ),
            });
        }
    }

    if responses.current_tool_usage.is_some_and(|u| u < 3.0) {
        out.push(Insight {
            kind: InsightKind::Tip,
            title: "Quick Start Tip".to_string(),
            message: "Start with simple automation tasks to build confidence before \
                      tackling complex workflows."
                .to_string(),
        });
    }

    out
}

/// Typical answers for someone with this profile, used to pre-fill the
/// line-specific questions.
///
/// Needs a job title and an experience bracket; without them nothing is
/// suggested. Only the suggested fields are set on the returned value.
pub fn suggest(line: ProductLine, responses: &AssessmentResponses) -> AssessmentResponses {
    let mut out = AssessmentResponses::default();
    let Some(experience) = responses.experience.as_deref() else {
        return out;
    };
    if responses.job_title.trim().is_empty() {
        return out;
    }

    // "6-10 years" and up count as experienced.
    let experienced = bracket_lower_bound(experience).is_some_and(|years| years > 5.0);
    let team_size = responses.team_size.unwrap_or(0.0);
    let pick = |yes: f64, no: f64| if experienced { yes } else { no };

    match line {
        ProductLine::M365 => {
            out.email_volume = Some(if experienced { "51-100" } else { "21-50" }.to_string());
            out.meetings_per_week = Some(if team_size > 10.0 { 15.0 } else { 8.0 });
        }
        ProductLine::CodeAssist => {
            let hours = if experienced { "7-8 hours" } else { "5-6 hours" };
            out.coding_hours_per_day = Some(hours.to_string());
            let team = if team_size > 0.0 { team_size } else { 5.0 };
            out.code_reviews_per_week = Some(team.min(10.0));
            out.bugs_per_month = Some(pick(15.0, 25.0));
        }
        ProductLine::LowCode => {
            out.apps_per_month = Some(if team_size > 20.0 { 3.0 } else { 1.0 });
        }
        ProductLine::Crm => {
            let manager = responses.job_title.contains("Manager");
            out.leads_per_week = Some(if manager { 50.0 } else { 25.0 });
            out.customer_interactions = Some(pick(40.0, 25.0));
        }
        ProductLine::Security => {
            let alerts = if team_size > 15.0 { "51-100" } else { "11-25" };
            out.alerts_per_day = Some(alerts.to_string());
            out.incidents_per_month = Some(pick(20.0, 35.0));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn developer() -> AssessmentResponses {
        AssessmentResponses {
            job_title: "Backend Developer".to_string(),
            coding_hours_per_day: Some("5-6 hours".to_string()),
            code_reviews_per_week: Some(4.0),
            bugs_per_month: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn bracket_parsing() {
        assert_eq!(bracket_lower_bound("21-50"), Some(21.0));
        assert_eq!(bracket_lower_bound("200+"), Some(200.0));
        assert_eq!(bracket_lower_bound("8+ hours"), Some(8.0));
        assert_eq!(bracket_lower_bound("Less than 1 hour"), None);
    }

    #[test]
    fn code_assist_estimate() {
        let e = assess(ProductLine::CodeAssist, &developer());
        // 5×0.3×260 + 4×0.5×52 + 10×1.2×12 = 390 + 104 + 144
        assert_eq!(e.estimated_hours_saved, 638.0);
        assert_eq!(e.weekly_hours_saved, 12.0);
        assert_eq!(e.cost_saved, 38_280.0);
        assert_eq!(e.confidence_score, 0.7);
    }

    #[test]
    fn low_code_daily_reporting_bonus() {
        let mut r = AssessmentResponses {
            job_title: "Analyst".to_string(),
            apps_per_month: Some(1.0),
            workflows_to_automate: Some(5.0),
            ..Default::default()
        };
        assert_eq!(assess(ProductLine::LowCode, &r).estimated_hours_saved, 240.0 + 40.0 + 52.0);
        r.reporting_frequency = Some(ReportingFrequency::Daily);
        assert_eq!(assess(ProductLine::LowCode, &r).estimated_hours_saved, 240.0 + 40.0 + 260.0);
    }

    #[test]
    fn security_defaults_alert_volume() {
        let r = AssessmentResponses {
            job_title: "SOC Analyst".to_string(),
            ..Default::default()
        };
        // 15 × 0.4 × 365
        assert_eq!(assess(ProductLine::Security, &r).estimated_hours_saved, 2_190.0);
    }

    #[test]
    fn confidence_is_capped() {
        let r = AssessmentResponses {
            job_title: "Lead".to_string(),
            experience: Some("15+ years".to_string()),
            current_tool_usage: Some(5.0),
            team_size: Some(200.0),
            ..Default::default()
        };
        assert_eq!(assess(ProductLine::M365, &r).confidence_score, 0.95);
    }

    #[test]
    fn insights_follow_thresholds() {
        let mut r = developer();
        r.current_tool_usage = Some(2.0);
        let e = assess(ProductLine::CodeAssist, &r);

        let got = insights(&r, &e, Some(8.0));
        let titles: Vec<&str> = got.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["High Impact Potential", "Above Average Impact", "Quick Start Tip"]
        );
        assert_eq!(
            got[1].message,
            "Your potential savings are 50% higher than similar professionals."
        );

        let none = insights(&developer(), &e, Some(20.0));
        assert_eq!(none.len(), 1);
    }

    #[test]
    fn suggestions_follow_profile() {
        let senior = AssessmentResponses {
            job_title: "Sales Manager".to_string(),
            experience: Some("11-15 years".to_string()),
            team_size: Some(25.0),
            ..Default::default()
        };
        let crm = suggest(ProductLine::Crm, &senior);
        assert_eq!(crm.leads_per_week, Some(50.0));
        assert_eq!(crm.customer_interactions, Some(40.0));
        assert_eq!(crm.job_title, "");

        let security = suggest(ProductLine::Security, &senior);
        assert_eq!(security.alerts_per_day.as_deref(), Some("51-100"));
        assert_eq!(security.incidents_per_month, Some(20.0));

        let junior = AssessmentResponses {
            job_title: "Developer".to_string(),
            experience: Some("3-5 years".to_string()),
            ..Default::default()
        };
        let code = suggest(ProductLine::CodeAssist, &junior);
        assert_eq!(code.coding_hours_per_day.as_deref(), Some("5-6 hours"));
        assert_eq!(code.code_reviews_per_week, Some(5.0));
        assert_eq!(code.bugs_per_month, Some(25.0));
    }

    #[test]
    fn no_suggestions_without_profile() {
        let mut r = developer();
        r.experience = None;
        assert_eq!(suggest(ProductLine::M365, &r), AssessmentResponses::default());

        r.experience = Some("15+ years".to_string());
        r.job_title = String::new();
        assert_eq!(suggest(ProductLine::M365, &r), AssessmentResponses::default());
    }

    #[test]
    fn job_title_is_required() {
        assert!(AssessmentResponses::default().validate().is_err());
        assert!(developer().validate().is_ok());
    }
}
