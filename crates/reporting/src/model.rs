use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roicalc_estimator::{
    activity_terms, Badge, Cadence, EstimatorConfig, ProductLine, ProductLineInput, ProductResult,
    TotalResult,
};
use roicalc_wizard::{CompanyProfile, WizardState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The wizard has not reached `Results` yet.
    #[error("the report is not available until the calculation has been completed")]
    NotReady,
}

/// Hours and cost attributed to one activity of a product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBreakdown {
    pub label: String,
    pub count: f64,
    pub cadence: Cadence,
    pub hours_saved_per_unit: f64,
    pub annual_hours: f64,
    pub annual_cost: f64,
}

/// Investment analysis for one product line.
///
/// Ratio fields are `None` when their denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub product: ProductLine,
    pub name: String,
    pub users: f64,
    pub hourly_rate: f64,
    pub license_cost_monthly: f64,
    pub license_cost_annual: f64,
    pub time_saved_hours: f64,
    pub cost_saved: f64,
    pub net_annual_savings: f64,
    pub roi_percent: Option<f64>,
    pub cost_per_hour_saved: Option<f64>,
    pub break_even_months: Option<f64>,
    pub score: f64,
    pub activities: Vec<ActivityBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub total_time_saved_hours: f64,
    pub total_cost_saved: f64,
    pub license_investment_annual: f64,
    pub net_annual_savings: f64,
    pub roi_percent: Option<f64>,
    pub payback_months: Option<f64>,
    /// Calendar-day average (annual / 365).
    pub daily_hours_saved: f64,
    pub weekly_hours_saved: f64,
    pub monthly_cost_saved: f64,
    pub score: f64,
    pub badge: Badge,
}

/// Everything the document and slide renderers print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub company_name: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub generated_on: NaiveDate,
    pub summary: ExecutiveSummary,
    pub lines: Vec<LineBreakdown>,
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        None
    } else {
        Some(numerator / denominator)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl LineBreakdown {
    pub fn build(
        result: &ProductResult,
        input: &ProductLineInput,
        config: &EstimatorConfig,
    ) -> Self {
        let users = result.seats;
        let license_cost_monthly = config.line(result.product).license_monthly_per_seat * users;
        let license_cost_annual = license_cost_monthly * 12.0;
        let net_annual_savings = result.cost_saved - license_cost_annual;

        Self {
            product: result.product,
            name: result.product.display_name().to_string(),
            users,
            hourly_rate: result.hourly_rate,
            license_cost_monthly,
            license_cost_annual,
            time_saved_hours: result.time_saved_hours,
            cost_saved: result.cost_saved,
            net_annual_savings,
            roi_percent: ratio(net_annual_savings, license_cost_annual).map(|r| r * 100.0),
            cost_per_hour_saved: ratio(license_cost_annual, result.time_saved_hours),
            break_even_months: ratio(license_cost_annual, result.cost_saved).map(|r| r * 12.0),
            score: result.score,
            activities: activities(result, input),
        }
    }
}

/// Per-activity share of a line's hours.
///
/// The headline figure is rounded once over the whole line, so the rounding
/// remainder goes to the last activity with any hours; the activities then add
/// up to `result.time_saved_hours` exactly.
fn activities(result: &ProductResult, input: &ProductLineInput) -> Vec<ActivityBreakdown> {
    let mut activities: Vec<ActivityBreakdown> = activity_terms(input)
        .into_iter()
        .map(|term| ActivityBreakdown {
            label: term.label.to_string(),
            count: term.count,
            cadence: term.cadence,
            hours_saved_per_unit: term.hours_saved_per_unit,
            annual_hours: result.seats * term.annual_hours_per_seat(),
            annual_cost: 0.0,
        })
        .collect();

    let attributed: f64 = activities.iter().map(|a| a.annual_hours).sum();
    let remainder = result.time_saved_hours - attributed;
    if let Some(last) = activities.iter_mut().rev().find(|a| a.annual_hours > 0.0) {
        last.annual_hours += remainder;
    }

    for activity in &mut activities {
        activity.annual_cost = activity.annual_hours * result.hourly_rate;
    }
    activities
}

impl ExecutiveSummary {
    pub fn build(total: &TotalResult, lines: &[LineBreakdown]) -> Self {
        let license_investment_annual: f64 = lines.iter().map(|l| l.license_cost_annual).sum();
        let net_annual_savings = total.cost_saved - license_investment_annual;

        Self {
            total_time_saved_hours: total.time_saved_hours,
            total_cost_saved: total.cost_saved,
            license_investment_annual,
            net_annual_savings,
            roi_percent: ratio(net_annual_savings, license_investment_annual).map(|r| r * 100.0),
            payback_months: ratio(license_investment_annual, total.cost_saved).map(|r| r * 12.0),
            daily_hours_saved: total.time_saved_hours / 365.0,
            weekly_hours_saved: (total.time_saved_hours / 52.0).floor(),
            monthly_cost_saved: total.cost_saved / 12.0,
            score: total.score,
            badge: total.badge,
        }
    }
}

impl Report {
    /// Assemble the report from an aggregated result and the inputs behind it.
    ///
    /// `input_for` is asked for each product in the result; a line with no
    /// recorded input gets an empty activity breakdown.
    pub fn build<'a>(
        total: &TotalResult,
        input_for: impl Fn(ProductLine) -> Option<&'a ProductLineInput>,
        company: Option<&CompanyProfile>,
        config: &EstimatorConfig,
        generated_on: NaiveDate,
    ) -> Self {
        let lines: Vec<LineBreakdown> = total
            .products
            .iter()
            .map(|result| match input_for(result.product) {
                Some(input) => LineBreakdown::build(result, input, config),
                None => {
                    let empty = ProductLineInput::empty(result.product);
                    LineBreakdown::build(result, &empty, config)
                }
            })
            .collect();

        Self {
            company_name: company
                .map(|c| c.display_name().to_string())
                .unwrap_or_else(|| CompanyProfile::default().display_name().to_string()),
            industry: company.and_then(|c| non_blank(&c.industry)),
            company_size: company.and_then(|c| c.company_size).map(|s| s.label().to_string()),
            generated_on,
            summary: ExecutiveSummary::build(total, &lines),
            lines,
        }
    }

    /// Report for a wizard that has reached `Results`.
    pub fn from_wizard(state: &WizardState, generated_on: NaiveDate) -> Result<Self, ExportError> {
        let total = state.result().ok_or(ExportError::NotReady)?;
        Ok(Self::build(
            total,
            |line| state.input(line),
            state.company(),
            state.config(),
            generated_on,
        ))
    }

    pub fn line(&self, product: ProductLine) -> Option<&LineBreakdown> {
        self.lines.iter().find(|l| l.product == product)
    }
}
