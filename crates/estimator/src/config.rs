//! Estimator constants, kept as data.
//!
//! The hourly rates, score thresholds and badge cut-offs are business-supplied
//! numbers with no derivation behind them. They live here so a deployment can
//! override them without touching the formulas.

use serde::{Deserialize, Serialize};

use crate::product::ProductLine;

/// Per product line parameters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineParameters {
    /// Hourly rate used when neither the survey nor the company profile gives one.
    pub default_hourly_rate: f64,
    /// Annual hours at which the per-product score saturates at 100.
    pub score_threshold_hours: f64,
    /// Monthly license price per seat (report only).
    pub license_monthly_per_seat: f64,
}

impl LineParameters {
    pub const fn new(
        default_hourly_rate: f64,
        score_threshold_hours: f64,
        license_monthly_per_seat: f64,
    ) -> Self {
        Self {
            default_hourly_rate,
            score_threshold_hours,
            license_monthly_per_seat,
        }
    }
}

/// Lower bounds (inclusive) of each badge tier.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeThresholds {
    pub platinum: f64,
    pub gold: f64,
    pub silver: f64,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            platinum: 80.0,
            gold: 60.0,
            silver: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub m365: LineParameters,
    pub code_assist: LineParameters,
    pub low_code: LineParameters,
    pub crm: LineParameters,
    pub security: LineParameters,
    /// Flat per-line reference used for the overall score.
    pub overall_reference_hours: f64,
    pub badges: BadgeThresholds,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            m365: LineParameters::new(50.0, 1000.0, 30.0),
            code_assist: LineParameters::new(75.0, 800.0, 10.0),
            low_code: LineParameters::new(60.0, 600.0, 20.0),
            crm: LineParameters::new(65.0, 700.0, 50.0),
            security: LineParameters::new(80.0, 500.0, 4.0),
            overall_reference_hours: 600.0,
            badges: BadgeThresholds::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn line(&self, line: ProductLine) -> LineParameters {
        match line {
            ProductLine::M365 => self.m365,
            ProductLine::CodeAssist => self.code_assist,
            ProductLine::LowCode => self.low_code,
            ProductLine::Crm => self.crm,
            ProductLine::Security => self.security,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_defaults() {
        let cfg = EstimatorConfig::default();
        let rates: Vec<f64> = ProductLine::ALL
            .iter()
            .map(|l| cfg.line(*l).default_hourly_rate)
            .collect();
        assert_eq!(rates, vec![50.0, 75.0, 60.0, 65.0, 80.0]);
        assert_eq!(cfg.overall_reference_hours, 600.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg: EstimatorConfig =
            serde_json::from_str(r#"{"overall_reference_hours": 400.0}"#).unwrap();
        assert_eq!(cfg.overall_reference_hours, 400.0);
        assert_eq!(cfg.security, EstimatorConfig::default().security);
    }
}
