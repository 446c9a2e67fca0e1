//! Aggregator: per-product results → organisation-wide totals, score and badge.

use serde::{Deserialize, Serialize};

use roicalc_core::{DomainError, DomainResult};

use crate::config::{BadgeThresholds, EstimatorConfig};
use crate::formula::{clamp_score, estimate};
use crate::input::ProductLineInput;
use crate::product::ProductLine;

/// Four-tier label derived from the overall score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Badge {
    /// Step function over the score; each tier includes its lower bound.
    pub fn from_score(score: f64, thresholds: &BadgeThresholds) -> Self {
        if score >= thresholds.platinum {
            Badge::Platinum
        } else if score >= thresholds.gold {
            Badge::Gold
        } else if score >= thresholds.silver {
            Badge::Silver
        } else {
            Badge::Bronze
        }
    }

    /// Badge for `score` with the shipped 80/60/40 cut-offs.
    pub fn for_score(score: f64) -> Self {
        Self::from_score(score, &BadgeThresholds::default())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Bronze => "Bronze",
            Badge::Silver => "Silver",
            Badge::Gold => "Gold",
            Badge::Platinum => "Platinum",
        }
    }
}

impl core::fmt::Display for Badge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived result for one product line. Replaced wholesale on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResult {
    pub product: ProductLine,
    pub time_saved_hours: f64,
    pub cost_saved: f64,
    /// Hourly rate the cost was computed with.
    pub hourly_rate: f64,
    /// Headcount the line was evaluated for.
    pub seats: f64,
    /// 0..=100 against the line's own threshold.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalResult {
    /// Per-product results, in selection order.
    pub products: Vec<ProductResult>,
    pub time_saved_hours: f64,
    pub cost_saved: f64,
    pub score: f64,
    pub badge: Badge,
}

impl TotalResult {
    pub fn product(&self, line: ProductLine) -> Option<&ProductResult> {
        self.products.iter().find(|p| p.product == line)
    }
}

/// Combine `results` into a [`TotalResult`].
///
/// The overall score normalises against a flat reference per selected line
/// (`config.overall_reference_hours`) and saturates at 100. An empty slice is an
/// invariant violation: the wizard never lets a session finish without a line.
pub fn aggregate(
    results: Vec<ProductResult>,
    config: &EstimatorConfig,
) -> DomainResult<TotalResult> {
    if results.is_empty() {
        return Err(DomainError::invariant(
            "cannot aggregate an empty product selection",
        ));
    }

    let time_saved_hours: f64 = results.iter().map(|r| r.time_saved_hours).sum();
    let cost_saved: f64 = results.iter().map(|r| r.cost_saved).sum();

    let reference = results.len() as f64 * config.overall_reference_hours;
    let score = clamp_score(time_saved_hours / reference * 100.0);

    Ok(TotalResult {
        products: results,
        time_saved_hours,
        cost_saved,
        score,
        badge: Badge::from_score(score, &config.badges),
    })
}

/// Run every formula and aggregate in one go.
pub fn calculate(
    inputs: &[ProductLineInput],
    company_rate: Option<f64>,
    config: &EstimatorConfig,
) -> DomainResult<TotalResult> {
    let results = inputs
        .iter()
        .map(|input| estimate(input, company_rate, config))
        .collect();
    aggregate(results, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CodeAssistInput;

    fn result(product: ProductLine, hours: f64, cost: f64) -> ProductResult {
        ProductResult {
            product,
            time_saved_hours: hours,
            cost_saved: cost,
            hourly_rate: 50.0,
            seats: 1.0,
            score: 0.0,
        }
    }

    #[test]
    fn badge_boundaries_are_inclusive() {
        assert_eq!(Badge::for_score(79.0), Badge::Gold);
        assert_eq!(Badge::for_score(80.0), Badge::Platinum);
        assert_eq!(Badge::for_score(39.0), Badge::Bronze);
        assert_eq!(Badge::for_score(40.0), Badge::Silver);
        assert_eq!(Badge::for_score(60.0), Badge::Gold);
        assert_eq!(Badge::for_score(59.999), Badge::Silver);
        assert_eq!(Badge::for_score(0.0), Badge::Bronze);
        assert_eq!(Badge::for_score(100.0), Badge::Platinum);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = aggregate(vec![], &EstimatorConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn totals_sum_and_score_uses_flat_reference() {
        let total = aggregate(
            vec![
                result(ProductLine::M365, 300.0, 15_000.0),
                result(ProductLine::Crm, 300.0, 19_500.0),
            ],
            &EstimatorConfig::default(),
        )
        .unwrap();

        assert_eq!(total.time_saved_hours, 600.0);
        assert_eq!(total.cost_saved, 34_500.0);
        // 600 / (2 × 600) × 100
        assert_eq!(total.score, 50.0);
        assert_eq!(total.badge, Badge::Silver);
        assert_eq!(total.products.len(), 2);
        assert_eq!(total.product(ProductLine::Crm).unwrap().cost_saved, 19_500.0);
        assert!(total.product(ProductLine::Security).is_none());
    }

    #[test]
    fn overall_score_saturates() {
        let total = aggregate(
            vec![result(ProductLine::Security, 50_000.0, 0.0)],
            &EstimatorConfig::default(),
        )
        .unwrap();
        assert_eq!(total.score, 100.0);
        assert_eq!(total.badge, Badge::Platinum);
    }

    #[test]
    fn calculate_single_code_assist_line() {
        let inputs = vec![ProductLineInput::CodeAssist(CodeAssistInput {
            developers: Some(1.0),
            code_reviews_per_week: Some(1.0),
            bugs_per_month: Some(1.0),
            features_per_month: Some(1.0),
            hourly_rate: None,
        })];
        let total = calculate(&inputs, None, &EstimatorConfig::default()).unwrap();
        // 150 h / 600 h
        assert_eq!(total.score, 25.0);
        assert_eq!(total.badge, Badge::Bronze);
        assert_eq!(total.cost_saved, 11_250.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn hours_strategy() -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec(0.0f64..5_000.0, 1..=5)
        }

        fn results_from(hours: &[f64]) -> Vec<ProductResult> {
            hours
                .iter()
                .zip(ProductLine::ALL)
                .map(|(h, line)| result(line, *h, h * 60.0))
                .collect()
        }

        proptest! {
            #[test]
            fn score_is_clamped(hours in hours_strategy()) {
                let total = aggregate(results_from(&hours), &EstimatorConfig::default()).unwrap();
                prop_assert!((0.0..=100.0).contains(&total.score));
            }

            /// Raising any single product's hours never lowers the overall score.
            #[test]
            fn score_is_monotonic(
                hours in hours_strategy(),
                idx in 0usize..5,
                bump in 0.0f64..5_000.0,
            ) {
                let cfg = EstimatorConfig::default();
                let idx = idx % hours.len();
                let before = aggregate(results_from(&hours), &cfg).unwrap();

                let mut raised = hours.clone();
                raised[idx] += bump;
                let after = aggregate(results_from(&raised), &cfg).unwrap();

                prop_assert!(after.score >= before.score);
                prop_assert!(after.badge >= before.badge);
            }

            /// Same inputs, two runs, bit-identical totals.
            #[test]
            fn aggregation_is_deterministic(hours in hours_strategy()) {
                let cfg = EstimatorConfig::default();
                let a = aggregate(results_from(&hours), &cfg).unwrap();
                let b = aggregate(results_from(&hours), &cfg).unwrap();
                prop_assert_eq!(a.time_saved_hours.to_bits(), b.time_saved_hours.to_bits());
                prop_assert_eq!(a.cost_saved.to_bits(), b.cost_saved.to_bits());
                prop_assert_eq!(a.score.to_bits(), b.score.to_bits());
                prop_assert_eq!(a, b);
            }

            #[test]
            fn badge_is_a_step_function(score in 0.0f64..=100.0) {
                let badge = Badge::for_score(score);
                let expected = if score >= 80.0 {
                    Badge::Platinum
                } else if score >= 60.0 {
                    Badge::Gold
                } else if score >= 40.0 {
                    Badge::Silver
                } else {
                    Badge::Bronze
                };
                prop_assert_eq!(badge, expected);
            }
        }
    }
}
