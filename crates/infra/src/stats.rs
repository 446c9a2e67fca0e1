//! Community statistics over stored responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use roicalc_estimator::ProductLine;

use crate::records::ModuleResponseRecord;

/// Number of weekly trend buckets.
pub const TREND_WEEKS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// "Week 1" is the oldest.
    pub week: String,
    pub starts_at: DateTime<Utc>,
    pub responses: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub total_responses: u64,
    /// Mean cost saved per response, rounded; 0 without responses.
    pub average_cost_saved: f64,
    pub total_hours_saved: f64,
    pub total_cost_saved: f64,
    pub module_usage: BTreeMap<ProductLine, u64>,
    /// Oldest first; the last bucket ends at `now`.
    pub weekly_trends: Vec<WeeklyTrend>,
}

fn week_starts(now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    (0..TREND_WEEKS)
        .map(|i| now - Duration::weeks((TREND_WEEKS - i) as i64))
        .collect()
}

impl CommunityStats {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self::compute(&[], now)
    }

    pub fn compute(responses: &[ModuleResponseRecord], now: DateTime<Utc>) -> Self {
        let mut total_hours_saved = 0.0;
        let mut total_cost_saved = 0.0;
        let mut module_usage = BTreeMap::new();

        for r in responses {
            total_hours_saved += r.estimated_hours_saved.max(0.0);
            total_cost_saved += r.estimated_cost_saved.max(0.0);
            *module_usage.entry(r.module_id).or_insert(0u64) += 1;
        }

        let total_responses = responses.len() as u64;
        let average_cost_saved = if total_responses > 0 {
            (total_cost_saved / total_responses as f64).round()
        } else {
            0.0
        };

        let weekly_trends = week_starts(now)
            .into_iter()
            .enumerate()
            .map(|(i, starts_at)| {
                let ends_at = starts_at + Duration::weeks(1);
                let count = responses
                    .iter()
                    .filter(|r| r.submitted_at >= starts_at && r.submitted_at < ends_at)
                    .count() as u64;
                WeeklyTrend {
                    week: format!("Week {}", i + 1),
                    starts_at,
                    responses: count,
                }
            })
            .collect();

        Self {
            total_responses,
            average_cost_saved,
            total_hours_saved,
            total_cost_saved,
            module_usage,
            weekly_trends,
        }
    }
}
