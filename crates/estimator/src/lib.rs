//! `roicalc-estimator`
//!
//! **Responsibility:** turn survey answers into time and cost savings.
//!
//! Everything here is pure and deterministic:
//! - no IO, no clocks, no randomness;
//! - the same input always yields a bit-identical result.
//!
//! Storage and presentation live in `roicalc-infra` / `roicalc-reporting`.

pub mod aggregate;
pub mod assessment;
pub mod config;
pub mod formula;
pub mod input;
pub mod product;

pub use aggregate::{aggregate, calculate, Badge, ProductResult, TotalResult};
pub use assessment::{
    assess, insights, suggest, AssessmentResponses, Insight, InsightKind, PersonalEstimate,
    ReportingFrequency,
};
pub use config::{BadgeThresholds, EstimatorConfig, LineParameters};
pub use formula::{activity_terms, estimate, resolve_hourly_rate, ActivityTerm, Cadence, Savings};
pub use input::{
    CodeAssistInput, CrmInput, LowCodeInput, M365Input, ProductLineInput, SecurityInput,
};
pub use product::ProductLine;
