//! Infrastructure layer: configuration, persistence backends, the reporting
//! adapter and community statistics.

pub mod adapter;
pub mod config;
pub mod records;
pub mod stats;
pub mod store;

pub use adapter::ReportingAdapter;
pub use config::{AppConfig, StoreBackend};
pub use records::{Benchmark, CalculationRecord, ModuleResponseRecord, SurveyResponses};
pub use stats::{CommunityStats, WeeklyTrend, TREND_WEEKS};
pub use store::{BenchmarkStore, InMemoryStore, PostgresStore, ResponseStore, StoreError};
