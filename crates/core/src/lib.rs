//! `roicalc-core`: shared building blocks.
//!
//! Error model and strongly-typed identifiers used by every other crate. No
//! infrastructure concerns live here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{SessionId, SubmissionId};
