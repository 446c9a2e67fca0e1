//! Document export.
//!
//! Builds a [`Report`] from a finished wizard and lays it out as a paginated
//! text document or a slide deck. Everything here is a pure read of the
//! result and inputs: no IO, no effect on the wizard.

pub mod document;
pub mod format;
pub mod model;
pub mod slides;

pub use document::{render_document, Page, LINES_PER_PAGE};
pub use model::{ActivityBreakdown, ExecutiveSummary, ExportError, LineBreakdown, Report};
pub use slides::{render_slides, Slide};
