//! Wizard module: the linear questionnaire that leads to the results view.
//!
//! `ModuleSelection → CompanyInfo → Survey(line₁) … Survey(lineₙ) → Results`
//!
//! The state is an explicit value owned by one session. All mutation goes
//! through the named transition methods on [`WizardState`].

pub mod company;
pub mod state;

pub use company::{CompanySize, CompanyProfile};
pub use state::{Progress, Step, Transition, WizardError, WizardState};
