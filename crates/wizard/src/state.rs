//! Wizard state machine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use roicalc_core::DomainError;
use roicalc_estimator::{calculate, EstimatorConfig, ProductLine, ProductLineInput, TotalResult};

use crate::company::CompanyProfile;

/// Position of the wizard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "product", rename_all = "snake_case")]
pub enum Step {
    ModuleSelection,
    CompanyInfo,
    Survey(ProductLine),
    Results,
}

impl core::fmt::Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Step::ModuleSelection => f.write_str("module selection"),
            Step::CompanyInfo => f.write_str("company info"),
            Step::Survey(line) => write!(f, "{line} survey"),
            Step::Results => f.write_str("results"),
        }
    }
}

/// Outcome of a successful `next()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Moved to another input step.
    Advanced(Step),
    /// Entered `Results`; carries the freshly aggregated result.
    Completed(TotalResult),
    /// Already on `Results`; nothing happened.
    Unchanged,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    /// The current step's required fields are not filled in. The message is
    /// meant for the visitor.
    #[error("{0}")]
    Blocked(String),

    #[error("already on the first step")]
    AtFirstStep,

    #[error("{action} is not available on the {step} step")]
    WrongStep { action: &'static str, step: Step },
}

impl From<DomainError> for WizardError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
                WizardError::Blocked(msg)
            }
            other => WizardError::Blocked(other.to_string()),
        }
    }
}

/// Progress bar figures (`current` is 1-based).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percent: f64,
}

/// State of one visitor's run through the calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    current_step: usize,
    /// Insertion-ordered, duplicate free.
    selection: Vec<ProductLine>,
    /// Set when the selection step is confirmed; cleared only by `restart()`.
    selection_locked: bool,
    company: Option<CompanyProfile>,
    inputs: BTreeMap<ProductLine, ProductLineInput>,
    result: Option<TotalResult>,
    #[serde(skip)]
    config: EstimatorConfig,
}

impl WizardState {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start with `line` already ticked (landing pages link with `?preselect=`).
    pub fn with_preselected(line: ProductLine, config: EstimatorConfig) -> Self {
        let mut state = Self::new(config);
        state.selection.push(line);
        state
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step(&self) -> Step {
        let n = self.selection.len();
        match self.current_step {
            0 => Step::ModuleSelection,
            1 => Step::CompanyInfo,
            i if i >= 2 && i < n + 2 => Step::Survey(self.selection[i - 2]),
            _ => Step::Results,
        }
    }

    pub fn selection(&self) -> &[ProductLine] {
        &self.selection
    }

    pub fn company(&self) -> Option<&CompanyProfile> {
        self.company.as_ref()
    }

    pub fn input(&self, line: ProductLine) -> Option<&ProductLineInput> {
        self.inputs.get(&line)
    }

    /// Inputs of the selected lines, in selection order (missing ones skipped).
    pub fn inputs(&self) -> Vec<&ProductLineInput> {
        self.selection
            .iter()
            .filter_map(|line| self.inputs.get(line))
            .collect()
    }

    pub fn result(&self) -> Option<&TotalResult> {
        self.result.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.step() == Step::Results
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Selection + company + one survey per line + results; 1 before anything is picked.
    pub fn total_steps(&self) -> usize {
        let n = self.selection.len();
        if n > 0 { n + 3 } else { 1 }
    }

    pub fn progress(&self) -> Progress {
        let current = self.current_step + 1;
        let total = self.total_steps();
        Progress {
            current,
            total,
            percent: (current as f64 / total as f64 * 100.0).min(100.0),
        }
    }

    fn require_step(&self, action: &'static str, expected: Step) -> Result<(), WizardError> {
        let step = self.step();
        if step != expected {
            return Err(WizardError::WrongStep { action, step });
        }
        Ok(())
    }

    fn require_editable_selection(&self, action: &'static str) -> Result<(), WizardError> {
        self.require_step(action, Step::ModuleSelection)?;
        if self.selection_locked {
            return Err(WizardError::Blocked(
                "the product selection is fixed for this session; restart to change it".to_string(),
            ));
        }
        Ok(())
    }

    /// Tick or untick a product line.
    pub fn toggle(&mut self, line: ProductLine) -> Result<(), WizardError> {
        self.require_editable_selection("toggle")?;
        if let Some(pos) = self.selection.iter().position(|l| *l == line) {
            self.selection.remove(pos);
        } else {
            self.selection.push(line);
        }
        Ok(())
    }

    /// Replace the selection wholesale (first occurrence wins on duplicates).
    pub fn set_selection(&mut self, lines: &[ProductLine]) -> Result<(), WizardError> {
        self.require_editable_selection("set_selection")?;
        self.selection.clear();
        for line in lines {
            if !self.selection.contains(line) {
                self.selection.push(*line);
            }
        }
        Ok(())
    }

    /// Store the company profile (last write wins). Checked on `next()`.
    pub fn submit_company(&mut self, profile: CompanyProfile) -> Result<(), WizardError> {
        self.require_step("submit_company", Step::CompanyInfo)?;
        self.company = Some(profile);
        Ok(())
    }

    /// Store the survey answers for the line currently shown (last write wins).
    pub fn submit_input(&mut self, input: ProductLineInput) -> Result<(), WizardError> {
        self.require_step("submit_input", Step::Survey(input.line()))?;
        self.inputs.insert(input.line(), input);
        Ok(())
    }

    /// Advance one step if the current step is complete.
    ///
    /// Leaving the last survey runs the aggregator and stores the result; on
    /// `Results` this is a no-op.
    pub fn next(&mut self) -> Result<Transition, WizardError> {
        match self.step() {
            Step::Results => return Ok(Transition::Unchanged),
            Step::ModuleSelection => {
                if self.selection.is_empty() {
                    return Err(WizardError::Blocked(
                        "Please select at least one product to continue".to_string(),
                    ));
                }
                self.selection_locked = true;
            }
            Step::CompanyInfo => match &self.company {
                Some(profile) => profile.validate()?,
                None => CompanyProfile::default().validate()?,
            },
            Step::Survey(line) => match self.inputs.get(&line) {
                Some(input) => input.validate()?,
                None => ProductLineInput::empty(line).validate()?,
            },
        }

        self.current_step += 1;
        let step = self.step();
        debug!(step = %step, current_step = self.current_step, "wizard advanced");

        if step == Step::Results {
            let result = self.run_aggregator()?;
            self.result = Some(result.clone());
            return Ok(Transition::Completed(result));
        }
        Ok(Transition::Advanced(step))
    }

    fn run_aggregator(&self) -> Result<TotalResult, WizardError> {
        let inputs: Vec<ProductLineInput> = self
            .selection
            .iter()
            .map(|line| {
                self.inputs
                    .get(line)
                    .cloned()
                    .unwrap_or_else(|| ProductLineInput::empty(*line))
            })
            .collect();
        let company_rate = self.company.as_ref().and_then(|c| c.hourly_rate);
        Ok(calculate(&inputs, company_rate, &self.config)?)
    }

    /// Go back one step. Not allowed on the first step, nor once results exist.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        match self.step() {
            Step::ModuleSelection => Err(WizardError::AtFirstStep),
            Step::Results => Err(WizardError::WrongStep {
                action: "back",
                step: Step::Results,
            }),
            _ => {
                self.current_step -= 1;
                Ok(self.step())
            }
        }
    }

    /// Back to an empty wizard. The selection is cleared too.
    pub fn restart(&mut self) {
        let config = core::mem::take(&mut self.config);
        *self = Self::new(config);
        debug!("wizard restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::CompanySize;
    use roicalc_estimator::{Badge, CodeAssistInput, CrmInput};

    fn company() -> CompanyProfile {
        CompanyProfile {
            company_name: "Fabrikam".to_string(),
            industry: "technology".to_string(),
            company_size: Some(CompanySize::Medium),
            location: "Berlin".to_string(),
            hourly_rate: None,
        }
    }

    fn code_assist() -> ProductLineInput {
        ProductLineInput::CodeAssist(CodeAssistInput {
            developers: Some(20.0),
            code_reviews_per_week: Some(5.0),
            bugs_per_month: Some(8.0),
            features_per_month: Some(3.0),
            hourly_rate: Some(75.0),
        })
    }

    fn crm() -> ProductLineInput {
        ProductLineInput::Crm(CrmInput {
            sales_reps: Some(1.0),
            leads_per_week: Some(10.0),
            customer_interactions: Some(4.0),
            reports_per_month: Some(2.0),
            hourly_rate: None,
        })
    }

    #[test]
    fn empty_selection_blocks_leaving_module_selection() {
        let mut w = WizardState::default();
        let err = w.next().unwrap_err();
        assert!(matches!(err, WizardError::Blocked(_)));
        assert_eq!(w.step(), Step::ModuleSelection);
        assert!(w.result().is_none());
        assert_eq!(w.total_steps(), 1);
    }

    #[test]
    fn full_run_reaches_results_once() {
        let mut w = WizardState::default();
        w.set_selection(&[ProductLine::CodeAssist]).unwrap();
        assert_eq!(w.total_steps(), 4);

        assert_eq!(w.next().unwrap(), Transition::Advanced(Step::CompanyInfo));
        w.submit_company(company()).unwrap();
        assert_eq!(
            w.next().unwrap(),
            Transition::Advanced(Step::Survey(ProductLine::CodeAssist))
        );
        w.submit_input(code_assist()).unwrap();

        let total = match w.next().unwrap() {
            Transition::Completed(total) => total,
            other => panic!("expected completion, got {other:?}"),
        };
        assert_eq!(total.time_saved_hours, 14_520.0);
        assert_eq!(total.cost_saved, 1_089_000.0);
        assert_eq!(total.badge, Badge::Platinum);
        assert!(w.is_complete());
        assert_eq!(w.result(), Some(&total));

        // Terminal: further next() calls change nothing.
        assert_eq!(w.next().unwrap(), Transition::Unchanged);
        assert_eq!(w.result(), Some(&total));
        assert_eq!(w.current_step(), 3);
    }

    #[test]
    fn company_validation_blocks() {
        let mut w = WizardState::with_preselected(ProductLine::Crm, EstimatorConfig::default());
        w.next().unwrap();
        assert!(matches!(w.next(), Err(WizardError::Blocked(_))));

        let mut incomplete = company();
        incomplete.industry.clear();
        w.submit_company(incomplete).unwrap();
        assert!(w.next().is_err());
        assert_eq!(w.step(), Step::CompanyInfo);
    }

    #[test]
    fn survey_validation_blocks_and_names_fields() {
        let mut w = WizardState::with_preselected(ProductLine::Crm, EstimatorConfig::default());
        w.next().unwrap();
        w.submit_company(company()).unwrap();
        w.next().unwrap();

        match w.next() {
            Err(WizardError::Blocked(msg)) => assert!(msg.contains("sales_reps")),
            other => panic!("expected blocked, got {other:?}"),
        }
    }

    #[test]
    fn steps_follow_selection_order_and_back_works() {
        let mut w = WizardState::default();
        w.toggle(ProductLine::Crm).unwrap();
        w.toggle(ProductLine::CodeAssist).unwrap();
        assert_eq!(w.selection(), &[ProductLine::Crm, ProductLine::CodeAssist]);

        w.next().unwrap();
        w.submit_company(company()).unwrap();
        w.next().unwrap();
        assert_eq!(w.step(), Step::Survey(ProductLine::Crm));
        w.submit_input(crm()).unwrap();
        w.next().unwrap();
        assert_eq!(w.step(), Step::Survey(ProductLine::CodeAssist));

        assert_eq!(w.back().unwrap(), Step::Survey(ProductLine::Crm));
        assert_eq!(w.input(ProductLine::Crm), Some(&crm()));
        assert_eq!(w.back().unwrap(), Step::CompanyInfo);
        assert_eq!(w.back().unwrap(), Step::ModuleSelection);
        assert_eq!(w.back().unwrap_err(), WizardError::AtFirstStep);
    }

    #[test]
    fn selection_is_locked_after_confirming() {
        let mut w =
            WizardState::with_preselected(ProductLine::Security, EstimatorConfig::default());
        w.next().unwrap();
        w.back().unwrap();
        assert!(matches!(w.toggle(ProductLine::M365), Err(WizardError::Blocked(_))));
        assert_eq!(w.selection(), &[ProductLine::Security]);
    }

    #[test]
    fn inputs_are_last_write_wins() {
        let mut w = WizardState::with_preselected(ProductLine::Crm, EstimatorConfig::default());
        w.next().unwrap();
        w.submit_company(company()).unwrap();
        w.next().unwrap();

        w.submit_input(ProductLineInput::empty(ProductLine::Crm)).unwrap();
        w.submit_input(crm()).unwrap();
        assert_eq!(w.input(ProductLine::Crm), Some(&crm()));
    }

    #[test]
    fn wrong_step_submissions_are_rejected() {
        let mut w = WizardState::with_preselected(ProductLine::Crm, EstimatorConfig::default());
        assert!(matches!(
            w.submit_company(company()),
            Err(WizardError::WrongStep { action: "submit_company", .. })
        ));
        w.next().unwrap();
        w.submit_company(company()).unwrap();
        w.next().unwrap();
        assert!(matches!(
            w.submit_input(code_assist()),
            Err(WizardError::WrongStep { .. })
        ));
    }

    #[test]
    fn company_rate_applies_when_survey_has_none() {
        let mut w = WizardState::with_preselected(ProductLine::Crm, EstimatorConfig::default());
        w.next().unwrap();
        let mut profile = company();
        profile.hourly_rate = Some(100.0);
        w.submit_company(profile).unwrap();
        w.next().unwrap();
        w.submit_input(crm()).unwrap();

        let Transition::Completed(total) = w.next().unwrap() else {
            panic!("expected completion");
        };
        // 348 h at the company rate
        assert_eq!(total.cost_saved, 34_800.0);
    }

    #[test]
    fn back_from_results_is_refused_and_restart_clears_everything() {
        let mut w =
            WizardState::with_preselected(ProductLine::CodeAssist, EstimatorConfig::default());
        w.next().unwrap();
        w.submit_company(company()).unwrap();
        w.next().unwrap();
        w.submit_input(code_assist()).unwrap();
        w.next().unwrap();

        assert!(matches!(w.back(), Err(WizardError::WrongStep { action: "back", .. })));

        w.restart();
        assert_eq!(w.step(), Step::ModuleSelection);
        assert!(w.selection().is_empty());
        assert!(w.company().is_none());
        assert!(w.result().is_none());
        assert!(w.inputs().is_empty());
        w.toggle(ProductLine::M365).unwrap();
    }

    #[test]
    fn progress_reports_one_based_position() {
        let mut w = WizardState::default();
        w.set_selection(&[ProductLine::M365, ProductLine::Crm, ProductLine::M365]).unwrap();
        assert_eq!(w.selection().len(), 2);
        let p = w.progress();
        assert_eq!((p.current, p.total), (1, 5));
        assert_eq!(p.percent, 20.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Whatever is picked, the number of steps is n + 3 and the step index
            /// maps onto the selection in order.
            #[test]
            fn step_count_matches_selection(picks in prop::collection::vec(0usize..5, 0..8)) {
                let lines: Vec<ProductLine> = picks.iter().map(|i| ProductLine::ALL[*i]).collect();
                let mut w = WizardState::default();
                w.set_selection(&lines).unwrap();
                let n = w.selection().len();
                let expected = if n > 0 { n + 3 } else { 1 };
                prop_assert_eq!(w.total_steps(), expected);

                for (i, line) in w.selection().iter().enumerate() {
                    let mut peek = w.clone();
                    peek.current_step = i + 2;
                    prop_assert_eq!(peek.step(), Step::Survey(*line));
                }
            }
        }
    }
}
