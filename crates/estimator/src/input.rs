//! Strongly-typed survey records, one per product line.
//!
//! Every numeric field is optional: a missing value counts as zero in the
//! formulas. Whether a step may be left is decided by [`ProductLineInput::validate`],
//! which the wizard calls before advancing.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use roicalc_core::{DomainError, DomainResult};

use crate::product::ProductLine;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct M365Input {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meetings_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentations_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeAssistInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developers: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_reviews_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bugs_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowCodeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_users: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_reps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads_per_week: Option<f64>,
    /// Logged customer interactions per week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_interactions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_analysts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threats_per_week: Option<f64>,
    /// Compliance checks per month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_checks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

/// Survey answers for one product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "kebab-case")]
pub enum ProductLineInput {
    M365(M365Input),
    CodeAssist(CodeAssistInput),
    LowCode(LowCodeInput),
    Crm(CrmInput),
    Security(SecurityInput),
}

impl ProductLineInput {
    /// An empty record for `line` (every field missing).
    pub fn empty(line: ProductLine) -> Self {
        match line {
            ProductLine::M365 => Self::M365(M365Input::default()),
            ProductLine::CodeAssist => Self::CodeAssist(CodeAssistInput::default()),
            ProductLine::LowCode => Self::LowCode(LowCodeInput::default()),
            ProductLine::Crm => Self::Crm(CrmInput::default()),
            ProductLine::Security => Self::Security(SecurityInput::default()),
        }
    }

    /// Decode an untagged JSON object as the record for `line`.
    pub fn from_json(line: ProductLine, value: JsonValue) -> DomainResult<Self> {
        fn decode<T: serde::de::DeserializeOwned>(
            line: ProductLine,
            value: JsonValue,
        ) -> DomainResult<T> {
            serde_json::from_value(value)
                .map_err(|e| DomainError::validation(format!("invalid {line} survey: {e}")))
        }

        Ok(match line {
            ProductLine::M365 => Self::M365(decode(line, value)?),
            ProductLine::CodeAssist => Self::CodeAssist(decode(line, value)?),
            ProductLine::LowCode => Self::LowCode(decode(line, value)?),
            ProductLine::Crm => Self::Crm(decode(line, value)?),
            ProductLine::Security => Self::Security(decode(line, value)?),
        })
    }

    pub fn line(&self) -> ProductLine {
        match self {
            Self::M365(_) => ProductLine::M365,
            Self::CodeAssist(_) => ProductLine::CodeAssist,
            Self::LowCode(_) => ProductLine::LowCode,
            Self::Crm(_) => ProductLine::Crm,
            Self::Security(_) => ProductLine::Security,
        }
    }

    pub fn hourly_rate(&self) -> Option<f64> {
        match self {
            Self::M365(i) => i.hourly_rate,
            Self::CodeAssist(i) => i.hourly_rate,
            Self::LowCode(i) => i.hourly_rate,
            Self::Crm(i) => i.hourly_rate,
            Self::Security(i) => i.hourly_rate,
        }
    }

    /// Number of seats the line is evaluated for (missing ⇒ 0).
    pub fn headcount(&self) -> f64 {
        let seats = match self {
            Self::M365(i) => i.employees,
            Self::CodeAssist(i) => i.developers,
            Self::LowCode(i) => i.business_users,
            Self::Crm(i) => i.sales_reps,
            Self::Security(i) => i.security_analysts,
        };
        non_negative(seats)
    }

    /// Fields that must be filled in (present, finite, > 0) before the survey step
    /// can be left.
    pub fn required_fields(&self) -> Vec<(&'static str, Option<f64>)> {
        match self {
            Self::M365(i) => vec![
                ("employees", i.employees),
                ("emails_per_day", i.emails_per_day),
                ("meetings_per_week", i.meetings_per_week),
                ("documents_per_week", i.documents_per_week),
                ("presentations_per_month", i.presentations_per_month),
            ],
            Self::CodeAssist(i) => vec![
                ("developers", i.developers),
                ("code_reviews_per_week", i.code_reviews_per_week),
                ("bugs_per_month", i.bugs_per_month),
                ("features_per_month", i.features_per_month),
            ],
            Self::LowCode(i) => vec![
                ("business_users", i.business_users),
                ("apps_per_month", i.apps_per_month),
                ("flows_per_month", i.flows_per_month),
                ("reports_per_week", i.reports_per_week),
            ],
            Self::Crm(i) => vec![
                ("sales_reps", i.sales_reps),
                ("leads_per_week", i.leads_per_week),
                ("customer_interactions", i.customer_interactions),
                ("reports_per_month", i.reports_per_month),
            ],
            Self::Security(i) => vec![
                ("security_analysts", i.security_analysts),
                ("incidents_per_month", i.incidents_per_month),
                ("threats_per_week", i.threats_per_week),
                ("compliance_checks", i.compliance_checks),
            ],
        }
    }

    /// Step-local validation; the message is meant to be shown to the visitor as is.
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&str> = self
            .required_fields()
            .into_iter()
            .filter(|(_, value)| !matches!(value, Some(v) if v.is_finite() && *v > 0.0))
            .map(|(name, _)| name)
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "please fill in all required fields for {}: {}",
                self.line().display_name(),
                missing.join(", ")
            )));
        }

        if let Some(rate) = self.hourly_rate() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(DomainError::validation(
                    "hourly_rate must be a non-negative number",
                ));
            }
        }

        Ok(())
    }
}

/// Missing, negative and non-finite counts contribute nothing.
pub(crate) fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
