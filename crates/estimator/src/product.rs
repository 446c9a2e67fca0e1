//! The product lines the calculator knows about.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use roicalc_core::DomainError;

/// One of the five AI add-ons being evaluated.
///
/// The serialized form (`m365`, `code-assist`, ...) is the stable wire identifier
/// used in URLs, stored documents and the `preselect` query parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductLine {
    /// Office productivity (mail, meetings, documents, slides).
    M365,
    /// Code assistance for developers.
    CodeAssist,
    /// Low-code app and workflow platform.
    LowCode,
    /// CRM / sales assistant.
    Crm,
    /// Security operations assistant.
    Security,
}

impl ProductLine {
    pub const ALL: [ProductLine; 5] = [
        ProductLine::M365,
        ProductLine::CodeAssist,
        ProductLine::LowCode,
        ProductLine::Crm,
        ProductLine::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductLine::M365 => "m365",
            ProductLine::CodeAssist => "code-assist",
            ProductLine::LowCode => "low-code",
            ProductLine::Crm => "crm",
            ProductLine::Security => "security",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductLine::M365 => "Office Productivity Copilot",
            ProductLine::CodeAssist => "Code Assistant Copilot",
            ProductLine::LowCode => "Low-Code Platform Copilot",
            ProductLine::Crm => "CRM Copilot",
            ProductLine::Security => "Security Copilot",
        }
    }

    /// Label for the headcount field ("users", "developers", ...).
    pub fn seat_label(&self) -> &'static str {
        match self {
            ProductLine::M365 => "employees",
            ProductLine::CodeAssist => "developers",
            ProductLine::LowCode => "business users",
            ProductLine::Crm => "sales reps",
            ProductLine::Security => "security analysts",
        }
    }
}

impl core::fmt::Display for ProductLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductLine {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductLine::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown product line: {s}")))
    }
}
