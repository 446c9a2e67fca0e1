use serde::{Deserialize, Serialize};

use roicalc_core::{DomainError, DomainResult};

/// Company size bracket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-1000")]
    Large,
    #[serde(rename = "1001-5000")]
    Enterprise,
    #[serde(rename = "5000+")]
    Global,
}

impl CompanySize {
    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Micro => "1-10 employees",
            CompanySize::Small => "11-50 employees",
            CompanySize::Medium => "51-200 employees",
            CompanySize::Large => "201-1,000 employees",
            CompanySize::Enterprise => "1,001-5,000 employees",
            CompanySize::Global => "5,000+ employees",
        }
    }
}

/// Who the estimate is for. Required before any product survey is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub company_size: Option<CompanySize>,
    pub location: String,
    /// Organisation-wide hourly rate; used when a survey leaves its own rate empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

impl CompanyProfile {
    pub fn validate(&self) -> DomainResult<()> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.company_name)
            || blank(&self.industry)
            || self.company_size.is_none()
            || blank(&self.location)
        {
            return Err(DomainError::validation(
                "Please fill in all required fields \
                 (Company Name, Industry, Company Size, and Location)",
            ));
        }

        if let Some(rate) = self.hourly_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(DomainError::validation(
                    "hourly_rate must be a non-negative number",
                ));
            }
        }
        Ok(())
    }

    /// Name to print on reports.
    pub fn display_name(&self) -> &str {
        let name = self.company_name.trim();
        if name.is_empty() { "Your Organization" } else { name }
    }
}
