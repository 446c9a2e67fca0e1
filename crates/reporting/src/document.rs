//! Paginated text document.

use serde::{Deserialize, Serialize};

use crate::format::{cadence, currency, grouped, hours, optional, optional_currency};
use crate::model::{LineBreakdown, Report};

/// Body lines a page holds before it overflows onto a continuation page.
pub const LINES_PER_PAGE: usize = 40;

const RECOMMENDATIONS: [&str; 6] = [
    "1. Start with the highest ROI product lines first",
    "2. Roll out in phases to maximise adoption",
    "3. Provide training so teams realise the full benefit",
    "4. Monitor usage metrics and productivity gains",
    "5. Establish governance and best practices",
    "6. Review and optimise usage regularly",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub title: String,
    pub lines: Vec<String>,
}

impl core::fmt::Display for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "-- page {} --", self.number)
    }
}

/// Collects sections and splits them into numbered pages.
struct PageBuilder {
    pages: Vec<Page>,
}

impl PageBuilder {
    fn new() -> Self {
        Self { pages: Vec::new() }
    }

    fn section(&mut self, title: &str, lines: Vec<String>) {
        if lines.is_empty() {
            self.push(title.to_string(), Vec::new());
            return;
        }
        for (i, chunk) in lines.chunks(LINES_PER_PAGE).enumerate() {
            let title = if i == 0 {
                title.to_string()
            } else {
                format!("{title} (cont.)")
            };
            self.push(title, chunk.to_vec());
        }
    }

    fn push(&mut self, title: String, lines: Vec<String>) {
        let number = self.pages.len() + 1;
        self.pages.push(Page { number, title, lines });
    }

    fn finish(self) -> Vec<Page> {
        self.pages
    }
}

fn summary_lines(report: &Report) -> Vec<String> {
    let s = &report.summary;
    vec![
        report.company_name.clone(),
        format!("Generated on: {}", report.generated_on.format("%Y-%m-%d")),
        format!("Industry: {}", report.industry.as_deref().unwrap_or("Not specified")),
        format!("Company Size: {}", report.company_size.as_deref().unwrap_or("Not specified")),
        String::new(),
        "Executive Summary".to_string(),
        format!("Total Annual Time Saved: {}", hours(s.total_time_saved_hours)),
        format!("Total Annual Cost Saved: {}", currency(s.total_cost_saved)),
        format!("Total Annual License Investment: {}", currency(s.license_investment_annual)),
        format!("Net Annual Savings: {}", currency(s.net_annual_savings)),
        format!("ROI Percentage: {}", optional(s.roi_percent, 1, "%")),
        format!("Payback Period: {}", optional(s.payback_months, 1, " months")),
        format!("Daily Time Savings: {:.1} hours", s.daily_hours_saved),
        format!("Weekly Time Savings: {}", hours(s.weekly_hours_saved)),
        format!("Monthly Cost Savings: {}", currency(s.monthly_cost_saved)),
        format!("ROI Score: {}/100", s.score.round()),
        format!("Efficiency Badge: {}", s.badge),
    ]
}

fn line_lines(line: &LineBreakdown) -> Vec<String> {
    let mut out = vec![
        "Investment Analysis".to_string(),
        format!("  Users: {}", grouped(line.users)),
        format!("  Hourly Rate: {}", currency(line.hourly_rate)),
        format!("  Monthly License Cost: {}", currency(line.license_cost_monthly)),
        format!("  Annual License Cost: {}", currency(line.license_cost_annual)),
        format!("  Annual Time Saved: {}", hours(line.time_saved_hours)),
        format!("  Annual Cost Saved: {}", currency(line.cost_saved)),
        format!("  Net Annual Savings: {}", currency(line.net_annual_savings)),
        format!("  ROI Percentage: {}", optional(line.roi_percent, 1, "%")),
        format!("  Cost per Hour Saved: {}", optional_currency(line.cost_per_hour_saved)),
        format!("  Break-even Point: {}", optional(line.break_even_months, 1, " months")),
        String::new(),
        "Detailed Time Savings Analysis".to_string(),
    ];

    for activity in &line.activities {
        out.push(format!("  {}", activity.label));
        out.push(format!(
            "    Volume: {} per {} per user, {} hours saved each",
            activity.count,
            cadence(activity.cadence),
            activity.hours_saved_per_unit
        ));
        out.push(format!("    Time Saved: {}/year", hours(activity.annual_hours)));
        out.push(format!("    Cost Saved: {}", currency(activity.annual_cost)));
    }
    out
}

/// Title page with the executive summary, one page per product line, then
/// the recommendations. Sections longer than [`LINES_PER_PAGE`] continue on
/// the next page.
pub fn render_document(report: &Report) -> Vec<Page> {
    let mut pages = PageBuilder::new();
    pages.section("AI Copilot ROI Report", summary_lines(report));
    for line in &report.lines {
        pages.section(&line.name, line_lines(line));
    }
    pages.section(
        "Implementation Recommendations",
        RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
    );
    pages.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{completed_wizard, date};
    use proptest::prelude::*;

    fn report() -> Report {
        Report::from_wizard(&completed_wizard(), date()).unwrap()
    }

    #[test]
    fn layout_is_summary_lines_then_recommendations() {
        let pages = render_document(&report());
        let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "AI Copilot ROI Report",
                "Code Assistant Copilot",
                "Security Copilot",
                "Implementation Recommendations",
            ]
        );
        assert!(pages.iter().enumerate().all(|(i, p)| p.number == i + 1));
    }

    #[test]
    fn summary_page_prints_totals() {
        let pages = render_document(&report());
        let first = &pages[0];
        assert!(first.lines.contains(&"Northwind Traders".to_string()));
        assert!(first.lines.contains(&"Generated on: 2026-03-02".to_string()));
        assert!(first.lines.contains(&"Total Annual Cost Saved: $1,174,440".to_string()));
        assert!(first.lines.contains(&"Efficiency Badge: Platinum".to_string()));
    }

    #[test]
    fn line_page_prints_investment_and_activities() {
        let pages = render_document(&report());
        let code = &pages[1];
        assert!(code.lines.contains(&"  Annual License Cost: $2,400".to_string()));
        assert!(code.lines.contains(&"  ROI Percentage: 45275.0%".to_string()));
        assert!(code.lines.contains(&"  Code review".to_string()));
        assert!(code.lines.contains(&"    Time Saved: 7,800 hours/year".to_string()));
    }

    #[test]
    fn long_sections_overflow_onto_continuation_pages() {
        let mut pages = PageBuilder::new();
        let lines: Vec<String> = (0..LINES_PER_PAGE + 5).map(|i| i.to_string()).collect();
        pages.section("Long", lines);
        let pages = pages.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), LINES_PER_PAGE);
        assert_eq!(pages[1].title, "Long (cont.)");
        assert_eq!(pages[1].lines.len(), 5);
    }

    #[test]
    fn page_display_includes_footer() {
        let page = Page {
            number: 3,
            title: "Title".to_string(),
            lines: vec!["body".to_string()],
        };
        assert_eq!(page.to_string(), "Title\n=====\nbody\n-- page 3 --");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Pages are numbered 1..=n, never exceed the page size and keep
        /// every line in order.
        #[test]
        fn pagination_keeps_every_line(sections in prop::collection::vec(0usize..130, 1..6)) {
            let mut builder = PageBuilder::new();
            let mut expected = Vec::new();
            for (s, len) in sections.iter().enumerate() {
                let lines: Vec<String> = (0..*len).map(|i| format!("s{s} l{i}")).collect();
                expected.extend(lines.iter().cloned());
                builder.section(&format!("Section {s}"), lines);
            }
            let pages = builder.finish();

            let numbers: Vec<usize> = pages.iter().map(|p| p.number).collect();
            prop_assert_eq!(numbers, (1..=pages.len()).collect::<Vec<_>>());
            prop_assert!(pages.iter().all(|p| p.lines.len() <= LINES_PER_PAGE));

            let min_pages: usize = sections.iter().map(|n| n.div_ceil(LINES_PER_PAGE).max(1)).sum();
            prop_assert_eq!(pages.len(), min_pages);

            let printed: Vec<String> = pages.into_iter().flat_map(|p| p.lines).collect();
            prop_assert_eq!(printed, expected);
        }
    }
}
