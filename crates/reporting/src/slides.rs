//! Slide deck.

use serde::{Deserialize, Serialize};

use crate::format::{currency, grouped, hours, optional};
use crate::model::{LineBreakdown, Report};

/// One slide: a title, optional subtitle lines, an optional table (first row
/// is the header) and bullet points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitle: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn title_slide(report: &Report) -> Slide {
    Slide {
        title: "AI Copilot ROI Analysis".to_string(),
        subtitle: vec![
            report.company_name.clone(),
            format!(
                "{} | {}",
                report.industry.as_deref().unwrap_or("Industry not specified"),
                report.company_size.as_deref().unwrap_or("Size not specified")
            ),
            format!("Generated: {}", report.generated_on.format("%Y-%m-%d")),
        ],
        ..Default::default()
    }
}

fn summary_slide(report: &Report) -> Slide {
    let s = &report.summary;
    let per = |annual: f64, f: fn(f64) -> String| [f(annual), f(annual / 12.0), f(annual / 365.0)];
    let daily_hours = |v: f64| format!("{v:.1} hours");

    let time = per(s.total_time_saved_hours, hours);
    let cost = per(s.total_cost_saved, currency);
    let license = per(s.license_investment_annual, currency);
    let net = per(s.net_annual_savings, currency);

    Slide {
        title: "Executive Summary".to_string(),
        table: vec![
            row(&["Metric", "Annual Value", "Monthly Value", "Daily Value"]),
            row(&["Time Saved", &time[0], &time[1], &daily_hours(s.daily_hours_saved)]),
            row(&["Cost Saved", &cost[0], &cost[1], &cost[2]]),
            row(&["License Investment", &license[0], &license[1], &license[2]]),
            row(&["Net Savings", &net[0], &net[1], &net[2]]),
            row(&["ROI Percentage", &optional(s.roi_percent, 1, "%"), "", ""]),
            row(&["Payback Period", &optional(s.payback_months, 1, " months"), "", ""]),
        ],
        bullets: vec![format!("ROI score {}/100, {} badge", s.score.round(), s.badge)],
        ..Default::default()
    }
}

fn line_slide(line: &LineBreakdown) -> Slide {
    Slide {
        title: line.name.clone(),
        table: vec![
            row(&["Metric", "Value"]),
            row(&["Users", &grouped(line.users)]),
            row(&["Annual License Cost", &currency(line.license_cost_annual)]),
            row(&["Time Saved (Annual)", &hours(line.time_saved_hours)]),
            row(&["Cost Saved (Annual)", &currency(line.cost_saved)]),
            row(&["Net Savings", &currency(line.net_annual_savings)]),
            row(&["ROI Percentage", &optional(line.roi_percent, 1, "%")]),
            row(&["Payback Period", &optional(line.break_even_months, 1, " months")]),
        ],
        bullets: line
            .activities
            .iter()
            .map(|a| format!("{}: {}/year", a.label, hours(a.annual_hours)))
            .collect(),
        ..Default::default()
    }
}

/// Title, executive summary, one slide per product line, next steps.
pub fn render_slides(report: &Report) -> Vec<Slide> {
    let mut deck = vec![title_slide(report), summary_slide(report)];
    deck.extend(report.lines.iter().map(line_slide));

    let mut ranked: Vec<&LineBreakdown> = report.lines.iter().collect();
    ranked.sort_by(|a, b| b.net_annual_savings.total_cmp(&a.net_annual_savings));
    deck.push(Slide {
        title: "Next Steps".to_string(),
        bullets: ranked
            .iter()
            .enumerate()
            .map(|(i, l)| {
                format!("{}. {} ({} net per year)", i + 1, l.name, currency(l.net_annual_savings))
            })
            .collect(),
        ..Default::default()
    });
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{completed_wizard, date};

    fn deck() -> Vec<Slide> {
        render_slides(&Report::from_wizard(&completed_wizard(), date()).unwrap())
    }

    #[test]
    fn deck_order() {
        let titles: Vec<String> = deck().into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "AI Copilot ROI Analysis",
                "Executive Summary",
                "Code Assistant Copilot",
                "Security Copilot",
                "Next Steps",
            ]
        );
    }

    #[test]
    fn summary_table_has_four_columns() {
        let deck = deck();
        let summary = &deck[1];
        assert!(summary.table.iter().all(|r| r.len() == 4));
        assert_eq!(summary.table[2][1], "$1,174,440");
        assert_eq!(summary.table[2][2], "$97,870");
    }

    #[test]
    fn title_slide_names_company_and_size_once() {
        let deck = deck();
        let title = &deck[0];
        assert_eq!(title.subtitle[0], "Northwind Traders");
        assert_eq!(title.subtitle[1], "retail | 201-1,000 employees");
        assert_eq!(title.subtitle[2], "Generated: 2026-03-02");
    }

    #[test]
    fn next_steps_rank_by_net_savings() {
        let deck = deck();
        let next = deck.last().unwrap();
        assert!(next.bullets[0].starts_with("1. Code Assistant Copilot"));
        assert!(next.bullets[1].starts_with("2. Security Copilot"));
    }
}
