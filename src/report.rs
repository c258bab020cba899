use std::fmt::Write;

use crate::aggregate::{self, BREAKDOWN_METRICS};
use crate::charts::BREAKDOWN_TITLES;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::{self, DateWindow, RangeSelection};
use crate::models::{RatingMetric, Scope, WeeklyAggregate};

/// Hover label for one aggregated week.
pub fn hover_text(row: &WeeklyAggregate) -> String {
    format!(
        "Week of {}<br>Days WFH: {}<br>Productivity: {}%<br>Team Connection: {}%<br>Loneliness: {}%<br>",
        row.date,
        row.home_days,
        row.rating(RatingMetric::Productivity),
        row.rating(RatingMetric::Connections),
        row.rating(RatingMetric::Loneliness),
    )
}

pub fn build_report(dataset: &Dataset, scope: &Scope, range: RangeSelection) -> Result<String> {
    let table = dataset.table(scope)?;
    let window = DateWindow::from_marks(dataset.marks(), range)?;
    let rows = filter::filter_weeks(table, window);
    let breakdowns = aggregate::breakdown_modes(&rows);

    let mut output = String::new();
    let scope_label = match scope {
        Scope::Company => "the whole company",
        Scope::Team(name) => name.as_str(),
    };

    let _ = writeln!(output, "# VirtuOffice Weekly Report");
    let _ = writeln!(
        output,
        "Generated for {} (weeks after {} and before {})",
        scope_label, window.after, window.before
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Employee Satisfaction");

    if rows.is_empty() {
        let _ = writeln!(output, "No weeks recorded for this window.");
    } else {
        for ((title, metric), value) in BREAKDOWN_TITLES
            .iter()
            .zip(BREAKDOWN_METRICS)
            .zip(breakdowns)
        {
            if let Some(value) = value {
                let _ = writeln!(output, "- {title} ({metric:?}): {value}%");
            }
        }

        let other = dataset.other_rating_column();
        if let Some(value) = aggregate::mode(rows.iter().map(|r| r.rating(RatingMetric::Other))) {
            if !other.is_empty() {
                let _ = writeln!(output, "- {other}: {value}%");
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Modes");

    if rows.is_empty() {
        let _ = writeln!(output, "No weeks recorded for this window.");
    } else {
        for row in &rows {
            let _ = writeln!(
                output,
                "- {}: {} days WFH, productivity {}%, team connection {}%, loneliness {}%",
                row.date,
                row.home_days,
                row.rating(RatingMetric::Productivity),
                row.rating(RatingMetric::Connections),
                row.rating(RatingMetric::Loneliness),
            );
        }
    }

    Ok(output)
}
