use tracing::debug;

use crate::aggregate;
use crate::charts::{Breakdown, ChartData, TimeSeries};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::{self, DateWindow, RangeSelection};
use crate::models::{Scope, WeeklyAggregate};

/// Recomputes all five charts for one control change.
///
/// Pure over the shared `Dataset`: the same selection always produces equal
/// chart data, and nothing is cached or mutated between calls.
pub fn update(dataset: &Dataset, team_selection: &str, range: RangeSelection) -> Result<ChartData> {
    let scope = Scope::from_selection(team_selection);
    let table = dataset.table(&scope)?;
    let window = DateWindow::from_marks(dataset.marks(), range)?;
    let rows = filter::filter_weeks(table, window);

    debug!(
        "Recomputed {} ({} to {}): {} weeks",
        scope.label(),
        window.after,
        window.before,
        rows.len()
    );

    Ok(build(dataset, &scope, &rows))
}

/// Charts shown before any interaction: the whole company, unfiltered.
pub fn initial(dataset: &Dataset) -> ChartData {
    let rows: Vec<&WeeklyAggregate> = dataset.company().iter().collect();
    build(dataset, &Scope::Company, &rows)
}

fn build(dataset: &Dataset, scope: &Scope, rows: &[&WeeklyAggregate]) -> ChartData {
    ChartData {
        time_series: TimeSeries::from_rows(scope, rows, dataset.size_ref()),
        breakdowns: Breakdown::all(aggregate::breakdown_modes(rows)),
    }
}
