use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{RatingMetric, Ratings, SurveyRecord, WeeklyAggregate};
use crate::report;

/// Metrics shown as the four satisfaction donuts, in display order.
pub const BREAKDOWN_METRICS: [RatingMetric; 4] = [
    RatingMetric::OfficeEnv,
    RatingMetric::HomeEnv,
    RatingMetric::Relationships,
    RatingMetric::Role,
];

/// Most frequent value. A frequency tie goes to the lowest value.
pub fn mode<I>(values: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(u32, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

/// Collapses records into one row per week, ascending by date.
pub fn aggregate<'a, I>(records: I) -> Vec<WeeklyAggregate>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut weeks: BTreeMap<NaiveDate, Vec<&SurveyRecord>> = BTreeMap::new();
    for record in records {
        weeks.entry(record.date).or_default().push(record);
    }

    weeks
        .into_iter()
        .map(|(date, group)| aggregate_week(date, &group))
        .collect()
}

fn aggregate_week(date: NaiveDate, group: &[&SurveyRecord]) -> WeeklyAggregate {
    // groups are built from at least one record, so every mode exists
    let home_days = mode(group.iter().map(|r| r.home_days)).unwrap_or_default();

    let mut ratings = Ratings::default();
    for metric in RatingMetric::ALL {
        let value = mode(group.iter().map(|r| r.ratings.get(metric))).unwrap_or_default();
        ratings.set(metric, value);
    }

    let mut row = WeeklyAggregate {
        date,
        home_days,
        ratings,
        summary_text: String::new(),
    };
    row.summary_text = report::hover_text(&row);
    row
}

/// Mode of each donut metric across already aggregated weeks.
pub fn breakdown_modes(rows: &[&WeeklyAggregate]) -> [Option<u32>; 4] {
    BREAKDOWN_METRICS.map(|metric| mode(rows.iter().map(|row| row.rating(metric))))
}
