use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::aggregate;
use crate::error::{DashboardError, Result};
use crate::filter::{self, RangeSelection};
use crate::models::{RatingMetric, Ratings, Scope, SurveyRecord, WeeklyAggregate, RATING_SCALE};

const DATE_FORMAT: &str = "%Y-%m-%d";
const RATING_COLUMNS: usize = 8;

/// Loaded survey plus every table derived from it. Built once, never mutated.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<SurveyRecord>,
    teams: Vec<String>,
    company: Vec<WeeklyAggregate>,
    by_team: BTreeMap<String, Vec<WeeklyAggregate>>,
    marks: Vec<NaiveDate>,
    other_rating: String,
}

pub fn load_path(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    info!("Loading survey data from {}", path.display());
    load_reader(file)
}

pub fn load_reader<R: Read>(reader: R) -> Result<Dataset> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        employee_id: String,
        team: String,
        date: String,
        home_days: String,
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    for required in ["employee_id", "team", "date", "home_days"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DashboardError::MalformedDataset(format!(
                "missing required column `{required}`"
            )));
        }
    }

    let layout = rating_layout(&headers)?;
    let first_rating = headers.len() - RATING_COLUMNS;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row_number = index + 1;
        let raw = result?;
        let row: CsvRow = raw.deserialize(Some(&headers))?;

        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
            DashboardError::malformed(row_number, "date", format!("`{}`: {e}", row.date))
        })?;
        let home_days = parse_count(row_number, "home_days", &row.home_days)?;

        let mut ratings = Ratings::default();
        for (offset, (column, metric)) in layout.iter().enumerate() {
            let value = raw.get(first_rating + offset).unwrap_or_default();
            let rescaled = parse_count(row_number, column, value)?
                .checked_mul(RATING_SCALE)
                .ok_or_else(|| {
                    DashboardError::malformed(row_number, column, format!("`{value}` is out of range"))
                })?;
            ratings.set(*metric, rescaled);
        }

        records.push(SurveyRecord {
            employee_id: row.employee_id,
            team: row.team,
            date,
            home_days,
            ratings,
        });
    }

    let other_rating = layout
        .iter()
        .find(|(_, metric)| *metric == RatingMetric::Other)
        .map(|(column, _)| column.clone())
        .unwrap_or_default();

    Dataset::from_records(records, other_rating)
}

fn parse_count(row: usize, column: &str, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|e| DashboardError::malformed(row, column, format!("`{value}`: {e}")))
}

/// Pairs the last eight headers with metrics. One unrecognised header is
/// allowed and becomes `Other`.
fn rating_layout(headers: &csv::StringRecord) -> Result<Vec<(String, RatingMetric)>> {
    if headers.len() < RATING_COLUMNS + 4 {
        return Err(DashboardError::MalformedDataset(format!(
            "expected {} rating columns after the identifying columns, found {} columns in total",
            RATING_COLUMNS,
            headers.len()
        )));
    }

    let mut layout = Vec::with_capacity(RATING_COLUMNS);
    for column in headers.iter().skip(headers.len() - RATING_COLUMNS) {
        let metric = RatingMetric::from_column(column).unwrap_or(RatingMetric::Other);
        if layout.iter().any(|(_, seen)| *seen == metric) {
            return Err(DashboardError::MalformedDataset(format!(
                "rating column `{column}` duplicates {metric:?}"
            )));
        }
        layout.push((column.to_string(), metric));
    }
    Ok(layout)
}

impl Dataset {
    pub fn from_records(records: Vec<SurveyRecord>, other_rating: String) -> Result<Self> {
        if records.is_empty() {
            return Err(DashboardError::MalformedDataset(
                "survey contains no rows".to_string(),
            ));
        }

        let mut teams: Vec<String> = Vec::new();
        for record in &records {
            if !teams.contains(&record.team) {
                teams.push(record.team.clone());
            }
        }

        let company = aggregate::aggregate(&records);
        let by_team = teams
            .iter()
            .map(|team| {
                let table = aggregate::aggregate(records.iter().filter(|r| &r.team == team));
                (team.clone(), table)
            })
            .collect();
        let weeks: Vec<NaiveDate> = company.iter().map(|row| row.date).collect();
        let marks = filter::sample_marks(&weeks);

        let respondents: BTreeSet<&str> = records.iter().map(|r| r.employee_id.as_str()).collect();
        info!(
            "Loaded {} responses from {} employees across {} teams and {} weeks",
            records.len(),
            respondents.len(),
            teams.len(),
            company.len()
        );
        debug!("Range marks: {:?}", marks);

        Ok(Self {
            records,
            teams,
            company,
            by_team,
            marks,
            other_rating,
        })
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    /// Team names in the order they first appear in the survey.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn company(&self) -> &[WeeklyAggregate] {
        &self.company
    }

    pub fn table(&self, scope: &Scope) -> Result<&[WeeklyAggregate]> {
        match scope {
            Scope::Company => Ok(&self.company),
            Scope::Team(name) => self
                .by_team
                .get(name)
                .map(Vec::as_slice)
                .ok_or_else(|| DashboardError::UnknownTeam(name.clone())),
        }
    }

    pub fn marks(&self) -> &[NaiveDate] {
        &self.marks
    }

    pub fn default_range(&self) -> RangeSelection {
        RangeSelection::default_for(self.marks.len())
    }

    /// Marker size reference for the loneliness trace.
    pub fn size_ref(&self) -> f64 {
        let max = self.company.iter().map(|row| row.home_days).max().unwrap_or(0);
        2.0 * f64::from(max.max(1)) / 100.0
    }

    pub fn other_rating_column(&self) -> &str {
        &self.other_rating
    }
}
