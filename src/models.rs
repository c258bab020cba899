use chrono::NaiveDate;
use serde::Serialize;

/// Survey answers are scored 0-5 and shown as percentages.
pub const RATING_SCALE: u32 = 20;

pub const ALL_TEAMS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingMetric {
    Productivity,
    Connections,
    Loneliness,
    OfficeEnv,
    HomeEnv,
    Relationships,
    Role,
    Other,
}

impl RatingMetric {
    pub const ALL: [RatingMetric; 8] = [
        RatingMetric::Productivity,
        RatingMetric::Connections,
        RatingMetric::Loneliness,
        RatingMetric::OfficeEnv,
        RatingMetric::HomeEnv,
        RatingMetric::Relationships,
        RatingMetric::Role,
        RatingMetric::Other,
    ];

    /// Maps a header to a known metric. `Other` is never returned here; the
    /// loader assigns it to the one column left over.
    pub fn from_column(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "productivity" => Some(Self::Productivity),
            "connections" | "connection" => Some(Self::Connections),
            "loneliness" | "lonliness" => Some(Self::Loneliness),
            "office_env" => Some(Self::OfficeEnv),
            "home_env" => Some(Self::HomeEnv),
            "relationships" => Some(Self::Relationships),
            "role" => Some(Self::Role),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Ratings([u32; 8]);

impl Ratings {
    pub fn get(&self, metric: RatingMetric) -> u32 {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: RatingMetric, value: u32) {
        self.0[metric.index()] = value;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRecord {
    pub employee_id: String,
    pub team: String,
    pub date: NaiveDate,
    pub home_days: u32,
    /// Already rescaled to 0-100.
    pub ratings: Ratings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyAggregate {
    pub date: NaiveDate,
    pub home_days: u32,
    pub ratings: Ratings,
    pub summary_text: String,
}

impl WeeklyAggregate {
    pub fn rating(&self, metric: RatingMetric) -> u32 {
        self.ratings.get(metric)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Company,
    Team(String),
}

impl Scope {
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_TEAMS {
            Scope::Company
        } else {
            Scope::Team(selection.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Scope::Company => ALL_TEAMS,
            Scope::Team(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_accepts_historic_spelling() {
        assert_eq!(
            RatingMetric::from_column("lonliness"),
            Some(RatingMetric::Loneliness)
        );
        assert_eq!(
            RatingMetric::from_column(" Office_Env "),
            Some(RatingMetric::OfficeEnv)
        );
        assert_eq!(RatingMetric::from_column("wellbeing"), None);
    }

    #[test]
    fn ratings_are_indexed_by_metric() {
        let mut ratings = Ratings::default();
        ratings.set(RatingMetric::Role, 60);
        ratings.set(RatingMetric::Other, 100);
        assert_eq!(ratings.get(RatingMetric::Role), 60);
        assert_eq!(ratings.get(RatingMetric::Other), 100);
        assert_eq!(ratings.get(RatingMetric::Productivity), 0);
    }

    #[test]
    fn all_sentinel_selects_company() {
        assert_eq!(Scope::from_selection("All"), Scope::Company);
        assert_eq!(
            Scope::from_selection("Engineering"),
            Scope::Team("Engineering".to_string())
        );
        assert_eq!(Scope::Team("Sales".to_string()).label(), "Sales");
    }
}
