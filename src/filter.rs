use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::models::WeeklyAggregate;

/// Every third week becomes a range selector mark.
pub const MARK_STEP: usize = 3;
/// The selector is fixed to marks 0..=17.
pub const MAX_MARKS: usize = 18;

const DEFAULT_LO: usize = 1;
const DEFAULT_HI: usize = 16;

pub fn sample_marks(weeks: &[NaiveDate]) -> Vec<NaiveDate> {
    weeks.iter().step_by(MARK_STEP).take(MAX_MARKS).copied().collect()
}

/// Slider handle positions, as indices into the mark list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub lo: usize,
    pub hi: usize,
}

impl RangeSelection {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    /// `[1, 16]`, pulled in when the survey has fewer marks.
    pub fn default_for(mark_count: usize) -> Self {
        let last = mark_count.saturating_sub(1);
        Self {
            lo: DEFAULT_LO.min(last),
            hi: DEFAULT_HI.min(last),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub after: NaiveDate,
    pub before: NaiveDate,
}

impl DateWindow {
    pub fn from_marks(marks: &[NaiveDate], range: RangeSelection) -> Result<Self> {
        let invalid = || DashboardError::InvalidRange {
            lo: range.lo,
            hi: range.hi,
            max: marks.len().saturating_sub(1),
        };
        if range.lo > range.hi {
            return Err(invalid());
        }
        let after = *marks.get(range.lo).ok_or_else(invalid)?;
        let before = *marks.get(range.hi).ok_or_else(invalid)?;
        Ok(Self { after, before })
    }

    /// Both ends are exclusive: weeks sitting on a mark are left out.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.after && date < self.before
    }
}

pub fn filter_weeks(table: &[WeeklyAggregate], window: DateWindow) -> Vec<&WeeklyAggregate> {
    table.iter().filter(|row| window.contains(row.date)).collect()
}
