//! Regular calendar grids.

use chrono::{Datelike, Weekday};
use comove_primitives::Date;

/// Regular grid frequency for the resampled date axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every calendar day.
    Daily,
    /// Monday through Friday, no holiday calendar.
    #[default]
    BusinessDaily,
}

impl Frequency {
    /// Whether `date` lies on this grid.
    #[must_use]
    pub fn contains(self, date: Date) -> bool {
        match self {
            Self::Daily => true,
            Self::BusinessDaily => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    /// Smallest grid date at or after `date`.
    ///
    /// Saturates at the calendar's maximum representable date.
    #[must_use]
    pub fn roll_forward(self, mut date: Date) -> Date {
        while !self.contains(date) {
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        date
    }

    /// Grid dates from `start` through `end`, both rolled onto the grid,
    /// inclusive on both sides.
    #[must_use]
    pub fn range(self, start: Date, end: Date) -> Vec<Date> {
        let last = self.roll_forward(end);
        let mut cursor = self.roll_forward(start);
        let mut dates = Vec::new();
        while cursor <= last {
            dates.push(cursor);
            match cursor.succ_opt() {
                Some(next) => cursor = self.roll_forward(next),
                None => break,
            }
        }
        dates
    }
}
