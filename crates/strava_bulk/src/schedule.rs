//! Calendar-day iteration over a date range with skip classification.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Why a visited day produces no activities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Saturday or Sunday while `--ignoreWeekEnd` is set.
    Weekend,
    /// The day matches the `--except` date.
    Except,
}

/// One visited calendar day. Skipped days are reported, not omitted, so
/// the caller can log the reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedDay {
    pub date: NaiveDate,
    pub skip: Option<SkipReason>,
}

impl PlannedDay {
    pub fn is_active(&self) -> bool {
        self.skip.is_none()
    }
}

/// Iterator over every calendar day `d` with `start <= d < end`, in
/// ascending order, one day per step. The range is half-open at day
/// resolution, so an empty or inverted range yields nothing.
#[derive(Clone, Debug)]
pub struct DateRangeWalker {
    cursor: NaiveDate,
    end: NaiveDate,
    ignore_weekends: bool,
    except: Option<NaiveDate>,
}

impl DateRangeWalker {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        ignore_weekends: bool,
        except: Option<NaiveDate>,
    ) -> Self {
        Self {
            cursor: start,
            end,
            ignore_weekends,
            except,
        }
    }

    fn classify(&self, date: NaiveDate) -> Option<SkipReason> {
        if self.ignore_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Some(SkipReason::Weekend);
        }
        if self.except == Some(date) {
            return Some(SkipReason::Except);
        }
        None
    }
}

impl Iterator for DateRangeWalker {
    type Item = PlannedDay;

    fn next(&mut self) -> Option<PlannedDay> {
        if self.cursor >= self.end {
            return None;
        }
        let date = self.cursor;
        // Advancing by exactly one day per step guarantees termination.
        self.cursor = date.checked_add_days(Days::new(1))?;
        Some(PlannedDay {
            date,
            skip: self.classify(date),
        })
    }
}
