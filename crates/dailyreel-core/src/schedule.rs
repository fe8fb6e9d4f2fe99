//! Calendar and dedup decisions. Both are pure.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::item::Category;
use crate::source::TrendingCandidate;

/// `true` when `date` falls on the weekly reset day.
pub fn is_reset_day(date: NaiveDate, reset_day: Weekday) -> bool {
    date.weekday() == reset_day
}

/// A reset is due on the reset day unless one already ran on that date.
pub fn reset_due(date: NaiveDate, reset_day: Weekday, last_reset: Option<NaiveDate>) -> bool {
    is_reset_day(date, reset_day) && last_reset != Some(date)
}

/// First trending candidate not already announced in `category`.
pub fn select_candidate<'a>(
    category: Category,
    trending: &'a [TrendingCandidate],
    seen: &HashSet<(Category, u64)>,
) -> Option<&'a TrendingCandidate> {
    trending.iter().find(|c| !seen.contains(&(category, c.id)))
}
