use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

lazy_static! {
    /// `yyyy-MM` month keys as stored on budgets
    pub static ref MONTH_REGEX: Regex = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap();
}

/// Polarity of a transaction or category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Kind {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "INCOME",
            Kind::Expense => "EXPENSE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INCOME" => Some(Kind::Income),
            "EXPENSE" => Some(Kind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default reporting period of the dashboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            _ => None,
        }
    }

    /// Date window ending today: the day itself, the last seven days, or the
    /// month so far.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        let start = match self {
            Period::Daily => today,
            Period::Weekly => today - Duration::days(6),
            Period::Monthly => today.with_day(1).unwrap_or(today),
        };
        DateRange::from_dates(start, today)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Today",
            Period::Weekly => "Last 7 days",
            Period::Monthly => "This month",
        }
    }
}

/// Inclusive range of `yyyy-MM-dd` keys.
///
/// Bounds stay textual because the store compares dates lexicographically;
/// a month window may end on a day that does not exist (`2024-02-31`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[schema(example = "2024-06-01")]
    pub start: String,
    #[schema(example = "2024-06-30")]
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(date_key(start), date_key(end))
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A calendar month, the granularity budgets are kept at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn parse(key: &str) -> Option<Self> {
        if !MONTH_REGEX.is_match(key) {
            return None;
        }
        let (year, month) = key.split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(today())
    }

    /// Storage key, `yyyy-MM`
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Spending window `{month}-01` to `{month}-31`.
    ///
    /// Day 31 is used for every month; shorter months still match because
    /// no stored date sorts between their real last day and `-31`.
    pub fn window(&self) -> DateRange {
        let key = self.key();
        DateRange::new(format!("{key}-01"), format!("{key}-31"))
    }

    /// Month `offset` months away (negative goes back in time).
    pub fn shift(&self, offset: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + offset;
        Self {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u32,
        }
    }

    /// Short display label, e.g. `Jun`
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_else(|| self.key())
    }

    /// Long display label, e.g. `June 2024`
    pub fn long_label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.key())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        assert_eq!(Kind::parse("INCOME"), Some(Kind::Income));
        assert_eq!(Kind::parse(Kind::Expense.as_str()), Some(Kind::Expense));
        assert_eq!(Kind::parse("income"), None);
    }

    #[test]
    fn test_period_parse_rejects_unknown() {
        assert_eq!(Period::parse("weekly"), Some(Period::Weekly));
        assert_eq!(Period::parse("yearly"), None);
        assert_eq!(Period::default(), Period::Monthly);
    }

    #[test]
    fn test_period_ranges() {
        let today = date("2024-06-15");
        assert_eq!(
            Period::Daily.range(today),
            DateRange::new("2024-06-15", "2024-06-15")
        );
        assert_eq!(
            Period::Weekly.range(today),
            DateRange::new("2024-06-09", "2024-06-15")
        );
        assert_eq!(
            Period::Monthly.range(today),
            DateRange::new("2024-06-01", "2024-06-15")
        );
    }

    #[test]
    fn test_weekly_range_crosses_month_boundary() {
        assert_eq!(
            Period::Weekly.range(date("2024-03-03")),
            DateRange::new("2024-02-26", "2024-03-03")
        );
    }

    #[test]
    fn test_month_parse() {
        assert_eq!(Month::parse("2024-06"), Month::new(2024, 6));
        assert!(Month::parse("2024-13").is_none());
        assert!(Month::parse("2024-6").is_none());
        assert!(Month::parse("June").is_none());
    }

    #[test]
    fn test_month_window_uses_day_31() {
        let feb = Month::parse("2024-02").unwrap();
        assert_eq!(feb.window(), DateRange::new("2024-02-01", "2024-02-31"));
    }

    #[test]
    fn test_month_shift_across_years() {
        let jan = Month::parse("2024-01").unwrap();
        assert_eq!(jan.shift(-1).key(), "2023-12");
        assert_eq!(jan.shift(-13).key(), "2022-12");
        assert_eq!(jan.shift(11).key(), "2024-12");
        assert_eq!(jan.shift(12).key(), "2025-01");
    }

    #[test]
    fn test_month_labels() {
        let june = Month::parse("2024-06").unwrap();
        assert_eq!(june.label(), "Jun");
        assert_eq!(june.long_label(), "June 2024");
        assert_eq!(june.to_string(), "2024-06");
    }
}
