use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use time::{Date, Duration, Month};

use super::DATE_SEPARATOR;

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})(?:-([0-9]{2})(?:-([0-9]{2}))?)?$").expect("valid date token regex")
});

/// A date known at least to the year. Missing parts resolve to the earliest
/// day consistent with the known ones, so `2020-10` compares as 2020-10-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartialDate {
    value: Date,
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
}

impl PartialDate {
    /// Returns `None` for a day without a month or components out of range.
    ///
    /// The day is added to the first of the month rather than checked against
    /// the calendar, so `2021-02-31` lands on 2021-03-03.
    pub fn new(year: i32, month: Option<u8>, day: Option<u8>) -> Option<Self> {
        if day.is_some() && month.is_none() {
            return None;
        }
        if month.is_some_and(|m| !(1..=12).contains(&m)) {
            return None;
        }
        if day.is_some_and(|d| !(1..=31).contains(&d)) {
            return None;
        }
        let month_start = Month::try_from(month.unwrap_or(1)).ok()?;
        let value = Date::from_calendar_date(year, month_start, 1)
            .ok()?
            .checked_add(Duration::days(i64::from(day.unwrap_or(1)) - 1))?;
        Some(Self {
            value,
            year,
            month,
            day,
        })
    }

    /// Resolved date used for ordering and threshold checks.
    pub fn value(&self) -> Date {
        self.value
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "{DATE_SEPARATOR}{month:02}")?;
            if let Some(day) = self.day {
                write!(f, "{DATE_SEPARATOR}{day:02}")?;
            }
        }
        Ok(())
    }
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. Surrounding whitespace is not
/// accepted; callers trim first.
pub fn parse_partial_date(token: &str) -> Option<PartialDate> {
    let caps = DATE_TOKEN.captures(token)?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = match caps.get(2) {
        Some(m) => Some(m.as_str().parse::<u8>().ok()?),
        None => None,
    };
    let day = match caps.get(3) {
        Some(d) => Some(d.as_str().parse::<u8>().ok()?),
        None => None,
    };
    PartialDate::new(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn year_only_resolves_to_january_first() {
        let parsed = parse_partial_date("2016").expect("year parses");
        assert_eq!(parsed.year(), 2016);
        assert_eq!(parsed.month(), None);
        assert_eq!(parsed.day(), None);
        assert_eq!(parsed.value(), date!(2016 - 01 - 01));
    }

    #[test]
    fn year_month_resolves_to_first_of_month() {
        let parsed = parse_partial_date("2020-10").expect("year-month parses");
        assert_eq!(parsed.month(), Some(10));
        assert_eq!(parsed.day(), None);
        assert_eq!(parsed.value(), date!(2020 - 10 - 01));
    }

    #[test]
    fn full_date_keeps_every_component() {
        let parsed = parse_partial_date("2019-03-07").expect("full date parses");
        assert_eq!(
            (parsed.year(), parsed.month(), parsed.day()),
            (2019, Some(3), Some(7))
        );
        assert_eq!(parsed.value(), date!(2019 - 03 - 07));
    }

    #[test]
    fn day_past_month_end_rolls_over() {
        let parsed = parse_partial_date("2021-02-31").expect("shape is valid");
        assert_eq!(parsed.value(), date!(2021 - 03 - 03));
        assert_eq!(parsed.to_string(), "2021-02-31");
    }

    #[test]
    fn rejects_tokens_of_the_wrong_shape() {
        for token in ["", "20", "2020-1", "2020/10", "2020-10-", "soon", " 2020", "2020-10-01-02"] {
            assert!(parse_partial_date(token).is_none(), "{token:?} should not parse");
        }
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(parse_partial_date("2020-13").is_none());
        assert!(parse_partial_date("2020-00").is_none());
        assert!(parse_partial_date("2020-01-00").is_none());
        assert!(parse_partial_date("2020-01-32").is_none());
    }

    #[test]
    fn day_requires_month() {
        assert!(PartialDate::new(2020, None, Some(4)).is_none());
    }

    #[test]
    fn display_pads_components() {
        let parsed = PartialDate::new(987, Some(4), Some(9)).expect("valid");
        assert_eq!(parsed.to_string(), "0987-04-09");
    }
}
