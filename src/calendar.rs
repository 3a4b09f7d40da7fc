use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::category::Category;
use crate::error::{CalendarError, CalendarResult};
use crate::lookup::HolidayStatus;

/// First full year of the Gregorian calendar.
pub const MIN_YEAR: i32 = 1583;
pub const MAX_YEAR: i32 = 9999;

/// Inclusive Jan 1 ..= Dec 31 span of a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl YearSpan {
    pub fn new(year: i32) -> CalendarResult<Self> {
        let invalid = || CalendarError::InvalidYear {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid());
        }
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
        Ok(Self { year, start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_leap(&self) -> bool {
        NaiveDate::from_ymd_opt(self.year, 2, 29).is_some()
    }

    pub fn len(&self) -> usize {
        if self.is_leap() { 366 } else { 365 }
    }

    /// Every date of the year in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        let end = self.end;
        let mut current = Some(start);
        std::iter::from_fn(move || {
            let date = current?;
            current = if date < end {
                Some(date + Duration::days(1))
            } else {
                None
            };
            Some(date)
        })
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Wire format expected by the holiday service.
pub fn format_lookup_date(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

/// Holiday beats weekend, weekend beats workday.
pub fn classify_day(date: NaiveDate, status: &HolidayStatus) -> (Category, Option<String>) {
    if status.is_holiday {
        (Category::Holiday, Some(status.label.clone()))
    } else if is_weekend(date) {
        (Category::Weekend, None)
    } else {
        (Category::Workday, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn not_holiday() -> HolidayStatus {
        HolidayStatus::new(false, "No es Festivo")
    }

    #[test]
    fn leap_year_spans_366_days() {
        let span = YearSpan::new(2024).unwrap();
        let days: Vec<_> = span.days().collect();
        assert_eq!(days.len(), 366);
        assert_eq!(span.len(), 366);
        assert_eq!(days.first().copied(), Some(d(2024, 1, 1)));
        assert_eq!(days.last().copied(), Some(d(2024, 12, 31)));
        assert_eq!(days.iter().filter(|date| **date == d(2024, 2, 29)).count(), 1);
    }

    #[test]
    fn common_year_has_no_feb_29() {
        let span = YearSpan::new(2025).unwrap();
        assert_eq!(span.days().count(), 365);
        assert!(!span.is_leap());
        assert!(span.days().all(|date| !(date.month() == 2 && date.day() == 29)));
    }

    #[test]
    fn rejects_years_out_of_range() {
        assert!(matches!(
            YearSpan::new(1582),
            Err(CalendarError::InvalidYear { year: 1582, .. })
        ));
        assert!(YearSpan::new(10_000).is_err());
        assert!(YearSpan::new(-4).is_err());
        assert!(YearSpan::new(MIN_YEAR).is_ok());
        assert!(YearSpan::new(MAX_YEAR).is_ok());
    }

    #[test]
    fn formats_dates_with_slashes() {
        assert_eq!(format_lookup_date(d(2024, 7, 6)), "2024/07/06");
    }

    #[test]
    fn saturday_without_holiday_is_weekend() {
        // 2024-07-06 is a Saturday
        let (category, description) = classify_day(d(2024, 7, 6), &not_holiday());
        assert_eq!(category, Category::Weekend);
        assert_eq!(description, None);
    }

    #[test]
    fn holiday_wins_over_weekend() {
        let status = HolidayStatus::new(true, "Es Festivo");
        let (category, description) = classify_day(d(2024, 7, 6), &status);
        assert_eq!(category, Category::Holiday);
        assert_eq!(description.as_deref(), Some("Es Festivo"));
    }

    #[test]
    fn weekday_without_holiday_is_workday() {
        // 2024-07-08 is a Monday
        let (category, _) = classify_day(d(2024, 7, 8), &not_holiday());
        assert_eq!(category, Category::Workday);
    }
}
