use crate::error::TimeRangeError;
use chrono::{Datelike, NaiveDate};
use std::convert::TryFrom;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month-to-date window. `end` is exclusive, as Cost Explorer treats it.
#[derive(Debug, PartialEq)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TryFrom<NaiveDate> for TimeRange {
    type Error = TimeRangeError;

    fn try_from(today: NaiveDate) -> Result<Self, Self::Error> {
        let start = today
            .with_day(1)
            .ok_or(TimeRangeError::NoneValue(today))?;
        if start >= today {
            return Err(TimeRangeError::Empty(today));
        }

        Ok(TimeRange { start, end: today })
    }
}

impl TimeRange {
    pub fn start_date(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_date(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TimeRangeError;
    use crate::time_range::TimeRange;
    use chrono::NaiveDate;
    use std::convert::TryFrom;

    #[test]
    fn test_try_from() {
        let today = NaiveDate::from_ymd_opt(2020, 12, 19).unwrap();

        let time_range = TimeRange::try_from(today).unwrap();
        assert_eq!(
            time_range,
            TimeRange {
                start: NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2020, 12, 19).unwrap(),
            }
        );
        assert_eq!(time_range.start_date(), "2020-12-01");
        assert_eq!(time_range.end_date(), "2020-12-19");
    }

    #[test]
    fn test_try_from_end_of_leap_february() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let time_range = TimeRange::try_from(today).unwrap();
        assert_eq!(time_range.start_date(), "2024-02-01");
        assert_eq!(time_range.end_date(), "2024-02-29");
    }

    #[test]
    fn test_first_of_month_is_empty() {
        let today = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();

        assert_eq!(
            TimeRange::try_from(today).err().unwrap(),
            TimeRangeError::Empty(today)
        );
    }
}
