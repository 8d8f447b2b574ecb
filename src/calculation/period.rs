use jiff::civil::Date;

use crate::prelude::*;

/// An inclusive range of calendar days, the unit every report is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day, inclusive.
    pub start: Date,

    /// Last day, inclusive.
    pub end: Date,
}

impl DateRange {
    /// The whole calendar month before the one `today` belongs to.
    ///
    /// `today` is passed in rather than read from the clock so month boundaries can be tested.
    pub fn previous_month(today: Date) -> Self {
        // The day before the 1st is always the last day of the previous month,
        // so there is no way to roll back two months here.
        let end = today
            .first_of_month()
            .yesterday()
            .expect("Only the first month of year -9999 has no previous month.");
        let start = end.first_of_month();

        DateRange { start, end }
    }

    /// The first day after the range, for APIs that take an exclusive end.
    pub fn exclusive_end(&self) -> AppResult<Date> {
        self.end.tomorrow().into_diagnostic()
    }

    /// "YYYY-MM-DD".
    pub fn start_string(&self) -> String {
        self.start.to_string()
    }

    /// "YYYY-MM-DD".
    pub fn end_string(&self) -> String {
        self.end.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn leap_year_february() {
        let range = DateRange::previous_month(date(2024, 3, 15));

        assert_eq!(range.start_string(), "2024-02-01");
        assert_eq!(range.end_string(), "2024-02-29");
    }

    #[test]
    fn rolls_over_the_year() {
        let range = DateRange::previous_month(date(2024, 1, 10));

        assert_eq!(range.start_string(), "2023-12-01");
        assert_eq!(range.end_string(), "2023-12-31");
    }

    #[test]
    fn first_day_of_month_only_goes_back_one_month() {
        let range = DateRange::previous_month(date(2024, 5, 1));

        assert_eq!(range.start_string(), "2024-04-01");
        assert_eq!(range.end_string(), "2024-04-30");
    }

    #[test]
    fn last_day_of_month_stays_in_the_previous_month() {
        let range = DateRange::previous_month(date(2023, 3, 31));

        assert_eq!(range.start, date(2023, 2, 1));
        assert_eq!(range.end, date(2023, 2, 28));
    }

    #[test]
    fn works_without_an_error_path_far_back_in_time() {
        let range = DateRange::previous_month(date(1, 1, 10));

        assert_eq!(range.start, date(0, 12, 1));
        assert_eq!(range.end, date(0, 12, 31));
    }

    #[test]
    #[should_panic(expected = "no previous month")]
    fn only_the_first_representable_month_has_no_predecessor() {
        DateRange::previous_month(date(-9999, 1, 20));
    }

    #[test]
    fn exclusive_end_is_the_first_of_the_current_month() {
        let range = DateRange::previous_month(date(2024, 3, 15));

        assert_eq!(range.exclusive_end().unwrap(), date(2024, 3, 1));
    }
}
