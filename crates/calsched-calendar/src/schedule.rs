use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::constants::MAX_YEAR;
use crate::event::Event;

impl Event {
    /// Whether the minute containing `at` is selected. Seconds are ignored,
    /// like in the schedulers this crate writes to.
    pub fn matches(&self, at: NaiveDateTime) -> bool {
        self.year.matches(at.year() as u32)
            && self.month.matches(at.month())
            && self.day.matches(at.day())
            && self.weekday.matches(at.weekday().number_from_monday())
            && self.hour.matches(at.hour())
            && self.minute.matches(at.minute())
    }

    /// First matching minute at or after `from` (truncated to the minute).
    ///
    /// Returns `None` once the search passes the last representable year,
    /// e.g. for `2003-*-*` asked from 2006.
    pub fn next(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut current = from.with_second(0)?.with_nanosecond(0)?;
        loop {
            if current.year() as u32 > MAX_YEAR {
                return None;
            }
            if !self.year.matches(current.year() as u32) {
                current = start_of_day(current.year() + 1, 1, 1)?;
                continue;
            }
            if !self.month.matches(current.month()) {
                current = start_of_next_month(current)?;
                continue;
            }
            if !self.day.matches(current.day())
                || !self.weekday.matches(current.weekday().number_from_monday())
            {
                current = current.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !self.hour.matches(current.hour()) {
                current = current.with_minute(0)? + Duration::hours(1);
                continue;
            }
            if !self.minute.matches(current.minute()) {
                current += Duration::minutes(1);
                continue;
            }
            return Some(current);
        }
    }

    /// Matching minutes in `(start, end]`.
    pub fn occurrences_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<NaiveDateTime> {
        let mut found = Vec::new();
        let mut cursor = start;
        while let Some(at) = self.next(cursor) {
            if at > end {
                break;
            }
            if at > start {
                found.push(at);
            }
            cursor = at + Duration::minutes(1);
        }
        found
    }

    /// The one instant described by the event, when every date and time
    /// field holds a single value (seconds may be left empty).
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        let second = if self.second.has_value() {
            self.second.single_value()?
        } else {
            0
        };
        NaiveDate::from_ymd_opt(
            self.year.single_value()? as i32,
            self.month.single_value()?,
            self.day.single_value()?,
        )?
        .and_hms_opt(
            self.hour.single_value()?,
            self.minute.single_value()?,
            second,
        )
    }
}

fn start_of_day(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn start_of_next_month(at: NaiveDateTime) -> Option<NaiveDateTime> {
    match at.month() {
        12 => start_of_day(at.year() + 1, 1, 1),
        month => start_of_day(at.year(), month + 1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn next(expr: &str, from: &str) -> Option<NaiveDateTime> {
        Event::parse(expr).unwrap().next(at(from))
    }

    const REF: &str = "2006-01-02 15:04:05";

    // -----------------------------------------------------------------------
    // next
    // -----------------------------------------------------------------------

    #[test]
    fn next_wildcards_start_at_current_minute() {
        assert_eq!(next("*:*:*", REF), Some(at("2006-01-02 15:04:00")));
        assert_eq!(next("*:*:11", REF), Some(at("2006-01-02 15:04:00")));
    }

    #[test]
    fn next_later_in_the_day() {
        assert_eq!(next("*:05", REF), Some(at("2006-01-02 15:05:00")));
        assert_eq!(next("16:00", REF), Some(at("2006-01-02 16:00:00")));
        assert_eq!(next("*:00", REF), Some(at("2006-01-02 16:00:00")));
    }

    #[test]
    fn next_rolls_over_days_months_and_years() {
        assert_eq!(next("*-01", REF), Some(at("2006-02-01 00:00:00")));
        assert_eq!(next("15:00", REF), Some(at("2006-01-03 15:00:00")));
        assert_eq!(next("tue", REF), Some(at("2006-01-03 00:00:00")));
        assert_eq!(next("01-01", REF), Some(at("2007-01-01 00:00:00")));
        assert_eq!(next("2008-*-*", REF), Some(at("2008-01-01 00:00:00")));
    }

    #[test]
    fn next_in_the_past_is_none() {
        assert_eq!(next("2003-*-*", REF), None);
    }

    #[test]
    fn next_impossible_date_is_none() {
        assert_eq!(next("02-31", REF), None);
    }

    #[test]
    fn next_weekday_and_day_must_both_match() {
        // 2006-09-01 is the first Friday the 1st after the reference
        assert_eq!(next("Fri *-*-01", REF), Some(at("2006-09-01 00:00:00")));
    }

    // -----------------------------------------------------------------------
    // matches / occurrences
    // -----------------------------------------------------------------------

    #[test]
    fn matches_ignores_seconds() {
        let event = Event::parse("Mon 15:04:30").unwrap();
        assert!(event.matches(at(REF)));
        assert!(!event.matches(at("2006-01-03 15:04:00")));
    }

    #[test]
    fn occurrences_every_quarter_hour() {
        let event = Event::parse("*:0,15,30,45").unwrap();
        let start = at(REF);
        let found = event.occurrences_between(start, start + Duration::hours(1));
        assert_eq!(
            found,
            vec![
                at("2006-01-02 15:15:00"),
                at("2006-01-02 15:30:00"),
                at("2006-01-02 15:45:00"),
                at("2006-01-02 16:00:00"),
            ]
        );
    }

    #[test]
    fn occurrences_exclude_start() {
        let event = Event::parse("*:*").unwrap();
        let start = at("2006-01-02 15:04:00");
        let found = event.occurrences_between(start, start + Duration::minutes(2));
        assert_eq!(found, vec![at("2006-01-02 15:05:00"), at("2006-01-02 15:06:00")]);
    }

    // -----------------------------------------------------------------------
    // as_datetime
    // -----------------------------------------------------------------------

    #[test]
    fn as_datetime_requires_single_values() {
        let event = Event::parse("2020-03-04 05:06:07").unwrap();
        assert_eq!(event.as_datetime(), Some(at("2020-03-04 05:06:07")));

        let mut event = Event::parse("2020-03-04 05:06").unwrap();
        event.second = crate::value::Value::new(0, 59);
        assert_eq!(event.as_datetime(), Some(at("2020-03-04 05:06:00")));

        assert_eq!(Event::parse("*-03-04 05:06").unwrap().as_datetime(), None);
        assert_eq!(Event::parse("2020-03-04 05,06:06").unwrap().as_datetime(), None);
    }
}
