use std::fmt;
use std::str::FromStr;

use crate::constants::{weekday_name, MAX_YEAR, MIN_YEAR};
use crate::error::{CalendarError, Result};
use crate::value::Value;

/// The seven fields of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Weekday,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Weekday,
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
    ];

    /// Inclusive domain of the field.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Field::Weekday => (1, 7),
            Field::Year => (MIN_YEAR, MAX_YEAR),
            Field::Month => (1, 12),
            Field::Day => (1, 31),
            Field::Hour => (0, 23),
            Field::Minute => (0, 59),
            Field::Second => (0, 59),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Weekday => "weekday",
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        };
        f.write_str(name)
    }
}

/// A calendar event: every field empty means "any time".
///
/// Weekdays are numbered Monday = 1 through Sunday = 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub weekday: Value,
    pub year: Value,
    pub month: Value,
    pub day: Value,
    pub hour: Value,
    pub minute: Value,
    pub second: Value,
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl Event {
    pub fn new() -> Self {
        let value = |field: Field| {
            let (min, max) = field.bounds();
            Value::new(min, max)
        };
        Self {
            weekday: value(Field::Weekday),
            year: value(Field::Year),
            month: value(Field::Month),
            day: value(Field::Day),
            hour: value(Field::Hour),
            minute: value(Field::Minute),
            second: value(Field::Second),
        }
    }

    /// Parse a keyword or a `[WEEKDAY] [[YEAR-]MONTH-DAY] [HH:MM[:SS]]`
    /// expression. See [`crate::grammar`].
    pub fn parse(input: &str) -> Result<Self> {
        crate::grammar::parse_event(input)
    }

    pub fn field(&self, field: Field) -> &Value {
        match field {
            Field::Weekday => &self.weekday,
            Field::Year => &self.year,
            Field::Month => &self.month,
            Field::Day => &self.day,
            Field::Hour => &self.hour,
            Field::Minute => &self.minute,
            Field::Second => &self.second,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut Value {
        match field {
            Field::Weekday => &mut self.weekday,
            Field::Year => &mut self.year,
            Field::Month => &mut self.month,
            Field::Day => &mut self.day,
            Field::Hour => &mut self.hour,
            Field::Minute => &mut self.minute,
            Field::Second => &mut self.second,
        }
    }

    /// True when no field has a value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| !self.field(*f).has_value())
    }

    /// Runs every day at the same time(s): the date part and weekday are
    /// all wildcards.
    pub fn is_daily(&self) -> bool {
        !self.weekday.has_value()
            && !self.year.has_value()
            && !self.month.has_value()
            && !self.day.has_value()
    }

    /// Only the weekday restricts the date.
    pub fn is_weekly(&self) -> bool {
        self.weekday.has_value()
            && !self.year.has_value()
            && !self.month.has_value()
            && !self.day.has_value()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weekday.has_value() {
            self.weekday.write_with(f, weekday_name)?;
            f.write_str(" ")?;
        }
        write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl FromStr for Event {
    type Err = CalendarError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Event::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_event() {
        let event = Event::new();
        assert!(event.is_empty());
        assert_eq!(event.to_string(), "*-*-* *:*:*");
    }

    #[test]
    fn field_bounds() {
        let event = Event::new();
        for field in Field::ALL {
            let (min, max) = field.bounds();
            assert_eq!(event.field(field).min(), min, "{field}");
            assert_eq!(event.field(field).max(), max, "{field}");
        }
        assert_eq!(Field::Year.bounds(), (2000, 2200));
    }

    #[test]
    fn display_with_weekday_names() {
        let mut event = Event::new();
        event.weekday.must_add_range(1, 4);
        event.weekday.must_add_range(6, 7);
        event.hour.must_add_value(0);
        event.minute.must_add_value(0);
        event.second.must_add_value(0);
        assert_eq!(event.to_string(), "Mon..Thu,Sat..Sun *-*-* 00:00:00");
    }

    #[test]
    fn weekday_without_long_run_is_a_list() {
        let mut event = Event::new();
        event.weekday.must_add_value(1);
        event.weekday.must_add_value(7);
        assert_eq!(event.to_string(), "Mon,Sun *-*-* *:*:*");
    }

    #[test]
    fn field_mut_writes_through() {
        let mut event = Event::new();
        event.field_mut(Field::Day).must_add_value(15);
        assert_eq!(event.day.single_value(), Some(15));
        assert!(!event.is_empty());
    }

    #[test]
    fn daily_and_weekly() {
        let mut event = Event::new();
        event.hour.must_add_value(3);
        assert!(event.is_daily());
        assert!(!event.is_weekly());

        event.weekday.must_add_range(1, 5);
        assert!(!event.is_daily());
        assert!(event.is_weekly());

        event.year.must_add_value(2020);
        assert!(!event.is_daily());
        assert!(!event.is_weekly());
    }
}
