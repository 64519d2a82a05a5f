use calsched_calendar::{Event, Field, Value};

use crate::error::{CrondError, Result};

/// Cron fields in line order.
const CRON_FIELDS: [Field; 5] = [
    Field::Minute,
    Field::Hour,
    Field::Day,
    Field::Month,
    Field::Weekday,
];

/// Read the five time fields of a cron line back into an [`Event`].
///
/// The result runs at second 0. A day of week of `0` is Sunday.
pub fn parse_cron_event(source: &str) -> Result<Event> {
    let parts: Vec<&str> = source.split_whitespace().collect();
    if parts.len() != CRON_FIELDS.len() {
        return Err(CrondError::FieldCount {
            found: parts.len(),
            line: source.trim().to_string(),
        });
    }

    let mut event = Event::new();
    event.second.add_value(0)?;

    for (field, part) in CRON_FIELDS.into_iter().zip(parts) {
        let invalid = |reason: String| CrondError::InvalidLine {
            line: part.to_string(),
            reason,
        };
        if field == Field::Weekday {
            // 0..=7 so both notations of sunday are accepted
            let mut days = Value::new(0, 7);
            parse_field(part, &mut days).map_err(invalid)?;
            for day in days.range_values() {
                event.weekday.add_value(if day == 0 { 7 } else { day })?;
            }
        } else {
            parse_field(part, event.field_mut(field)).map_err(invalid)?;
        }
    }
    Ok(event)
}

fn parse_field(field: &str, value: &mut Value) -> std::result::Result<(), String> {
    if field == "*" {
        return Ok(());
    }
    for part in field.split(',') {
        match part.split_once('-') {
            Some((start, end)) => value
                .add_range(number(start)?, number(end)?)
                .map_err(|e| e.to_string())?,
            None => value.add_value(number(part)?).map_err(|e| e.to_string())?,
        }
    }
    Ok(())
}

fn number(text: &str) -> std::result::Result<u32, String> {
    text.parse::<u32>()
        .map_err(|e| format!("{text:?} is not a number: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_back_to_calendar_events() {
        let cases = [
            ("00 00 * * 1,2,3,4,6,0", "Mon..Thu,Sat..Sun *-*-* 00:00:00"),
            ("23 01,02 * * 1,0", "Mon,Sun *-*-* 01,02:23:00"),
            ("00 00 01 * 3", "Wed *-*-01 00:00:00"),
            ("48 17 * * 3", "Wed *-*-* 17:48:00"),
            ("02 01 15 10 2,3,4,5,6", "Tue..Sat *-10-15 01:02:00"),
            ("00 00 07 * *", "*-*-07 00:00:00"),
            ("00 17 * 12 0", "Sun *-12-* 17:00:00"),
            ("00 17 * 12 7", "Sun *-12-* 17:00:00"),
            ("30 * 01-03 * 1,5", "Mon,Fri *-*-01..03 *:30:00"),
            ("10,20,30 12-14 * * *", "*-*-* 12..14:10,20,30:00"),
            ("00 00 05 02-04 *", "*-02..04-05 00:00:00"),
            ("00 00 * * 1,2,3,4,5,6,0", "Mon..Sun *-*-* 00:00:00"),
            ("00 00 * * 0-2", "Mon,Tue,Sun *-*-* 00:00:00"),
            ("00\t00 * * 0,1", "Mon,Sun *-*-* 00:00:00"),
            ("00 00    * * 0,1", "Mon,Sun *-*-* 00:00:00"),
        ];
        for (line, expected) in cases {
            let event = parse_cron_event(line).unwrap_or_else(|e| panic!("{line:?}: {e}"));
            assert_eq!(event.to_string(), expected, "{line:?}");
        }
    }

    #[test]
    fn wrong_field_count() {
        for line in ["", " ", "     ", "invalid", "0 0 * *", "0 0 * * * *"] {
            assert!(
                matches!(parse_cron_event(line), Err(CrondError::FieldCount { .. })),
                "{line:?}"
            );
        }
    }

    #[test]
    fn invalid_fields() {
        for line in [
            "99 00 * * 0,1",
            "0- 00 * * 0,1",
            "-0 00 * * 0,1",
            "0, 00 * * 0,1",
            ",0 00 * * 0,1",
            "*/5 * * * *",
            "00 00 * * 8",
        ] {
            assert!(parse_cron_event(line).is_err(), "{line:?} should fail");
        }
    }
}
