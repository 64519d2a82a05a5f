//! Text grammar of calendar events.
//!
//! ```text
//! EVENT   := KEYWORD | [WEEKDAY] [DATE] [TIME]      (at least one part)
//! WEEKDAY := list of mon..sun / monday..sunday / 1..7 (case-insensitive)
//! DATE    := [YEAR-]MONTH-DAY
//! TIME    := HOUR:MINUTE[:SECOND]
//! ```
//!
//! Every number part is a comma list of values and `a..b` ranges, or `*`.
//! An event with no time part runs at midnight; a time without seconds runs
//! at second 0. Two-digit years mean `20xx`. Weekday ranges may wrap around
//! the end of the week (`sun..mon`).

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::constants::{keyword_event, CENTURY_THRESHOLD, LONG_WEEKDAYS, SHORT_WEEKDAYS};
use crate::error::{CalendarError, Result};
use crate::event::{Event, Field};
use crate::value::{parse_items, Item};
use Field::{Day, Hour, Minute, Month, Second, Weekday, Year};
use Step::{Midnight, Optional, OrZero, Set};

const UNIT: &str = r"[0-9*.,]+";
const WEEKDAY: &str = r"([a-zA-Z0-9.,]+)";

/// What to do with one capture group (or the absence of one).
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Required group feeding a field.
    Set(Field, usize),
    /// Optional group: nothing happens when it did not participate.
    Optional(Field, usize),
    /// Optional group defaulting to `0` when absent.
    OrZero(Field, usize),
    /// Set hour, minute and second to `0`.
    Midnight,
}

struct Rule {
    name: &'static str,
    expr: Regex,
    steps: &'static [Step],
}

fn date() -> String {
    format!(r"(?:({UNIT})-)?({UNIT})-({UNIT})")
}

fn time() -> String {
    format!(r"({UNIT}):({UNIT})(?::({UNIT}))?")
}

fn rule(name: &'static str, parts: &[&str], steps: &'static [Step]) -> Rule {
    let pattern = format!(r"^{}$", parts.join(r"\s+"));
    Rule {
        name,
        expr: Regex::new(&pattern).expect("calendar grammar pattern is valid"),
        steps,
    }
}

/// Tried in order; the first full match wins.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let (date, time) = (date(), time());
    vec![
        rule(
            "weekday date time",
            &[WEEKDAY, &date, &time],
            &[
                Set(Weekday, 1),
                Optional(Year, 2),
                Set(Month, 3),
                Set(Day, 4),
                Set(Hour, 5),
                Set(Minute, 6),
                OrZero(Second, 7),
            ],
        ),
        rule(
            "date",
            &[&date],
            &[Optional(Year, 1), Set(Month, 2), Set(Day, 3), Midnight],
        ),
        rule(
            "time",
            &[&time],
            &[Set(Hour, 1), Set(Minute, 2), OrZero(Second, 3)],
        ),
        rule(
            "date time",
            &[&date, &time],
            &[
                Optional(Year, 1),
                Set(Month, 2),
                Set(Day, 3),
                Set(Hour, 4),
                Set(Minute, 5),
                OrZero(Second, 6),
            ],
        ),
        rule("weekday", &[WEEKDAY], &[Set(Weekday, 1), Midnight]),
        rule(
            "weekday date",
            &[WEEKDAY, &date],
            &[
                Set(Weekday, 1),
                Optional(Year, 2),
                Set(Month, 3),
                Set(Day, 4),
                Midnight,
            ],
        ),
        rule(
            "weekday time",
            &[WEEKDAY, &time],
            &[
                Set(Weekday, 1),
                Set(Hour, 2),
                Set(Minute, 3),
                OrZero(Second, 4),
            ],
        ),
    ]
});

/// Parse `input` into an [`Event`].
pub fn parse_event(input: &str) -> Result<Event> {
    let text = input.trim();
    if text.is_empty() {
        return Err(CalendarError::EmptySchedule);
    }
    if let Some(event) = keyword_event(&text.to_lowercase()) {
        return Ok(event);
    }

    for rule in RULES.iter() {
        let Some(caps) = rule.expr.captures(text) else {
            continue;
        };
        let mut event = Event::new();
        for step in rule.steps {
            apply(*step, &caps, &mut event).map_err(|e| CalendarError::InvalidExpression {
                input: input.to_string(),
                source: Box::new(e),
            })?;
        }
        debug!(input = %text, rule = rule.name, event = %event, "parsed calendar event");
        return Ok(event);
    }

    Err(CalendarError::UnrecognizedExpression(input.to_string()))
}

fn apply(step: Step, caps: &Captures<'_>, event: &mut Event) -> Result<()> {
    match step {
        Set(field, group) | Optional(field, group) => match caps.get(group) {
            Some(m) => set_field(event, field, m.as_str()),
            None => Ok(()),
        },
        OrZero(field, group) => match caps.get(group) {
            Some(m) => set_field(event, field, m.as_str()),
            None => event.field_mut(field).add_value(0),
        },
        Midnight => {
            event.hour.add_value(0)?;
            event.minute.add_value(0)?;
            event.second.add_value(0)
        }
    }
}

fn set_field(event: &mut Event, field: Field, text: &str) -> Result<()> {
    match field {
        Weekday => {
            let text = weekday_numbers(text);
            for item in parse_items(&text)? {
                event.weekday.add_item(item, true)?;
            }
            Ok(())
        }
        Year => {
            for item in parse_items(text)? {
                event.year.add_item(full_year(item), false)?;
            }
            Ok(())
        }
        other => event.field_mut(other).parse(text),
    }
}

/// Replace weekday names with their number (`mon` -> `01`).
fn weekday_numbers(text: &str) -> String {
    let mut text = text.to_lowercase();
    // long names first so "monday" does not become "01day"
    for names in [&LONG_WEEKDAYS, &SHORT_WEEKDAYS] {
        for (i, name) in names.iter().enumerate() {
            text = text.replace(*name, &format!("{:02}", i + 1));
        }
    }
    text
}

fn full_year(item: Item) -> Item {
    let year = |y: u32| {
        if y < CENTURY_THRESHOLD {
            y + 2000
        } else {
            y
        }
    };
    match item {
        Item::Single(y) => Item::Single(year(y)),
        Item::Range(start, end) => Item::Range(year(start), year(end)),
    }
}
