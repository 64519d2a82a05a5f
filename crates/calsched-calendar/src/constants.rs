use crate::event::Event;

pub const MIN_YEAR: u32 = 2000;
pub const MAX_YEAR: u32 = 2200;

/// Two-digit years below this are taken as `2000 + year`.
pub const CENTURY_THRESHOLD: u32 = 1000;

/// Weekday names, Monday first. Index `i` is weekday number `i + 1`.
pub const SHORT_WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
pub const LONG_WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Title-case short name of weekday `n` (1 = Monday), as used in the
/// normalized form.
pub fn weekday_name(n: u32) -> String {
    let Some(name) = n
        .checked_sub(1)
        .and_then(|i| SHORT_WEEKDAYS.get(i as usize))
    else {
        return n.to_string();
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Named schedules and how each one fills an empty event.
pub static KEYWORDS: &[(&str, fn(&mut Event))] = &[
    ("minutely", minutely),
    ("hourly", hourly),
    ("daily", daily),
    ("weekly", weekly),
    ("monthly", monthly),
    ("quarterly", quarterly),
    ("semiannually", semiannually),
    ("yearly", yearly),
    ("annually", yearly),
];

fn minutely(event: &mut Event) {
    event.second.must_add_value(0);
}

fn hourly(event: &mut Event) {
    minutely(event);
    event.minute.must_add_value(0);
}

fn daily(event: &mut Event) {
    hourly(event);
    event.hour.must_add_value(0);
}

fn weekly(event: &mut Event) {
    daily(event);
    event.weekday.must_add_value(1);
}

fn monthly(event: &mut Event) {
    daily(event);
    event.day.must_add_value(1);
}

fn quarterly(event: &mut Event) {
    monthly(event);
    for month in [1, 4, 7, 10] {
        event.month.must_add_value(month);
    }
}

fn semiannually(event: &mut Event) {
    monthly(event);
    event.month.must_add_value(1);
    event.month.must_add_value(7);
}

fn yearly(event: &mut Event) {
    monthly(event);
    event.month.must_add_value(1);
}

/// Event for a keyword, `None` when `name` is not one.
pub fn keyword_event(name: &str) -> Option<Event> {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == name)
        .map(|(_, fill)| {
            let mut event = Event::new();
            fill(&mut event);
            event
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names() {
        assert_eq!(weekday_name(1), "Mon");
        assert_eq!(weekday_name(7), "Sun");
        assert_eq!(weekday_name(0), "0");
        assert_eq!(weekday_name(8), "8");
    }

    #[test]
    fn keywords_normalize() {
        let expected = [
            ("minutely", "*-*-* *:*:00"),
            ("hourly", "*-*-* *:00:00"),
            ("daily", "*-*-* 00:00:00"),
            ("weekly", "Mon *-*-* 00:00:00"),
            ("monthly", "*-*-01 00:00:00"),
            ("quarterly", "*-01,04,07,10-01 00:00:00"),
            ("semiannually", "*-01,07-01 00:00:00"),
            ("yearly", "*-01-01 00:00:00"),
            ("annually", "*-01-01 00:00:00"),
        ];
        for (keyword, normalized) in expected {
            let event = keyword_event(keyword).unwrap();
            assert_eq!(event.to_string(), normalized, "{keyword}");
        }
        assert!(keyword_event("fortnightly").is_none());
    }
}
