//! Normalized output must parse back into the same event.

use calsched_calendar::{CalendarError, Event};

const EXPRESSIONS: &[&str] = &[
    "minutely",
    "hourly",
    "daily",
    "weekly",
    "monthly",
    "quarterly",
    "semiannually",
    "yearly",
    "Sat,Thu,Mon..Wed,Sat..Sun",
    "Mon,Sun 12-*-* 2,1:23",
    "Wed *-1",
    "Wed, 17:48",
    "Wed..Sat,Tue 12-10-15 1:2:3",
    "*-*-7 0:0:0",
    "10-15",
    "monday *-12-* 17:00",
    "Mon,Fri *-*-3,1,2 *:30:45",
    "12,14,13,12:20,10,30",
    "03-05 08:05:40",
    "2003-02..04-05",
    "sun..mon",
];

#[test]
fn normalized_form_is_stable() {
    for expr in EXPRESSIONS {
        let event: Event = expr.parse().unwrap();
        let normalized = event.to_string();
        let again: Event = normalized.parse().unwrap();
        assert_eq!(again, event, "{expr:?} -> {normalized:?}");
        assert_eq!(again.to_string(), normalized);
    }
}

#[test]
fn errors_display_the_input() {
    let err = Event::parse("1:99").unwrap_err();
    assert!(matches!(err, CalendarError::InvalidExpression { .. }));
    assert!(err.to_string().contains("\"1:99\""), "{err}");

    let err = Event::parse("not a schedule").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unrecognized calendar expression: \"not a schedule\""
    );
}
