use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use calsched_calendar::{Event, Field};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LaunchdError, Result};

/// Keys of a launchd calendar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntervalKey {
    /// 1..12
    Month,
    /// 1..31
    Day,
    /// 0..7, both 0 and 7 being Sunday
    Weekday,
    /// 0..23
    Hour,
    /// 0..59
    Minute,
}

impl IntervalKey {
    /// Order in which fields are expanded.
    pub const PRECEDENCE: [IntervalKey; 5] = [
        IntervalKey::Month,
        IntervalKey::Day,
        IntervalKey::Weekday,
        IntervalKey::Hour,
        IntervalKey::Minute,
    ];

    /// Event field behind this key.
    pub fn field(self) -> Field {
        match self {
            IntervalKey::Month => Field::Month,
            IntervalKey::Day => Field::Day,
            IntervalKey::Weekday => Field::Weekday,
            IntervalKey::Hour => Field::Hour,
            IntervalKey::Minute => Field::Minute,
        }
    }
}

impl fmt::Display for IntervalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalKey::Month => "Month",
            IntervalKey::Day => "Day",
            IntervalKey::Weekday => "Weekday",
            IntervalKey::Hour => "Hour",
            IntervalKey::Minute => "Minute",
        };
        f.write_str(name)
    }
}

impl FromStr for IntervalKey {
    type Err = LaunchdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        IntervalKey::PRECEDENCE
            .into_iter()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| LaunchdError::UnknownKey(s.to_string()))
    }
}

/// One trigger instant. Keys not present mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarInterval(BTreeMap<IntervalKey, u32>);

impl CalendarInterval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: IntervalKey) -> Option<u32> {
        self.0.get(&key).copied()
    }

    pub fn set(&mut self, key: IntervalKey, value: u32) {
        self.0.insert(key, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntervalKey, u32)> + '_ {
        self.0.iter().map(|(key, value)| (*key, *value))
    }
}

impl<const N: usize> From<[(IntervalKey, u32); N]> for CalendarInterval {
    fn from(pairs: [(IntervalKey, u32); N]) -> Self {
        Self(BTreeMap::from(pairs))
    }
}

/// Expand an event into one record per combination of its populated fields.
///
/// Fields are taken in [`IntervalKey::PRECEDENCE`] order; at each step every
/// record built so far is combined with every value of the next field.
/// Wildcard fields are left out of the records, and an event with no
/// populated field gives a single empty record. Sunday is written as 0.
pub fn intervals_from_event(event: &Event) -> Vec<CalendarInterval> {
    let mut records = vec![CalendarInterval::new()];
    for key in IntervalKey::PRECEDENCE {
        let value = event.field(key.field());
        if !value.has_value() {
            continue;
        }
        let values: Vec<u32> = value
            .range_values()
            .into_iter()
            .map(|v| match key {
                IntervalKey::Weekday => v % 7,
                _ => v,
            })
            .collect();
        records = records
            .iter()
            .flat_map(|record| {
                values.iter().map(move |v| {
                    let mut next = record.clone();
                    next.set(key, *v);
                    next
                })
            })
            .collect();
    }
    debug!(event = %event, records = records.len(), "expanded calendar intervals");
    records
}

/// All records for a list of events, in order.
pub fn intervals_from_events(events: &[Event]) -> Vec<CalendarInterval> {
    events.iter().flat_map(intervals_from_event).collect()
}

/// Merge records back into a single event running at second 0.
///
/// The merge is lossy when records combine fields differently; it gives the
/// smallest event matching every record.
pub fn parse_calendar_intervals(intervals: &[CalendarInterval]) -> Result<Event> {
    let mut event = Event::new();
    event.second.add_value(0)?;
    for interval in intervals {
        for (key, value) in interval.iter() {
            let value = match (key, value) {
                (IntervalKey::Weekday, 0) => 7,
                (_, value) => value,
            };
            event.field_mut(key.field()).add_value(value)?;
        }
    }
    Ok(event)
}
