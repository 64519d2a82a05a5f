//! `calsched-launchd` — calendar events as launchd `StartCalendarInterval`
//! records.
//!
//! launchd has no ranges or lists: every combination of field values
//! becomes its own record. See [`interval::intervals_from_event`].

pub mod error;
pub mod interval;

pub use error::{LaunchdError, Result};
pub use interval::{
    intervals_from_event, intervals_from_events, parse_calendar_intervals, CalendarInterval,
    IntervalKey,
};
