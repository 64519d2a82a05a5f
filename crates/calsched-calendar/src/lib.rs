//! `calsched-calendar` — systemd.time style calendar events.
//!
//! # Overview
//!
//! An [`Event`] is made of seven [`Value`]s (weekday, year, month, day, hour,
//! minute, second). Each value is either a wildcard, a single number or a set
//! of numbers inside the field's fixed domain.
//!
//! Text is turned into an event by [`Event::parse`], which accepts the
//! keywords below or a `[WEEKDAY] [[YEAR-]MONTH-DAY] [HOUR:MINUTE[:SECOND]]`
//! expression. `Display` writes the normalized form back, which parses into an
//! equal event.
//!
//! | Keyword        | Normalized form              |
//! |----------------|------------------------------|
//! | `minutely`     | `*-*-* *:*:00`               |
//! | `hourly`       | `*-*-* *:00:00`              |
//! | `daily`        | `*-*-* 00:00:00`             |
//! | `weekly`       | `Mon *-*-* 00:00:00`         |
//! | `monthly`      | `*-*-01 00:00:00`            |
//! | `quarterly`    | `*-01,04,07,10-01 00:00:00`  |
//! | `semiannually` | `*-01,07-01 00:00:00`        |
//! | `yearly`       | `*-01-01 00:00:00`           |
//! | `annually`     | `*-01-01 00:00:00`           |

pub mod constants;
pub mod error;
pub mod event;
pub mod grammar;
pub mod schedule;
pub mod value;

pub use error::{CalendarError, Result};
pub use event::{Event, Field};
pub use value::{Range, Value};
