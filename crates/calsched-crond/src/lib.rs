//! `calsched-crond` — calendar events as crontab lines.
//!
//! [`Entry`] renders one event and command as a crontab line, and
//! [`Crontab`] maintains the block of lines this tool owns inside a user's
//! crontab (through the `crontab` binary) or a crontab file.

pub mod crontab;
pub mod entry;
pub mod error;
pub mod io;
pub mod parse;

pub use crontab::{Crontab, END_MARKER, START_MARKER};
pub use entry::{cron_time, Entry, CURRENT_USER};
pub use error::{CrondError, Result};
pub use parse::parse_cron_event;
