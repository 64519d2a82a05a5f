//! `calsched-core` — configuration and shared helpers for the calsched workspace.
//!
//! The calendar engine itself lives in `calsched-calendar`; this crate only
//! holds what every scheduler backend needs: the TOML/env configuration, the
//! scheduler resource string (`crond:/usr/bin/crontab`, `crontab:user:/etc/crontab`, …)
//! and a small k-combination helper.

pub mod combination;
pub mod config;
pub mod error;
pub mod scheduler;

pub use error::{CalschedError, Result};
pub use scheduler::SchedulerKind;
