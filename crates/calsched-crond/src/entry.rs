use std::fmt;

use calsched_calendar::{Event, Range, Value};

/// User column value meaning "whoever runs the scheduler", resolved when the
/// entry is handed to a [`Crontab`](crate::Crontab).
pub const CURRENT_USER: &str = "*";

/// One line of the owned crontab section.
///
/// Two entries are equal when they share the same config file, profile and
/// command; the schedule and command line do not take part.
#[derive(Debug, Clone)]
pub struct Entry {
    event: Event,
    config_file: String,
    profile_name: String,
    command_name: String,
    command_line: String,
    work_dir: String,
    user: String,
}

impl Entry {
    pub fn new(
        event: Event,
        config_file: impl Into<String>,
        profile_name: impl Into<String>,
        command_name: impl Into<String>,
        command_line: impl Into<String>,
        work_dir: impl Into<String>,
    ) -> Self {
        Self {
            event,
            config_file: config_file.into(),
            profile_name: profile_name.into(),
            command_name: command_name.into(),
            command_line: command_line.into(),
            work_dir: work_dir.into(),
            user: String::new(),
        }
    }

    /// Copy of the entry with the user column set.
    pub fn with_user(&self, user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..self.clone()
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn work_dir(&self) -> &str {
        &self.work_dir
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn has_user(&self) -> bool {
        !self.user.is_empty()
    }

    /// The user column still has to be resolved to the current user.
    pub fn needs_user(&self) -> bool {
        self.user == CURRENT_USER
    }

    /// Everything after the time fields: `[user\t][cd DIR && ]command`.
    pub(crate) fn command_column(&self) -> String {
        let mut column = String::new();
        if self.has_user() && !self.needs_user() {
            column.push_str(&self.user);
            column.push('\t');
        }
        if !self.work_dir.is_empty() {
            column.push_str("cd ");
            column.push_str(&self.work_dir);
            column.push_str(" && ");
        }
        column.push_str(&self.command_line);
        column
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.config_file == other.config_file
            && self.profile_name == other.profile_name
            && self.command_name == other.command_name
    }
}

impl Eq for Entry {}

/// Crontab line, end of line included.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\t{}", cron_time(&self.event), self.command_column())
    }
}

/// The five cron time fields (`minute hour day-of-month month day-of-week`)
/// selecting the same minutes as `event`. Seconds and years are dropped.
pub fn cron_time(event: &Event) -> String {
    let field = |value: &Value| {
        if value.has_value() {
            format_ranges(&value.ranges())
        } else {
            "*".to_string()
        }
    };
    // sunday is 7 in the event but cron prefers 0, so no ranges here
    let weekday = if event.weekday.has_value() {
        event
            .weekday
            .range_values()
            .iter()
            .map(|day| (day % 7).to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        "*".to_string()
    };
    format!(
        "{} {} {} {} {}",
        field(&event.minute),
        field(&event.hour),
        field(&event.day),
        field(&event.month),
        weekday
    )
}

/// `a-b` for runs of three or more, `a,b` for two adjacent values.
fn format_ranges(ranges: &[Range]) -> String {
    ranges
        .iter()
        .map(|range| match range.end - range.start {
            0 => format!("{:02}", range.start),
            1 => format!("{:02},{:02}", range.start, range.end),
            _ => format!("{:02}-{:02}", range.start, range.end),
        })
        .collect::<Vec<_>>()
        .join(",")
}
