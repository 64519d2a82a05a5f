use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CalschedError, Result};

pub const SCHEDULER_CROND: &str = "crond";
pub const SCHEDULER_CRONTAB: &str = "crontab";
pub const SCHEDULER_LAUNCHD: &str = "launchd";
pub const SCHEDULER_SYSTEMD: &str = "systemd";
pub const SCHEDULER_WINDOWS: &str = "windows";

/// Which OS scheduler receives the generated jobs.
///
/// Parsed from a `scheduler[: resource]` string, for example:
///
/// | Input                                  | Result                                   |
/// |----------------------------------------|------------------------------------------|
/// | `crond`                                | `Crond { binary: None }`                 |
/// | `crond: /usr/bin/crontab`              | `Crond { binary: Some(..) }`             |
/// | `crontab: /etc/crontab`                | `Crontab { file, user: None }`           |
/// | `crontab: root: /etc/crontab`          | `Crontab { file, user: Some("root") }`   |
/// | `crontab: C:\crontab`                  | `Crontab { file: "C:\crontab", .. }`     |
/// | `launchd` / `systemd` / `windows`      | the matching variant                     |
/// | anything else                          | `OsDefault`                              |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedulerKind {
    /// Use the OS default scheduler.
    OsDefault,
    /// Talk to crond through a `crontab`-compatible binary.
    Crond { binary: Option<String> },
    /// Edit a crontab file directly. `user` set means the file carries a user column.
    Crontab { file: String, user: Option<String> },
    Launchd,
    Systemd,
    Windows,
}

impl SchedulerKind {
    pub fn parse(input: &str) -> Result<Self> {
        let (scheduler, resource) = input.split_once(':').unwrap_or((input, ""));
        let scheduler = scheduler.trim();
        let resource = resource.trim();

        match scheduler {
            SCHEDULER_CROND => Ok(SchedulerKind::Crond {
                binary: (!resource.is_empty()).then(|| resource.to_string()),
            }),

            SCHEDULER_CRONTAB => {
                if resource.is_empty() {
                    return Err(CalschedError::InvalidScheduler(format!(
                        "no crontab file was specified, expecting \"{SCHEDULER_CRONTAB}: filename\""
                    )));
                }
                if let Some((user, location)) = resource.split_once(':') {
                    let user = user.trim();
                    // a single letter is a drive letter, not a user
                    if !is_drive_letter(user) {
                        let user = if user.is_empty() { "-" } else { user };
                        return Ok(SchedulerKind::Crontab {
                            file: location.trim().to_string(),
                            user: Some(user.to_string()),
                        });
                    }
                }
                Ok(SchedulerKind::Crontab {
                    file: resource.to_string(),
                    user: None,
                })
            }

            SCHEDULER_LAUNCHD => Ok(SchedulerKind::Launchd),
            SCHEDULER_SYSTEMD => Ok(SchedulerKind::Systemd),
            SCHEDULER_WINDOWS => Ok(SchedulerKind::Windows),
            "" => Ok(SchedulerKind::OsDefault),
            other => {
                warn!(scheduler = %other, "unknown scheduler, using the OS default");
                Ok(SchedulerKind::OsDefault)
            }
        }
    }

    /// True for both crontab flavours (binary or direct file access).
    pub fn is_cron(&self) -> bool {
        matches!(self, SchedulerKind::Crond { .. } | SchedulerKind::Crontab { .. })
    }
}

impl std::fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerKind::OsDefault => write!(f, "default"),
            SchedulerKind::Crond { binary: None } => write!(f, "{SCHEDULER_CROND}"),
            SchedulerKind::Crond { binary: Some(b) } => write!(f, "{SCHEDULER_CROND}:{b}"),
            SchedulerKind::Crontab { file, user: None } => write!(f, "{SCHEDULER_CRONTAB}:{file}"),
            SchedulerKind::Crontab {
                file,
                user: Some(u),
            } => write!(f, "{SCHEDULER_CRONTAB}:{u}:{file}"),
            SchedulerKind::Launchd => write!(f, "{SCHEDULER_LAUNCHD}"),
            SchedulerKind::Systemd => write!(f, "{SCHEDULER_SYSTEMD}"),
            SchedulerKind::Windows => write!(f, "{SCHEDULER_WINDOWS}"),
        }
    }
}

impl std::str::FromStr for SchedulerKind {
    type Err = CalschedError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SchedulerKind::parse(s)
    }
}

fn is_drive_letter(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}
