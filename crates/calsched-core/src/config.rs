use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{CalschedError, Result};
use crate::scheduler::SchedulerKind;

pub const DEFAULT_CRONTAB_BINARY: &str = "crontab";
pub const DEFAULT_JOB_PROGRAM: &str = "resticprofile";
/// Environment variable holding an explicit config path.
pub const CONFIG_ENV: &str = "CALSCHED_CONFIG";

/// Top-level config (calsched.toml + CALSCHED_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalschedConfig {
    /// Scheduler resource string, see [`SchedulerKind::parse`].
    #[serde(default)]
    pub scheduler: String,
    #[serde(default)]
    pub crontab: CrontabConfig,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// Settings used when the scheduler is crond and no resource overrides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrontabConfig {
    #[serde(default = "default_crontab_binary")]
    pub binary: String,
    /// Value written in the user column when one is needed.
    /// Falls back to the current user when unset.
    pub user: Option<String>,
}

impl Default for CrontabConfig {
    fn default() -> Self {
        Self {
            binary: default_crontab_binary(),
            user: None,
        }
    }
}

/// One scheduled command of one profile.
///
/// `(config_file, profile, command)` identifies the job inside a crontab.
/// The command line is built from it, see [`JobConfig::command_line`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub config_file: String,
    pub profile: String,
    pub command: String,
    #[serde(default = "default_job_program")]
    pub program: String,
    /// Flags placed before `--config`.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub work_dir: String,
    /// `"*"` means "the current user"; empty means no user column.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub schedules: Vec<String>,
}

fn default_crontab_binary() -> String {
    DEFAULT_CRONTAB_BINARY.to_string()
}

fn default_job_program() -> String {
    DEFAULT_JOB_PROGRAM.to_string()
}

impl JobConfig {
    /// `PROGRAM [ARGS..] --config FILE run-schedule COMMAND@PROFILE`
    ///
    /// The identity always ends the line so an installed job can be found
    /// again whatever the program and flags are.
    pub fn command_line(&self) -> String {
        let config_file = if self.config_file.contains(char::is_whitespace) {
            format!("\"{}\"", self.config_file)
        } else {
            self.config_file.clone()
        };
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        format!(
            "{} --config {} run-schedule {}@{}",
            parts.join(" "),
            config_file,
            self.command,
            self.profile
        )
    }
}

impl CalschedConfig {
    /// Load config from a TOML file with CALSCHED_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. `$CALSCHED_CONFIG`
    ///   3. ~/.calsched/calsched.toml
    ///
    /// A missing file is not an error: every section has a default.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(default_config_path);

        tracing::debug!(path = %path, "loading configuration");

        let config: CalschedConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CALSCHED_").ignore(&["config"]).split("_"))
            .extract()
            .map_err(|e| CalschedError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Parsed form of the `scheduler` setting.
    pub fn scheduler_kind(&self) -> Result<SchedulerKind> {
        SchedulerKind::parse(&self.scheduler)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.calsched/calsched.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = CalschedConfig::load(path.to_str()).unwrap();
        assert_eq!(config.crontab.binary, DEFAULT_CRONTAB_BINARY);
        assert!(config.jobs.is_empty());
        assert_eq!(config.scheduler_kind().unwrap(), SchedulerKind::OsDefault);
    }

    #[test]
    fn loads_jobs_and_scheduler() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
scheduler = "crontab: /etc/crontab"

[crontab]
user = "backup"

[[jobs]]
config_file = "profiles.yaml"
profile = "home"
command = "backup"
program = "/usr/local/bin/resticprofile"
args = ["--no-ansi"]
schedules = ["daily", "Mon..Fri 12:30"]
"#
        )
        .unwrap();

        let config = CalschedConfig::load(file.path().to_str()).unwrap();
        assert_eq!(
            config.scheduler_kind().unwrap(),
            SchedulerKind::Crontab {
                file: "/etc/crontab".to_string(),
                user: None
            }
        );
        assert_eq!(config.crontab.user.as_deref(), Some("backup"));
        assert_eq!(config.jobs.len(), 1);
        let job = &config.jobs[0];
        assert_eq!(job.profile, "home");
        assert_eq!(job.schedules, vec!["daily", "Mon..Fri 12:30"]);
        assert!(job.work_dir.is_empty());
        assert!(job.user.is_empty());
        assert_eq!(
            job.command_line(),
            "/usr/local/bin/resticprofile --no-ansi --config profiles.yaml run-schedule backup@home"
        );
    }

    #[test]
    fn command_line_carries_the_identity() {
        let job = JobConfig {
            config_file: "my profiles.toml".to_string(),
            profile: "home".to_string(),
            command: "check".to_string(),
            program: default_job_program(),
            args: Vec::new(),
            work_dir: String::new(),
            user: String::new(),
            schedules: Vec::new(),
        };
        assert_eq!(
            job.command_line(),
            "resticprofile --config \"my profiles.toml\" run-schedule check@home"
        );
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "jobs = 12").unwrap();
        let err = CalschedConfig::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
