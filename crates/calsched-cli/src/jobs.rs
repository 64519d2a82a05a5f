//! Turning configured jobs into crontab entries.

use anyhow::{bail, Context};
use calsched_calendar::Event;
use calsched_core::config::{CalschedConfig, JobConfig};
use calsched_core::SchedulerKind;
use calsched_crond::{Crontab, Entry, CURRENT_USER};
use tracing::debug;

/// One entry per schedule of every job.
pub fn entries_from_config(config: &CalschedConfig) -> anyhow::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for job in &config.jobs {
        for schedule in &job.schedules {
            let event = Event::parse(schedule).with_context(|| {
                format!("job {}/{}: invalid schedule", job.profile, job.command)
            })?;
            entries.push(entry_for(job, event, config.crontab.user.as_deref()));
        }
    }
    debug!(jobs = config.jobs.len(), entries = entries.len(), "entries built");
    Ok(entries)
}

fn entry_for(job: &JobConfig, event: Event, user_override: Option<&str>) -> Entry {
    let entry = Entry::new(
        event,
        job.config_file.as_str(),
        job.profile.as_str(),
        job.command.as_str(),
        job.command_line(),
        job.work_dir.as_str(),
    );
    match (job.user.as_str(), user_override) {
        ("", _) => entry,
        (CURRENT_USER, Some(user)) => entry.with_user(user),
        (user, _) => entry.with_user(user),
    }
}

/// Crontab target for the configured scheduler.
pub fn crontab_for(config: &CalschedConfig, entries: Vec<Entry>) -> anyhow::Result<Crontab> {
    let kind = config.scheduler_kind()?;
    let entries = match &kind {
        // "crontab:user:file" means the file has a user column
        SchedulerKind::Crontab {
            user: Some(user), ..
        } => {
            let user = if user == "-" { CURRENT_USER } else { user.as_str() };
            entries
                .into_iter()
                .map(|e| if e.has_user() { e } else { e.with_user(user) })
                .collect()
        }
        _ => entries,
    };

    let crontab = Crontab::new(entries);
    let crontab = match kind {
        SchedulerKind::Crond { binary } => {
            crontab.with_binary(binary.unwrap_or_else(|| config.crontab.binary.clone()))
        }
        SchedulerKind::Crontab { file, .. } => crontab.with_file(file),
        other => bail!("scheduler {other} does not use a crontab"),
    };
    Ok(match &config.crontab.user {
        Some(user) => crontab.with_user(user.as_str()),
        None => crontab,
    })
}
