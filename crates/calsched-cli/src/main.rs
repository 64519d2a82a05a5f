//! CLI binary for calsched.

use anyhow::Context;
use calsched_calendar::Event;
use calsched_core::config::CalschedConfig;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod jobs;

/// calsched: calendar expressions for crond and launchd.
#[derive(Parser)]
#[command(name = "calsched", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize calendar expressions and show when they run next.
    Show {
        #[arg(required = true)]
        expressions: Vec<String>,
    },

    /// Print the cron time fields of calendar expressions.
    Cron {
        #[arg(required = true)]
        expressions: Vec<String>,
    },

    /// Print launchd calendar intervals as JSON.
    Launchd {
        #[arg(required = true)]
        expressions: Vec<String>,
    },

    /// Write the configured jobs into the crontab.
    Install,

    /// Remove the configured jobs from the crontab.
    Remove,

    /// List the jobs found in the crontab.
    List,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "calsched=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Show { expressions } => show(&expressions),
        Command::Cron { expressions } => {
            for event in parse_all(&expressions)? {
                println!("{}", calsched_crond::cron_time(&event));
            }
            Ok(())
        }
        Command::Launchd { expressions } => {
            let events = parse_all(&expressions)?;
            let records = calsched_launchd::intervals_from_events(&events);
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Command::Install => install(&load_config(cli.config.as_deref())),
        Command::Remove => remove(&load_config(cli.config.as_deref())),
        Command::List => list(&load_config(cli.config.as_deref())),
    }
}

// load config: explicit path > CALSCHED_CONFIG env > ~/.calsched/calsched.toml
fn load_config(path: Option<&str>) -> CalschedConfig {
    CalschedConfig::load(path).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        CalschedConfig::default()
    })
}

fn parse_all(expressions: &[String]) -> anyhow::Result<Vec<Event>> {
    expressions
        .iter()
        .map(|expr| Event::parse(expr).with_context(|| format!("cannot parse {expr:?}")))
        .collect()
}

fn show(expressions: &[String]) -> anyhow::Result<()> {
    let now = Local::now();
    for (expr, event) in expressions.iter().zip(parse_all(expressions)?) {
        println!("  Original form: {expr}");
        println!("Normalized form: {event}");
        match event.next(now.naive_local()) {
            Some(next) => {
                println!("    Next elapse: {}", next.format("%a %Y-%m-%d %H:%M:%S"));
                if let Some(local) = next.and_local_timezone(Local).earliest() {
                    println!(
                        "       (in UTC): {}",
                        local.with_timezone(&Utc).format("%a %Y-%m-%d %H:%M:%S UTC")
                    );
                    println!("       From now: {}", format_delay(local - now));
                }
            }
            None => println!("    Next elapse: never"),
        }
        println!();
    }
    Ok(())
}

fn format_delay(delay: chrono::Duration) -> String {
    let minutes = delay.num_minutes().max(0);
    let (days, hours, minutes) = (minutes / 1440, minutes / 60 % 24, minutes % 60);
    match (days, hours) {
        (0, 0) => format!("{minutes}min"),
        (0, _) => format!("{hours}h {minutes}min"),
        _ => format!("{days} days {hours}h {minutes}min"),
    }
}

fn install(config: &CalschedConfig) -> anyhow::Result<()> {
    let entries = jobs::entries_from_config(config)?;
    let mut crontab = jobs::crontab_for(config, entries)?;
    crontab.rewrite()?;
    info!(entries = crontab.entries().len(), "jobs installed");
    Ok(())
}

fn remove(config: &CalschedConfig) -> anyhow::Result<()> {
    let entries = jobs::entries_from_config(config)?;
    let crontab = jobs::crontab_for(config, entries)?;
    let deleted = crontab.remove()?;
    info!(deleted, "jobs removed");
    Ok(())
}

fn list(config: &CalschedConfig) -> anyhow::Result<()> {
    let crontab = jobs::crontab_for(config, Vec::new())?;
    for entry in crontab.get_entries()? {
        println!(
            "{}/{}\t{}\t{}",
            entry.profile_name(),
            entry.command_name(),
            entry.event(),
            entry.config_file()
        );
    }
    Ok(())
}
