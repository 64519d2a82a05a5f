//! The owned section of a crontab.
//!
//! Everything outside the two marker lines belongs to somebody else and is
//! written back untouched. Inside, lines are matched to entries by their
//! identity (config file, profile, command) so a schedule or command line
//! change replaces the previous line instead of adding a second one.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use calsched_calendar::Event;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::entry::Entry;
use crate::error::{CrondError, Result};
use crate::io::{self, Source};
use crate::parse::parse_cron_event;

pub const START_MARKER: &str =
    "### this content was generated by resticprofile, please leave this line intact ###\n";
pub const END_MARKER: &str =
    "### end of resticprofile content, please leave this line intact ###\n";

const TIME_EXP: &str = r"^(([\d,/\-*]+[ \t]?){5})";
const USER_EXP: &str = r"[\t]+([^\s]+\t+)?";
const WORK_DIR_EXP: &str = r"(cd .+ && )?";
const CONFIG_EXP: &str = r#"([^\s]+.+--config[ =]"?([^"\n]+)"? "#;
const LEGACY_EXP: &str = r"[^\n]*--name[ =]([^\s]+)( --.+)? ([a-z]+))$";
const RUN_SCHEDULE_EXP: &str = r"run-schedule ([^\s]+)@([^\s]+))$";

/// `... --config FILE --name PROFILE [flags] COMMAND`
static LEGACY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&[TIME_EXP, USER_EXP, WORK_DIR_EXP, CONFIG_EXP, LEGACY_EXP].concat())
        .expect("legacy crontab line pattern is valid")
});

/// `... --config FILE run-schedule COMMAND@PROFILE`
static RUN_SCHEDULE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&[TIME_EXP, USER_EXP, WORK_DIR_EXP, CONFIG_EXP, RUN_SCHEDULE_EXP].concat())
        .expect("run-schedule crontab line pattern is valid")
});

/// Header added by `crontab -l` on some systems.
static DO_NOT_EDIT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^# DO NOT EDIT THIS FILE[^\n]*\n#[^\n]*\n#[^\n]*\n")
        .expect("header pattern is valid")
});

static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*[*]\s+[*]\s+[*]\s+[*]\s+[*](\s+user.*)?\s+(command|cmd).*$")
        .expect("header line pattern is valid")
});

static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+\s+\S+\s+\S+\s+\S+\s+\S+|@[a-z]+)((?:\s{2,}|\t)\S+)?(?:\s{2,}|\t)(\S.*)$")
        .expect("entry line pattern is valid")
});

/// Share of entry lines with an extra column above which a crontab without
/// header is considered to have a user column.
const USER_COLUMN_THRESHOLD: f64 = 0.75;

/// A set of entries and the crontab they go to.
#[derive(Debug, Clone)]
pub struct Crontab {
    file: Option<PathBuf>,
    binary: Option<String>,
    user: Option<String>,
    entries: Vec<Entry>,
}

impl Crontab {
    /// Entries using the current-user sentinel get the current user name.
    pub fn new(entries: Vec<Entry>) -> Self {
        let mut crontab = Self {
            file: None,
            binary: None,
            user: None,
            entries,
        };
        let user = crontab.username();
        for entry in crontab.entries.iter_mut() {
            if entry.needs_user() {
                *entry = entry.with_user(&user);
            }
        }
        crontab
    }

    /// Use a `crontab`-compatible binary. Ignored when a file is set.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    /// Read and write this file directly.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Name written in the user column when one is added later on.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// All entry lines, in order.
    pub fn generate(&self) -> String {
        self.entries.iter().map(Entry::to_string).collect()
    }

    /// Current content. A "DO NOT EDIT" header is dropped when listing
    /// through the binary and refused when editing a file.
    pub fn load_current(&self) -> Result<String> {
        let source = self.source()?;
        let content = io::load(source)?;
        let cleaned = cleanup_crontab(&content);
        if cleaned == content {
            return Ok(content);
        }
        match source {
            Source::File(file) => Err(CrondError::DoNotEdit {
                file: file.display().to_string(),
            }),
            Source::Binary(_) => Ok(cleaned),
        }
    }

    /// Replace the owned section with the current entries.
    pub fn rewrite(&mut self) -> Result<()> {
        let source = self.source()?;
        let current = self.load_current()?;

        if matches!(source, Source::File(_)) && detect_needs_user_column(&current) {
            let user = self.username();
            debug!(user = %user, "crontab file has a user column");
            for entry in self.entries.iter_mut() {
                if !entry.has_user() {
                    *entry = entry.with_user(&user);
                }
            }
        }

        let (content, deleted) = self.update(&current, true)?;
        io::save(self.source()?, &content)?;
        info!(
            entries = self.entries.len(),
            replaced = deleted,
            "crontab updated"
        );
        Ok(())
    }

    /// Delete the lines of every entry. Returns how many lines went.
    pub fn remove(&self) -> Result<usize> {
        let source = self.source()?;
        let current = self.load_current()?;
        let (content, deleted) = self.update(&current, false)?;
        io::save(source, &content)?;
        info!(deleted, "crontab entries removed");
        Ok(deleted)
    }

    /// Entries found in the owned section; empty when there is none.
    pub fn get_entries(&self) -> Result<Vec<Entry>> {
        let current = self.load_current()?;
        match extract_own_section(&current) {
            Some((_, section, _)) => Ok(parse_entries(section)),
            None => Ok(Vec::new()),
        }
    }

    /// Rebuild `source` with the owned section updated.
    ///
    /// Lines matching an entry are removed first (only when the section
    /// already exists); with `add_entries` the fresh lines are appended.
    /// Returns the new content and the number of lines deleted.
    pub(crate) fn update(&self, source: &str, add_entries: bool) -> Result<(String, usize)> {
        let (before, mut section, after, found) = match extract_own_section(source) {
            Some((before, section, after)) => (before, section.to_string(), after, true),
            None => (source, String::new(), "", false),
        };

        let mut deleted = 0;
        if found {
            for entry in &self.entries {
                let (remaining, count) = delete_line(&section, entry)?;
                section = remaining;
                deleted += count;
            }
        }

        let mut output = String::with_capacity(source.len() + START_MARKER.len() + END_MARKER.len());
        output.push_str(before);
        if !found {
            output.push('\n');
        }
        output.push_str(START_MARKER);
        output.push_str(&section);
        if add_entries {
            output.push_str(&self.generate());
        }
        output.push_str(END_MARKER);
        output.push_str(after);
        Ok((output, deleted))
    }

    fn source(&self) -> Result<Source<'_>> {
        Source::select(self.file.as_deref(), self.binary.as_deref())
    }

    fn username(&self) -> String {
        self.user.clone().unwrap_or_else(current_username)
    }
}

/// `$USER` or `$LOGNAME`, `root` when neither gives a usable name.
fn current_username() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_default();
    if user.is_empty() || user.chars().any(char::is_whitespace) {
        return "root".to_string();
    }
    user
}

/// Split into (before, owned section, after), markers excluded.
pub fn extract_own_section(crontab: &str) -> Option<(&str, &str, &str)> {
    let start = crontab.find(START_MARKER)?;
    let body_start = start + START_MARKER.len();
    let end = body_start + crontab[body_start..].find(END_MARKER)?;
    Some((
        &crontab[..start],
        &crontab[body_start..end],
        &crontab[end + END_MARKER.len()..],
    ))
}

/// Drop a "DO NOT EDIT" header at the very top.
pub fn cleanup_crontab(crontab: &str) -> String {
    DO_NOT_EDIT_HEADER.replace_all(crontab, "").into_owned()
}

/// Remove every uncommented line running `entry`: a resticprofile command
/// carrying its identity, in either form, or a line with exactly its command
/// column. Returns what is left and how many lines were removed.
fn delete_line(crontab: &str, entry: &Entry) -> Result<(String, usize)> {
    let legacy = format!(
        r"--name {}[^\n]* {}",
        regex::escape(entry.profile_name()),
        regex::escape(entry.command_name())
    );
    let run_schedule = format!(
        r"run-schedule {}@{}",
        regex::escape(entry.command_name()),
        regex::escape(entry.profile_name())
    );
    let mut alternatives = vec![format!(
        r#"[^#\n][^\n]+resticprofile[^\n]+--config ["]?{}["]? (?:{}|{})"#,
        regex::escape(entry.config_file()),
        legacy,
        run_schedule
    )];
    if !entry.command_line().is_empty() {
        alternatives.push(format!(
            r"[\d,/\-*]+(?: [\d,/\-*]+){{4}}\t{}",
            regex::escape(&entry.command_column())
        ));
    }
    let pattern = Regex::new(&format!(r"(?m)^(?:{})\n", alternatives.join("|")))?;
    let count = pattern.find_iter(crontab).count();
    if count == 0 {
        return Ok((crontab.to_string(), 0));
    }
    Ok((pattern.replace_all(crontab, "").into_owned(), count))
}

/// Whether an existing crontab file carries a user column, judged from
/// its header comments or, without any, from its entry lines.
pub fn detect_needs_user_column(crontab: &str) -> bool {
    let (mut headers, mut user_headers) = (0usize, 0usize);
    let (mut entries, mut user_entries) = (0usize, 0usize);

    for line in crontab.split('\n') {
        if let Some(caps) = HEADER_LINE.captures(line) {
            headers += 1;
            if caps
                .get(1)
                .is_some_and(|m| m.as_str().trim().starts_with("user"))
            {
                user_headers += 1;
            }
        } else if let Some(caps) = ENTRY_LINE.captures(line) {
            entries += 1;
            if caps.get(2).is_some_and(|m| !m.as_str().is_empty()) {
                user_entries += 1;
            }
        }
    }

    let user_share = if entries > 0 {
        user_entries as f64 / entries as f64
    } else {
        0.0
    };
    let verdict = if headers > 0 {
        user_headers == headers || (user_headers > 0 && user_share > 0.0)
    } else {
        user_share > USER_COLUMN_THRESHOLD
    };
    debug!(headers, user_headers, entries, user_entries, verdict, "user column detection");
    verdict
}

fn parse_entries(section: &str) -> Vec<Entry> {
    section
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match parse_entry(line) {
            Ok(Some(entry)) => Some(entry),
            Ok(None) => {
                debug!(line, "not a scheduled command");
                None
            }
            Err(e) => {
                warn!(line, error = %e, "skipping crontab line");
                None
            }
        })
        .collect()
}

/// Read an entry back from one of its crontab lines.
pub fn parse_entry(line: &str) -> Result<Option<Entry>> {
    // (profile group, command group)
    let (caps, profile, command) = if let Some(caps) = LEGACY_LINE.captures(line) {
        (caps, 7, 9)
    } else if let Some(caps) = RUN_SCHEDULE_LINE.captures(line) {
        (caps, 8, 7)
    } else {
        return Ok(None);
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let event: Event = parse_cron_event(group(1))?;
    let work_dir = group(4);
    let work_dir = work_dir.strip_prefix("cd ").unwrap_or(work_dir);
    let work_dir = work_dir.strip_suffix(" && ").unwrap_or(work_dir);
    let entry = Entry::new(
        event,
        group(6),
        group(profile),
        group(command),
        group(5),
        work_dir,
    );
    let user = group(3).trim();
    Ok(Some(if user.is_empty() {
        entry
    } else {
        entry.with_user(user)
    }))
}
