//! Reading and writing the crontab, either through a `crontab` binary
//! (`-l` to list, `-` to replace from stdin) or directly as a file.

use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{CrondError, Result};

/// Crontab files at or above this size are refused.
pub const MAX_CRONTAB_FILE_SIZE: usize = 16 * 1024 * 1024;

/// Where the crontab lives.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source<'a> {
    Binary(&'a str),
    File(&'a Path),
}

impl<'a> Source<'a> {
    /// The binary is only used when no file is set.
    pub(crate) fn select(file: Option<&'a Path>, binary: Option<&'a str>) -> Result<Self> {
        match (file, binary) {
            (Some(file), _) => Ok(Source::File(file)),
            (None, Some(binary)) if !binary.is_empty() => Ok(Source::Binary(binary)),
            _ => Err(CrondError::NoCrontabFile),
        }
    }
}

pub(crate) fn load(source: Source<'_>) -> Result<String> {
    match source {
        Source::Binary(binary) => load_from_binary(binary),
        Source::File(file) => load_file(file),
    }
}

pub(crate) fn save(source: Source<'_>, content: &str) -> Result<()> {
    match source {
        Source::Binary(binary) => save_with_binary(binary, content),
        Source::File(file) => save_file(file, content),
    }
}

fn load_from_binary(binary: &str) -> Result<String> {
    debug!(binary = %binary, "listing crontab");
    let output = Command::new(binary).arg("-l").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if output.status.success() {
        return Ok(stdout);
    }
    let combined = stdout + &String::from_utf8_lossy(&output.stderr);
    // an empty crontab is reported as a failure by most implementations
    if combined.starts_with("no crontab for ") {
        return Ok(String::new());
    }
    Err(CrondError::Command {
        binary: binary.to_string(),
        output: combined.trim_end().to_string(),
    })
}

fn save_with_binary(binary: &str, content: &str) -> Result<()> {
    debug!(binary = %binary, bytes = content.len(), "replacing crontab");
    let mut child = Command::new(binary)
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(content.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        let combined = String::from_utf8_lossy(&output.stdout).into_owned()
            + &String::from_utf8_lossy(&output.stderr);
        return Err(CrondError::Command {
            binary: binary.to_string(),
            output: combined.trim_end().to_string(),
        });
    }
    Ok(())
}

/// A missing file reads as an empty crontab.
fn load_file(file: &Path) -> Result<String> {
    let handle = match fs::File::open(file) {
        Ok(handle) => handle,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = %file.display(), "crontab file does not exist yet");
            return Ok(String::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    handle
        .take(MAX_CRONTAB_FILE_SIZE as u64)
        .read_to_end(&mut bytes)?;
    if bytes.len() >= MAX_CRONTAB_FILE_SIZE {
        return Err(too_large(file));
    }
    String::from_utf8(bytes).map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e).into())
}

fn save_file(file: &Path, content: &str) -> Result<()> {
    if content.len() >= MAX_CRONTAB_FILE_SIZE {
        return Err(too_large(file));
    }
    fs::write(file, content)?;
    debug!(file = %file.display(), bytes = content.len(), "crontab file written");
    Ok(())
}

fn too_large(file: &Path) -> CrondError {
    CrondError::FileTooLarge {
        file: file.display().to_string(),
        max: MAX_CRONTAB_FILE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_prefers_the_file() {
        let path = Path::new("/tmp/crontab");
        assert!(matches!(
            Source::select(Some(path), Some("crontab")),
            Ok(Source::File(_))
        ));
        assert!(matches!(
            Source::select(None, Some("crontab")),
            Ok(Source::Binary("crontab"))
        ));
        assert!(matches!(
            Source::select(None, None),
            Err(CrondError::NoCrontabFile)
        ));
        assert!(matches!(
            Source::select(None, Some("")),
            Err(CrondError::NoCrontabFile)
        ));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let content = load(Source::File(&dir.path().join("crontab"))).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crontab");
        save(Source::File(&path), "01 01 * * *\tbackup\n").unwrap();
        assert_eq!(load(Source::File(&path)).unwrap(), "01 01 * * *\tbackup\n");
    }

    #[test]
    fn oversized_content_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crontab");
        let content = "#".repeat(MAX_CRONTAB_FILE_SIZE);
        assert!(matches!(
            save(Source::File(&path), &content),
            Err(CrondError::FileTooLarge { .. })
        ));
        assert!(!path.exists());

        fs::write(&path, &content).unwrap();
        assert!(matches!(
            load(Source::File(&path)),
            Err(CrondError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn missing_binary_is_an_io_error() {
        let err = load(Source::Binary("/nonexistent/calsched-crontab")).unwrap_err();
        assert!(matches!(err, CrondError::Io(_)));
    }
}
