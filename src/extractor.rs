//! Thin wrapper around the yt-dlp invocation that fetches the info JSON
//! (with comments embedded) and the thumbnail for a single video.

use anyhow::{Result, bail};
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// What happened when we ran the extractor. Callers still decide success by
/// looking for the files it was supposed to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorStatus {
    Succeeded,
    /// Process ran but exited non-zero (`None` when killed by a signal).
    Failed(Option<i32>),
    SpawnFailed(String),
    Skipped,
}

impl ExtractorStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Skipped)
    }
}

impl fmt::Display for ExtractorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(Some(code)) => write!(f, "exited with status {code}"),
            Self::Failed(None) => write!(f, "terminated by signal"),
            Self::SpawnFailed(err) => write!(f, "could not be started: {err}"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Runs `<program> --version` so a missing yt-dlp shows up as a clear log
/// line before we try the real command.
pub fn ensure_program_available(program: &Path) -> Result<()> {
    let status = Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => bail!(
            "{} is installed but returned a failure status",
            program.display()
        ),
        Err(err) => bail!("{} is not installed or not in PATH: {}", program.display(), err),
    }
}

/// Builds the metadata + comments + thumbnail command. Files land in
/// `output_dir` named after the video id.
pub fn build_command(program: &Path, video_url: &str, output_dir: &Path) -> Command {
    let output_pattern = output_dir.join("%(id)s");
    let mut command = Command::new(program);
    command
        .arg("--write-thumbnail")
        .arg("--skip-download")
        .arg("--write-info-json")
        .arg("--write-comments")
        .arg("--no-progress")
        .arg("--output")
        .arg(output_pattern.to_string_lossy().to_string())
        .arg(video_url);
    command
}

/// Runs the extractor synchronously. Never fails on its own; the status is
/// logged and handed back so the caller can apply its own policy.
pub fn run_extractor(program: &Path, video_url: &str, output_dir: &Path) -> ExtractorStatus {
    if let Err(err) = ensure_program_available(program) {
        warn!("extractor unavailable: {err:#}");
        return ExtractorStatus::SpawnFailed(err.to_string());
    }

    info!(url = video_url, "extracting video info and comments");
    let mut command = build_command(program, video_url, output_dir);
    debug!(?command, "running extractor");

    let status = match command.status() {
        Ok(status) if status.success() => ExtractorStatus::Succeeded,
        Ok(status) => ExtractorStatus::Failed(status.code()),
        Err(err) => ExtractorStatus::SpawnFailed(err.to_string()),
    };

    if !status.is_success() {
        warn!("extractor {status}");
    }
    status
}
