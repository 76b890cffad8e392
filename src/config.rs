//! Configuration for the exporter.
//!
//! Values come from an optional env-style file (`KEY="value"` per line) and
//! are then overridden by whatever the caller passed on the command line.

use anyhow::{Context, Result, anyhow, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/newtube-export-env";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_YTDLP_BIN: &str = "yt-dlp";

/// Raw values read from the config file. Everything is optional because the
/// command line may supply the rest.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub video_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub ytdlp_bin: Option<PathBuf>,
    pub strict_extractor: Option<bool>,
}

/// Command-line overrides layered on top of [`EnvConfig`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub video_url: Option<String>,
    pub video_id: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub ytdlp_bin: Option<PathBuf>,
    pub strict_extractor: bool,
    pub skip_extract: bool,
}

/// Fully resolved settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub video_url: String,
    pub video_id: Option<String>,
    pub output_dir: PathBuf,
    pub ytdlp_bin: PathBuf,
    pub strict_extractor: bool,
    pub skip_extract: bool,
}

pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            let value = value_raw.trim().trim_matches('"');
            match key.trim() {
                "STRICT_EXTRACTOR" => {
                    let strict = parse_bool(value).with_context(|| {
                        format!("Parsing STRICT_EXTRACTOR from {}", path.display())
                    })?;
                    cfg.strict_extractor = Some(strict);
                }
                // Empty paths and URLs mean "not set".
                _ if value.is_empty() => {}
                "VIDEO_URL" => cfg.video_url = Some(value.to_string()),
                "OUTPUT_DIR" => cfg.output_dir = Some(PathBuf::from(value)),
                "YTDLP_BIN" => cfg.ytdlp_bin = Some(PathBuf::from(value)),
                _ => {}
            }
        }
    }
    Ok(Some(cfg))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

/// Reads the config file (if any) and merges the command-line overrides.
pub fn resolve_settings(config_path: &Path, overrides: Overrides) -> Result<ExportSettings> {
    let cfg = read_env_config(config_path)?.unwrap_or_default();
    merge(cfg, overrides, config_path)
}

fn merge(cfg: EnvConfig, overrides: Overrides, config_path: &Path) -> Result<ExportSettings> {
    let video_url = overrides.video_url.or(cfg.video_url).ok_or_else(|| {
        anyhow!(
            "no video URL given; pass --url or set VIDEO_URL in {}",
            config_path.display()
        )
    })?;
    let output_dir = overrides
        .output_dir
        .or(cfg.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let ytdlp_bin = overrides
        .ytdlp_bin
        .or(cfg.ytdlp_bin)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_YTDLP_BIN));
    let strict_extractor = overrides.strict_extractor || cfg.strict_extractor.unwrap_or(false);

    Ok(ExportSettings {
        video_url,
        video_id: overrides.video_id,
        output_dir,
        ytdlp_bin,
        strict_extractor,
        skip_extract: overrides.skip_extract,
    })
}
