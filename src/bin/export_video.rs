#![forbid(unsafe_code)]

//! Command-line entry point: fetches one video's info JSON and thumbnail via
//! yt-dlp and writes `<id>_formatted_data.json` next to them.

use anyhow::Result;
use clap::Parser;
use newtube_export::config::{DEFAULT_CONFIG_PATH, Overrides, resolve_settings};
use newtube_export::export::{self, ExportOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Export a YouTube video's metadata and comments.")]
struct Cli {
    #[arg(long = "url", value_name = "URL", help = "Video URL (overrides VIDEO_URL)")]
    url: Option<String>,
    #[arg(
        long = "video-id",
        value_name = "ID",
        help = "Use this id instead of deriving it from the URL"
    )]
    video_id: Option<String>,
    #[arg(
        long = "output-dir",
        value_name = "PATH",
        help = "Directory for yt-dlp output and the formatted document (default .)"
    )]
    output_dir: Option<PathBuf>,
    #[arg(long = "yt-dlp", value_name = "PATH", help = "yt-dlp executable to run")]
    ytdlp_bin: Option<PathBuf>,
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_PATH, help = "Path to the config file")]
    config: PathBuf,
    #[arg(
        long = "skip-extract",
        help = "Do not run yt-dlp; reuse files already in the output directory"
    )]
    skip_extract: bool,
    #[arg(long = "strict", help = "Fail when yt-dlp reports an error")]
    strict: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let settings = resolve_settings(
        &cli.config,
        Overrides {
            video_url: cli.url,
            video_id: cli.video_id,
            output_dir: cli.output_dir,
            ytdlp_bin: cli.ytdlp_bin,
            strict_extractor: cli.strict,
            skip_extract: cli.skip_extract,
        },
    )?;

    match export::run(&settings)? {
        ExportOutcome::Written(report) => {
            tracing::info!(
                video_id = %report.video_id,
                top_level = report.top_level_comments,
                "export finished: {}",
                report.document_path.display()
            );
        }
        // Exits normally; only the log says the run produced nothing.
        ExportOutcome::MissingMetadata { info_path, extractor } => {
            tracing::warn!(
                "no document written: {} missing (extractor {extractor})",
                info_path.display()
            );
        }
    }

    Ok(())
}
