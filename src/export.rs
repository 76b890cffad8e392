//! One sequential export run: extract, load, build the tree, assemble,
//! rename the thumbnail, write the document.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::comments::build_comment_tree;
use crate::config::ExportSettings;
use crate::document::{assemble_document, document_path, write_document};
use crate::extractor::{ExtractorStatus, run_extractor};
use crate::finalize::{ThumbnailOutcome, rename_thumbnail};
use crate::info::{info_json_path, load_video_info};
use crate::timestamp::now_formatted;
use crate::video_id::derive_video_id;

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub video_id: String,
    pub document_path: PathBuf,
    pub extractor: ExtractorStatus,
    pub thumbnail: ThumbnailOutcome,
    pub total_comments: i64,
    pub total_comments_scraped: usize,
    pub top_level_comments: usize,
}

#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// The extractor left no info JSON behind; nothing was written.
    MissingMetadata {
        info_path: PathBuf,
        extractor: ExtractorStatus,
    },
    Written(ExportReport),
}

pub fn run(settings: &ExportSettings) -> Result<ExportOutcome> {
    let video_id = match &settings.video_id {
        Some(id) => id.clone(),
        None => derive_video_id(&settings.video_url)?,
    };
    let output_dir = settings.output_dir.as_path();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let extractor = if settings.skip_extract {
        info!("skipping extraction, reusing files in {}", output_dir.display());
        ExtractorStatus::Skipped
    } else {
        run_extractor(&settings.ytdlp_bin, &settings.video_url, output_dir)
    };
    if settings.strict_extractor && !extractor.is_success() {
        bail!("extractor {extractor} for {}", settings.video_url);
    }

    let info_path = info_json_path(output_dir, &video_id);
    if !info_path.exists() {
        warn!("could not find info file: {}", info_path.display());
        return Ok(ExportOutcome::MissingMetadata {
            info_path,
            extractor,
        });
    }

    let video_info = load_video_info(&info_path)?;
    let tree = build_comment_tree(video_info.comments());
    let document = assemble_document(&settings.video_url, &video_info, tree, now_formatted())?;

    let thumbnail = rename_thumbnail(output_dir, &video_id)?;

    let document_path = document_path(output_dir, &video_id);
    write_document(&document_path, &document)?;

    info!(
        total_comments = document.total_comments,
        scraped = document.total_comments_scraped,
        "comments and video info saved to {}",
        document_path.display()
    );

    Ok(ExportOutcome::Written(ExportReport {
        video_id,
        document_path,
        extractor,
        thumbnail,
        total_comments: document.total_comments,
        total_comments_scraped: document.total_comments_scraped,
        top_level_comments: document.comments.len(),
    }))
}
