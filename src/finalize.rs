//! Renames the thumbnail yt-dlp dropped next to the info JSON.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extensions yt-dlp commonly writes for thumbnails, in lookup order.
const THUMBNAIL_EXTENSIONS: &[&str] = &["webp", "jpg", "png"];
const THUMBNAIL_SUFFIX: &str = "_ss";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    Missing,
}

/// First thumbnail named `<video_id>.<ext>` found in `output_dir`.
pub fn find_thumbnail(output_dir: &Path, video_id: &str) -> Option<(PathBuf, &'static str)> {
    THUMBNAIL_EXTENSIONS.iter().find_map(|ext| {
        let candidate = output_dir.join(format!("{video_id}.{ext}"));
        candidate.is_file().then_some((candidate, *ext))
    })
}

/// Renames `<id>.<ext>` to `<id>_ss.<ext>`. A missing thumbnail is logged and
/// reported, not treated as an error; a failed rename is.
pub fn rename_thumbnail(output_dir: &Path, video_id: &str) -> Result<ThumbnailOutcome> {
    let Some((from, ext)) = find_thumbnail(output_dir, video_id) else {
        warn!(video_id, "thumbnail not found in {}", output_dir.display());
        return Ok(ThumbnailOutcome::Missing);
    };

    let to = output_dir.join(format!("{video_id}{THUMBNAIL_SUFFIX}.{ext}"));
    fs::rename(&from, &to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    info!("thumbnail saved as {}", to.display());
    Ok(ThumbnailOutcome::Renamed { from, to })
}
