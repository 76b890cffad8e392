//! Derives the yt-dlp `%(id)s` value from a video URL so we know which files
//! to look for once the extractor has run.

use anyhow::{Context, Result, anyhow};
use url::Url;

/// Path prefixes that are followed directly by the video id.
const ID_PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

pub fn derive_video_id(video_url: &str) -> Result<String> {
    let url = Url::parse(video_url.trim())
        .with_context(|| format!("parsing video URL {video_url:?}"))?;

    if let Some(id) = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        && !id.is_empty()
    {
        return Ok(id);
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if let [prefix, id, ..] = segments.as_slice()
        && ID_PATH_PREFIXES.contains(prefix)
    {
        return Ok((*id).to_owned());
    }

    segments
        .last()
        .filter(|segment| **segment != "watch")
        .map(|segment| (*segment).to_owned())
        .ok_or_else(|| anyhow!("could not find a video id in {video_url}"))
}
