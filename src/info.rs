//! Typed view over yt-dlp's `<id>.info.json`.
//!
//! Only the handful of fields the export document needs are modelled; the
//! rest of the (very large) payload is ignored by serde.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Parent value yt-dlp writes for top-level comments.
pub const ROOT_PARENT: &str = "root";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub like_count: Option<i64>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub comment_count: Option<i64>,
    #[serde(default)]
    pub comments: Option<Vec<RawComment>>,
}

/// One entry of the flat `comments` list. Replies point at their parent via
/// `parent`; top-level comments carry [`ROOT_PARENT`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parent: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author_thumbnail: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    /// Epoch seconds in practice, but older dumps carry date strings.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl RawComment {
    pub fn is_top_level(&self) -> bool {
        self.parent == ROOT_PARENT
    }
}

impl VideoInfo {
    pub fn comments(&self) -> &[RawComment] {
        self.comments.as_deref().unwrap_or_default()
    }
}

/// yt-dlp writes `null` for some author fields; treat that like a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn info_json_path(output_dir: &Path, video_id: &str) -> PathBuf {
    output_dir.join(format!("{video_id}.info.json"))
}

/// Parses the info JSON. A missing or malformed file is an error.
pub fn load_video_info(path: &Path) -> Result<VideoInfo> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_comments_and_counters() -> Result<()> {
        let dir = tempdir()?;
        let path = info_json_path(dir.path(), "abc");
        fs::write(
            &path,
            r#"{
                "id": "abc",
                "title": "Título",
                "like_count": 12,
                "view_count": 4567,
                "formats": [{"format_id": "18"}],
                "comments": [
                    {"id": "c1", "parent": "root", "author": "@a", "text": "hi", "timestamp": 1700000000},
                    {"id": "c1.r1", "parent": "c1", "author": null, "text": "reply", "timestamp": "2024-01-01"}
                ]
            }"#,
        )?;

        let info = load_video_info(&path)?;
        assert_eq!(info.title.as_deref(), Some("Título"));
        assert_eq!(info.like_count, Some(12));
        assert_eq!(info.comment_count, None);
        assert_eq!(info.comments().len(), 2);
        assert!(info.comments()[0].is_top_level());
        assert!(!info.comments()[1].is_top_level());
        assert_eq!(info.comments()[1].author, "");
        Ok(())
    }

    #[test]
    fn absent_comments_key_is_empty() -> Result<()> {
        let info: VideoInfo = serde_json::from_str(r#"{"title": null}"#)?;
        assert!(info.comments().is_empty());
        assert!(info.title.is_none());
        Ok(())
    }

    #[test]
    fn missing_and_malformed_files_fail() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("missing.info.json");
        assert!(load_video_info(&missing).is_err());

        let broken = dir.path().join("broken.info.json");
        fs::write(&broken, "{not json")?;
        let err = load_video_info(&broken).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
        Ok(())
    }
}
