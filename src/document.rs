//! The export document: a fixed-schema JSON object combining the video's
//! metadata with its comment tree.
//!
//! Field order matches the consumers' schema, so the structs below are laid
//! out in the exact order they are serialized.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::comments::{CommentNode, DateField};
use crate::info::VideoInfo;

pub const DOCUMENT_TYPE: &str = "page";
pub const DOCUMENT_SOURCE: &str = "YouTube";
pub const TOPIC_LABEL: &str = "video";
pub const TOPIC_SCORE: f64 = 0.8;
pub const FEATURED_IMAGE_SLOTS: usize = 12;
pub const PERCENT_COMMENTS: f64 = 0.5;
const JSON_INDENT: &[u8] = b"   ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTopic {
    pub status: String,
    pub topic: Topic,
}

/// Reaction counts. YouTube only exposes likes, so everything else is null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reactions {
    pub total: Option<i64>,
    pub sad: Option<i64>,
    pub love: Option<i64>,
    pub wow: Option<i64>,
    pub like: Option<i64>,
    pub haha: Option<i64>,
    pub angry: Option<i64>,
}

impl Reactions {
    pub fn from_likes(likes: i64) -> Self {
        Self {
            total: Some(likes),
            sad: None,
            love: None,
            wow: None,
            like: Some(likes),
            haha: None,
            angry: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub post_url: String,
    pub post_title: Option<String>,
    pub posted_at: DateField,
    pub post_text: String,
    pub post_topic: PostTopic,
    pub comments: Vec<CommentNode>,
    pub reactions: Reactions,
    pub featured_image: Vec<Option<String>>,
    pub total_comments: i64,
    pub total_comments_scraped: usize,
    pub percent_comments: f64,
    pub total_shares: i64,
    pub vitality_score: i64,
    pub checksum: String,
}

/// Hex BLAKE3 digest, used for both the document id and the checksum.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Checksum over the compact JSON form of the comment array.
pub fn comments_checksum(comments: &[CommentNode]) -> Result<String> {
    let serialized = serde_json::to_vec(comments).context("serializing comments for checksum")?;
    Ok(content_hash(&serialized))
}

/// Rough popularity proxy: thousands of views, rounded down.
pub fn vitality_score(view_count: Option<i64>) -> i64 {
    view_count.unwrap_or(0).div_euclid(1000)
}

/// Assembles the document. `posted_at` is the export time, already formatted.
pub fn assemble_document(
    video_url: &str,
    info: &VideoInfo,
    comments: Vec<CommentNode>,
    posted_at: String,
) -> Result<ExportDocument> {
    let checksum = comments_checksum(&comments)?;

    Ok(ExportDocument {
        id: ObjectId {
            oid: content_hash(video_url.as_bytes()),
        },
        kind: DOCUMENT_TYPE.to_string(),
        source: DOCUMENT_SOURCE.to_string(),
        post_url: video_url.to_string(),
        post_title: info.title.clone(),
        posted_at: DateField::new(posted_at),
        post_text: info.description.clone().unwrap_or_default(),
        post_topic: PostTopic {
            status: "ok".to_string(),
            topic: Topic {
                label: TOPIC_LABEL.to_string(),
                score: TOPIC_SCORE,
            },
        },
        comments,
        reactions: Reactions::from_likes(info.like_count.unwrap_or(0)),
        featured_image: vec![None; FEATURED_IMAGE_SLOTS],
        total_comments: info.comment_count.unwrap_or(0),
        total_comments_scraped: info.comments().len(),
        percent_comments: PERCENT_COMMENTS,
        total_shares: 0,
        vitality_score: vitality_score(info.view_count),
        checksum,
    })
}

pub fn document_path(output_dir: &Path, video_id: &str) -> PathBuf {
    output_dir.join(format!("{video_id}_formatted_data.json"))
}

/// Serializes with a three-space indent; non-ASCII text is written as-is.
pub fn to_pretty_json(document: &ExportDocument) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .context("serializing export document")?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Writes the document in one go. There is no temp-file-and-rename step, so
/// a crash mid-write leaves a truncated file behind.
pub fn write_document(path: &Path, document: &ExportDocument) -> Result<()> {
    let bytes = to_pretty_json(document)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::build_comment_tree_with;
    use crate::info::RawComment;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    const URL: &str = "https://youtu.be/TYRQAXNfDog?si=0UIsXawNNiVYs-xQ";

    fn comment(id: &str, parent: &str, text: &str) -> RawComment {
        RawComment {
            id: id.into(),
            parent: parent.into(),
            author: "Zoë".into(),
            text: text.into(),
            timestamp: Some(json!(1_700_000_000)),
            ..RawComment::default()
        }
    }

    fn sample_info() -> VideoInfo {
        VideoInfo {
            title: Some("Sample Title".into()),
            description: Some("desc".into()),
            like_count: Some(42),
            view_count: Some(12_345),
            comment_count: Some(2),
            comments: Some(vec![
                comment("c1", "root", "first"),
                comment("c2", "root", "second"),
                comment("c1.r1", "c1", "reply"),
            ]),
        }
    }

    fn assemble(info: &VideoInfo) -> ExportDocument {
        let tree = build_comment_tree_with(info.comments(), |_| "14-11-2023 22:13".into());
        assemble_document(URL, info, tree, "01-01-2030 00:00".into()).unwrap()
    }

    #[test]
    fn end_to_end_counts_and_tree() {
        let document = assemble(&sample_info());
        assert_eq!(document.total_comments, 2);
        assert_eq!(document.total_comments_scraped, 3);
        assert_eq!(document.comments.len(), 2);
        assert_eq!(document.comments[0].comments_replies.len(), 1);
        assert!(document.comments[1].comments_replies.is_empty());
        assert_eq!(document.vitality_score, 12);
        assert_eq!(document.post_title.as_deref(), Some("Sample Title"));
        assert_eq!(document.id.oid, content_hash(URL.as_bytes()));
    }

    #[test]
    fn reactions_mirror_like_count_only() -> Result<()> {
        let document = assemble(&sample_info());
        let value = serde_json::to_value(&document.reactions)?;
        assert_eq!(value["Total"], 42);
        assert_eq!(value["Like"], 42);
        for key in ["Sad", "Love", "Wow", "Haha", "Angry"] {
            assert_eq!(value[key], Value::Null, "{key} should be null");
        }
        assert_eq!(value.as_object().map(|map| map.len()), Some(7));
        Ok(())
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let info = VideoInfo::default();
        let document = assemble(&info);
        assert_eq!(document.reactions.total, Some(0));
        assert_eq!(document.total_comments, 0);
        assert_eq!(document.total_comments_scraped, 0);
        assert_eq!(document.vitality_score, 0);
        assert_eq!(document.post_title, None);
        assert_eq!(document.post_text, "");
        assert!(document.comments.is_empty());
    }

    #[test]
    fn null_like_count_and_authors_export_as_zero_and_empty() -> Result<()> {
        let info: VideoInfo = serde_json::from_str(
            r#"{"like_count": null, "comments": [
                {"id": "c1", "parent": "root", "author": null, "author_url": null,
                 "author_thumbnail": null, "text": "hi"}
            ]}"#,
        )?;
        let document = assemble(&info);
        assert_eq!(document.reactions.total, Some(0));
        assert_eq!(document.reactions.like, Some(0));
        let top = &document.comments[0];
        assert_eq!(top.user_name, "");
        assert_eq!(top.user_profile_url, "");
        assert_eq!(top.user_pro_pic, "");
        Ok(())
    }

    #[test]
    fn vitality_score_floors() {
        assert_eq!(vitality_score(Some(999)), 0);
        assert_eq!(vitality_score(Some(1000)), 1);
        assert_eq!(vitality_score(Some(1999)), 1);
        assert_eq!(vitality_score(None), 0);
    }

    #[test]
    fn written_document_round_trips_checksum() -> Result<()> {
        let dir = tempdir()?;
        let document = assemble(&sample_info());
        let path = document_path(dir.path(), "TYRQAXNfDog");
        write_document(&path, &document)?;

        let text = std::fs::read_to_string(&path)?;
        let parsed: ExportDocument = serde_json::from_str(&text)?;
        assert_eq!(parsed, document);
        assert_eq!(comments_checksum(&parsed.comments)?, parsed.checksum);
        Ok(())
    }

    #[test]
    fn output_uses_three_space_indent_and_literal_unicode() -> Result<()> {
        let document = assemble(&sample_info());
        let text = String::from_utf8(to_pretty_json(&document)?)?;
        assert!(text.starts_with("{\n   \"_id\": {\n      \"$oid\""));
        assert!(text.contains("Zoë"));
        assert!(!text.contains("\\u00eb"));
        assert!(text.ends_with("}\n"));

        let value: Value = serde_json::from_str(&text)?;
        assert_eq!(value["type"], "page");
        assert_eq!(value["source"], "YouTube");
        assert_eq!(value["post_topic"]["topic"]["label"], "video");
        assert_eq!(value["featured_image"].as_array().map(Vec::len), Some(12));
        assert!(
            value["featured_image"]
                .as_array()
                .is_some_and(|slots| slots.iter().all(Value::is_null))
        );
        assert_eq!(value["percent_comments"], 0.5);
        assert_eq!(value["total_shares"], 0);
        Ok(())
    }

    #[test]
    fn checksum_tracks_comment_content() {
        let mut info = sample_info();
        let before = assemble(&info).checksum;
        if let Some(comments) = info.comments.as_mut() {
            comments[0].text = "edited".into();
        }
        let after = assemble(&info).checksum;
        assert_ne!(before, after);
    }
}
