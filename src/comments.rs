//! Turns yt-dlp's flat comment list into the two-level tree the export
//! document carries: top-level comments, each with its direct replies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::info::{ROOT_PARENT, RawComment};
use crate::timestamp::format_timestamp;

/// `{"$date": "..."}` wrapper used for every date in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateField {
    #[serde(rename = "$date")]
    pub date: String,
}

impl DateField {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }
}

/// Comment as it appears in the export. Replies carry an empty
/// `comments_replies` list; nesting never goes deeper than one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub user_pro_pic: String,
    pub comment_time: DateField,
    pub user_name: String,
    pub user_profile_url: String,
    pub comment_text: String,
    #[serde(default)]
    pub comments_replies: Vec<CommentNode>,
}

/// Node plus the bookkeeping needed to link it. Never leaves this module.
struct WorkingComment<'a> {
    id: &'a str,
    parent: &'a str,
    node: CommentNode,
}

/// Builds the tree with timestamps rendered in local time.
pub fn build_comment_tree(records: &[RawComment]) -> Vec<CommentNode> {
    build_comment_tree_with(records, format_timestamp)
}

/// Builds the tree using `format_time` for comment timestamps.
///
/// Top-level comments keep input order, as do replies under each parent.
/// Replies whose parent is not a top-level comment are dropped, which
/// includes every reply-to-a-reply. A repeated id replaces the earlier
/// record's content but keeps its position.
pub fn build_comment_tree_with<F>(records: &[RawComment], format_time: F) -> Vec<CommentNode>
where
    F: Fn(Option<&Value>) -> String,
{
    let mut working: Vec<WorkingComment<'_>> = Vec::with_capacity(records.len());
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(records.len());

    for record in records {
        let comment = WorkingComment {
            id: &record.id,
            parent: &record.parent,
            node: to_node(record, &format_time),
        };
        match by_id.get(record.id.as_str()) {
            Some(&index) => working[index] = comment,
            None => {
                by_id.insert(&record.id, working.len());
                working.push(comment);
            }
        }
    }

    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, comment) in working.iter().enumerate() {
        if comment.parent != ROOT_PARENT {
            children.entry(comment.parent).or_default().push(index);
        }
    }

    let roots: Vec<(usize, &str)> = working
        .iter()
        .enumerate()
        .filter(|(_, comment)| comment.parent == ROOT_PARENT)
        .map(|(index, comment)| (index, comment.id))
        .collect();

    let mut nodes: Vec<Option<CommentNode>> =
        working.into_iter().map(|comment| Some(comment.node)).collect();

    roots
        .into_iter()
        .filter_map(|(index, id)| {
            let replies: Vec<CommentNode> = children
                .get(id)
                .into_iter()
                .flatten()
                .filter_map(|&child| nodes[child].take())
                .collect();
            let mut node = nodes[index].take()?;
            node.comments_replies = replies;
            Some(node)
        })
        .collect()
}

fn to_node<F>(record: &RawComment, format_time: &F) -> CommentNode
where
    F: Fn(Option<&Value>) -> String,
{
    CommentNode {
        user_pro_pic: record.author_thumbnail.clone(),
        comment_time: DateField::new(format_time(record.timestamp.as_ref())),
        user_name: record.author.clone(),
        user_profile_url: record.author_url.clone(),
        comment_text: record.text.clone(),
        comments_replies: Vec::new(),
    }
}
