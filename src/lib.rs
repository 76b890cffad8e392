#![forbid(unsafe_code)]

//! Exports a single YouTube video's metadata and comment thread into the
//! fixed JSON document consumed downstream.
//!
//! yt-dlp does the fetching; this crate only reshapes what it writes to disk.
//! The `export_video` binary wires [`export::run`] to the command line.

pub mod comments;
pub mod config;
pub mod document;
pub mod export;
pub mod extractor;
pub mod finalize;
pub mod info;
pub mod timestamp;
pub mod video_id;
