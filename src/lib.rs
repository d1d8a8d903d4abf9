//! Instagram media relay bot for Telegram.
//!
//! Listens for text messages, extracts the first Instagram post link,
//! downloads the post's media via yt-dlp and re-uploads each file back
//! to the requesting chat, subject to an allow-list and a per-file size
//! cap. Everything is request-scoped; the only filesystem use is a
//! temporary directory that lives for exactly one request.

/// Telegram bot handlers and the delivery pipeline
pub mod bot;
/// Configuration management
pub mod config;
/// Media download via yt-dlp
pub mod fetcher;
/// Instagram link extraction
pub mod links;
/// Upload kind classification
pub mod media;
pub mod utils;
