//! Outbound messaging abstraction.
//!
//! The delivery pipeline only talks to the chat through [`Messenger`], so it
//! can be exercised in tests without a live bot token.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};

/// Outbound side of one request: plain-text notices and binary uploads,
/// all addressed to the requesting chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain-text notice.
    async fn send_text(&self, text: &str) -> Result<()>;
    /// Upload a file as a photo.
    async fn send_photo(&self, path: &Path) -> Result<()>;
    /// Upload a file as a video.
    async fn send_video(&self, path: &Path) -> Result<()>;
    /// Upload a file as a generic document.
    async fn send_document(&self, path: &Path) -> Result<()>;
}

/// [`Messenger`] backed by a teloxide [`Bot`] and a fixed destination chat.
pub struct TelegramMessenger {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramMessenger {
    /// Bind a bot to the chat all messages of this request go to.
    #[must_use]
    pub const fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, text).await?;
        Ok(())
    }

    async fn send_photo(&self, path: &Path) -> Result<()> {
        self.bot
            .send_photo(self.chat_id, InputFile::file(path))
            .await?;
        Ok(())
    }

    async fn send_video(&self, path: &Path) -> Result<()> {
        self.bot
            .send_video(self.chat_id, InputFile::file(path))
            .await?;
        Ok(())
    }

    async fn send_document(&self, path: &Path) -> Result<()> {
        self.bot
            .send_document(self.chat_id, InputFile::file(path))
            .await?;
        Ok(())
    }
}
