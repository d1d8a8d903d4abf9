//! Command and message handlers.

use crate::bot::delivery;
use crate::bot::messenger::{Messenger, TelegramMessenger};
use crate::config::Settings;
use crate::fetcher::MediaFetcher;
use crate::links;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;

/// Supported bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Greeting
    #[command(description = "Start working with the bot.")]
    Start,
    /// Usage help
    #[command(description = "Show usage help.")]
    Help,
}

/// Whether a message text is a command invocation (`/...`).
///
/// Command messages are handled by [`Command`] dispatch and must never reach
/// the delivery pipeline, including commands the bot does not know.
#[must_use]
pub fn is_command_text(text: &str) -> bool {
    text.starts_with('/')
}

/// `/start` — fixed greeting.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(
        msg.chat.id,
        "Hi! Send me an Instagram post link and I will fetch the media for you.",
    )
    .await?;
    Ok(())
}

/// `/help` — fixed usage text.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    let text = "How to use:\n\
        - Just send an Instagram post link.\n\
        - Only allow-listed users can use the bot.\n\
        - If something fails, the error shows up right here.";
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Authorize the requester, extract the link and hand over to the delivery
/// pipeline. A disallowed identity or a message without a link ends with a
/// single notice and the fetcher is never invoked.
///
/// # Errors
///
/// Returns an error if a notice cannot be sent; pipeline failures are
/// reported to the chat and do not surface here.
pub async fn process_message(
    fetcher: &dyn MediaFetcher,
    messenger: &dyn Messenger,
    settings: &Settings,
    username: Option<&str>,
    user_id: Option<i64>,
    text: &str,
) -> Result<()> {
    if !settings.is_allowed(username, user_id) {
        info!("⛔️ Rejected message from user {user_id:?} ({username:?})");
        messenger
            .send_text("⛔️ You are not allowed to use this bot.")
            .await?;
        return Ok(());
    }

    let Some(url) = links::find_instagram_link(text) else {
        messenger
            .send_text("That does not look like an Instagram link. Please send one.")
            .await?;
        return Ok(());
    };

    info!("Handling link {url}");
    delivery::deliver(fetcher, messenger, settings, url).await
}

/// Entry point for every non-command text message.
///
/// # Errors
///
/// Returns an error if a reply cannot be sent.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    settings: Arc<Settings>,
    fetcher: Arc<dyn MediaFetcher>,
) -> Result<()> {
    let username = msg.from.as_ref().and_then(|u| u.username.as_deref());
    let user_id = msg.from.as_ref().map(|u| u.id.0.cast_signed());
    let text = msg.text().unwrap_or("");

    let messenger = TelegramMessenger::new(bot, msg.chat.id);
    process_message(
        fetcher.as_ref(),
        &messenger,
        &settings,
        username,
        user_id,
        text,
    )
    .await
}
