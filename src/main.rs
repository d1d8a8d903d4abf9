use dotenvy::dotenv;
use instagrab::bot::handlers::Command;
use instagrab::config::Settings;
use instagrab::fetcher::{MediaFetcher, YtDlpFetcher};
use instagrab::{bot, config};
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting the bot token from log output
struct RedactionPatterns {
    token_url: Regex,
    token_bare: Regex,
    token_prefixed: Regex,
}

impl RedactionPatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token_url: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)(/['\s]*)")?,
            token_bare: Regex::new(r"([0-9]{8,10}:[A-Za-z0-9_-]{35})")?,
            token_prefixed: Regex::new(r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let mut output = input.to_string();
        output = self
            .token_url
            .replace_all(&output, "$1[TELEGRAM_TOKEN]$3")
            .to_string();
        output = self
            .token_bare
            .replace_all(&output, "[TELEGRAM_TOKEN]")
            .to_string();
        output = self
            .token_prefixed
            .replace_all(&output, "$1[TELEGRAM_TOKEN]")
            .to_string();
        output
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // We return the original buffer length to satisfy the contract,
        // even if the redacted string length differs.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: (self.make_inner)(),
            patterns: self.patterns.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting Instagram relay bot...");

    let settings = init_settings();
    info!(
        "Allow-list: {} username(s), {} chat id(s); size cap: {} MB",
        settings.allowed_usernames().len(),
        settings.allowed_chat_ids().len(),
        settings.max_file_size_mb()
    );

    let bot = Bot::new(settings.telegram_token.clone());
    let fetcher: Arc<dyn MediaFetcher> = Arc::new(YtDlpFetcher);

    info!("Bot is running...");

    Dispatcher::builder(bot, setup_handler())
        .dependencies(dptree::deps![settings, fetcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter {
        make_inner: io::stderr,
        patterns,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match config::Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry().branch(
        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_command),
            )
            .branch(
                Update::filter_message()
                    // Unknown commands like /foo must not fall through to
                    // the pipeline route
                    .filter(|msg: Message| {
                        msg.text()
                            .is_some_and(|t| !bot::handlers::is_command_text(t))
                    })
                    .endpoint(handle_text),
            ),
    )
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg).await,
        Command::Help => bot::handlers::help(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {e:#}");
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    settings: Arc<Settings>,
    fetcher: Arc<dyn MediaFetcher>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = Box::pin(bot::handlers::handle_message(bot, msg, settings, fetcher)).await {
        error!("Message handler error: {e:#}");
    }
    respond(())
}
