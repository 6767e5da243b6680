use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use lostfound_chat::chat::{ChatWidget, HttpWebhook, MemoryStorage, WidgetEvent};
use lostfound_chat::config::WidgetConfig;
use lostfound_chat::terminal::{self, TerminalView};

#[derive(Parser, Debug)]
#[command(name = "lostfound-chat", about = "Lost & Found chat widget in the terminal")]
struct Cli {
    /// Webhook receiving chat messages.
    #[arg(long, env = "CHAT_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Logical viewport width used for the small-screen auto-close.
    #[arg(long, env = "CHAT_VIEWPORT_WIDTH", default_value_t = 1024)]
    viewport_width: u32,

    /// Agent string reported to the webhook.
    #[arg(long, env = "CHAT_USER_AGENT")]
    user_agent: Option<String>,

    /// Open the panel on start.
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = match WidgetConfig::from_env_with_url(cli.webhook_url) {
        Ok(config) => config.with_user_agent(cli.user_agent),
        Err(e) => {
            tracing::error!(error = %e, "chat widget not configured");
            return ExitCode::FAILURE;
        }
    };
    let webhook = match HttpWebhook::from_config(&config) {
        Ok(webhook) => webhook,
        Err(e) => {
            tracing::error!(error = %e, "webhook client init failed");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(url = webhook.url(), viewport_width = cli.viewport_width, "chat widget ready");

    let view = TerminalView::new(std::io::stdout(), cli.viewport_width);
    let (widget, events) = ChatWidget::new(view, Box::new(MemoryStorage::new()), Arc::new(webhook), config);
    let handle = widget.handle();
    if cli.open {
        handle.open();
    }

    println!("{}", terminal::HELP);
    let input = handle.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    for event in terminal::parse_line(&line) {
                        input.send(event);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        input.send(WidgetEvent::Shutdown);
    });

    widget.run(events).await;
    ExitCode::SUCCESS
}
