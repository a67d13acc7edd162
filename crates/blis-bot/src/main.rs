//! BLIS bot console
//!
//! Reads commands from stdin and prints the bot's responses.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blis::{BlisClient, BotMemory, HeroCard, Response};
use blis_bot::adapters::{HttpBlisClient, InMemoryBlisClient, InMemoryBotMemory};
use blis_bot::application::TemplateStore;
use blis_bot::{CommandDispatcher, Config};

const OFFLINE_APP: &str = "offline";

#[derive(Parser)]
#[command(name = "blis-bot")]
#[command(about = "BLIS bot - manage entities and render card templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/blis/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dialog service base URL
    #[arg(long, env = "BLIS_SERVICE_URL")]
    service_url: Option<String>,

    /// Dialog service user
    #[arg(long, env = "BLIS_USER")]
    user: Option<String>,

    /// Dialog service secret
    #[arg(long, env = "BLIS_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// App to load at startup
    #[arg(short, long, env = "BLIS_APP_ID")]
    app: Option<String>,

    /// Directory holding card templates
    #[arg(short, long, env = "BLIS_TEMPLATE_DIR")]
    templates: Option<PathBuf>,

    /// Use an in-memory dialog service
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn merge_into(self, mut config: Config) -> Config {
        if let Some(url) = self.service_url {
            config.service_url = url;
        }
        if self.user.is_some() {
            config.user = self.user;
        }
        if self.secret.is_some() {
            config.secret = self.secret;
        }
        if self.app.is_some() {
            config.app_id = self.app;
        }
        if let Some(dir) = self.templates {
            config.template_dir = dir;
        }
        config.offline |= self.offline;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let config = cli.merge_into(config);

    let memory = Arc::new(InMemoryBotMemory::new());
    let client: Arc<dyn BlisClient> = if config.offline {
        tracing::info!("Using in-memory dialog service");
        if config.app_id.is_none() {
            memory.set_app_id(Some(OFFLINE_APP.to_string())).await;
        }
        Arc::new(InMemoryBlisClient::new())
    } else {
        let service = config.service_config()?;
        tracing::info!(url = %service.base_url, "Using dialog service");
        Arc::new(HttpBlisClient::new(&service).context("Failed to create dialog service client")?)
    };

    if let Some(app_id) = &config.app_id {
        memory.set_app_id(Some(app_id.clone())).await;
        tracing::info!(app_id = %app_id, "Loaded app");
    }

    let store = TemplateStore::new(&config.template_dir);
    let dispatcher = CommandDispatcher::new(client, memory, store);

    println!("{}", "BLIS bot ready. Type !help for commands.".bold());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        for response in dispatcher.dispatch(&line).await {
            print_response(&response);
        }
    }

    Ok(())
}

fn print_response(response: &Response) {
    match response {
        Response::Text(text) => println!("{text}"),
        Response::Card(card) => print_card(card),
        Response::Payload(payload) => match serde_json::to_string_pretty(payload) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("{} {e}", "Failed to print payload:".red()),
        },
        Response::Suggestions(buttons) => {
            let labels: Vec<String> = buttons
                .iter()
                .map(|b| format!("[{}] {}", b.label, b.command.dimmed()))
                .collect();
            println!("{}", labels.join("  "));
        }
    }
}

fn print_card(card: &HeroCard) {
    println!("{}", card.title.cyan().bold());
    if let Some(subtitle) = &card.subtitle {
        println!("  {}", subtitle.dimmed());
    }
    if let Some(text) = &card.text {
        println!("  {text}");
    }
    for button in &card.buttons {
        println!("  {} {}", format!("[{}]", button.label).green(), button.command.dimmed());
    }
}
