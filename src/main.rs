use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::{MessageDispatcher, Messenger};
use application::services::ChatService;
use domain::entities::BotCommand;
use domain::traits::Bot;
use infrastructure::adapters::telegram::{TelegramAdapter, UpdatePoller};
use infrastructure::config::Config;
use infrastructure::llm::{OpenAIProvider, LLM};

#[derive(Parser)]
#[command(name = "relay-bot")]
#[command(about = "Relay Telegram chats to an OpenAI-compatible model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and TELEGRAM_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("relay-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let mut config = Config::load_with_env(config_path)?;
    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }
    config.validate()?;

    if config.llm.api_key.is_none() {
        tracing::warn!("No LLM API key configured (LLM_API_KEY); chat replies will fail");
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(serve(config))
}

async fn serve(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {}", config.bot.name);
    let allow_list = config.allow_list()?;
    let mut adapter = TelegramAdapter::new(config.token()?, &config.telegram.api_url);

    // Fetch bot info
    adapter.fetch_bot_info().await?;
    let info = adapter.bot_info();
    tracing::info!(
        "Bot started: {} (@{}, id {}), {} allowed users",
        info.name,
        info.username,
        info.id,
        allow_list.len()
    );

    // Register bot commands with Telegram
    if let Err(e) = adapter.set_commands(&BotCommand::menu()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let adapter = Arc::new(adapter);
    let messenger = Messenger::new(adapter.clone());

    let llm = Arc::new(OpenAIProvider::from_config(&config.llm));
    tracing::info!(
        "Using {} at {} (default model {})",
        llm.name(),
        config.llm.api_base,
        config.llm.default_model
    );
    let chat = Arc::new(ChatService::new(llm, messenger.clone(), config.llm.clone()));

    let dispatcher = Arc::new(MessageDispatcher::new(allow_list, messenger, chat.clone(), chat));

    let poller = UpdatePoller::new(adapter, &config.telegram);
    poller
        .run(dispatcher, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}

fn init_config(path: &str) -> Result<(), BotError> {
    if std::path::Path::new(path).exists() {
        println!("{} already exists, not overwriting", path);
        return Ok(());
    }

    let template = Config::template()?;
    std::fs::write(path, template)
        .map_err(|e| BotError::Internal(format!("Failed to write {}: {}", path, e)))?;
    println!("Wrote default config to {}", path);
    Ok(())
}
