use anyhow::Result;
use clap::{Parser, Subcommand};
use market_application::{AppContext, Gateways};
use market_infrastructure::{ConfigService, FileKeyValueStore, MarketPaths};
use market_interaction::MarketClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod commands;
mod logging;
mod notifier;
mod render;

use commands::{FavoritesAction, ItemsAction, TradesAction};
use notifier::ConsoleNotifier;

#[derive(Parser)]
#[command(name = "campus-market")]
#[command(about = "Campus Market - client for the campus second-hand marketplace", long_about = None)]
struct Cli {
    /// Path to a config.toml to use instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account (does not log in)
    Register {
        username: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        student_id: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Site-wide user, item and transaction counts
    Stats,
    /// Your profile and counters
    Profile,
    /// Browse and manage items
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },
    /// Your transactions
    Trades {
        #[command(subcommand)]
        action: TradesAction,
    },
    /// Your favorite items
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Chat with the other party of a transaction (/quit to leave)
    Chat { transaction_id: i64 },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = MarketPaths::default();
    let _log_guard = logging::init(&paths);

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(&paths)?,
    };
    let mut config = config_service.get_config()?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    tracing::debug!("[Main] Using backend {}", config.api_base);

    let client = Arc::new(MarketClient::new(&config)?);
    let storage = Arc::new(FileKeyValueStore::open(&paths)?);
    let ctx = Arc::new(AppContext::new(
        config,
        Gateways::from_backend(client),
        storage,
        Arc::new(ConsoleNotifier),
    ));
    ctx.session.restore().await;

    let succeeded = match cli.command {
        Commands::Login { username, password } => {
            commands::account::login(&ctx, &username, password).await
        }
        Commands::Register {
            username,
            password,
            email,
            phone,
            student_id,
        } => {
            commands::account::register(&ctx, username, password, email, phone, student_id).await
        }
        Commands::Logout => commands::account::logout(&ctx).await,
        Commands::Whoami => commands::account::whoami(&ctx).await,
        Commands::Stats => commands::account::stats(&ctx).await,
        Commands::Profile => commands::account::profile(&ctx).await,
        Commands::Items { action } => commands::items::run(&ctx, action).await,
        Commands::Trades { action } => commands::trades::run(&ctx, action).await,
        Commands::Favorites { action } => commands::trades::run_favorites(&ctx, action).await,
        Commands::Chat { transaction_id } => commands::chat::run(&ctx, transaction_id).await,
    };

    Ok(exit_code(succeeded))
}

/// Returned from `main` so the log guard is dropped (and flushed) on failure too.
fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
