//! ShopEZ CLI - browse the catalog, manage an account, and inspect orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shopez products --category womens-clothing
//! shopez product 64f1c2
//! shopez search jacket
//! shopez quote 64f1c2=2 64f1c3
//!
//! # Account (password read from SHOPEZ_PASSWORD)
//! shopez login --email jane@example.com
//! shopez orders --email jane@example.com
//!
//! # Admin (token read from SHOPEZ_ADMIN_TOKEN)
//! shopez admin orders
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPEZ_API_URL` - Backend base URL (default `http://localhost:5000/api`)
//! - `SHOPEZ_LOG_FORMAT` - Set to `json` for structured log output
//! - `SENTRY_DSN` - Enables error reporting when set

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopez_storefront::config::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{CommandError, Context};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "shopez")]
#[command(author, version, about = "ShopEZ storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Category label or slug (e.g. `womens-clothing`)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Product {
        /// Product id
        id: String,
    },
    /// List catalog categories
    Categories,
    /// Search product titles
    Search {
        /// Case-insensitive title substring
        query: String,
    },
    /// Price a cart of `ID[=QTY]` items
    Quote {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Log in and show the account
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Register a new account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,
    },
    /// List a user's orders
    Orders {
        #[arg(short, long)]
        email: String,
    },
    /// Show one order
    Order {
        /// Order id
        id: String,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List registered users
    Users,
    /// List all products
    Products,
    /// List all orders with purchaser names
    Orders,
    /// Delete a product
    DeleteProduct {
        /// Product id
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopez=info,shopez_storefront=info".into());

    let is_json = std::env::var("SHOPEZ_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Sentry before the subscriber so the tracing layer has a client
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CommandError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CommandError> {
    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Products { category } => {
            commands::catalog::products(&ctx, category.as_deref()).await?;
        }
        Commands::Product { id } => commands::catalog::product(&ctx, &id).await?,
        Commands::Categories => commands::catalog::categories(&ctx).await?,
        Commands::Search { query } => commands::catalog::search(&ctx, &query).await?,
        Commands::Quote { items } => commands::catalog::quote(&ctx, &items).await?,
        Commands::Login { email } => commands::account::login(&ctx, &email).await?,
        Commands::Register {
            first_name,
            last_name,
            email,
            accept_terms,
        } => {
            commands::account::register(&ctx, first_name, last_name, email, accept_terms).await?;
        }
        Commands::Orders { email } => commands::orders::history(&ctx, &email).await?,
        Commands::Order { id } => commands::orders::show(&ctx, &id).await?,
        Commands::Admin { action } => match action {
            AdminAction::Users => commands::admin::users(&ctx).await?,
            AdminAction::Products => commands::admin::products(&ctx).await?,
            AdminAction::Orders => commands::admin::orders(&ctx).await?,
            AdminAction::DeleteProduct { id } => {
                commands::admin::delete_product(&ctx, &id).await?;
            }
        },
    }
    Ok(())
}
