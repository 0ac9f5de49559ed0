//! Command implementations.
//!
//! Each command builds what it needs from [`Context`], talks to the backend
//! through the storefront library, and renders to a locked stdout.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod orders;

use std::io::{self, StdoutLock};

use shopez_storefront::config::StorefrontConfig;
use shopez_storefront::gateway::GatewayClient;
use shopez_storefront::store::Store;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront library error.
    #[error(transparent)]
    Storefront(#[from] shopez_storefront::Error),

    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Command argument could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

impl CommandError {
    /// Send to Sentry when it is worth a report.
    pub fn report(&self) {
        match self {
            Self::Storefront(e) => e.report(),
            _ => tracing::warn!(error = %self, "Command failed"),
        }
    }
}

macro_rules! from_library_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for CommandError {
                fn from(err: $ty) -> Self {
                    Self::Storefront(err.into())
                }
            }
        )+
    };
}

from_library_error!(
    shopez_storefront::config::ConfigError,
    shopez_storefront::gateway::GatewayError,
    shopez_storefront::services::AccountError,
    shopez_storefront::services::CheckoutError,
);

pub type CommandResult = Result<(), CommandError>;

/// Shared state for one CLI invocation.
pub struct Context {
    pub config: StorefrontConfig,
    pub gateway: GatewayClient,
}

impl Context {
    /// Build the gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CommandError> {
        let gateway = GatewayClient::new(&config.gateway)?;
        Ok(Self { config, gateway })
    }

    /// Create a store and wait for its initial catalog load.
    ///
    /// # Errors
    ///
    /// Returns the load's gateway error.
    pub async fn loaded_store(&self) -> Result<Store, CommandError> {
        let (store, initial_load) = Store::connect(self.gateway.clone());
        initial_load.await??;
        Ok(store)
    }
}

/// Lock stdout once for the whole command.
pub fn stdout() -> StdoutLock<'static> {
    io::stdout().lock()
}

/// Read a secret from the environment.
pub fn env_secret(name: &'static str) -> Result<secrecy::SecretString, CommandError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(secrecy::SecretString::from)
        .ok_or(CommandError::MissingEnvVar(name))
}
