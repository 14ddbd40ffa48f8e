//! Subcommand implementations and the arguments they share.

pub mod demo;
pub mod fetch;
pub mod query;
pub mod token;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use hdx_core::poll::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
use hdx_core::{BaseUrl, Credentials, PollConfig};
use hdx_http::HttpConnection;

use crate::cli::Commands;

/// Where the exchange lives and how to authenticate with it.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Base URL of the exchange
    #[arg(long, env = "HDX_BASE_URL")]
    pub base_url: String,

    /// Client identifier
    #[arg(long, env = "HDX_CLIENT_ID")]
    pub client_id: String,

    /// Client secret
    #[arg(long, env = "HDX_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
}

impl ConnectionArgs {
    pub fn base_url(&self) -> Result<BaseUrl> {
        BaseUrl::new(&self.base_url).context("Invalid base URL")
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.client_id, &self.client_secret)
    }

    /// Authenticate and open a connection.
    pub async fn connect(&self) -> Result<HttpConnection> {
        HttpConnection::connect(self.base_url()?, &self.credentials())
            .await
            .context("Authentication failed")
    }
}

/// How long to wait for a submitted query.
#[derive(Args, Debug)]
pub struct PollArgs {
    /// Give up after this many seconds
    #[arg(long, default_value_t = DEFAULT_MAX_WAIT.as_secs())]
    pub timeout_seconds: u64,

    /// Seconds between status checks (at least 1)
    #[arg(
        long,
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_seconds: u64,
}

impl PollArgs {
    pub fn config(&self) -> PollConfig {
        PollConfig::with_max_wait(Duration::from_secs(self.timeout_seconds))
            .interval(Duration::from_secs(self.poll_interval_seconds))
    }
}

pub async fn handle(command: Commands) -> Result<()> {
    match command {
        Commands::Demo(args) => demo::run(args).await,
        Commands::Query(args) => query::run(args).await,
        Commands::Fetch(args) => fetch::run(args).await,
        Commands::Token(args) => token::run(args).await,
    }
}
