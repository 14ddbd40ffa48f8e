//! Token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use hdx_http::Authenticator;

use super::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the token
    #[arg(long)]
    pub show: bool,
}

pub async fn run(args: TokenArgs) -> Result<()> {
    let auth = Authenticator::new(args.connection.base_url()?)?;
    let token = auth
        .authenticate(&args.connection.credentials())
        .await
        .context("Authentication failed")?;

    output::success("Authenticated");
    output::field("Base URL", auth.base_url().as_str());
    if args.show {
        println!("{}", token.as_str());
    }

    Ok(())
}
