//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{demo, fetch, query, token};

/// Demo client for a FHIR health-data exchange.
#[derive(Parser, Debug)]
#[command(name = "hdx")]
#[command(author, version = env!("HDX_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole flow with a sample patient
    Demo(demo::DemoArgs),

    /// Submit a query for an existing patient and wait for it
    Query(query::QueryArgs),

    /// Download a patient's resources, following every page
    Fetch(fetch::FetchArgs),

    /// Check the client credentials
    Token(token::TokenArgs),
}
