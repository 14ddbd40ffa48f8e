//! Query command implementation.

use anyhow::{Context, Result};
use clap::Args;

use hdx_core::{Purpose, RecordId};

use super::{ConnectionArgs, PollArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Id of an existing patient
    #[arg(long)]
    pub patient_id: String,
}

pub async fn run(args: QueryArgs) -> Result<()> {
    let patient = RecordId::new(&args.patient_id).context("Invalid patient id")?;
    let conn = args.connection.connect().await?;

    conn.submit_query(&patient, Purpose::Treatment)
        .await
        .context("Failed to submit query")?;

    output::progress("Waiting for the query to complete...");
    let outcome = conn
        .wait_for_query(&patient, args.poll.config())
        .await
        .context("Query failed")?;

    output::success(&format!(
        "Query completed after {} status checks ({}s)",
        outcome.attempts,
        outcome.elapsed.as_secs()
    ));

    if let Some(manifest) = outcome.manifest {
        if let Some(time) = &manifest.transaction_time {
            output::field("Transaction time", time);
        }
        for item in &manifest.output {
            output::field(&item.resource_type, &item.url);
        }
    }

    Ok(())
}
