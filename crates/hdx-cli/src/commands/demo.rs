//! Demo command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hdx_core::{PageLimit, Purpose, RecordId, SearchUrl};

use super::{ConnectionArgs, PollArgs};
use crate::{output, sample};

/// Extra parameters for the medication statement search.
const MEDICATION_PARAMS: &str = "&effective=gt2020-04-29T01:00:00&_count=1000";

#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Stop after this many pages per download
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Write each download to this directory as a Bundle
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

fn searches(patient: &RecordId) -> [SearchUrl; 2] {
    [
        SearchUrl::Everything(patient.clone()),
        SearchUrl::MedicationStatement {
            patient: patient.clone(),
            params: Some(MEDICATION_PARAMS.to_string()),
        },
    ]
}

pub async fn run(args: DemoArgs) -> Result<()> {
    let conn = args.connection.connect().await?;
    output::success("Authenticated");

    let submission = conn
        .register_patient(&sample::patient(), Purpose::Treatment)
        .await
        .context("Failed to register patient")?;
    output::field("Patient", submission.record_id.as_str());

    output::progress("Waiting for the query to complete...");
    let outcome = conn
        .wait_for_query(&submission.record_id, args.poll.config())
        .await
        .context("Query failed")?;
    output::success(&format!(
        "Query completed after {} status checks",
        outcome.attempts
    ));

    let limit = PageLimit::from(args.max_pages);
    for search in searches(&submission.record_id) {
        let collection = conn
            .fetch_all(&search, limit)
            .await
            .with_context(|| format!("Failed to fetch {}", search))?;

        output::field(
            search.label(),
            &format!(
                "{} resources in {} pages",
                collection.len(),
                collection.pages()
            ),
        );

        if let Some(dir) = &args.output_dir {
            let path = dir.join(format!("{}.json", search.label()));
            output::write_bundle(&path, &collection)?;
            output::field("Wrote", &path.display().to_string());
        }
    }

    Ok(())
}
