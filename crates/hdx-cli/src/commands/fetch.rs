//! Fetch command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hdx_core::{PageLimit, RecordId, SearchUrl};

use super::ConnectionArgs;
use crate::output;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResourceKind {
    /// Patient/{id}/$everything
    #[default]
    Everything,
    /// MedicationStatement?patient={id}
    MedicationStatement,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Id of the patient
    #[arg(long)]
    pub patient_id: String,

    /// Which resources to download
    #[arg(long, value_enum, default_value_t)]
    pub resource: ResourceKind,

    /// Extra search parameters, appended verbatim (e.g. '&_count=1000')
    #[arg(long)]
    pub params: Option<String>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Pretty-print each resource
    #[arg(long)]
    pub pretty: bool,

    /// Write the resources to this file as a Bundle instead of printing them
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn search(kind: ResourceKind, patient: RecordId, params: Option<String>) -> SearchUrl {
    match kind {
        ResourceKind::Everything => SearchUrl::Everything(patient),
        ResourceKind::MedicationStatement => SearchUrl::MedicationStatement { patient, params },
    }
}

pub async fn run(args: FetchArgs) -> Result<()> {
    let patient = RecordId::new(&args.patient_id).context("Invalid patient id")?;
    if args.params.is_some() && args.resource == ResourceKind::Everything {
        anyhow::bail!("--params only applies to --resource medication-statement");
    }

    let conn = args.connection.connect().await?;
    let search = search(args.resource, patient, args.params);

    let collection = conn
        .fetch_all(&search, PageLimit::from(args.max_pages))
        .await
        .with_context(|| format!("Failed to fetch {}", search))?;

    if let Some(path) = &args.output {
        output::write_bundle(path, &collection)?;
        output::success(&format!(
            "Wrote {} resources from {} pages to {}",
            collection.len(),
            collection.pages(),
            path.display()
        ));
        return Ok(());
    }

    for resource in &collection {
        if args.pretty {
            output::json_pretty(resource)?;
        } else {
            output::json(resource)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medication_search_keeps_params() {
        let patient = RecordId::new("p1").unwrap();
        let search = search(
            ResourceKind::MedicationStatement,
            patient,
            Some("&_count=10".to_string()),
        );
        assert_eq!(
            search.to_reference(),
            "MedicationStatement?patient=p1&_count=10"
        );
    }
}
