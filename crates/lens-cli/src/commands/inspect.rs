//! Inspect command: per-source diagnostics for adapter output.

use std::collections::BTreeMap;

use anyhow::Result;
use lens_core::{SourceEvents, SourceId};
use serde::Serialize;

use super::util::{SourceExport, source_breakdown};

/// Output structure for the inspect command.
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub sources: Vec<SourceExport>,
}

/// Builds the inspect output without reconciling.
pub fn build_output(sources: &BTreeMap<SourceId, SourceEvents>) -> InspectOutput {
    InspectOutput {
        sources: source_breakdown(sources),
    }
}

/// Runs the inspect command.
pub fn run(sources: &BTreeMap<SourceId, SourceEvents>) -> Result<()> {
    let output = build_output(sources);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
