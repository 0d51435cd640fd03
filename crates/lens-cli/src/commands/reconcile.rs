//! Reconcile command: merge all sources into one estimated timeline.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use lens_core::{Reconciliation, ReconcileConfig, SourceEvents, SourceId, estimate_hours};
use serde::Serialize;

use super::util::{SourceExport, format_utc, round_hours, source_breakdown};
use crate::input::SourceDocument;

/// Output structure for the reconcile command.
#[derive(Debug, Serialize)]
pub struct ReconcileOutput {
    /// The resolved configuration that produced this session set.
    pub config: ReconcileConfig,
    pub total_hours: f64,
    pub sessions: Vec<SessionExport>,
    pub sources: Vec<SourceExport>,
}

/// One merged session with its estimate.
#[derive(Debug, Serialize)]
pub struct SessionExport {
    pub start: f64,
    pub end: f64,
    pub start_utc: String,
    pub end_utc: String,
    pub duration_hours: f64,
    pub estimated_hours: f64,
}

/// Builds the output document from a reconciliation outcome.
pub fn build_output(
    sources: &BTreeMap<SourceId, SourceEvents>,
    outcome: &Reconciliation,
    config: &ReconcileConfig,
) -> ReconcileOutput {
    let sessions = outcome
        .sessions
        .iter()
        .map(|session| SessionExport {
            start: session.start(),
            end: session.end(),
            start_utc: format_utc(session.start()),
            end_utc: format_utc(session.end()),
            duration_hours: round_hours(session.duration_hours()),
            estimated_hours: round_hours(estimate_hours(session, config)),
        })
        .collect();

    ReconcileOutput {
        config: *config,
        total_hours: round_hours(outcome.total_hours),
        sessions,
        sources: source_breakdown(sources),
    }
}

/// Runs the reconcile command.
///
/// With `as_source`, the merged sessions are re-emitted as a valid *input*
/// document instead of the result document: partial results from one
/// repository feed into a later reconcile call covering several.
pub fn run(
    sources: &BTreeMap<SourceId, SourceEvents>,
    config: &ReconcileConfig,
    as_source: Option<&str>,
) -> Result<()> {
    let outcome = lens_core::reconcile(sources, config)?;

    if let Some(id) = as_source {
        let id = SourceId::new(id).context("invalid --as-source ID")?;
        let document = SourceDocument {
            sources: BTreeMap::from([(id, SourceEvents::Intervals(outcome.sessions))]),
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let output = build_output(sources, &outcome, config);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
