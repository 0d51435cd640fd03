//! Normalized source-document loading.
//!
//! Adapters (commit-session extraction, editor duration trackers, assistant
//! history readers) run as external programs and each emit one document in
//! the uniform format below. This module loads one or more documents and
//! unions their source maps for the reconciler.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lens_core::{SourceEvents, SourceId};
use serde::{Deserialize, Serialize};

/// A normalized adapter output document.
///
/// ```json
/// {
///   "sources": {
///     "git": {"kind": "intervals", "values": [[1700000000.0, 1700003600.0]]},
///     "claude": {"kind": "points", "values": [1700001000.5]}
///   }
/// }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Timing evidence keyed by source ID.
    pub sources: BTreeMap<SourceId, SourceEvents>,
}

/// Loads documents from the given files and unions their source maps.
///
/// Reads stdin when no files are given; a file named `-` also means stdin.
/// The same source ID appearing in two documents is an input error, since
/// silently concatenating or replacing evidence would skew the estimate.
pub fn load_documents(files: &[PathBuf]) -> Result<BTreeMap<SourceId, SourceEvents>> {
    let mut sources = BTreeMap::new();

    if files.is_empty() {
        merge_document(&mut sources, read_stdin()?, "<stdin>")?;
        return Ok(sources);
    }

    for path in files {
        let (document, origin) = if path.as_os_str() == "-" {
            (read_stdin()?, "<stdin>".to_string())
        } else {
            (read_file(path)?, path.display().to_string())
        };
        merge_document(&mut sources, document, &origin)?;
    }

    Ok(sources)
}

fn read_file(path: &Path) -> Result<SourceDocument> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse source document {}", path.display()))
}

fn read_stdin() -> Result<SourceDocument> {
    serde_json::from_reader(std::io::stdin().lock())
        .context("failed to parse source document from stdin")
}

fn merge_document(
    sources: &mut BTreeMap<SourceId, SourceEvents>,
    document: SourceDocument,
    origin: &str,
) -> Result<()> {
    for (id, events) in document.sources {
        match sources.entry(id) {
            Entry::Vacant(slot) => {
                tracing::debug!(source = %slot.key(), events = events.len(), %origin, "loaded source");
                slot.insert(events);
            }
            Entry::Occupied(slot) => {
                bail!("duplicate source ID '{}' in {origin}", slot.key());
            }
        }
    }
    Ok(())
}
