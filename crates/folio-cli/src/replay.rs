//! Input files: a hydrated page and a JSON-lines intent log.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_editor::{ChangeSink, FocusTarget, IntentEvent, PageController};
use folio_types::Page;

/// Read a page file (`{ "id": ..., "blocks": [...] }`).
pub fn read_page(path: &Path) -> Result<Page> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing page {}", path.display()))
}

/// Read an intent log: one JSON event per line. Blank lines and lines
/// starting with `//` are skipped.
pub fn read_events(path: &Path) -> Result<Vec<IntentEvent>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_events(&text).with_context(|| format!("parsing events {}", path.display()))
}

pub fn parse_events(text: &str) -> Result<Vec<IntentEvent>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
        .map(|(n, line)| serde_json::from_str(line).with_context(|| format!("line {n}")))
        .collect()
}

/// Counts from one replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: usize,
    pub rejected: usize,
}

/// Feed every event to the controller. Rejected events are already logged by
/// the controller and only counted here.
pub fn replay<S: ChangeSink, F: FocusTarget>(
    controller: &mut PageController<S, F>,
    events: Vec<IntentEvent>,
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for event in events {
        match controller.handle(event) {
            Ok(_) => stats.applied += 1,
            Err(_) => stats.rejected += 1,
        }
    }
    stats
}
