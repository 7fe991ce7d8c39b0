//! JSON export of decorated signals.
//!
//! The output carries each signal's original fields plus `classification`
//! and `formatted_value`, recursively through `dependencies`, and a
//! `summary` block of per-class counts.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};

use crate::data::{SignalSummary, SignalView};

fn summary_json(summary: &SignalSummary) -> Value {
    json!({
        "total": summary.total,
        "success": summary.success,
        "warning": summary.warning,
        "error": summary.error,
        "undefined": summary.undefined,
        "unclassified": summary.unclassified,
    })
}

/// Export for the home view: every signal, summary over the top level.
pub fn signals_report(signals: &[SignalView]) -> Value {
    json!({
        "summary": summary_json(&SignalSummary::from_signals(signals)),
        "signals": signals.iter().map(SignalView::to_json).collect::<Vec<_>>(),
    })
}

/// Export for the detail view: one tree, summary over every node.
pub fn signal_report(signal: &SignalView) -> Value {
    json!({
        "summary": summary_json(&SignalSummary::from_tree(signal)),
        "signal": signal.to_json(),
    })
}

/// Write `value` as pretty-printed JSON.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
