//! Rendering sync reports for the terminal.

use paramsync_core::sync::{Action, SyncReport};


/// Human-readable report: one line per record plus a summary.
pub fn render_text(report: &SyncReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let verb = match (entry.action, report.applied) {
            (Action::Create, true) => "created",
            (Action::Create, false) => "create",
            (Action::Update, true) => "updated",
            (Action::Update, false) => "update",
            (Action::Unchanged, _) => "unchanged",
        };
        out.push_str(&format!("{:<10} {} ({})\n", verb, entry.path, entry.kind));
    }
    out.push_str(&report.summary());
    out
}

/// Pretty JSON of the report.
pub fn render_json(report: &SyncReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
