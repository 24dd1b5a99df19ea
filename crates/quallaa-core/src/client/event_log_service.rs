use std::io::Write;
use std::time::Instant;

use chrono::Utc;

use crate::key::NoteKey;
use crate::models::IndexEventRecord;

use super::Quallaa;

impl Quallaa {
    /// Appends one JSONL record to the workspace event log. Best-effort:
    /// logging must never fail an indexing operation.
    pub(super) fn try_log_event(&self, record: &IndexEventRecord) {
        let Ok(serialized) = serde_json::to_string(record) else {
            return;
        };
        let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.fs.event_log_path())
        else {
            return;
        };
        let _ = writeln!(file, "{serialized}");
    }

    pub(super) fn log_operation(
        &self,
        operation: &str,
        key: Option<&NoteKey>,
        status: &str,
        started: Instant,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_event(&IndexEventRecord {
            operation: operation.to_string(),
            key: key.map(ToString::to_string),
            status: status.to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            details,
        });
    }
}
