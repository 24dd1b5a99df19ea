use std::collections::HashSet;
use std::time::Instant;

use crate::error::Result;
use crate::extract;
use crate::models::ScanReport;

use super::Quallaa;

impl Quallaa {
    /// Full workspace (re-)build: enumerate every note once, register them
    /// all, then apply the extractions against the fully populated alias
    /// table. Registering everything first means the resolution pass runs
    /// once against complete knowledge instead of note-by-note, which is why
    /// a bulk scan resolves links an incremental sequence would first report
    /// broken.
    pub fn scan_workspace(&self) -> Result<ScanReport> {
        let started = Instant::now();
        let notes = self.fs.scan_notes(&self.scan_config)?;

        // Extraction and hashing are pure; keep them outside the index lock.
        let mut prepared = Vec::with_capacity(notes.len());
        let mut unchanged = 0usize;
        for (key, text) in notes {
            let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
            if self.state.get_content_hash(key.as_str())?.as_deref() == Some(hash.as_str()) {
                unchanged += 1;
            }
            let (frontmatter, extraction) = extract::extract(&text);
            prepared.push((key, text, frontmatter, extraction, hash));
        }

        // Phase 1: the whole alias table in one step, replacing any previous
        // in-memory index for this workspace.
        let mut versions = Vec::with_capacity(prepared.len());
        {
            let mut index = self.write_index()?;
            index.clear();
            for (key, text, frontmatter, _, _) in &prepared {
                versions.push(index.register(key, text.clone(), frontmatter.clone()));
            }
        }

        // Phase 2: one atomic apply per note, so readers can interleave and
        // render progressively during a large scan.
        let scanned: HashSet<String> = prepared
            .iter()
            .map(|(key, ..)| key.as_str().to_string())
            .collect();
        for ((key, _, _, extraction, hash), version) in prepared.into_iter().zip(versions) {
            {
                let mut index = self.write_index()?;
                index.apply_extraction(&key, extraction, version);
            }
            let mtime = self.note_mtime(&key);
            self.state.upsert_index_state(key.as_str(), &hash, mtime)?;
            self.publish_changed(&key);
        }

        // Prune state rows for notes deleted while the workspace was closed.
        for tracked in self.state.tracked_keys()? {
            if !scanned.contains(&tracked) {
                self.state.remove_index_state(&tracked)?;
            }
        }

        let stats = self.read_index()?.stats();
        let report = ScanReport {
            indexed: stats.notes,
            unchanged,
            duration_ms: started.elapsed().as_millis(),
            stats,
        };
        self.log_operation(
            "scan_workspace",
            None,
            "ok",
            started,
            serde_json::to_value(&report).ok(),
        );
        self.log_collisions(started);
        Ok(report)
    }

    pub(super) fn note_mtime(&self, key: &crate::key::NoteKey) -> i64 {
        std::fs::metadata(self.fs.resolve_key(key))
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|time| time.duration_since(std::time::UNIX_EPOCH).ok())
            .and_then(|duration| i64::try_from(duration.as_nanos()).ok())
            .unwrap_or(0)
    }

    /// Ambiguous aliases are resolved deterministically but never silently:
    /// every current collision goes to the event log.
    pub(super) fn log_collisions(&self, started: Instant) {
        let collisions = match self.read_index() {
            Ok(index) => index.alias_collisions(),
            Err(_) => return,
        };
        for collision in collisions {
            self.log_operation(
                "alias_collision",
                Some(&collision.winner),
                "ambiguous",
                started,
                serde_json::to_value(&collision).ok(),
            );
        }
    }
}
