use std::time::Instant;

use crate::error::Result;
use crate::extract;
use crate::key::NoteKey;

use super::Quallaa;

/// File-watch entry points. Events for the same key must arrive in order (the
/// watcher's contract); each call applies one note's change as a single
/// atomic index step.
impl Quallaa {
    pub fn on_created(&self, key: &NoteKey, text: impl Into<String>) -> Result<()> {
        let started = Instant::now();
        self.index_note(key, text.into())?;
        self.log_operation("note_created", Some(key), "ok", started, None);
        Ok(())
    }

    pub fn on_changed(&self, key: &NoteKey, text: impl Into<String>) -> Result<()> {
        let started = Instant::now();
        let text = text.into();

        // Spurious change events (save without edit, touch) are suppressed by
        // the content-hash cache; the index already reflects these bytes.
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        let already_indexed = {
            let index = self.read_index()?;
            index.note(key).is_some()
        };
        if already_indexed && self.state.get_content_hash(key.as_str())?.as_deref() == Some(&hash) {
            self.log_operation("note_changed", Some(key), "unchanged", started, None);
            return Ok(());
        }

        self.index_note(key, text)?;
        self.log_operation("note_changed", Some(key), "ok", started, None);
        Ok(())
    }

    pub fn on_deleted(&self, key: &NoteKey) -> Result<()> {
        let started = Instant::now();
        let removed = {
            let mut index = self.write_index()?;
            index.remove_note(key)
        };
        if removed {
            self.state.remove_index_state(key.as_str())?;
            self.publish_changed(key);
        }
        let status = if removed { "ok" } else { "not_indexed" };
        self.log_operation("note_deleted", Some(key), status, started, None);
        Ok(())
    }

    /// Rename is delete at the old key plus create at the new key, inside one
    /// write-lock step: no reader observes the gap where links to the old key
    /// have unresolved but the new key is not yet registered.
    pub fn on_renamed(&self, old: &NoteKey, new: &NoteKey, text: impl Into<String>) -> Result<()> {
        let started = Instant::now();
        let text = text.into();
        let (frontmatter, extraction) = extract::extract(&text);
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();

        {
            let mut index = self.write_index()?;
            index.remove_note(old);
            let version = index.register(new, text, frontmatter);
            index.apply_extraction(new, extraction, version);
        }
        self.state.remove_index_state(old.as_str())?;
        self.state
            .upsert_index_state(new.as_str(), &hash, self.note_mtime(new))?;
        self.publish_changed(old);
        self.publish_changed(new);

        self.log_operation(
            "note_renamed",
            Some(new),
            "ok",
            started,
            Some(serde_json::json!({ "from": old.to_string() })),
        );
        self.log_collisions(started);
        Ok(())
    }

    fn index_note(&self, key: &NoteKey, text: String) -> Result<()> {
        let started = Instant::now();
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        let (frontmatter, extraction) = extract::extract(&text);

        {
            let mut index = self.write_index()?;
            let version = index.register(key, text, frontmatter);
            index.apply_extraction(key, extraction, version);
        }
        self.state
            .upsert_index_state(key.as_str(), &hash, self.note_mtime(key))?;
        self.publish_changed(key);
        self.log_collisions(started);
        Ok(())
    }
}
