use std::collections::HashMap;

use crate::key::NoteKey;
use crate::models::Frontmatter;

/// Current text and metadata of one indexed note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub key: NoteKey,
    pub text: String,
    pub frontmatter: Frontmatter,
    /// Logical version from a monotonic counter, not wall clock. A stale
    /// extraction carries an older version and must not be applied.
    pub version: u64,
}

/// In-memory source of truth for note content. Single writer; persistence is
/// the file system, owned by the caller.
#[derive(Debug, Default, Clone)]
pub struct NoteStore {
    notes: HashMap<NoteKey, Note>,
    clock: u64,
}

impl NoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a note and returns its new logical version.
    pub fn put(&mut self, key: NoteKey, text: String, frontmatter: Frontmatter) -> u64 {
        self.clock += 1;
        let version = self.clock;
        self.notes.insert(
            key.clone(),
            Note {
                key,
                text,
                frontmatter,
                version,
            },
        );
        version
    }

    pub fn remove(&mut self, key: &NoteKey) -> Option<Note> {
        self.clock += 1;
        self.notes.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &NoteKey) -> Option<&Note> {
        self.notes.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &NoteKey) -> bool {
        self.notes.contains_key(key)
    }

    #[must_use]
    pub fn version_of(&self, key: &NoteKey) -> Option<u64> {
        self.notes.get(key).map(|note| note.version)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NoteKey, &Note)> {
        self.notes.iter()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}
