use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{QuallaaError, Result};
use crate::key::NoteKey;
use crate::models::ScanConfig;

/// Engine-internal directory under the workspace root (state cache, event
/// log). Never indexed.
pub const INTERNAL_DIR: &str = ".quallaa";

/// Read-side file-system collaborator: maps note keys to paths under one
/// workspace root and enumerates the notes a scan should index.
#[derive(Debug, Clone)]
pub struct WorkspaceFs {
    root: PathBuf,
}

impl WorkspaceFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(self.internal_dir())?;
        Ok(())
    }

    #[must_use]
    pub fn internal_dir(&self) -> PathBuf {
        self.root.join(INTERNAL_DIR)
    }

    #[must_use]
    pub fn state_db_path(&self) -> PathBuf {
        self.internal_dir().join("state.sqlite3")
    }

    #[must_use]
    pub fn event_log_path(&self) -> PathBuf {
        self.internal_dir().join("index_events.jsonl")
    }

    #[must_use]
    pub fn resolve_key(&self, key: &NoteKey) -> PathBuf {
        let mut out = self.root.clone();
        for segment in key.as_str().split('/') {
            out.push(segment);
        }
        out
    }

    pub fn key_from_path(&self, path: &Path) -> Result<NoteKey> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            QuallaaError::Validation(format!("path is outside workspace: {}", path.display()))
        })?;
        NoteKey::from_relative_path(relative)
    }

    pub fn read_note(&self, key: &NoteKey) -> Result<String> {
        let path = self.resolve_key(key);
        if !path.exists() {
            return Err(QuallaaError::NotFound(key.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Enumerates every note file under the root per `config`, sorted by key
    /// for deterministic scan order. Unreadable files are skipped, not fatal:
    /// one bad file must never abort indexing of the rest of the workspace.
    pub fn scan_notes(&self, config: &ScanConfig) -> Result<Vec<(NoteKey, String)>> {
        let excludes = build_exclude_set(&config.exclude_globs)?;
        let mut notes = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                if name == INTERNAL_DIR {
                    return false;
                }
                if entry.depth() == 0 || config.include_hidden {
                    return true;
                }
                !name.starts_with('.')
            });

        for entry in walker.filter_map(std::result::Result::ok) {
            let path = entry.path();
            if !entry.file_type().is_file() || !has_note_extension(path, &config.extensions) {
                continue;
            }
            let Ok(key) = self.key_from_path(path) else {
                continue;
            };
            if excludes.is_match(key.as_str()) {
                continue;
            }
            let Ok(text) = fs::read_to_string(path) else {
                continue;
            };
            notes.push((key, text));
        }

        notes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(notes)
    }
}

fn has_note_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|err| QuallaaError::Validation(format!("invalid glob `{pattern}`: {err}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| QuallaaError::Validation(format!("invalid exclude set: {err}")))
}
