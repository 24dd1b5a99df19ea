use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuallaaError, Result};

/// Stable identity of a note: its workspace-relative path with `/` separators.
/// Case-sensitive; two keys differing only in case are distinct notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteKey(String);

impl NoteKey {
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().replace('\\', "/");
        if normalized.is_empty() {
            return Err(QuallaaError::InvalidKey("empty key".to_string()));
        }
        if normalized.starts_with('/') {
            return Err(QuallaaError::InvalidKey(format!(
                "key must be workspace-relative: {value}"
            )));
        }

        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(QuallaaError::PathTraversal(value.to_string())),
                other => segments.push(other),
            }
        }
        if segments.is_empty() {
            return Err(QuallaaError::InvalidKey(value.to_string()));
        }
        Ok(Self(segments.join("/")))
    }

    pub fn from_relative_path(path: &Path) -> Result<Self> {
        Self::parse(&path.to_string_lossy())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, extension included (`notes/Nested Note.md` -> `Nested Note.md`).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Display title derived from the file name: the stem without its extension.
    #[must_use]
    pub fn title(&self) -> &str {
        strip_markdown_extension(self.file_name())
    }

    /// Full relative path without the markdown extension, usable as a
    /// path-qualified link target (`notes/Nested Note`).
    #[must_use]
    pub fn stem_path(&self) -> &str {
        strip_markdown_extension(&self.0)
    }
}

impl Display for NoteKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteKey {
    type Err = QuallaaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn strip_markdown_extension(name: &str) -> &str {
    for ext in [".md", ".markdown"] {
        if name.len() > ext.len()
            && let Some(stem) = name.strip_suffix(ext)
        {
            return stem;
        }
    }
    name
}
