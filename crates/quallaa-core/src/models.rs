use serde::{Deserialize, Serialize};

use crate::key::NoteKey;

/// Metadata recognized from a note's leading `---` frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One `[[...]]` occurrence as it appears in a note body, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOccurrence {
    pub raw_target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Byte offset of the opening `[[` within the note text.
    pub offset: usize,
    /// 1-based line number of the occurrence.
    pub line: usize,
}

/// Extractor output for a single note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub links: Vec<LinkOccurrence>,
    /// Lowercased, deduplicated union of frontmatter and inline tags.
    pub tags: Vec<String>,
}

/// A link occurrence after target resolution. `resolved = None` means the
/// raw target currently matches no note and no alias (a broken link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReference {
    pub source: NoteKey,
    pub raw_target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<NoteKey>,
    pub offset: usize,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkEntry {
    pub source: NoteKey,
    pub context_snippet: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Title,
    Alias,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSuggestion {
    /// The title or alias text that matched, as the user would insert it.
    pub label: String,
    pub key: NoteKey,
    pub kind: SuggestionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub tag: String,
    pub count: usize,
    pub members: Vec<NoteKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsSnapshot {
    /// Sorted by tag name. Hierarchical tags (`project/backend`) appear under
    /// their literal name only; prefix grouping happens at query time.
    pub tags: Vec<TagEntry>,
}

impl TagsSnapshot {
    /// Entries whose tag equals `prefix` or lives under `prefix/`.
    #[must_use]
    pub fn entries_under<'a>(&'a self, prefix: &str) -> Vec<&'a TagEntry> {
        self.tags
            .iter()
            .filter(|entry| {
                entry.tag == prefix
                    || (entry.tag.len() > prefix.len()
                        && entry.tag.starts_with(prefix)
                        && entry.tag.as_bytes()[prefix.len()] == b'/')
            })
            .collect()
    }

    /// Distinct members across all entries under `prefix`, sorted by key.
    #[must_use]
    pub fn members_under(&self, prefix: &str) -> Vec<NoteKey> {
        let mut members: Vec<NoteKey> = self
            .entries_under(prefix)
            .into_iter()
            .flat_map(|entry| entry.members.iter().cloned())
            .collect();
        members.sort();
        members.dedup();
        members
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub key: NoteKey,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NoteKey,
    pub target: NoteKey,
}

/// Full node/edge export for visualization. Edges carry resolved links only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub source: NoteKey,
    pub raw_target: String,
    pub line: usize,
}

/// A deterministic alias-policy outcome where more than one note claimed the
/// same alias string. `winner` is the note resolution currently picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasCollision {
    pub alias: String,
    pub winner: NoteKey,
    pub losers: Vec<NoteKey>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub notes: usize,
    pub links: usize,
    pub resolved_links: usize,
    pub broken_links: usize,
    pub tags: usize,
}

/// Coarse change notification published after each applied index step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChanged {
    pub key: NoteKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Extensions treated as notes, compared case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            include_hidden: false,
            exclude_globs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub indexed: usize,
    pub unchanged: usize,
    pub duration_ms: u128,
    pub stats: IndexStats,
}

/// One line of the JSONL index event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEventRecord {
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub status: String,
    pub latency_ms: u128,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
