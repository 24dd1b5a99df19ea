use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::key::NoteKey;
use crate::models::{
    AliasCollision, BacklinkEntry, BrokenLink, Extraction, Frontmatter, GraphEdge, GraphNode,
    GraphSnapshot, IndexStats, LinkReference, TagEntry, TagsSnapshot,
};
use crate::store::{Note, NoteStore};
use crate::text;

mod suggest;

/// How a note came to claim an alias string. `Title` covers the file-stem,
/// the path-qualified stem, the full key, and the frontmatter title; `Alias`
/// covers explicit frontmatter alias entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum AliasKind {
    Title,
    Alias,
}

#[derive(Debug, Clone)]
pub(crate) struct AliasClaim {
    pub(crate) kind: AliasKind,
    pub(crate) display: String,
}

#[derive(Debug, Default, Clone)]
struct AliasSlot {
    claims: BTreeMap<NoteKey, AliasClaim>,
}

impl AliasSlot {
    /// Deterministic collision policy: the note with the shortest key string
    /// wins, ties broken by lexicographically least key. Insertion order never
    /// matters, so resolution is identical across runs.
    fn winner(&self) -> Option<(&NoteKey, &AliasClaim)> {
        self.claims.iter().min_by(|(a, _), (b, _)| {
            a.as_str()
                .len()
                .cmp(&b.as_str().len())
                .then_with(|| a.cmp(b))
        })
    }
}

/// The aggregate index: note store, forward-link table, backlink inverse
/// index, tag inverted index, alias table, and the raw-target watcher index
/// that keeps the re-resolution cascade O(affected) instead of O(all notes).
///
/// Single writer, many readers: callers wrap this in a `RwLock` and hold the
/// write guard across one note's `register` + `apply_extraction` so readers
/// never observe a half-applied step.
#[derive(Debug, Default, Clone)]
pub struct GraphIndex {
    store: NoteStore,
    forward: HashMap<NoteKey, Vec<LinkReference>>,
    /// target -> source -> occurrence indices into `forward[source]`.
    backlinks: HashMap<NoteKey, BTreeMap<NoteKey, Vec<usize>>>,
    tag_members: BTreeMap<String, BTreeSet<NoteKey>>,
    note_tags: HashMap<NoteKey, Vec<String>>,
    aliases: BTreeMap<String, AliasSlot>,
    /// normalized raw target -> sources holding a link with that target.
    watchers: HashMap<String, BTreeSet<NoteKey>>,
}

impl GraphIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts the note into the store and the alias table, returning the logical
    /// version the matching extraction must carry. Alias strings the note
    /// gained or lost trigger re-resolution of exactly the links watching
    /// those strings.
    pub fn register(&mut self, key: &NoteKey, text: String, frontmatter: Frontmatter) -> u64 {
        let old_claims = self
            .store
            .get(key)
            .map(|note| alias_claims(key, &note.frontmatter))
            .unwrap_or_default();
        let new_claims = alias_claims(key, &frontmatter);
        let version = self.store.put(key.clone(), text, frontmatter);

        let mut affected = BTreeSet::new();
        for norm in old_claims.keys() {
            if !new_claims.contains_key(norm) {
                self.drop_claim(norm, key);
                affected.insert(norm.clone());
            }
        }
        for (norm, claim) in new_claims {
            let slot = self.aliases.entry(norm.clone()).or_default();
            if slot.claims.insert(key.clone(), claim).is_none() {
                affected.insert(norm);
            }
        }

        self.re_resolve(&affected);
        version
    }

    /// Replaces the note's entire contribution to the link and tag indexes in
    /// one step. Returns `false` without touching anything when `version` is
    /// no longer the note's current version (a superseded extraction).
    pub fn apply_extraction(&mut self, key: &NoteKey, extraction: Extraction, version: u64) -> bool {
        if self.store.version_of(key) != Some(version) {
            return false;
        }
        self.clear_contribution(key);

        let mut links = Vec::with_capacity(extraction.links.len());
        for (idx, occurrence) in extraction.links.into_iter().enumerate() {
            let norm = normalize_target(&occurrence.raw_target);
            let resolved = self.resolve_normalized(&norm);
            if !norm.is_empty() {
                self.watchers.entry(norm).or_default().insert(key.clone());
            }
            if let Some(target) = &resolved {
                self.backlinks
                    .entry(target.clone())
                    .or_default()
                    .entry(key.clone())
                    .or_default()
                    .push(idx);
            }
            links.push(LinkReference {
                source: key.clone(),
                raw_target: occurrence.raw_target,
                alias: occurrence.alias,
                resolved,
                offset: occurrence.offset,
                line: occurrence.line,
            });
        }
        self.forward.insert(key.clone(), links);

        for tag in &extraction.tags {
            self.tag_members
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        self.note_tags.insert(key.clone(), extraction.tags);
        true
    }

    /// Drops a note entirely. Links that pointed to it stay in their source
    /// notes and become unresolved (or flip to the next alias claimant).
    pub fn remove_note(&mut self, key: &NoteKey) -> bool {
        let Some(note) = self.store.remove(key) else {
            return false;
        };
        self.clear_contribution(key);

        let mut affected = BTreeSet::new();
        for norm in alias_claims(key, &note.frontmatter).keys() {
            self.drop_claim(norm, key);
            affected.insert(norm.clone());
        }
        // Every inbound link resolved through one of those alias strings, so
        // this pass unresolves (or re-targets) all of them.
        self.re_resolve(&affected);
        self.backlinks.remove(key);
        true
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.forward.clear();
        self.backlinks.clear();
        self.tag_members.clear();
        self.note_tags.clear();
        self.aliases.clear();
        self.watchers.clear();
    }

    #[must_use]
    pub fn resolve_target(&self, raw_target: &str) -> Option<NoteKey> {
        self.resolve_normalized(&normalize_target(raw_target))
    }

    /// Resolves a query argument that may be an exact note key or any
    /// title/alias (`"Wiki Links"` for the note `Wiki Links.md`).
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<NoteKey> {
        if let Ok(key) = NoteKey::parse(name)
            && self.store.contains(&key)
        {
            return Some(key);
        }
        self.resolve_target(name)
    }

    #[must_use]
    pub fn note(&self, key: &NoteKey) -> Option<&Note> {
        self.store.get(key)
    }

    #[must_use]
    pub fn links_of(&self, key: &NoteKey) -> &[LinkReference] {
        self.forward.get(key).map_or(&[], Vec::as_slice)
    }

    /// Backlinks ordered by source note path, then document order within each
    /// source. Empty when there are none; never an error.
    #[must_use]
    pub fn backlinks_for(&self, key: &NoteKey) -> Vec<BacklinkEntry> {
        let Some(per_target) = self.backlinks.get(key) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (source, occurrence_indices) in per_target {
            let links = self.forward.get(source);
            let source_text = self.store.get(source).map_or("", |note| note.text.as_str());
            for idx in occurrence_indices {
                if let Some(link) = links.and_then(|all| all.get(*idx)) {
                    out.push(BacklinkEntry {
                        source: source.clone(),
                        context_snippet: text::context_snippet(source_text, link.offset),
                        line: link.line,
                    });
                }
            }
        }
        out
    }

    #[must_use]
    pub fn tags_snapshot(&self) -> TagsSnapshot {
        TagsSnapshot {
            tags: self
                .tag_members
                .iter()
                .map(|(tag, members)| TagEntry {
                    tag: tag.clone(),
                    count: members.len(),
                    members: members.iter().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Full export for visualization: every indexed note as a node, every
    /// resolved link occurrence as an edge. Broken links are not edges.
    #[must_use]
    pub fn graph_snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<GraphNode> = self
            .store
            .iter()
            .map(|(key, note)| GraphNode {
                key: key.clone(),
                title: note
                    .frontmatter
                    .title
                    .clone()
                    .unwrap_or_else(|| key.title().to_string()),
                tags: self.note_tags.get(key).cloned().unwrap_or_default(),
            })
            .collect();
        nodes.sort_by(|a, b| a.key.cmp(&b.key));

        let mut sources: Vec<&NoteKey> = self.forward.keys().collect();
        sources.sort();
        let mut edges = Vec::new();
        for source in sources {
            for link in &self.forward[source] {
                if let Some(target) = &link.resolved {
                    edges.push(GraphEdge {
                        source: source.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        GraphSnapshot { nodes, edges }
    }

    #[must_use]
    pub fn broken_links(&self) -> Vec<BrokenLink> {
        let mut sources: Vec<&NoteKey> = self.forward.keys().collect();
        sources.sort();
        let mut out = Vec::new();
        for source in sources {
            for link in &self.forward[source] {
                if link.resolved.is_none() {
                    out.push(BrokenLink {
                        source: source.clone(),
                        raw_target: link.raw_target.clone(),
                        line: link.line,
                    });
                }
            }
        }
        out
    }

    /// Alias strings currently claimed by more than one note, with the
    /// policy's winner and the deterministic losers.
    #[must_use]
    pub fn alias_collisions(&self) -> Vec<AliasCollision> {
        let mut out = Vec::new();
        for (norm, slot) in &self.aliases {
            if slot.claims.len() < 2 {
                continue;
            }
            let Some((winner, _)) = slot.winner() else {
                continue;
            };
            out.push(AliasCollision {
                alias: norm.clone(),
                winner: winner.clone(),
                losers: slot
                    .claims
                    .keys()
                    .filter(|key| *key != winner)
                    .cloned()
                    .collect(),
            });
        }
        out
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let links: usize = self.forward.values().map(Vec::len).sum();
        let resolved: usize = self
            .forward
            .values()
            .flat_map(|all| all.iter())
            .filter(|link| link.resolved.is_some())
            .count();
        IndexStats {
            notes: self.store.len(),
            links,
            resolved_links: resolved,
            broken_links: links - resolved,
            tags: self.tag_members.len(),
        }
    }

    fn resolve_normalized(&self, norm: &str) -> Option<NoteKey> {
        if norm.is_empty() {
            return None;
        }
        self.aliases
            .get(norm)
            .and_then(AliasSlot::winner)
            .map(|(key, _)| key.clone())
    }

    fn drop_claim(&mut self, norm: &str, key: &NoteKey) {
        if let Some(slot) = self.aliases.get_mut(norm) {
            slot.claims.remove(key);
            if slot.claims.is_empty() {
                self.aliases.remove(norm);
            }
        }
    }

    /// Removes the note's outgoing links (and the backlink entries they
    /// produced) plus its tag memberships. Entries pointing *to* the note are
    /// untouched.
    fn clear_contribution(&mut self, key: &NoteKey) {
        if let Some(old_links) = self.forward.remove(key) {
            for link in &old_links {
                let norm = normalize_target(&link.raw_target);
                if let Some(watching) = self.watchers.get_mut(&norm) {
                    watching.remove(key);
                    if watching.is_empty() {
                        self.watchers.remove(&norm);
                    }
                }
                if let Some(target) = &link.resolved
                    && let Some(per_target) = self.backlinks.get_mut(target)
                {
                    per_target.remove(key);
                    if per_target.is_empty() {
                        self.backlinks.remove(target);
                    }
                }
            }
        }
        if let Some(tags) = self.note_tags.remove(key) {
            for tag in tags {
                if let Some(members) = self.tag_members.get_mut(&tag) {
                    members.remove(key);
                    if members.is_empty() {
                        self.tag_members.remove(&tag);
                    }
                }
            }
        }
    }

    /// Re-resolves only the links whose normalized raw target is in
    /// `affected`, through the watcher index. This is the one non-local part
    /// of an update and it is bounded by the watchers of those strings.
    fn re_resolve(&mut self, affected: &BTreeSet<String>) {
        if affected.is_empty() {
            return;
        }
        let mut sources = BTreeSet::new();
        for norm in affected {
            if let Some(watching) = self.watchers.get(norm) {
                sources.extend(watching.iter().cloned());
            }
        }

        for source in sources {
            let Some(mut links) = self.forward.remove(&source) else {
                continue;
            };
            for (idx, link) in links.iter_mut().enumerate() {
                let norm = normalize_target(&link.raw_target);
                if !affected.contains(&norm) {
                    continue;
                }
                let resolved = self.resolve_normalized(&norm);
                if resolved == link.resolved {
                    continue;
                }
                if let Some(old_target) = &link.resolved {
                    self.remove_backlink_occurrence(old_target, &source, idx);
                }
                if let Some(new_target) = &resolved {
                    self.add_backlink_occurrence(new_target, &source, idx);
                }
                link.resolved = resolved;
            }
            self.forward.insert(source, links);
        }
    }

    fn remove_backlink_occurrence(&mut self, target: &NoteKey, source: &NoteKey, idx: usize) {
        if let Some(per_target) = self.backlinks.get_mut(target) {
            if let Some(occurrence_indices) = per_target.get_mut(source) {
                if let Ok(pos) = occurrence_indices.binary_search(&idx) {
                    occurrence_indices.remove(pos);
                }
                if occurrence_indices.is_empty() {
                    per_target.remove(source);
                }
            }
            if per_target.is_empty() {
                self.backlinks.remove(target);
            }
        }
    }

    fn add_backlink_occurrence(&mut self, target: &NoteKey, source: &NoteKey, idx: usize) {
        let occurrence_indices = self
            .backlinks
            .entry(target.clone())
            .or_default()
            .entry(source.clone())
            .or_default();
        if let Err(pos) = occurrence_indices.binary_search(&idx) {
            occurrence_indices.insert(pos, idx);
        }
    }
}

/// Lowercases and collapses internal whitespace so alias matching is
/// case-insensitive and layout-insensitive.
pub(crate) fn normalize_alias(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Alias normalization for link targets: a heading fragment (`Roadmap#Q1`)
/// resolves against the page part.
pub(crate) fn normalize_target(raw_target: &str) -> String {
    let page = raw_target
        .split_once('#')
        .map_or(raw_target, |(left, _)| left);
    normalize_alias(page)
}

/// Every string by which this note can be targeted, keyed by normalized form.
/// When the same string arises as both a title form and an explicit alias,
/// the title claim wins.
fn alias_claims(key: &NoteKey, frontmatter: &Frontmatter) -> BTreeMap<String, AliasClaim> {
    let mut claims: BTreeMap<String, AliasClaim> = BTreeMap::new();
    let mut put = |claims: &mut BTreeMap<String, AliasClaim>, value: &str, kind: AliasKind| {
        let norm = normalize_alias(value);
        if norm.is_empty() {
            return;
        }
        let candidate = AliasClaim {
            kind,
            display: value.trim().to_string(),
        };
        claims
            .entry(norm)
            .and_modify(|existing| {
                if kind < existing.kind {
                    *existing = candidate.clone();
                }
            })
            .or_insert(candidate);
    };

    put(&mut claims, key.title(), AliasKind::Title);
    put(&mut claims, key.stem_path(), AliasKind::Title);
    put(&mut claims, key.as_str(), AliasKind::Title);
    if let Some(title) = &frontmatter.title {
        put(&mut claims, title, AliasKind::Title);
    }
    for alias in &frontmatter.aliases {
        put(&mut claims, alias, AliasKind::Alias);
    }
    claims
}
