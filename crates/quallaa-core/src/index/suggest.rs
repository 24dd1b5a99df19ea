use std::collections::HashMap;

use crate::key::NoteKey;
use crate::models::{LinkSuggestion, SuggestionKind};

use super::{AliasKind, GraphIndex, normalize_alias};

impl GraphIndex {
    /// Autocomplete candidates for a typed prefix, ranked: title prefix
    /// matches first, then alias prefix matches, then substring matches; ties
    /// broken by shorter label, then lexical label. One suggestion per note
    /// (its best-ranked match). An empty prefix lists every note title.
    ///
    /// The prefix tier is a `BTreeMap` range scan, so the hot path never walks
    /// the whole alias table.
    #[must_use]
    pub fn suggest_links(&self, prefix: &str, limit: usize) -> Vec<LinkSuggestion> {
        if limit == 0 {
            return Vec::new();
        }
        let norm = normalize_alias(prefix);
        let mut best: HashMap<NoteKey, LinkSuggestion> = HashMap::new();

        for (alias, slot) in self.aliases.range(norm.clone()..) {
            if !alias.starts_with(&norm) {
                break;
            }
            let Some((key, claim)) = slot.winner() else {
                continue;
            };
            let kind = match claim.kind {
                AliasKind::Title => SuggestionKind::Title,
                AliasKind::Alias => SuggestionKind::Alias,
            };
            consider(&mut best, key, &claim.display, kind);
        }

        if !norm.is_empty() {
            for (alias, slot) in &self.aliases {
                if alias.starts_with(&norm) || !alias.contains(&norm) {
                    continue;
                }
                let Some((key, claim)) = slot.winner() else {
                    continue;
                };
                consider(&mut best, key, &claim.display, SuggestionKind::Fuzzy);
            }
        }

        let mut out: Vec<LinkSuggestion> = best.into_values().collect();
        out.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.label.chars().count().cmp(&b.label.chars().count()))
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.key.cmp(&b.key))
        });
        out.truncate(limit);
        out
    }
}

fn consider(
    best: &mut HashMap<NoteKey, LinkSuggestion>,
    key: &NoteKey,
    label: &str,
    kind: SuggestionKind,
) {
    let candidate = LinkSuggestion {
        label: label.to_string(),
        key: key.clone(),
        kind,
    };
    best.entry(key.clone())
        .and_modify(|existing| {
            let candidate_rank = (kind, candidate.label.chars().count());
            let existing_rank = (existing.kind, existing.label.chars().count());
            if candidate_rank < existing_rank {
                *existing = candidate.clone();
            }
        })
        .or_insert(candidate);
}
