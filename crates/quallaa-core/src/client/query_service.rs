use crate::error::Result;
use crate::models::{
    AliasCollision, BacklinkEntry, BrokenLink, GraphSnapshot, IndexStats, LinkSuggestion,
    TagsSnapshot,
};

use super::Quallaa;

/// The read-side contracts consumed by the UI. All take the shared lock, so
/// they never block behind more than one in-flight note apply and never see a
/// half-applied extraction.
impl Quallaa {
    pub fn suggest_links(&self, prefix: &str, limit: usize) -> Result<Vec<LinkSuggestion>> {
        Ok(self.read_index()?.suggest_links(prefix, limit))
    }

    /// `name` may be an exact note key or any resolvable title/alias. An
    /// unknown name yields an empty list, not an error.
    pub fn backlinks_for(&self, name: &str) -> Result<Vec<BacklinkEntry>> {
        let index = self.read_index()?;
        Ok(index
            .resolve_name(name)
            .map(|key| index.backlinks_for(&key))
            .unwrap_or_default())
    }

    pub fn tags_snapshot(&self) -> Result<TagsSnapshot> {
        Ok(self.read_index()?.tags_snapshot())
    }

    pub fn graph_snapshot(&self) -> Result<GraphSnapshot> {
        Ok(self.read_index()?.graph_snapshot())
    }

    pub fn broken_links(&self) -> Result<Vec<BrokenLink>> {
        Ok(self.read_index()?.broken_links())
    }

    pub fn alias_collisions(&self) -> Result<Vec<AliasCollision>> {
        Ok(self.read_index()?.alias_collisions())
    }

    pub fn stats(&self) -> Result<IndexStats> {
        Ok(self.read_index()?.stats())
    }
}
