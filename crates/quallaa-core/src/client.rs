use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{QuallaaError, Result};
use crate::events::ChangeBus;
use crate::fs::WorkspaceFs;
use crate::index::GraphIndex;
use crate::models::{IndexChanged, ScanConfig};
use crate::state::SqliteStateStore;

mod event_log_service;
mod indexing_service;
mod query_service;
mod update_service;

/// Handle to one open workspace: the note-graph index plus its file-system
/// and state collaborators. Obtained at workspace-open time, dropped at
/// close; there is no ambient global index.
///
/// Writes go through the update entry points one event at a time; reads take
/// the shared lock and never observe a half-applied step.
#[derive(Clone)]
pub struct Quallaa {
    pub fs: WorkspaceFs,
    pub state: SqliteStateStore,
    pub index: Arc<RwLock<GraphIndex>>,
    bus: Arc<ChangeBus>,
    scan_config: ScanConfig,
}

impl std::fmt::Debug for Quallaa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quallaa").finish_non_exhaustive()
    }
}

impl Quallaa {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_config(root, ScanConfig::default())
    }

    pub fn open_with_config(root: impl Into<PathBuf>, scan_config: ScanConfig) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let fs = WorkspaceFs::new(&root);
        fs.initialize()?;
        let state = SqliteStateStore::open(fs.state_db_path())?;

        Ok(Self {
            fs,
            state,
            index: Arc::new(RwLock::new(GraphIndex::new())),
            bus: Arc::new(ChangeBus::new()),
            scan_config,
        })
    }

    #[must_use]
    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan_config
    }

    /// Coarse "index changed for key K" notifications, published after each
    /// applied step. Subscribers decide what to re-read.
    pub fn subscribe(&self) -> Receiver<IndexChanged> {
        self.bus.subscribe()
    }

    pub(crate) fn read_index(&self) -> Result<RwLockReadGuard<'_, GraphIndex>> {
        self.index
            .read()
            .map_err(|_| QuallaaError::Internal("index lock poisoned".to_string()))
    }

    pub(crate) fn write_index(&self) -> Result<RwLockWriteGuard<'_, GraphIndex>> {
        self.index
            .write()
            .map_err(|_| QuallaaError::Internal("index lock poisoned".to_string()))
    }

    pub(crate) fn publish_changed(&self, key: &crate::key::NoteKey) {
        self.bus.publish(&IndexChanged { key: key.clone() });
    }
}

#[cfg(test)]
mod tests;
