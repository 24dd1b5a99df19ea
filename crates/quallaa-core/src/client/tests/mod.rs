use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::Quallaa;
use crate::key::NoteKey;

mod incremental_lifecycle;
mod scale;

fn open_workspace() -> (TempDir, Quallaa) {
    let temp = tempfile::tempdir().expect("tempdir");
    let app = Quallaa::open(temp.path()).expect("open workspace");
    (temp, app)
}

fn write_note(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, body).expect("write note");
}

fn key(value: &str) -> NoteKey {
    NoteKey::parse(value).expect("key")
}
