// Public fallible APIs in this crate share one concrete error contract (`QuallaaError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod client;
pub mod error;
pub mod events;
pub mod extract;
pub mod frontmatter;
pub mod fs;
pub mod index;
pub mod key;
pub mod models;
pub mod state;
pub mod store;
pub(crate) mod text;

pub use client::Quallaa;
pub use error::{QuallaaError, Result};
pub use key::NoteKey;
