//! # promptrepo-core
//!
//! Core engine for promptrepo, a personal prompt library.
//!
//! This crate is framework-agnostic and can be used by:
//! - the HTTP server (`promptrepo-http`)
//! - the daemon binary (`promptrepo-daemon`)
//! - tests and scripts that open a data file directly
//!
//! ## Key Concepts
//!
//! - **Container**: the root, or one folder. Folders and prompts inside the
//!   same container share one dense `order` sequence.
//! - **Move**: the single path for reordering within a container and for
//!   moving between containers. Folder moves are cycle-checked first.
//! - **Version ledger**: each prompt keeps an append-only history of
//!   name/text snapshots.
//! - **Usage**: copies are counted at most once per cooldown window.
//! - **PromptStore**: owns the document and persists every mutation
//!   atomically under a single-writer lock.

pub mod cycle;
pub mod error;
pub mod folders;
pub mod migrate;
pub mod model;
pub mod moves;
pub mod order;
pub mod paths;
pub mod persistence;
pub mod query;
pub mod store;
pub mod tree;
pub mod usage;
pub mod versions;

// Re-export commonly used types
pub use error::StoreError;
pub use model::{Document, Folder, ItemKind, Prompt, VersionEntry};
pub use order::Direction;
pub use store::PromptStore;
pub use usage::{CopyOutcome, COOLDOWN_MS};
pub use versions::PromptUpdate;
