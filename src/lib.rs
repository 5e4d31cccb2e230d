//! distspell - a distributed SymSpell-style spell-checker.
//!
//! Given a dictionary file and a query-word-list file, shards both across
//! `N` worker threads (standing in for the `N` independent OS processes of
//! the design this crate follows — see DESIGN.md), builds a per-worker
//! deletion index (`symspell`), and runs a round-robin broadcast protocol
//! (`coordinator`) so every worker eventually knows the spelling status and
//! edit-distance-1 candidates for every query word. Rank 0 assembles the
//! final, sorted output (`assembler`).
//!
//! Most consumers want [`engine::run_and_write`] (the CLI's entry point) or,
//! for tests, [`engine::run_with_shards`] to drive the protocol over
//! hand-built shards without touching the filesystem.

pub mod assembler;
pub mod collective;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod reader;
pub mod symspell;

pub use coordinator::MisspelledRecord;
pub use error::SpellCheckError;
pub use symspell::DeletionIndex;
