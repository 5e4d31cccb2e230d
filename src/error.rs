//! Error taxonomy for the spell-checker job.
//!
//! Kept deliberately small per the design's error model: operational failures
//! (I/O) are represented here and are fatal to the whole job; programmer
//! errors (broken invariants) are plain `assert!`/`panic!`, not variants of
//! this enum.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SpellCheckError {
    #[error("rank {rank}: failed to read {}: {source}", path.display())]
    Io {
        rank: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("world size resolved to zero")]
    EmptyWorld,
}
