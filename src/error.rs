//! Error type for the public API surface, following the small
//! `thiserror`-derived enum style common across the ecosystem's PQ crates.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KemError {
    #[error("failed to draw randomness from the configured RNG")]
    RngFailure,

    #[error("wrong buffer length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
}
