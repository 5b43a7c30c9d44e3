//! Error types for the caption votes repository.
mod vote_store;

pub use vote_store::VoteStoreError;
