//! # Caption Votes Repository
//! This crate provides the storage adapter for caption voting: the
//! `VoteStore` trait, a PostgreSQL implementation backed by sqlx and an
//! in-memory implementation with the same uniqueness guarantees.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::VoteStoreError;
pub use interfaces::VoteStore;
pub use memory::InMemoryVoteStore;
pub use postgres::PostgresVoteStore;
