//! # Caption Votes Shared
//! This crate defines the data structures shared by the caption voting
//! server, its storage adapters and the client-side voting deck.
//! It includes the image/caption/vote model, the queue item shape, the wire
//! DTOs of the vote endpoint and the user-visible messages both sides agree on.
pub mod messages;
pub mod types;
