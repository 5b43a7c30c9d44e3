//! # Caption Votes Deck
//! Client side of caption voting: a queue controller that presents one
//! caption at a time, submits at most one vote at a time and reconciles the
//! outcome with the local queue, plus an HTTP client for the vote endpoints.
pub mod controller;
pub mod errors;
pub mod http;
pub mod submitter;

pub use controller::{
    DeckOptions, DeckView, PendingVote, QueueController, QueueHandle, QueueState, Step,
    SwipeDirection, Transition,
};
pub use errors::{Disposition, SubmissionError};
pub use http::HttpVoteClient;
pub use submitter::SubmitVote;
