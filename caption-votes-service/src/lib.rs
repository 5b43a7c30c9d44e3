//! # Caption Votes Service
//! Server-side core of caption voting: admission of single votes with
//! one-vote-per-image deduplication, and computation of the shuffled queue
//! of captions a user is still eligible to vote on.
pub mod clock;
pub mod eligibility;
pub mod errors;
pub mod intake;

pub use clock::{Clock, FixedClock, SystemClock};
pub use eligibility::EligibilityFilter;
pub use errors::{ValidationError, VoteError};
pub use intake::VoteIntakeService;
