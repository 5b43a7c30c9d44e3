//! Caption Votes server library.
//!
//! Configuration, dependency wiring, identity and the HTTP routes of the
//! caption voting service. The binary in `main.rs` only assembles these.
pub mod config;
pub mod errors;
pub mod server;
pub mod telemetry;

pub use config::{Dependencies, Settings};
pub use errors::AppError;
