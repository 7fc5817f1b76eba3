//! AOC Client Library
//!
//! A blocking client for the Advent of Code website that fetches puzzle
//! inputs, reads star progress and submits answers without tripping the
//! site's answer cooldown.
//!
//! # Features
//!
//! - Puzzle input fetching for any year and day
//! - Star progress per year and per calendar day
//! - Answer submission classified into [`Outcome`] or [`ClientError`]
//! - A [`Backoff`] gate that parses the server's stated wait time and keeps
//!   later submissions off the network until it has passed
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Well-typed errors using thiserror and `tracing` events for diagnostics
//!
//! # Example
//!
//! ```no_run
//! use aoc_client::{AocClient, ClientError, Outcome, SubmissionRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AocClient::new()?;
//! let session = "your_session_cookie_here";
//!
//! let input = client.get_input(2024, 1, session)?;
//!
//! let request = SubmissionRequest::new(2024, 1, 1, "42")?;
//! match client.submit(&request, session) {
//!     Ok(Outcome::Success) => println!("Correct!"),
//!     Ok(Outcome::Wrong(message)) => println!("Incorrect: {}", message),
//!     Ok(waiting @ Outcome::Waiting { .. }) => println!("{}", waiting),
//!     Err(ClientError::RateLimited { wait }) => println!("Throttled for {}", wait),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

mod backoff;
mod client;
mod duration;
mod error;
mod parser;
mod transport;

pub use backoff::{Backoff, Clock, ManualClock, SystemClock, ThrottleState};
pub use client::{AocClient, AocClientBuilder, Outcome, Part, SubmissionRequest};
pub use duration::{WaitDuration, countdown};
pub use error::ClientError;
pub use parser::{DayStars, StarLevel, YearStars};
pub use transport::USER_AGENT;
