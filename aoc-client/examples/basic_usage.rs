//! Basic usage example for the AOC client
//!
//! This example demonstrates how to:
//! - Create a client with default settings
//! - Verify a session cookie
//! - Fetch puzzle input and star progress
//! - Submit an answer and react to the cooldown
//!
//! Note: This example requires a valid AOC session cookie in `AOC_SESSION`.

use aoc_client::{AocClient, ClientError, Outcome, SubmissionRequest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let session = std::env::var("AOC_SESSION")?;
    let client = AocClient::new()?;

    let user_id = client.verify_session(&session)?;
    println!("Session is valid (user #{})", user_id);

    let input = client.get_input(2024, 1, &session)?;
    println!("Input length: {} bytes", input.len());

    for entry in client.stars_by_year(&session)? {
        println!("{}: {} stars", entry.year, entry.stars);
    }

    let request = SubmissionRequest::new(2024, 1, 1, "12345")?;
    for attempt in 1..=2 {
        println!("Attempt {}:", attempt);
        match client.submit(&request, &session) {
            Ok(Outcome::Success) => println!("  correct"),
            Ok(Outcome::Wrong(message)) => println!("  incorrect: {}", message),
            Ok(waiting @ Outcome::Waiting { .. }) => println!("  {}", waiting),
            Err(ClientError::RateLimited { wait }) => println!("  throttled for {}", wait),
            Err(e) => println!("  failed: {}", e),
        }
    }

    Ok(())
}
