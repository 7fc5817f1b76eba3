//! Answer submission with optional waiting through cooldowns

use aoc_client::{AocClient, ClientError, Outcome, SubmissionRequest};
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::info;

/// Final state of a submission run
pub struct SubmissionReport {
    pub request: SubmissionRequest,
    pub result: Result<Outcome, ClientError>,
    pub submitted_at: DateTime<Local>,
    /// Time spent sleeping through cooldowns
    pub waited: Duration,
}

/// Submit once, or keep waiting and resubmitting while throttled when `auto_retry` is set
///
/// Retrying is the caller's decision; the client itself never retries.
pub fn submit_answer(
    client: &AocClient,
    request: SubmissionRequest,
    session: &str,
    auto_retry: bool,
) -> SubmissionReport {
    submit_with_sleep(client, request, session, auto_retry, std::thread::sleep)
}

fn submit_with_sleep(
    client: &AocClient,
    request: SubmissionRequest,
    session: &str,
    auto_retry: bool,
    mut sleep: impl FnMut(Duration),
) -> SubmissionReport {
    let mut waited = Duration::ZERO;

    loop {
        let result = client.submit(&request, session);
        let wait = match &result {
            Ok(Outcome::Waiting { remaining }) => Some(*remaining),
            Err(ClientError::RateLimited { wait }) => Some(wait.as_duration()),
            _ => None,
        };

        match wait {
            Some(wait) if auto_retry => {
                info!(wait_ms = wait.as_millis() as u64, "waiting before resubmitting");
                sleep(wait);
                waited += wait;
            }
            _ => {
                return SubmissionReport {
                    request,
                    result,
                    submitted_at: Local::now(),
                    waited,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_client::{Backoff, ManualClock, WaitDuration};
    use std::sync::Arc;

    const TOO_RECENT: &str = "<html><body><main>You gave an answer too recently. You have 30s left to wait.</main></body></html>";
    const WRONG: &str = "<html><body><main>That's not the right answer; your answer is too high.</main></body></html>";

    fn client(url: String, clock: Arc<ManualClock>) -> AocClient {
        AocClient::builder()
            .base_url(url)
            .unwrap()
            .backoff(Arc::new(Backoff::with_clock(clock)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_without_retry_reports_rate_limit() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2023/day/1/answer")
            .with_status(200)
            .with_body(TOO_RECENT)
            .expect(1)
            .create();

        let clock = Arc::new(ManualClock::new());
        let client = client(server.url(), clock);
        let request = SubmissionRequest::new(2023, 1, 1, "5").unwrap();
        let report = submit_with_sleep(&client, request, "s", false, |_| panic!("no sleep expected"));

        assert!(matches!(report.result, Err(ClientError::RateLimited { .. })));
        assert_eq!(report.waited, Duration::ZERO);
        mock.assert();
    }

    #[test]
    fn test_auto_retry_sleeps_through_cooldown() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2023/day/1/answer")
            .with_status(200)
            .with_body(WRONG)
            .expect(1)
            .create();

        let clock = Arc::new(ManualClock::new());
        let client = client(server.url(), Arc::clone(&clock));

        // Arm a cooldown as if an earlier answer had been throttled
        let armed = client.backoff().attempt(|| {
            Err(ClientError::RateLimited {
                wait: WaitDuration {
                    seconds: 30,
                    ..Default::default()
                },
            })
        });
        assert!(armed.is_err());

        let request = SubmissionRequest::new(2023, 1, 1, "5").unwrap();
        let mut sleeps = Vec::new();
        let report = submit_with_sleep(&client, request, "s", true, |d| {
            sleeps.push(d);
            clock.advance(d);
        });

        assert!(matches!(report.result, Ok(Outcome::Wrong(_))));
        assert_eq!(sleeps, vec![Duration::from_secs(30)]);
        assert_eq!(report.waited, Duration::from_secs(30));
        mock.assert();
    }
}
