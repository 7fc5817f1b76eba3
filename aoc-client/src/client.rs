//! AOC HTTP client implementation

use crate::backoff::Backoff;
use crate::duration::countdown;
use crate::error::{ClientError, TransportError};
use crate::parser::{DayStars, ResponseParser, YearStars};
use crate::transport::{Transport, USER_AGENT};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Puzzle part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    One,
    Two,
}

impl Part {
    /// Value of the `level` form field
    pub fn level(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }
}

impl TryFrom<u8> for Part {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Part::One),
            2 => Ok(Part::Two),
            other => Err(ClientError::InvalidRequest(format!(
                "part must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// One answer to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    year: u16,
    day: u8,
    part: Part,
    answer: String,
}

impl SubmissionRequest {
    /// Build a request, rejecting days outside 1..=25 and parts other than 1 or 2
    pub fn new(year: u16, day: u8, part: u8, answer: impl Into<String>) -> Result<Self, ClientError> {
        if !(1..=25).contains(&day) {
            return Err(ClientError::InvalidRequest(format!(
                "day must be between 1 and 25, got {}",
                day
            )));
        }
        Ok(Self {
            year,
            day,
            part: Part::try_from(part)?,
            answer: answer.into(),
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn part(&self) -> Part {
        self.part
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Result of an answer submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Answer was accepted
    Success,
    /// Answer was rejected, with the server's explanation
    Wrong(String),
    /// A cooldown is active locally; nothing was sent
    Waiting {
        /// Time left by this process's own clock
        remaining: Duration,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("That's the right answer!"),
            Outcome::Wrong(message) => f.write_str(message),
            Outcome::Waiting { remaining } => {
                write!(f, "You have to wait: {}", countdown(*remaining))
            }
        }
    }
}

/// The main AOC HTTP client
///
/// Fetches puzzle inputs and star progress and submits answers. Every
/// submission passes through a [`Backoff`] gate; clients built without an
/// explicit gate share the process-wide one.
///
/// # Example
///
/// ```no_run
/// use aoc_client::{AocClient, Outcome, SubmissionRequest};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::new()?;
/// let session = "your_session_cookie";
///
/// let input = client.get_input(2024, 1, session)?;
/// println!("Input: {} bytes", input.len());
///
/// let request = SubmissionRequest::new(2024, 1, 1, "42")?;
/// match client.submit(&request, session)? {
///     Outcome::Success => println!("Correct!"),
///     Outcome::Wrong(message) => println!("{}", message),
///     waiting @ Outcome::Waiting { .. } => println!("{}", waiting),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AocClient {
    transport: Transport,
    parser: ResponseParser,
    backoff: Arc<Backoff>,
}

impl AocClient {
    /// Create a client for adventofcode.com using the shared cooldown gate
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ClientInit` if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, ClientError> {
        Self::builder().build()
    }

    /// Create a builder for configuring the AOC client
    pub fn builder() -> AocClientBuilder {
        AocClientBuilder::new()
    }

    /// Site this client talks to
    pub fn base_url(&self) -> &reqwest::Url {
        self.transport.base_url()
    }

    /// The cooldown gate used by [`submit`](Self::submit)
    pub fn backoff(&self) -> &Arc<Backoff> {
        &self.backoff
    }

    /// Verify a session cookie and return the account's user ID
    ///
    /// # Errors
    ///
    /// * `ClientError::InvalidSession` - the settings page did not load or
    ///   carried no user ID
    /// * `ClientError::Request` - network error
    pub fn verify_session(&self, session: &str) -> Result<u64, ClientError> {
        let page = self.transport.get(&["settings"], Some(session))?;
        self.parser
            .extract_user_id(&page.body)
            .ok_or(ClientError::InvalidSession)
    }

    /// Fetch puzzle input for a specific year and day
    ///
    /// Exactly one trailing newline is removed from the body.
    ///
    /// # Errors
    ///
    /// * `ClientError::InvalidSession` - any non-success status
    /// * `ClientError::Request` - network error
    /// * `ClientError::Encoding` - body is not valid UTF-8
    pub fn get_input(&self, year: u16, day: u8, session: &str) -> Result<String, ClientError> {
        let page = self.transport.get(
            &[&year.to_string(), "day", &day.to_string(), "input"],
            Some(session),
        )?;
        let mut input = page.body;
        if input.ends_with('\n') {
            input.pop();
        }
        Ok(input)
    }

    /// Submit an answer through the cooldown gate
    ///
    /// # Returns
    ///
    /// * `Success` - answer was accepted
    /// * `Wrong` - answer was rejected, with the server's text
    /// * `Waiting` - a cooldown is active and no request was sent
    ///
    /// # Errors
    ///
    /// * `ClientError::RateLimited` - the server asked to wait; later calls
    ///   return `Waiting` until that time has passed
    /// * `ClientError::InvalidSession` - any non-200 status
    /// * `ClientError::SolveError` - the reply could not be classified
    /// * `ClientError::Request` - network error
    pub fn submit(&self, request: &SubmissionRequest, session: &str) -> Result<Outcome, ClientError> {
        self.backoff.attempt(|| {
            debug!(
                year = request.year,
                day = request.day,
                part = request.part.level(),
                "submitting answer"
            );
            let level = request.part.level().to_string();
            let page = self.transport.post_form(
                &[&request.year.to_string(), "day", &request.day.to_string(), "answer"],
                session,
                &[("level", level.as_str()), ("answer", request.answer.as_str())],
            )?;
            self.parser.classify_submission(page.status, &page.body)
        })
    }

    /// List every year the event has run, without authenticating
    ///
    /// # Errors
    ///
    /// * `ClientError::UnexpectedStatus` - non-success status
    /// * `ClientError::Request` - network error
    pub fn years(&self) -> Result<Vec<u16>, ClientError> {
        let page = self
            .transport
            .get(&["events"], None)
            .map_err(|e| match e {
                TransportError::Status(status) => ClientError::UnexpectedStatus(status),
                other => other.into(),
            })?;
        Ok(self
            .parser
            .parse_events(&page.body)
            .into_iter()
            .map(|entry| entry.year)
            .collect())
    }

    /// Star totals for every year, as seen by the session's account
    pub fn stars_by_year(&self, session: &str) -> Result<Vec<YearStars>, ClientError> {
        let page = self.transport.get(&["events"], Some(session))?;
        Ok(self.parser.parse_events(&page.body))
    }

    /// Per-day star levels for one year's calendar
    pub fn calendar(&self, year: u16, session: &str) -> Result<Vec<DayStars>, ClientError> {
        let page = self.transport.get(&[&year.to_string()], Some(session))?;
        Ok(self.parser.parse_calendar(&page.body))
    }
}

/// Builder for configuring an AOC HTTP client
///
/// # Example
///
/// ```no_run
/// use aoc_client::{AocClient, Backoff};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::builder()
///     .base_url("http://localhost:1234")?
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(10))
///     )
///     .backoff(Arc::new(Backoff::new()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AocClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
    backoff: Option<Arc<Backoff>>,
}

impl AocClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL, parsed and validated immediately
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, ClientError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder
    ///
    /// The redirect policy and user agent are always overridden.
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Use a specific cooldown gate instead of the process-wide one
    pub fn backoff(mut self, backoff: Arc<Backoff>) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Build the AOC client with the configured settings
    pub fn build(self) -> Result<AocClient, ClientError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse("https://adventofcode.com")
                .map_err(|e| ClientError::ClientInit(e.to_string()))?,
        };

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());

        // Redirects are not followed so an expired session surfaces as a status
        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::ClientInit(e.to_string()))?;

        Ok(AocClient {
            transport: Transport::new(client, base_url),
            parser: ResponseParser::new(),
            backoff: self.backoff.unwrap_or_else(Backoff::shared),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use proptest::prelude::*;

    fn test_client(url: String) -> AocClient {
        AocClient::builder()
            .base_url(url)
            .unwrap()
            .backoff(Arc::new(Backoff::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let client = AocClient::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://adventofcode.com/");
    }

    #[test]
    fn test_default_client_uses_shared_backoff() {
        let client = AocClient::new().unwrap();
        assert!(Arc::ptr_eq(client.backoff(), &Backoff::shared()));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(AocClient::builder().base_url("not a valid url").is_err());
    }

    #[test]
    fn test_submission_request_validation() {
        assert!(SubmissionRequest::new(2023, 0, 1, "1").is_err());
        assert!(SubmissionRequest::new(2023, 26, 1, "1").is_err());
        assert!(SubmissionRequest::new(2023, 5, 3, "1").is_err());
        let request = SubmissionRequest::new(2023, 25, 2, "abc").unwrap();
        assert_eq!(request.part(), Part::Two);
        assert_eq!(request.answer(), "abc");
    }

    #[test]
    fn test_waiting_display() {
        let outcome = Outcome::Waiting {
            remaining: Duration::from_millis(42_500),
        };
        assert_eq!(outcome.to_string(), "You have to wait: 0m 42s");
    }

    #[test]
    fn test_requests_carry_identification_and_cookie() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2023/day/5/input")
            .match_header("user-agent", USER_AGENT)
            .match_header("cookie", "session=abc123")
            .with_status(200)
            .with_body("1\n2\n")
            .expect(1)
            .create();

        let client = test_client(server.url());
        assert_eq!(client.get_input(2023, 5, "abc123").unwrap(), "1\n2");
        mock.assert();
    }

    #[test]
    fn test_input_strips_exactly_one_newline() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2022/day/1/input")
            .with_status(200)
            .with_body("a\n\n")
            .create();

        let client = test_client(server.url());
        assert_eq!(client.get_input(2022, 1, "s").unwrap(), "a\n");
        mock.assert();
    }

    #[test]
    fn test_redirect_is_not_followed() {
        let mut server = mockito::Server::new();
        let home = server.mock("GET", "/").with_status(200).expect(0).create();
        let settings = server
            .mock("GET", "/settings")
            .with_status(303)
            .with_header("location", "/")
            .expect(1)
            .create();

        let client = test_client(server.url());
        assert!(matches!(
            client.verify_session("expired"),
            Err(ClientError::InvalidSession)
        ));
        home.assert();
        settings.assert();
    }

    #[test]
    fn test_verify_session_returns_user_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/settings")
            .with_status(200)
            .with_body("<html><body>Settings (anonymous user #424242)</body></html>")
            .create();

        let client = test_client(server.url());
        assert_eq!(client.verify_session("s").unwrap(), 424242);
        mock.assert();
    }

    #[test]
    fn test_submit_server_error_is_invalid_session() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2023/day/5/answer")
            .with_status(500)
            .with_body("<html><body><main>Internal error</main></body></html>")
            .expect(1)
            .create();

        let client = test_client(server.url());
        let request = SubmissionRequest::new(2023, 5, 1, "42").unwrap();
        assert!(matches!(
            client.submit(&request, "s"),
            Err(ClientError::InvalidSession)
        ));
        assert_eq!(client.backoff().remaining(), None);
        mock.assert();
    }

    #[test]
    fn test_submit_unknown_body_is_solve_error() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2023/day/5/answer")
            .with_status(200)
            .with_body("<html><body><main><article><p>You don't seem to be solving the right level.</p></article></main></body></html>")
            .create();

        let client = test_client(server.url());
        let request = SubmissionRequest::new(2023, 5, 1, "42").unwrap();
        match client.submit(&request, "s") {
            Err(ClientError::SolveError(text)) => {
                assert_eq!(text, "You don't seem to be solving the right level.")
            }
            other => panic!("Expected SolveError, got {:?}", other),
        }
        mock.assert();
    }

    #[test]
    fn test_years_is_unauthenticated() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/events")
            .match_header("cookie", Matcher::Missing)
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_body(
                r#"<main><div class="eventlist-event"><a href="/2024">[2024]</a></div>
                <div class="eventlist-event"><a href="/2023">[2023]</a></div></main>"#,
            )
            .create();

        let client = test_client(server.url());
        assert_eq!(client.years().unwrap(), vec![2024, 2023]);
        mock.assert();
    }

    #[test]
    fn test_years_error_status_is_not_a_session_failure() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/events").with_status(503).create();

        let client = test_client(server.url());
        match client.years() {
            Err(ClientError::UnexpectedStatus(status)) => assert_eq!(status.as_u16(), 503),
            other => panic!("Expected UnexpectedStatus, got {:?}", other),
        }
        mock.assert();
    }

    #[test]
    fn test_stars_by_year_and_calendar() {
        let mut server = mockito::Server::new();
        let events = server
            .mock("GET", "/events")
            .match_header("cookie", "session=s")
            .with_status(200)
            .with_body(
                r#"<div class="eventlist-event"><a href="/2023">[2023]</a> <span class="star-count">41*</span></div>"#,
            )
            .create();
        let calendar = server
            .mock("GET", "/2023")
            .match_header("cookie", "session=s")
            .with_status(200)
            .with_body(
                r#"<pre class="calendar"><a class="calendar-day1 calendar-verycomplete"></a><a class="calendar-day2 calendar-complete"></a></pre>"#,
            )
            .create();

        let client = test_client(server.url());
        assert_eq!(
            client.stars_by_year("s").unwrap(),
            vec![YearStars { year: 2023, stars: 41 }]
        );
        assert_eq!(
            client.calendar(2023, "s").unwrap(),
            vec![
                DayStars { day: 1, level: crate::StarLevel::Two },
                DayStars { day: 2, level: crate::StarLevel::One },
            ]
        );
        events.assert();
        calendar.assert();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_submission_request_construction(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            part in 1u8..=2u8,
            answer in "[0-9]{1,10}",
            session in "[a-f0-9]{32,128}",
        ) {
            let mut server = mockito::Server::new();
            let expected_path = format!("/{}/day/{}/answer", year, day);

            let mock = server.mock("POST", expected_path.as_str())
                .match_header("cookie", format!("session={}", session).as_str())
                .match_body(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("level".into(), part.to_string()),
                    Matcher::UrlEncoded("answer".into(), answer.clone()),
                ]))
                .with_status(200)
                .with_body(r#"<html><body><main>That's the right answer!</main></body></html>"#)
                .expect(1)
                .create();

            let client = test_client(server.url());
            let request = SubmissionRequest::new(year, day, part, answer.clone()).unwrap();
            let result = client.submit(&request, &session);

            mock.assert();
            prop_assert_eq!(result.unwrap(), Outcome::Success);
        }

        #[test]
        fn prop_non_success_status_is_invalid_session(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            status_code in prop::sample::select(vec![400, 401, 403, 404, 429, 500, 502, 503, 504]),
        ) {
            let mut server = mockito::Server::new();
            let expected_path = format!("/{}/day/{}/input", year, day);

            let mock = server.mock("GET", expected_path.as_str())
                .with_status(status_code)
                .with_body("Error response")
                .expect(1)
                .create();

            let client = test_client(server.url());
            let result = client.get_input(year, day, "session");

            mock.assert();
            prop_assert!(
                matches!(result, Err(ClientError::InvalidSession)),
                "status {} should map to InvalidSession, got {:?}",
                status_code,
                result
            );
        }
    }
}
