//! Authenticated HTTP transport

use crate::error::TransportError;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderValue};
use tracing::debug;
use zeroize::Zeroize;

/// Identification sent with every request, as the site asks automated tools to do
pub const USER_AGENT: &str = concat!(
    "aoc-client/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/khangp0000/my-aoc-kit by khangp0000@users.noreply.github.com)"
);

/// Status and body of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fetched {
    pub status: StatusCode,
    pub body: String,
}

/// Thin wrapper over a blocking reqwest client rooted at a base URL
#[derive(Clone, Debug)]
pub(crate) struct Transport {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
}

impl Transport {
    pub fn new(client: reqwest::blocking::Client, base_url: reqwest::Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    /// Create a secure cookie header value from a session string
    ///
    /// The header is flagged sensitive and the temporary string is zeroized.
    fn cookie_header(session: &str) -> Result<HeaderValue, TransportError> {
        let mut cookie_string = format!("session={}", session);
        let header_value = HeaderValue::from_bytes(cookie_string.as_bytes());
        cookie_string.zeroize();

        let mut header_value = header_value
            .map_err(|_| TransportError::Url("Invalid session cookie format".to_string()))?;
        header_value.set_sensitive(true);
        Ok(header_value)
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Url("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// GET a page, with the session cookie when one is given
    pub fn get(&self, segments: &[&str], session: Option<&str>) -> Result<Fetched, TransportError> {
        let url = self.url(segments)?;
        debug!(method = "GET", path = url.path(), authenticated = session.is_some(), "sending request");

        let mut request = self.client.get(url);
        if let Some(session) = session {
            request = request.header(COOKIE, Self::cookie_header(session)?);
        }
        Self::read(request.send()?)
    }

    /// POST a form with the session cookie
    pub fn post_form(
        &self,
        segments: &[&str],
        session: &str,
        form: &[(&str, &str)],
    ) -> Result<Fetched, TransportError> {
        let url = self.url(segments)?;
        debug!(method = "POST", path = url.path(), "sending request");

        let response = self
            .client
            .post(url)
            .header(COOKIE, Self::cookie_header(session)?)
            .form(form)
            .send()?;
        Self::read(response)
    }

    fn read(response: reqwest::blocking::Response) -> Result<Fetched, TransportError> {
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "non-success response");
            return Err(TransportError::Status(status));
        }
        let body = response.text().map_err(|_| TransportError::Encoding)?;
        Ok(Fetched { status, body })
    }
}
