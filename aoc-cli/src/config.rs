//! Configuration resolution from CLI args and the environment

use crate::cli::Args;
use crate::error::CliError;
use aoc_client::AocClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zeroize::Zeroizing;

/// Environment variable holding the session cookie
pub const SESSION_ENV: &str = "AOC_SESSION";

/// Resolved runtime configuration
pub struct Config {
    /// Site to talk to
    pub base_url: String,
    /// HTTP timeout
    pub timeout: Duration,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Config {
            base_url: args.base_url.clone(),
            timeout: Duration::from_secs(args.timeout),
            quiet: args.quiet,
        }
    }

    /// Build the HTTP client; it shares the process-wide cooldown gate
    pub fn client(&self) -> Result<AocClient, CliError> {
        let client = AocClient::builder()
            .base_url(self.base_url.as_str())?
            .client_builder(
                reqwest::blocking::Client::builder()
                    .timeout(self.timeout)
                    .use_rustls_tls(),
            )
            .build()?;
        Ok(client)
    }
}

/// Expand ~ to home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

/// Session from the environment, or prompted for when absent
pub fn resolve_session() -> Result<Zeroizing<String>, CliError> {
    match std::env::var(SESSION_ENV) {
        Ok(s) if !s.trim().is_empty() => Ok(Zeroizing::new(s.trim().to_string())),
        _ => prompt_session(&format!(
            "{} is not set; a session token is required for this command",
            SESSION_ENV
        )),
    }
}

/// Prompt user for session token
pub fn prompt_session(reason: &str) -> Result<Zeroizing<String>, CliError> {
    eprintln!("{}", reason);
    let s = Zeroizing::new(
        rpassword::prompt_password("Enter AOC session key: ")
            .map_err(|e| CliError::Config(format!("Failed to read session: {}", e)))?,
    );
    if s.trim().is_empty() {
        return Err(CliError::Config("Session token is required.".to_string()));
    }
    Ok(Zeroizing::new(s.trim().to_string()))
}
