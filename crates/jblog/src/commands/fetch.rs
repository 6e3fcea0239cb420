//! `jblog fetch` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use jblog_config::{CliSettings, Config};
use jblog_markdown::MarkdownRenderer;
use jblog_retry::{RetryOptions, is_transient_error, retry};
use ureq::Agent;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fetch command.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Absolute URL, or path relative to the configured API base URL.
    path: String,

    /// Blog API base URL (overrides config).
    #[arg(long, env = "JBLOG_API_URL")]
    api_url: Option<String>,

    /// Retries after the first attempt (overrides config).
    #[arg(long)]
    max_retries: Option<u32>,

    /// Print the response body instead of rendering it.
    #[arg(long)]
    raw: bool,

    /// Path to configuration file (default: auto-discover jblog.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Error from a single fetch attempt.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FetchError {
    /// Request failed before a response arrived (DNS, connect, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    /// Server answered with an error status.
    #[error("HTTP error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Blocking request task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Task(String),
}

impl FetchError {
    /// Rate limiting and server errors are retried along with network failures.
    fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Task(_) => false,
            Self::Http(_) => is_transient_error(self),
        }
    }
}

impl FetchArgs {
    /// Execute the fetch command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or every attempt fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            api_url: self.api_url.clone(),
            max_retries: self.max_retries,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let url = resolve_url(&config.api.base_url, &self.path);
        let agent = create_agent(config.api.timeout());
        let options = RetryOptions::new()
            .max_retries(config.retry.max_retries)
            .delay(config.retry.delay())
            .backoff(config.retry.backoff)
            .retry_if(FetchError::is_transient)
            .on_retry(|err: &FetchError, attempt| {
                Output::new().warning(&format!("{err}; retrying (attempt {attempt})"));
            });

        tracing::info!(url = %url, "Fetching post");
        let body = retry(
            || {
                let agent = agent.clone();
                let url = url.clone();
                async move {
                    tokio::task::spawn_blocking(move || get(&agent, &url))
                        .await
                        .map_err(|e| FetchError::Task(e.to_string()))?
                }
            },
            options,
        )
        .await?;

        let text = if self.raw {
            body
        } else {
            MarkdownRenderer::with_options(config.render).render(&body)
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

/// Create an HTTP agent that reports error statuses as responses.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Perform one GET request and return the body of a successful response.
fn get(agent: &Agent, url: &str) -> Result<String, FetchError> {
    let response = agent.get(url).header("Accept", "text/markdown, text/plain").call()?;

    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(FetchError::Status { status, body });
    }

    Ok(body_reader.read_to_string()?)
}

/// Join `path` to `base_url` unless it is already an absolute URL.
fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
