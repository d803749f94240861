//! OCLC stanza source lookup
//!
//! Stanzas copied from the OCLC knowledge base are usually annotated with a
//! comment of the form:
//!
//! ```text
//! # Source - https://help.oclc.org/Library_Management/EZproxy/Database_stanzas/Docuseek2
//! ```
//!
//! The page behind that URL holds the current version of the stanza inside a
//! `<pre>` block. Its Title line is compared against the local Title to spot
//! stanzas that have fallen behind upstream.

use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// The only host Source comments may point at.
pub const OCLC_HOST: &str = "help.oclc.org";

/// How long to wait for the OCLC website before giving up.
pub const OCLC_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay after each request so a large config doesn't hammer the site.
pub const OCLC_REQUEST_DELAY: Duration = Duration::from_millis(300);

/// Prefix identifying a Source comment.
pub const SOURCE_PREFIX: &str = "# Source - ";

static PRE: Lazy<Selector> = Lazy::new(|| Selector::parse("pre").expect("valid pre selector"));

/// Why a Source comment could not be checked.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source line is malformed")]
    Malformed,

    #[error("{0}")]
    Url(#[from] url::ParseError),

    #[error("source line isn't using https")]
    NotHttps,

    #[error("source line isn't pointing to OCLC")]
    NotOclc,

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("OCLC returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unable to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Validate a `# Source - <url>` comment and return its URL.
pub fn parse_source_line(line: &str) -> Result<Url, SourceError> {
    let parts: Vec<&str> = line.split(' ').collect();
    if parts.len() != 4 {
        return Err(SourceError::Malformed);
    }
    let url = Url::parse(parts[3])?;
    if url.scheme() != "https" {
        return Err(SourceError::NotHttps);
    }
    if url.host_str() != Some(OCLC_HOST) {
        return Err(SourceError::NotOclc);
    }
    Ok(url)
}

/// Resolves the upstream Title for a Source URL.
pub trait TitleLookup {
    /// `Ok(None)` when the page was fetched but carries no Title line.
    fn expected_title(&self, url: &Url) -> Result<Option<String>, SourceError>;
}

/// Fetches stanza pages from the OCLC website.
pub struct OclcClient {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl OclcClient {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ezproxy-config-lint/", env!("CARGO_PKG_VERSION")))
            .timeout(OCLC_HTTP_TIMEOUT)
            .build()?;
        // The processor is synchronous; a small runtime drives each request.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceError::Runtime)?;
        Ok(Self { client, runtime })
    }

    async fn fetch(&self, url: &Url) -> Result<String, SourceError> {
        tracing::info!("Fetching OCLC stanza source from: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;

        tokio::time::sleep(OCLC_REQUEST_DELAY).await;
        Ok(body)
    }
}

impl TitleLookup for OclcClient {
    fn expected_title(&self, url: &Url) -> Result<Option<String>, SourceError> {
        let body = self.runtime.block_on(self.fetch(url))?;
        let title = title_from_html(&body);
        if title.is_none() {
            tracing::warn!("No Title line found in stanza source at {}", url);
        }
        Ok(title)
    }
}

/// Find the Title of the first stanza shown in a `<pre>` block.
///
/// Only a `<pre>` whose first child is a text node is considered; a block
/// that starts with a child element is skipped.
pub fn title_from_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&PRE)
        .filter_map(|pre| pre.first_child())
        .filter_map(|child| child.value().as_text().map(|text| text.to_string()))
        .find_map(|text| {
            text.lines().find_map(|line| {
                line.strip_prefix("Title ")
                    .or_else(|| line.strip_prefix("T "))
                    .map(|title| title.trim().to_string())
            })
        })
}
