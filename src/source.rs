use crate::config::Config;
use crate::error::{CaptionError, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::path::PathBuf;
use tracing::debug;

/// Where subtitle documents come from.
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Check a locator without fetching it.
    fn validate(&self, location: &str) -> Result<()>;
    async fn fetch(&self, location: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Only `http` and `https` URLs are accepted.
pub fn validate_http_url(location: &str) -> Result<Url> {
    let url = Url::parse(location)
        .map_err(|e| CaptionError::InvalidSourceReference(format!("{}: {}", location, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(CaptionError::InvalidSourceReference(format!(
            "{}: unsupported scheme '{}'",
            location, scheme
        ))),
    }
}

/// Fetches subtitle documents over HTTP(S).
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build a client honoring the configured timeout and user agent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.request_timeout());
        if let Some(ref agent) = config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubtitleSource for HttpSource {
    fn validate(&self, location: &str) -> Result<()> {
        validate_http_url(location).map(|_| ())
    }

    async fn fetch(&self, location: &str) -> Result<String> {
        let url = validate_http_url(location)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CaptionError::RetrievalFailure(e.to_string()))?;

        let status = response.status();
        debug!("Subtitle fetch {} -> {}", location, status);

        if !status.is_success() {
            return Err(CaptionError::RetrievalFailure(format!(
                "{} returned {}",
                location, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| CaptionError::RetrievalFailure(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Reads subtitle documents from the local filesystem.
#[derive(Debug, Default)]
pub struct FileSource;

impl FileSource {
    fn path_of(location: &str) -> Result<PathBuf> {
        if location.starts_with("file:") {
            let url = Url::parse(location)
                .map_err(|e| CaptionError::InvalidSourceReference(format!("{}: {}", location, e)))?;
            url.to_file_path().map_err(|_| {
                CaptionError::InvalidSourceReference(format!("{}: not a local path", location))
            })
        } else if location.is_empty() {
            Err(CaptionError::InvalidSourceReference(
                "empty path".to_string(),
            ))
        } else {
            Ok(PathBuf::from(location))
        }
    }
}

#[async_trait]
impl SubtitleSource for FileSource {
    fn validate(&self, location: &str) -> Result<()> {
        Self::path_of(location).map(|_| ())
    }

    async fn fetch(&self, location: &str) -> Result<String> {
        let path = Self::path_of(location)?;
        debug!("Reading subtitles from {}", path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CaptionError::RetrievalFailure(format!("{}: {}", path.display(), e)))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Pick a source for a locator: HTTP(S) URLs go over the network, `file:`
/// URLs and plain paths are read from disk, other URL schemes are rejected.
pub fn open_source(location: &str, config: &Config) -> Result<Box<dyn SubtitleSource>> {
    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Box::new(HttpSource::from_config(config)?)),
            "file" => Ok(Box::new(FileSource)),
            // Windows drive letters parse as one-letter schemes.
            scheme if scheme.len() == 1 => Ok(Box::new(FileSource)),
            scheme => Err(CaptionError::InvalidSourceReference(format!(
                "{}: unsupported scheme '{}'",
                location, scheme
            ))),
        },
        Err(_) => Ok(Box::new(FileSource)),
    }
}
