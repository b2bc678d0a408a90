use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Invalid subtitle source: {0}")]
    InvalidSourceReference(String),

    #[error("Fetching subtitles failed: {0}")]
    RetrievalFailure(String),

    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Subtitle document contains no cues")]
    EmptyResult,

    #[error("Invalid playback time: {0} (expected a finite, non-negative number of seconds)")]
    InvalidQueryArgument(f64),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CaptionError>;
