pub mod extract;
pub mod json;
pub mod markup;
pub mod srt;
pub mod timestamp;
pub mod vtt;

pub use extract::{parse, CueExtractor};
pub use markup::strip_markup;
pub use timestamp::{decode_timestamp, format_timestamp};

use crate::config::{LineJoin, OutputFormat};
use crate::error::Result;

/// A single timed caption. Times are seconds from the start of playback.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    start: f64,
    end: f64,
    payload: String,
}

impl Cue {
    pub fn new(start: f64, end: f64, payload: impl Into<String>) -> Self {
        Self {
            start,
            end,
            payload: payload.into(),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Whether `time` falls in the half-open interval `[start, end)`.
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Options for the built-in cue extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub strip_markup: bool,
    pub line_join: LineJoin,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_markup: true,
            line_join: LineJoin::default(),
        }
    }
}

/// Turns a raw subtitle document into an ordered cue sequence.
pub trait CueParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Vec<Cue>>;
    fn name(&self) -> &'static str;
}

/// Adapts a caller-supplied function into a [`CueParser`].
pub struct FnParser<F>(F);

impl<F> FnParser<F>
where
    F: Fn(&str) -> Vec<Cue> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> CueParser for FnParser<F>
where
    F: Fn(&str) -> Vec<Cue> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Result<Vec<Cue>> {
        Ok((self.0)(raw))
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Renders a cue list as a subtitle document.
///
/// Payloads are written verbatim. A payload line that is a bare integer, or
/// that contains `-->`, does not survive a reparse of SRT/VTT output: the
/// first is dropped as a cue counter, the second is read as a boundary line.
pub trait SubtitleFormatter {
    fn format(&self, cues: &[Cue]) -> String;
    fn extension(&self) -> &'static str;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn SubtitleFormatter> {
    match format {
        OutputFormat::Srt => Box::new(srt::SrtFormatter),
        OutputFormat::Vtt => Box::new(vtt::VttFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter::default()),
    }
}
