use super::markup::strip_markup;
use super::timestamp::decode_timestamp;
use super::{Cue, CueParser, ParseOptions};
use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Separator between start and end on a boundary line, with any space/tab run around it.
static ARROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*-->[ \t]*").expect("Invalid regex"));

const ARROW: &str = "-->";
const HEADER: &str = "WEBVTT";

/// The built-in WebVTT/SRT cue extractor.
#[derive(Debug, Clone, Default)]
pub struct CueExtractor {
    options: ParseOptions,
}

impl CueExtractor {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl CueParser for CueExtractor {
    fn parse(&self, raw: &str) -> Result<Vec<Cue>> {
        parse(raw, &self.options)
    }

    fn name(&self) -> &'static str {
        "webvtt/srt"
    }
}

/// A boundary line that has been seen, with the payload lines collected so far.
struct PendingCue<'a> {
    start: f64,
    end: f64,
    lines: Vec<&'a str>,
}

impl PendingCue<'_> {
    fn finish(self, options: &ParseOptions) -> Cue {
        let payload = if options.strip_markup {
            self.lines
                .iter()
                .map(|line| strip_markup(line))
                .collect::<Vec<_>>()
                .join(options.line_join.separator())
        } else {
            self.lines.join(options.line_join.separator())
        };
        Cue::new(self.start, self.end, payload)
    }
}

/// Parse a WebVTT or SRT document into cues, in document order.
///
/// Text before the first boundary line is ignored. A boundary with no text
/// after it still yields a cue with an empty payload. Any malformed timestamp
/// fails the whole parse. An empty result is not an error here.
pub fn parse(document: &str, options: &ParseOptions) -> Result<Vec<Cue>> {
    let normalized = normalize(document);

    let mut cues = Vec::new();
    let mut pending: Option<PendingCue<'_>> = None;
    let mut skipped = 0usize;

    for line in normalized.split('\n').map(str::trim).filter(|l| is_semantic(l)) {
        if line.contains(ARROW) {
            let (start, end) = decode_boundary(line)?;
            if let Some(cue) = pending.take() {
                cues.push(cue.finish(options));
            }
            pending = Some(PendingCue {
                start,
                end,
                lines: Vec::new(),
            });
        } else if let Some(cue) = pending.as_mut() {
            cue.lines.push(line);
        } else {
            skipped += 1;
        }
    }

    if let Some(cue) = pending {
        cues.push(cue.finish(options));
    }

    debug!(
        "Extracted {} cues ({} header lines skipped)",
        cues.len(),
        skipped
    );
    Ok(cues)
}

/// Trim, unify line endings to `\n` and drop a leading `WEBVTT` header line.
fn normalize(document: &str) -> String {
    let text = document
        .trim_start_matches('\u{feff}')
        .trim()
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let first_line = text.split('\n').next().unwrap_or_default().trim_end();
    if is_header(first_line) {
        text[first_line.len()..].trim_start().to_string()
    } else {
        text
    }
}

fn is_header(line: &str) -> bool {
    match line.strip_prefix(HEADER) {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t']),
        None => false,
    }
}

/// Blank lines and bare cue counters carry no meaning in either format.
fn is_semantic(line: &str) -> bool {
    !line.is_empty() && !line.bytes().all(|b| b.is_ascii_digit())
}

fn decode_boundary(line: &str) -> Result<(f64, f64)> {
    let mut sides = ARROW_RE.splitn(line, 2);
    let start = decode_timestamp(sides.next().unwrap_or_default())?;
    let end = decode_timestamp(sides.next().unwrap_or_default())?;
    Ok((start, end))
}
