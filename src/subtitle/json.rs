// JSON output
use super::timestamp::format_timestamp;
use super::{Cue, SubtitleFormatter};
use serde::Serialize;

#[derive(Default)]
pub struct JsonFormatter {
    pub source: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    metadata: JsonMetadata<'a>,
    cues: Vec<JsonCue<'a>>,
}

#[derive(Serialize)]
struct JsonMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    cue_count: usize,
}

#[derive(Serialize)]
struct JsonCue<'a> {
    index: usize,
    start: f64,
    end: f64,
    start_formatted: String,
    end_formatted: String,
    payload: &'a str,
}

impl SubtitleFormatter for JsonFormatter {
    fn format(&self, cues: &[Cue]) -> String {
        let output = JsonOutput {
            metadata: JsonMetadata {
                source: self.source.as_deref(),
                cue_count: cues.len(),
            },
            cues: cues
                .iter()
                .enumerate()
                .map(|(i, cue)| JsonCue {
                    index: i + 1,
                    start: cue.start(),
                    end: cue.end(),
                    start_formatted: format_timestamp(cue.start(), '.'),
                    end_formatted: format_timestamp(cue.end(), '.'),
                    payload: cue.payload(),
                })
                .collect(),
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
