// SRT output
use super::timestamp::format_timestamp;
use super::{Cue, SubtitleFormatter};

pub struct SrtFormatter;

impl SubtitleFormatter for SrtFormatter {
    fn format(&self, cues: &[Cue]) -> String {
        cues.iter()
            .enumerate()
            .map(|(i, cue)| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    i + 1,
                    format_timestamp(cue.start(), ','),
                    format_timestamp(cue.end(), ','),
                    cue.payload()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn extension(&self) -> &'static str {
        "srt"
    }
}
