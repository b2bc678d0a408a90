// WebVTT output
use super::timestamp::format_timestamp;
use super::{Cue, SubtitleFormatter};

pub struct VttFormatter;

impl SubtitleFormatter for VttFormatter {
    fn format(&self, cues: &[Cue]) -> String {
        let mut output = String::from("WEBVTT\n\n");

        for cue in cues {
            output.push_str(&format!(
                "{} --> {}\n{}\n\n",
                format_timestamp(cue.start(), '.'),
                format_timestamp(cue.end(), '.'),
                cue.payload()
            ));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "vtt"
    }
}
