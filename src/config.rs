use crate::error::{CaptionError, Result};
use crate::subtitle::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the lines of a multi-line cue payload are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Newline,
    Space,
}

impl LineJoin {
    pub fn separator(&self) -> &'static str {
        match self {
            LineJoin::Newline => "\n",
            LineJoin::Space => " ",
        }
    }
}

impl std::fmt::Display for LineJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineJoin::Newline => write!(f, "newline"),
            LineJoin::Space => write!(f, "space"),
        }
    }
}

impl std::str::FromStr for LineJoin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newline" => Ok(LineJoin::Newline),
            "space" => Ok(LineJoin::Space),
            _ => Err(format!("Unknown line join: {}. Use 'newline' or 'space'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Srt,
    Vtt,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(OutputFormat::Srt),
            "vtt" => Ok(OutputFormat::Vtt),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Use 'srt', 'vtt', or 'json'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remove `<...>` tags from cue payloads.
    pub strip_markup: bool,
    pub line_join: LineJoin,
    /// Timeout for HTTP retrieval, in seconds.
    pub request_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip_markup: true,
            line_join: LineJoin::default(),
            request_timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Read a config file. A missing file yields defaults; a file that exists
    /// but cannot be read or parsed is a `Config` error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CaptionError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str::<Config>(&contents)
            .map_err(|e| CaptionError::Config(format!("Cannot parse {}: {}", path.display(), e)))
    }

    fn apply_env(&mut self) {
        if let Ok(strip) = std::env::var("SUBCUE_STRIP_MARKUP") {
            if let Ok(s) = strip.parse() {
                self.strip_markup = s;
            }
        }
        if let Ok(join) = std::env::var("SUBCUE_LINE_JOIN") {
            if let Ok(j) = join.parse() {
                self.line_join = j;
            }
        }
        if let Ok(timeout) = std::env::var("SUBCUE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.request_timeout_secs = t;
            }
        }
        if let Ok(agent) = std::env::var("SUBCUE_USER_AGENT") {
            self.user_agent = Some(agent);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(CaptionError::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strip_markup: self.strip_markup,
            line_join: self.line_join,
        }
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subcue").join("config.toml"))
    }
}
