pub mod config;
pub mod error;
pub mod loader;
pub mod playback;
pub mod source;
pub mod store;
pub mod subtitle;

pub use config::{Config, LineJoin};
pub use error::{CaptionError, Result};
pub use loader::SubtitleLoader;
pub use playback::{CaptionChange, CaptionTracker};
pub use store::CaptionStore;
pub use subtitle::{parse, Cue, CueExtractor, CueParser, FnParser, ParseOptions};
