use crate::error::{CaptionError, Result};
use crate::source::SubtitleSource;
use crate::store::CaptionStore;
use crate::subtitle::{CueExtractor, CueParser, ParseOptions};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Fetches a subtitle document, parses it and installs the cues in a store.
///
/// A load either installs a complete, non-empty cue sequence or leaves the
/// store empty. A rejected locator leaves the store untouched.
pub struct SubtitleLoader {
    source: Box<dyn SubtitleSource>,
    parser: Box<dyn CueParser>,
}

impl SubtitleLoader {
    /// Create a loader using the built-in extractor with default options.
    pub fn new(source: Box<dyn SubtitleSource>) -> Self {
        Self {
            source,
            parser: Box::new(CueExtractor::default()),
        }
    }

    pub fn with_options(self, options: ParseOptions) -> Self {
        self.with_parser(CueExtractor::new(options))
    }

    /// Replace the built-in extractor with a caller-supplied parser.
    pub fn with_parser(mut self, parser: impl CueParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn parser_name(&self) -> &'static str {
        self.parser.name()
    }

    /// Fetch `location` and install its cues into `store`, returning the cue count.
    pub async fn load(&self, location: &str, store: &mut CaptionStore) -> Result<usize> {
        self.source.validate(location)?;

        store.clear();
        debug!("Fetching subtitles from {} via {}", location, self.source.name());

        let text = self.source.fetch(location).await.map_err(|e| {
            warn!("Fetching subtitles failed: {}", e);
            match e {
                e @ (CaptionError::RetrievalFailure(_)
                | CaptionError::InvalidSourceReference(_)) => e,
                other => CaptionError::RetrievalFailure(other.to_string()),
            }
        })?;

        self.load_text(&text, store)
    }

    /// Parse already-retrieved text into `store`.
    pub fn load_text(&self, text: &str, store: &mut CaptionStore) -> Result<usize> {
        store.clear();

        let cues = self.parser.parse(text).inspect_err(|e| {
            warn!("Parsing subtitles with {} failed: {}", self.parser.name(), e);
        })?;

        if cues.is_empty() {
            warn!("Subtitle document produced no cues");
            return Err(CaptionError::EmptyResult);
        }

        let count = cues.len();
        store.load(cues);
        info!("Loaded {} cues", count);
        Ok(count)
    }

    /// Load several tracks concurrently, one store per locator.
    pub async fn load_all(&self, locations: &[&str]) -> Vec<Result<CaptionStore>> {
        let loads = locations.iter().map(|location| async move {
            let mut store = CaptionStore::new();
            self.load(location, &mut store).await.map(|_| store)
        });

        join_all(loads).await
    }
}
