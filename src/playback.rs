use crate::error::Result;
use crate::store::CaptionStore;
use crate::subtitle::Cue;
use std::time::{Duration, Instant};

/// What a caption display should do after a clock tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionChange {
    Show(String),
    Hide,
}

/// Remembers the caption last shown and reports only transitions.
#[derive(Debug, Default)]
pub struct CaptionTracker {
    previous: String,
}

impl CaptionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query `store` at `time`; `None` means the display is already up to date.
    pub fn update(&mut self, store: &CaptionStore, time: f64) -> Result<Option<CaptionChange>> {
        let current = store.caption_at(time)?;
        if current == self.previous {
            return Ok(None);
        }

        self.previous = current.to_string();
        if current.is_empty() {
            Ok(Some(CaptionChange::Hide))
        } else {
            Ok(Some(CaptionChange::Show(current.to_string())))
        }
    }

    /// The caption currently on screen (empty when hidden).
    pub fn previous(&self) -> &str {
        &self.previous
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

/// Wall-clock driven playback position.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    origin: Instant,
    from: f64,
    rate: f64,
}

impl PlaybackClock {
    /// Start at `from` seconds, advancing `rate` media seconds per real second.
    pub fn start(from: f64, rate: f64) -> Self {
        Self {
            origin: Instant::now(),
            from,
            rate,
        }
    }

    pub fn position_after(&self, elapsed: Duration) -> f64 {
        self.from + elapsed.as_secs_f64() * self.rate
    }

    pub fn position(&self) -> f64 {
        self.position_after(self.origin.elapsed())
    }
}

/// Latest end time in the sequence, 0 when empty.
pub fn track_end(cues: &[Cue]) -> f64 {
    cues.iter().map(Cue::end).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CaptionStore {
        let mut store = CaptionStore::new();
        store.load(vec![
            Cue::new(1.0, 4.0, "Hello world"),
            Cue::new(4.0, 5.0, "Hello world"),
            Cue::new(5.0, 7.5, "Next"),
        ]);
        store
    }

    #[test]
    fn test_reports_transitions_only() {
        let store = store();
        let mut tracker = CaptionTracker::new();

        assert_eq!(tracker.update(&store, 0.5).unwrap(), None);
        assert_eq!(
            tracker.update(&store, 1.0).unwrap(),
            Some(CaptionChange::Show("Hello world".to_string()))
        );
        assert_eq!(tracker.update(&store, 2.0).unwrap(), None);
        // Adjacent cues with identical text do not flicker.
        assert_eq!(tracker.update(&store, 4.5).unwrap(), None);
        assert_eq!(
            tracker.update(&store, 6.0).unwrap(),
            Some(CaptionChange::Show("Next".to_string()))
        );
        assert_eq!(tracker.update(&store, 8.0).unwrap(), Some(CaptionChange::Hide));
        assert_eq!(tracker.previous(), "");
    }

    #[test]
    fn test_reset() {
        let store = store();
        let mut tracker = CaptionTracker::new();

        tracker.update(&store, 2.0).unwrap();
        assert_eq!(tracker.previous(), "Hello world");

        tracker.reset();
        assert!(tracker.update(&store, 2.0).unwrap().is_some());
    }

    #[test]
    fn test_invalid_time_keeps_state() {
        let store = store();
        let mut tracker = CaptionTracker::new();
        tracker.update(&store, 2.0).unwrap();

        assert!(tracker.update(&store, f64::NAN).is_err());
        assert_eq!(tracker.previous(), "Hello world");
    }

    #[test]
    fn test_clock_position() {
        let clock = PlaybackClock::start(10.0, 2.0);
        assert_eq!(clock.position_after(Duration::from_millis(1500)), 13.0);
        assert!(clock.position() >= 10.0);
    }

    #[test]
    fn test_track_end() {
        assert_eq!(track_end(store().cues()), 7.5);
        assert_eq!(track_end(&[]), 0.0);
    }
}
