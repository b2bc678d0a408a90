use crate::error::{CaptionError, Result};
use crate::subtitle::Cue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Holds the active cue sequence for one subtitle track and answers
/// "which cue is showing at time T".
///
/// Cues are kept in document order; nothing assumes they are sorted by time.
/// Lookups remember the index of the last hit so that a playback clock moving
/// forward finds the next cue in a step or two, and fall back to scanning the
/// rest of the sequence on seeks.
///
/// `load` and `clear` take `&mut self`, so there is a single writer. Readers
/// that need to outlive a reload can hold a [`CaptionStore::snapshot`].
#[derive(Debug)]
pub struct CaptionStore {
    cues: Arc<[Cue]>,
    cursor: AtomicUsize,
}

impl Default for CaptionStore {
    fn default() -> Self {
        Self {
            cues: Arc::from(Vec::new()),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl CaptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cue sequence and reset the cursor.
    pub fn load(&mut self, cues: Vec<Cue>) {
        debug!("Installing {} cues", cues.len());
        self.cues = cues.into();
        *self.cursor.get_mut() = 0;
    }

    /// Drop all cues, returning to the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// An immutable handle on the current sequence, unaffected by later loads.
    pub fn snapshot(&self) -> Arc<[Cue]> {
        Arc::clone(&self.cues)
    }

    /// The cue covering `time`, if any.
    pub fn active_cue_at(&self, time: f64) -> Result<Option<&Cue>> {
        let index = self.active_index_at(time)?;
        Ok(index.map(|i| &self.cues[i]))
    }

    /// The caption text at `time`, or `""` when no cue covers it.
    pub fn caption_at(&self, time: f64) -> Result<&str> {
        Ok(self.active_cue_at(time)?.map(Cue::payload).unwrap_or(""))
    }

    fn active_index_at(&self, time: f64) -> Result<Option<usize>> {
        validate_time(time)?;

        let cursor = self.cursor.load(Ordering::Relaxed);
        let found = find_active(&self.cues, cursor, time);
        if let Some(index) = found {
            self.cursor.store(index, Ordering::Relaxed);
        }
        Ok(found)
    }
}

/// Playback times must be finite and non-negative.
pub fn validate_time(time: f64) -> Result<()> {
    if time.is_finite() && time >= 0.0 {
        Ok(())
    } else {
        Err(CaptionError::InvalidQueryArgument(time))
    }
}

/// Find the index of the first cue covering `time`, scanning from `cursor`
/// to the end and then from the start up to `cursor`.
///
/// An out-of-range cursor is treated as 0.
pub fn find_active(cues: &[Cue], cursor: usize, time: f64) -> Option<usize> {
    let cursor = if cursor >= cues.len() { 0 } else { cursor };

    cues[cursor..]
        .iter()
        .position(|cue| cue.is_active_at(time))
        .map(|offset| cursor + offset)
        .or_else(|| cues[..cursor].iter().position(|cue| cue.is_active_at(time)))
}
