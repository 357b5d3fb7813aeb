//! Play queue with a cursor
//!
//! The queue is an ordered list of tracks plus the index of the track that
//! owns (or last owned) the audio session. It is ephemeral and lives only in
//! the engine.

use crate::shuffle::random_index;
use crate::types::RepeatMode;
use rand::Rng;
use soundkit_core::Track;
use std::sync::Arc;

/// Cursor movement requested by next/previous
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the queue
    Forward,

    /// Towards the start of the queue
    Backward,
}

/// Ordered tracks plus cursor
///
/// Invariant: `current_index < tracks.len()` whenever the queue is non-empty.
/// The track list sits behind an `Arc` so snapshots can share it; mutations
/// go through `Arc::make_mut`.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Arc<Vec<Track>>,
    current_index: usize,
}

impl Queue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tracks and reset the cursor
    ///
    /// `start_index` past the end is clamped to the last track.
    pub fn set(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.current_index = start_index.min(tracks.len().saturating_sub(1));
        self.tracks = Arc::new(tracks);
    }

    /// Shared handle to the track list
    pub fn tracks(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.tracks)
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// Cursor position (0 for an empty queue)
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Move the cursor
    ///
    /// Returns false (and leaves the cursor alone) when `index` is out of bounds
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Remove the track at `index`
    ///
    /// A removal before the cursor shifts the cursor down so it keeps pointing
    /// at the same track. Removing the cursor's own slot leaves the cursor on
    /// whatever slid into place, clamped to the new end.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }

        let removed = Arc::make_mut(&mut self.tracks).remove(index);

        if index < self.current_index {
            self.current_index -= 1;
        }
        self.current_index = self
            .current_index
            .min(self.tracks.len().saturating_sub(1));

        Some(removed)
    }

    /// Index the cursor would move to
    ///
    /// With shuffle on, any index may be chosen (see [`random_index`]).
    /// Otherwise the cursor steps by one and only wraps at either end under
    /// [`RepeatMode::All`]; `None` means "stay put".
    pub fn step<R: Rng + ?Sized>(
        &self,
        direction: Direction,
        shuffle: bool,
        repeat: RepeatMode,
        rng: &mut R,
    ) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        if shuffle {
            return random_index(len, rng);
        }

        match direction {
            Direction::Forward => {
                let next = self.current_index + 1;
                if next < len {
                    Some(next)
                } else if repeat == RepeatMode::All {
                    Some(0)
                } else {
                    None
                }
            }
            Direction::Backward => {
                if self.current_index > 0 {
                    Some(self.current_index - 1)
                } else if repeat == RepeatMode::All {
                    Some(len - 1)
                } else {
                    None
                }
            }
        }
    }
}
