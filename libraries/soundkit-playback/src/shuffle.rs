//! Shuffle index selection
//!
//! Shuffle does not reorder the queue. It only decides where the cursor jumps
//! on next/previous.

use rand::Rng;

/// Pick a uniformly random queue index
///
/// The whole queue is eligible, the current index included, so the same track
/// can be picked twice in a row. Returns `None` for an empty queue.
pub fn random_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}
