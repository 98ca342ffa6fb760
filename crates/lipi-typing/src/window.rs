//! Where the raw key buffer can be cut.
//!
//! Cutting at token `k` commits everything rendered before `k` and keeps
//! keys `k..` for re-rendering. A cut is safe when rendering the kept keys
//! on their own yields exactly the tail of the full rendering from `k`:
//!
//! - no token before `k` may still grow (so `k` never passes the first open
//!   token), and
//! - the renderer must enter `k` with nothing waiting, or `k` must start
//!   with a consonant, which closes the waiting one before its own output.

use lipi_core::engine::{Rendering, Segment};

/// Index of the latest safe cut. `segments.len()` means the whole buffer
/// is final.
///
/// No cut lands inside or after an open token, so the kept keys can hold
/// one token still growing plus the closed token that waits on it: up to
/// twice the longest typing input of the script.
pub(crate) fn safe_cut(rendering: &Rendering) -> usize {
    let segments: &[Segment] = &rendering.segments;
    let n = segments.len();
    let first_open = segments.iter().position(|s| s.open).unwrap_or(n);
    if first_open == n && !rendering.pending_at_end {
        return n;
    }
    if n == 0 {
        return 0;
    }
    (1..=first_open.min(n - 1))
        .rev()
        .find(|&k| {
            let s = &segments[k];
            s.neutral_before || (s.starts_with_consonant && k < first_open)
        })
        .unwrap_or(0)
}
