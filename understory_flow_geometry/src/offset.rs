// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset correction: keep the leftmost block from spilling past the canvas's left edge.
//!
//! The correction is a single horizontal shift applied to every block.
//! Once applied, the leftmost edge sits at `visible_left + margin`, so a second evaluation
//! with no intervening change yields no further shift.

/// Leftmost block edge over `(center_x, width)` pairs, or `None` when empty.
pub fn leftmost_edge<I>(blocks: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    blocks
        .into_iter()
        .map(|(x, width)| x - width / 2.0)
        .reduce(f64::min)
}

/// Overflow smaller than this is treated as rounding noise from a previous shift.
pub const OVERFLOW_TOLERANCE: f64 = 1e-9;

/// Shift that moves `leftmost` to `visible_left + margin`, if `leftmost` overflows.
///
/// Negative margins are treated as zero.
pub fn overflow_shift(leftmost: f64, visible_left: f64, margin: f64) -> Option<f64> {
    (leftmost < visible_left - OVERFLOW_TOLERANCE).then(|| visible_left + margin.max(0.0) - leftmost)
}
