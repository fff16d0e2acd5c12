// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attachment hit-testing: which placed block would a dragged item snap under?
//!
//! ## Region
//!
//! A block centered at `(x, y)` with size `w × h` accepts a drop point when
//!
//! ```text
//! x - w/2 - padding_x <= px <= x + w/2 + padding_x
//! y - h/2             <= py <= y + h
//! ```
//!
//! Horizontally the region is the block widened by the sibling gap on both sides.
//! Vertically it runs from the block's top edge to half a block-height below its bottom edge,
//! which is where a dragged item hovers when it is about to become a child.
//! Both intervals are closed.
//!
//! ## Tie-break
//!
//! Candidates are tested in the order given and the **first** match wins.
//! There is no distance ranking; callers control priority through iteration order
//! (the block registry yields its blocks in insertion order).

use kurbo::{Point, Rect, Size};

/// Which point of the dragged item is tested against attach regions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DropPoint {
    /// The dragged item's center.
    #[default]
    Center,
    /// The midpoint of the dragged item's top edge.
    TopCenter,
}

impl DropPoint {
    /// Returns the drop point for a dragged item occupying `rect`.
    pub fn point(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            Self::Center => center,
            Self::TopCenter => Point::new(center.x, rect.y0),
        }
    }
}

/// A block considered by [`first_attachment`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate<K> {
    /// Caller key returned on a match.
    pub key: K,
    /// Block center.
    pub center: Point,
    /// Block size.
    pub size: Size,
}

/// Returns the attach region of a block centered at `center`.
pub fn attach_region(center: Point, size: Size, padding_x: f64) -> Rect {
    let half_width = size.width / 2.0;
    Rect::new(
        center.x - half_width - padding_x,
        center.y - size.height / 2.0,
        center.x + half_width + padding_x,
        center.y + size.height,
    )
}

/// Returns `true` if `point` lies in the attach region of the given block.
pub fn attaches(point: Point, center: Point, size: Size, padding_x: f64) -> bool {
    let region = attach_region(center, size, padding_x);
    // `Rect::contains` is half-open; both far edges attach here.
    point.x >= region.x0 && point.x <= region.x1 && point.y >= region.y0 && point.y <= region.y1
}

/// Returns the key of the first candidate whose attach region holds `point`.
pub fn first_attachment<K, I>(point: Point, candidates: I, padding_x: f64) -> Option<K>
where
    I: IntoIterator<Item = Candidate<K>>,
{
    candidates
        .into_iter()
        .find(|c| attaches(point, c.center, c.size, padding_x))
        .map(|c| c.key)
}
