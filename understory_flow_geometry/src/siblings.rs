// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling row arithmetic for centered tree layout.
//!
//! A child occupies its **lay-width**: the larger of its own width and the width of its subtree.
//! The children of one parent form a row whose span is the sum of their lay-widths plus
//! `padding_x` between neighbors. The row is centered under the parent and filled left to right.

/// Horizontal footprint of a block inside its parent's row.
#[inline]
pub fn lay_width(width: f64, child_width: f64) -> f64 {
    width.max(child_width)
}

/// Total span of a row of siblings with the given lay-widths.
///
/// Returns `0.0` for an empty row.
pub fn row_span<I>(lay_widths: I, padding_x: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut span = 0.0;
    for (i, w) in lay_widths.into_iter().enumerate() {
        if i > 0 {
            span += padding_x;
        }
        span += w;
    }
    span
}

/// Left-to-right cursor over a centered sibling row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SiblingRow {
    cursor: f64,
    padding_x: f64,
}

impl SiblingRow {
    /// Start a row of total `span` centered on `center_x`.
    pub fn centered(center_x: f64, span: f64, padding_x: f64) -> Self {
        Self {
            cursor: center_x - span / 2.0,
            padding_x,
        }
    }

    /// Place the next sibling and return its center `x`.
    pub fn place(&mut self, lay_width: f64) -> f64 {
        let x = self.cursor + lay_width / 2.0;
        self.cursor += lay_width + self.padding_x;
        x
    }
}

/// Center `y` of a child hanging `padding_y` below its parent's bottom edge.
#[inline]
pub fn child_center_y(parent_y: f64, parent_height: f64, padding_y: f64, child_height: f64) -> f64 {
    parent_y + parent_height / 2.0 + padding_y + child_height / 2.0
}
