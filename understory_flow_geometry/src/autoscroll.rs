// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scroll while dragging.
//!
//! A pointer inside a band of `edge` units around one of the visible canvas edges scrolls the canvas
//! by `step` toward that edge. Edges are checked right, left, bottom, top; the first match wins,
//! so only one axis scrolls per pointer move.

use kurbo::{Point, Rect, Vec2};

/// Scroll delta for a pointer at `pointer` over the visible region `view`.
///
/// `view` and `pointer` share the canvas-local coordinate space.
pub fn edge_scroll(view: Rect, pointer: Point, edge: f64, step: f64) -> Option<Vec2> {
    let near = |v: f64, line: f64| v > line - edge && v < line + edge;
    if near(pointer.x, view.x1) {
        Some(Vec2::new(step, 0.0))
    } else if near(pointer.x, view.x0) {
        Some(Vec2::new(-step, 0.0))
    } else if near(pointer.y, view.y1) {
        Some(Vec2::new(0.0, step))
    } else if near(pointer.y, view.y0) {
        Some(Vec2::new(0.0, -step))
    } else {
        None
    }
}

/// Apply `delta` to a scroll offset, clamping at the content origin.
///
/// Returns the new offset and the delta that was actually applied.
pub fn clamp_scroll(scroll: Vec2, delta: Vec2) -> (Vec2, Vec2) {
    let next = Vec2::new((scroll.x + delta.x).max(0.0), (scroll.y + delta.y).max(0.0));
    (next, next - scroll)
}
