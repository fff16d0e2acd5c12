// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector routing between a parent block and one of its children.
//!
//! An [`Arrow`] is a stem polyline plus a triangular head. Points are stored relative to
//! [`Arrow::origin`], the canvas position where a host would place the connector's box;
//! [`Arrow::to_canvas`] maps them back.
//!
//! The stem leaves the parent's bottom anchor, drops to the middle of the vertical gap,
//! turns horizontally until it is above the child, and drops to the child's top anchor.
//! The head's tip sits on the child's top anchor.
//!
//! Routing is selected by `dx = child.x - parent.x + ARROW_ANCHOR_OFFSET`:
//! a child at most [`ARROW_ANCHOR_OFFSET`] left of its parent is routed [`ArrowRouting::Rightward`]
//! with the box anchored left of the parent; anything further left is routed
//! [`ArrowRouting::Leftward`] with the box anchored on the child and the stem doubling back.

use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Size};

/// Horizontal offset between a connector box's left edge and the parent anchor.
pub const ARROW_ANCHOR_OFFSET: f64 = 20.0;

/// Half of the arrowhead's base width; also its height.
pub const ARROW_HEAD_HALF_WIDTH: f64 = 5.0;

/// Which way the stem travels from the parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrowRouting {
    /// Child is well left of the parent; the box is anchored on the child.
    Leftward,
    /// Child is right of, below, or slightly left of the parent; the box is anchored on the parent.
    Rightward,
}

/// A routed connector.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    /// Routing that produced the points.
    pub routing: ArrowRouting,
    /// Canvas position of the connector box's top-left corner.
    pub origin: Point,
    /// Stem polyline, relative to `origin`.
    pub stem: [Point; 4],
    /// Arrowhead triangle, relative to `origin`. The last point is the tip.
    pub head: [Point; 3],
}

impl Arrow {
    /// Route the connector from a parent block to a child block.
    ///
    /// `padding_y` is the vertical gap between the parent's bottom edge and the child's top edge.
    pub fn route(parent_center: Point, parent_size: Size, child_center: Point, padding_y: f64) -> Self {
        let top = parent_center.y + parent_size.height / 2.0;
        let dx = child_center.x - parent_center.x + ARROW_ANCHOR_OFFSET;
        let turn = padding_y / 2.0;
        let end = padding_y;
        let hw = ARROW_HEAD_HALF_WIDTH;
        if dx >= 0.0 {
            Self {
                routing: ArrowRouting::Rightward,
                origin: Point::new(parent_center.x - ARROW_ANCHOR_OFFSET, top),
                stem: [
                    Point::new(ARROW_ANCHOR_OFFSET, 0.0),
                    Point::new(ARROW_ANCHOR_OFFSET, turn),
                    Point::new(dx, turn),
                    Point::new(dx, end),
                ],
                head: [
                    Point::new(dx - hw, end - hw),
                    Point::new(dx + hw, end - hw),
                    Point::new(dx, end),
                ],
            }
        } else {
            let back = parent_center.x - child_center.x + hw;
            Self {
                routing: ArrowRouting::Leftward,
                origin: Point::new(child_center.x - hw, top),
                stem: [
                    Point::new(back, 0.0),
                    Point::new(back, turn),
                    Point::new(hw, turn),
                    Point::new(hw, end),
                ],
                head: [
                    Point::new(0.0, end - hw),
                    Point::new(2.0 * hw, end - hw),
                    Point::new(hw, end),
                ],
            }
        }
    }

    /// Map a point relative to `origin` into canvas coordinates.
    pub fn to_canvas(&self, p: Point) -> Point {
        self.origin + p.to_vec2()
    }

    /// Canvas position where the stem leaves the parent.
    pub fn start(&self) -> Point {
        self.to_canvas(self.stem[0])
    }

    /// Canvas position of the arrowhead tip.
    pub fn tip(&self) -> Point {
        self.to_canvas(self.head[2])
    }

    /// Stem as an open path, relative to `origin`.
    pub fn stem_path(&self) -> BezPath {
        polyline(&self.stem, false)
    }

    /// Arrowhead as a closed path, relative to `origin`.
    pub fn head_path(&self) -> BezPath {
        polyline(&self.head, true)
    }

    /// Bounding box of stem and head, relative to `origin`.
    pub fn bounds(&self) -> Rect {
        let mut points = self.stem.iter().chain(self.head.iter());
        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Canvas-space vertices of stem then head.
    pub fn canvas_points(&self) -> Vec<Point> {
        self.stem
            .iter()
            .chain(self.head.iter())
            .map(|p| self.to_canvas(*p))
            .collect()
    }
}

fn polyline(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}
