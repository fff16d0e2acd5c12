// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout, offset correction, and per-edge geometry over a [`Registry`].
//!
//! ## Layout
//!
//! [`Registry::layout`] positions every non-root block from tree structure alone:
//!
//! 1. Bottom-up, each block's `child_width` becomes its own width for a leaf, or the larger of
//!    its own width and its children's row span otherwise.
//! 2. Top-down, each parent's children are laid out left to right in insertion order, centered
//!    under the parent, each occupying its lay-width with `padding_x` between neighbors, and
//!    hanging `padding_y` below the parent's bottom edge.
//!
//! The root is never moved; it is the layout's only anchor.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;
use understory_flow_geometry::arrow::Arrow;
use understory_flow_geometry::attach::{Candidate, first_attachment};
use understory_flow_geometry::offset::{leftmost_edge, overflow_shift};
use understory_flow_geometry::siblings::{SiblingRow, child_center_y, row_span};

use crate::registry::Registry;
use crate::types::{Block, BlockId, LayoutConfig};

impl Registry {
    /// Recompute every `child_width` and reposition every non-root block.
    pub fn layout(&mut self, config: &LayoutConfig) {
        let Some(root) = self.root() else {
            return;
        };
        let order = self.preorder(root);
        for id in order.iter().rev() {
            self.refresh_child_width(*id, config.padding_x);
        }
        for id in &order {
            let Some(parent) = self.get(*id) else {
                continue;
            };
            let kids = self.child_ids(*id).to_vec();
            if kids.is_empty() {
                continue;
            }
            let (px, py, ph) = (parent.center.x, parent.center.y, parent.size.height);
            let span = self.row_span_of(*id, config.padding_x);
            let mut row = SiblingRow::centered(px, span, config.padding_x);
            for kid in kids {
                if let Some(b) = self.block_mut(kid) {
                    let x = row.place(b.lay_width());
                    let y = child_center_y(py, ph, config.padding_y, b.size.height);
                    b.center = Point::new(x, y);
                }
            }
        }
    }

    /// Recompute `child_width` for `from` and then for each of its ancestors up to the root.
    ///
    /// Used right after an attach so no stale cache survives until the next full layout.
    pub fn refresh_ancestors(&mut self, from: BlockId, padding_x: f64) {
        self.refresh_child_width(from, padding_x);
        for ancestor in self.ancestors(from) {
            self.refresh_child_width(ancestor, padding_x);
        }
    }

    /// Shift every block right so the leftmost edge is no further left than `visible_left`.
    ///
    /// When the leftmost edge overflows, it ends up at `visible_left + margin`.
    /// Returns the applied shift. A second call with no change in between returns `None`.
    pub fn correct_offset(&mut self, visible_left: f64, margin: f64) -> Option<f64> {
        let leftmost = leftmost_edge(self.iter().map(|b| (b.center.x, b.size.width)))?;
        let shift = overflow_shift(leftmost, visible_left, margin)?;
        for b in self.blocks_mut() {
            b.center.x += shift;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(shift, "corrected horizontal offset");
        Some(shift)
    }

    /// First block, in insertion order, whose attach region holds `point`.
    pub fn attach_target(&self, point: Point, padding_x: f64) -> Option<BlockId> {
        let candidates = self.iter().map(|b| Candidate {
            key: b.id,
            center: b.center,
            size: b.size,
        });
        first_attachment(point, candidates, padding_x)
    }

    /// Connector from `id`'s parent to `id`, or `None` for the root or an unknown id.
    pub fn arrow_to(&self, id: BlockId, padding_y: f64) -> Option<Arrow> {
        let child = self.get(id)?;
        let parent = self.get(child.parent?)?;
        Some(Arrow::route(
            parent.center,
            parent.size,
            child.center,
            padding_y,
        ))
    }

    /// Connectors for every parent/child edge, keyed by child, in insertion order.
    pub fn arrows(&self, padding_y: f64) -> Vec<(BlockId, Arrow)> {
        self.iter()
            .filter_map(|b| self.arrow_to(b.id, padding_y).map(|a| (b.id, a)))
            .collect()
    }

    fn preorder(&self, root: BlockId) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.child_ids(id).iter().rev().copied());
        }
        out
    }

    fn row_span_of(&self, parent: BlockId, padding_x: f64) -> f64 {
        row_span(self.children_of(parent).map(Block::lay_width), padding_x)
    }

    fn refresh_child_width(&mut self, id: BlockId, padding_x: f64) {
        let span = (self.child_count(id) > 0).then(|| self.row_span_of(id, padding_x));
        if let Some(b) = self.block_mut(id) {
            b.child_width = match span {
                Some(span) => b.size.width.max(span),
                None => b.size.width,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn add(reg: &mut Registry, id: u32, parent: Option<u32>, width: f64, height: f64) {
        reg.add(Block::new(
            BlockId(id),
            parent.map(BlockId),
            Point::new(0.0, 0.0),
            Size::new(width, height),
        ))
        .unwrap();
    }

    fn center(reg: &Registry, id: u32) -> Point {
        reg.get(BlockId(id)).unwrap().center
    }

    fn child_width(reg: &Registry, id: u32) -> f64 {
        reg.get(BlockId(id)).unwrap().child_width
    }

    fn rooted_at(x: f64, y: f64, width: f64, height: f64) -> Registry {
        let mut reg = Registry::new();
        reg.add(Block::new(
            BlockId(0),
            None,
            Point::new(x, y),
            Size::new(width, height),
        ))
        .unwrap();
        reg
    }

    #[test]
    fn three_siblings_center_under_parent() {
        let mut reg = rooted_at(200.0, 50.0, 40.0, 20.0);
        add(&mut reg, 1, Some(0), 30.0, 20.0);
        add(&mut reg, 2, Some(0), 50.0, 20.0);
        add(&mut reg, 3, Some(0), 30.0, 20.0);
        reg.layout(&LayoutConfig::new(10.0, 5.0));

        assert_eq!(child_width(&reg, 0), 130.0);
        assert_eq!(center(&reg, 1), Point::new(150.0, 75.0));
        assert_eq!(center(&reg, 2), Point::new(200.0, 75.0));
        assert_eq!(center(&reg, 3), Point::new(250.0, 75.0));
        // Root is the anchor.
        assert_eq!(center(&reg, 0), Point::new(200.0, 50.0));
    }

    #[test]
    fn single_child_hangs_below() {
        let mut reg = rooted_at(100.0, 100.0, 40.0, 20.0);
        add(&mut reg, 1, Some(0), 60.0, 30.0);
        reg.layout(&LayoutConfig::new(10.0, 5.0));
        assert_eq!(center(&reg, 1), Point::new(100.0, 130.0));
        assert_eq!(child_width(&reg, 0), 60.0);
        assert_eq!(child_width(&reg, 1), 60.0);
    }

    #[test]
    fn narrow_children_keep_parent_footprint() {
        let mut reg = rooted_at(100.0, 100.0, 40.0, 20.0);
        add(&mut reg, 1, Some(0), 20.0, 20.0);
        reg.layout(&LayoutConfig::new(10.0, 5.0));
        assert_eq!(child_width(&reg, 0), 40.0);
        assert_eq!(center(&reg, 1).x, 100.0);
    }

    #[test]
    fn wide_subtree_pushes_siblings_apart() {
        //        0
        //      /   \
        //     1     2
        //    / \
        //   3   4
        let mut reg = rooted_at(0.0, 0.0, 20.0, 10.0);
        add(&mut reg, 1, Some(0), 20.0, 10.0);
        add(&mut reg, 2, Some(0), 20.0, 10.0);
        add(&mut reg, 3, Some(1), 40.0, 10.0);
        add(&mut reg, 4, Some(1), 40.0, 10.0);
        reg.layout(&LayoutConfig::new(10.0, 10.0));

        assert_eq!(child_width(&reg, 1), 90.0);
        assert_eq!(child_width(&reg, 2), 20.0);
        assert_eq!(child_width(&reg, 0), 120.0);
        assert_eq!(center(&reg, 1), Point::new(-15.0, 20.0));
        assert_eq!(center(&reg, 2), Point::new(50.0, 20.0));
        assert_eq!(center(&reg, 3), Point::new(-40.0, 40.0));
        assert_eq!(center(&reg, 4), Point::new(10.0, 40.0));
    }

    #[test]
    fn refresh_walks_to_root() {
        let mut reg = rooted_at(0.0, 0.0, 20.0, 10.0);
        add(&mut reg, 1, Some(0), 20.0, 10.0);
        add(&mut reg, 2, Some(1), 100.0, 10.0);
        reg.refresh_ancestors(BlockId(1), 0.0);
        assert_eq!(child_width(&reg, 1), 100.0);
        assert_eq!(child_width(&reg, 0), 100.0);
    }

    #[test]
    fn offset_correction_is_idempotent() {
        let mut reg = rooted_at(30.0, 0.0, 20.0, 10.0);
        add(&mut reg, 1, Some(0), 40.0, 10.0);
        add(&mut reg, 2, Some(0), 40.0, 10.0);
        reg.layout(&LayoutConfig::new(10.0, 10.0));
        // Leftmost edge at 30 - 45 = -15.
        assert_eq!(reg.correct_offset(0.0, 20.0), Some(35.0));
        let after: Vec<Point> = reg.iter().map(|b| b.center).collect();
        assert_eq!(reg.correct_offset(0.0, 20.0), None);
        let again: Vec<Point> = reg.iter().map(|b| b.center).collect();
        assert_eq!(after, again);
        assert_eq!(center(&reg, 1).x - 20.0, 20.0);
    }

    #[test]
    fn attach_target_prefers_earlier_blocks() {
        let mut reg = rooted_at(100.0, 100.0, 40.0, 20.0);
        // Overlaps the root's region.
        reg.add(Block::new(
            BlockId(1),
            Some(BlockId(0)),
            Point::new(110.0, 105.0),
            Size::new(40.0, 20.0),
        ))
        .unwrap();
        assert_eq!(
            reg.attach_target(Point::new(105.0, 102.0), 0.0),
            Some(BlockId(0))
        );
        assert_eq!(
            reg.attach_target(Point::new(125.0, 112.0), 0.0),
            Some(BlockId(1))
        );
        assert_eq!(reg.attach_target(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn arrows_cover_every_edge() {
        let mut reg = rooted_at(100.0, 100.0, 40.0, 20.0);
        add(&mut reg, 1, Some(0), 30.0, 20.0);
        add(&mut reg, 2, Some(0), 30.0, 20.0);
        reg.layout(&LayoutConfig::new(10.0, 20.0));
        let arrows = reg.arrows(20.0);
        assert_eq!(arrows.len(), 2);
        for (child, arrow) in &arrows {
            let c = reg.get(*child).unwrap();
            assert_eq!(arrow.start(), Point::new(100.0, 110.0));
            assert_eq!(arrow.tip(), Point::new(c.center.x, c.rect().y0));
        }
        assert!(reg.arrow_to(BlockId(0), 20.0).is_none());
    }
}
