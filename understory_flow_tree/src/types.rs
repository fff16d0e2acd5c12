// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the block tree: identifiers, blocks, and layout configuration.

use core::fmt;

use kurbo::{Point, Rect, Size};
use understory_flow_geometry::siblings;

/// Identifier for a block.
///
/// Ids are assigned by the host or by the drag engine (`0` for the first block, otherwise one
/// past the largest id in the registry) and are never reused while the block is alive.
/// Unlike arena handles, a `BlockId` is a plain value that survives export and import.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BlockId(pub u32);

impl BlockId {
    /// Wrap a raw id.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the flowchart tree.
///
/// Position is the block's **center** in canvas-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Identifier, unique within a registry.
    pub id: BlockId,
    /// Parent block, or `None` for the root.
    pub parent: Option<BlockId>,
    /// Center point.
    pub center: Point,
    /// Rendered size.
    pub size: Size,
    /// Cached horizontal footprint of this block's subtree.
    ///
    /// Equal to `size.width` for a leaf. Maintained by layout and ancestor refresh.
    pub child_width: f64,
}

impl Block {
    /// Create a leaf block; `child_width` starts at the block's own width.
    pub fn new(id: BlockId, parent: Option<BlockId>, center: Point, size: Size) -> Self {
        Self {
            id,
            parent,
            center,
            size,
            child_width: size.width,
        }
    }

    /// Bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Point {
        self.rect().origin()
    }

    /// Whether this block has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Footprint of this block inside its parent's sibling row.
    pub fn lay_width(&self) -> f64 {
        siblings::lay_width(self.size.width, self.child_width)
    }
}

/// Spacing used by layout, attachment, and arrow routing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LayoutConfig {
    /// Horizontal gap between siblings; also widens attach regions on both sides.
    pub padding_x: f64,
    /// Vertical gap between a parent's bottom edge and its children's top edges.
    pub padding_y: f64,
}

impl LayoutConfig {
    /// Configuration with the given paddings.
    pub const fn new(padding_x: f64, padding_y: f64) -> Self {
        Self {
            padding_x,
            padding_y,
        }
    }
}
