// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the drag engine: pointer input, canvas frame, configuration, and surface commands.
//!
//! ## Coordinates
//!
//! Every point and rectangle exchanged with the engine is in canvas content coordinates:
//! relative to the canvas's top-left and already adjusted for its scroll offset.
//! [`CanvasFrame`] tells the engine which part of that space is currently visible.

use alloc::string::String;

use kurbo::{Point, Rect, Size, Vec2};
use understory_flow_geometry::{Arrow, DropPoint};
use understory_flow_tree::{BlockId, LayoutConfig};

bitflags::bitflags! {
    /// Pointer buttons held during a pointer-down.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// Primary button, or a touch contact.
        const PRIMARY   = 0b0000_0001;
        /// Secondary button.
        const SECONDARY = 0b0000_0010;
        /// Auxiliary (middle) button.
        const AUXILIARY = 0b0000_0100;
    }
}

impl PointerButtons {
    /// Whether this press may start a drag: primary held and secondary not held.
    pub fn initiates_drag(self) -> bool {
        self.contains(Self::PRIMARY) && !self.contains(Self::SECONDARY)
    }
}

/// What a pointer-down landed on.
#[derive(Clone, Debug, PartialEq)]
pub enum DownTarget<S> {
    /// A template element the host offers for creating new blocks.
    Template {
        /// Host handle for the template, echoed back in [`SurfaceOp::SpawnBlock`].
        source: S,
        /// The template's rendered rectangle.
        rect: Rect,
    },
    /// A placed block.
    Block(BlockId),
    /// Empty canvas.
    Canvas,
}

/// Visible region of the canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasFrame {
    /// Size of the visible canvas area.
    pub size: Size,
    /// Current scroll offset.
    pub scroll: Vec2,
}

impl CanvasFrame {
    /// An unscrolled frame of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            scroll: Vec2::ZERO,
        }
    }

    /// Visible rectangle in content coordinates.
    pub fn view(&self) -> Rect {
        Rect::from_origin_size(self.scroll.to_point(), self.size)
    }

    /// Whether a dropped item at `rect` landed on the canvas.
    ///
    /// Only the top and left edges count; the canvas grows to the right and downward.
    pub fn lands_inside(&self, rect: Rect) -> bool {
        let view = self.view();
        rect.x0 > view.x0 && rect.y0 > view.y0
    }
}

/// Engine configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Sibling and level spacing.
    pub layout: LayoutConfig,
    /// Gap kept between the canvas's left edge and the leftmost block after offset correction.
    pub offset_margin: f64,
    /// Width of the band around each visible canvas edge that triggers auto-scroll.
    pub autoscroll_edge: f64,
    /// Scroll distance per pointer move inside the band.
    pub autoscroll_step: f64,
    /// Which point of the dragged item is tested against attach regions.
    pub drop_point: DropPoint,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            offset_margin: 20.0,
            autoscroll_edge: 10.0,
            autoscroll_step: 10.0,
            drop_point: DropPoint::Center,
        }
    }
}

impl EngineConfig {
    /// Default configuration with the given paddings.
    pub fn with_padding(padding_x: f64, padding_y: f64) -> Self {
        Self {
            layout: LayoutConfig::new(padding_x, padding_y),
            ..Self::default()
        }
    }
}

/// Current state of the drag machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// No pointer interaction in progress.
    Idle,
    /// A new block created from a template is following the pointer.
    PlacingNewBlock,
    /// A placed block and its subtree are following the pointer.
    RearrangingSubtree,
}

/// A command for the rendering surface.
///
/// Engine entry points return these in the order they must be applied.
/// A command naming a block the surface no longer shows should be ignored by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp<S> {
    /// Create the element for a new block by cloning `source`, at `top_left`.
    SpawnBlock {
        /// New block's id.
        id: BlockId,
        /// Template handle from the pointer-down.
        source: S,
        /// Initial top-left corner.
        top_left: Point,
    },
    /// Toggle the dragging style on a block.
    SetDragging {
        /// Block.
        id: BlockId,
        /// Whether the block is being dragged.
        dragging: bool,
    },
    /// Attach `member` (and its incoming arrow) to `anchor`'s element at `offset` from its top-left,
    /// so it moves with the anchor.
    GroupUnder {
        /// Dragged block.
        anchor: BlockId,
        /// Descendant being carried.
        member: BlockId,
        /// Member's top-left relative to the anchor's top-left.
        offset: Vec2,
    },
    /// Return every member grouped under `anchor` to the canvas.
    ReleaseGroup {
        /// Dragged block.
        anchor: BlockId,
    },
    /// Place a block's element.
    MoveBlock {
        /// Block.
        id: BlockId,
        /// Top-left corner in content coordinates.
        top_left: Point,
    },
    /// Remove a block's element together with its incoming arrow.
    RemoveBlock {
        /// Block.
        id: BlockId,
    },
    /// Create or update the arrow into `child`.
    SetArrow {
        /// Child end of the edge.
        child: BlockId,
        /// Routed connector.
        arrow: Arrow,
    },
    /// Remove the arrow into `child`.
    RemoveArrow {
        /// Child end of the edge.
        child: BlockId,
    },
    /// Show the drop indicator under `target`, or hide it.
    Indicator {
        /// Block the dragged item would attach to.
        target: Option<BlockId>,
    },
    /// Scroll the canvas by this delta.
    ScrollBy(Vec2),
    /// Replace the canvas contents with previously exported markup.
    RestoreMarkup(String),
    /// Remove every block and arrow from the canvas.
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_primary_starts_a_drag() {
        assert!(PointerButtons::PRIMARY.initiates_drag());
        assert!((PointerButtons::PRIMARY | PointerButtons::AUXILIARY).initiates_drag());
        assert!(!PointerButtons::SECONDARY.initiates_drag());
        assert!(!(PointerButtons::PRIMARY | PointerButtons::SECONDARY).initiates_drag());
        assert!(!PointerButtons::empty().initiates_drag());
    }

    #[test]
    fn frame_tracks_scroll() {
        let mut frame = CanvasFrame::new(Size::new(400.0, 300.0));
        assert_eq!(frame.view(), Rect::new(0.0, 0.0, 400.0, 300.0));
        frame.scroll = Vec2::new(50.0, 0.0);
        assert_eq!(frame.view(), Rect::new(50.0, 0.0, 450.0, 300.0));
        assert!(frame.lands_inside(Rect::new(60.0, 10.0, 100.0, 30.0)));
        assert!(!frame.lands_inside(Rect::new(40.0, 10.0, 80.0, 30.0)));
        assert!(!frame.lands_inside(Rect::new(60.0, 0.0, 100.0, 20.0)));
    }

    #[test]
    fn default_config() {
        let c = EngineConfig::with_padding(10.0, 5.0);
        assert_eq!(c.layout, LayoutConfig::new(10.0, 5.0));
        assert_eq!(c.offset_margin, 20.0);
        assert_eq!(c.drop_point, DropPoint::Center);
    }
}
