// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_flow_drag --heading-base-level=0

//! Understory Flow Drag: a deterministic, `no_std` drag engine for flowchart block trees.
//!
//! ## Overview
//!
//! [`FlowEngine`](crate::engine::FlowEngine) turns pointer events into edits of an
//! `understory_flow_tree` registry and into a list of [`SurfaceOp`](crate::types::SurfaceOp)
//! commands for whatever renders the canvas. It never reads or writes a renderer itself.
//!
//! ## Interactions
//!
//! - Press on a template: a new block follows the pointer. On release it attaches under the first
//!   block whose attach region contains the drop point, becomes the root if the canvas is empty,
//!   or is discarded.
//! - Press on a placed block: it and its descendants are lifted out of the tree and follow the
//!   pointer as a group. On release they attach under the target, go back where they came from,
//!   or are discarded.
//! - While dragging, the engine reports the drop target through
//!   [`IndicatorState`](crate::indicator::IndicatorState) transitions and scrolls the canvas when
//!   the pointer nears an edge.
//!
//! Every committed change re-runs the layout, shifts the tree right if it crossed the left edge,
//! and re-routes every arrow. Host [`Hooks`](crate::hooks::Hooks) observe grabs and releases and
//! can veto attaches.
//!
//! ## Coordinates
//!
//! All points are canvas content coordinates: relative to the canvas origin and including the
//! current scroll offset. [`CanvasFrame`](crate::types::CanvasFrame) carries the visible size and
//! scroll.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use understory_flow_drag::{
//!     CanvasFrame, DownTarget, EngineConfig, FlowEngine, PointerButtons, SurfaceOp,
//! };
//! use understory_flow_tree::BlockId;
//!
//! let mut engine = FlowEngine::new(
//!     EngineConfig::with_padding(10.0, 5.0),
//!     CanvasFrame::new(Size::new(800.0, 600.0)),
//! );
//!
//! // Drag a 40x20 template so the new block's center lands on (100, 100).
//! let template = Rect::from_origin_size(Point::new(700.0, 20.0), Size::new(40.0, 20.0));
//! let down = DownTarget::Template { source: "step", rect: template };
//! engine.pointer_down(down, template.center(), PointerButtons::PRIMARY);
//! engine.pointer_move(Point::new(100.0, 100.0));
//! let ops = engine.pointer_up(Point::new(100.0, 100.0));
//! assert!(ops.contains(&SurfaceOp::MoveBlock {
//!     id: BlockId(0),
//!     top_left: Point::new(80.0, 90.0),
//! }));
//!
//! // A second block dropped onto the first attaches below it.
//! let down = DownTarget::Template { source: "step", rect: template };
//! engine.pointer_down(down, template.center(), PointerButtons::PRIMARY);
//! engine.pointer_up(Point::new(100.0, 105.0));
//! let child = engine.registry().get(BlockId(1)).unwrap();
//! assert_eq!(child.parent, Some(BlockId(0)));
//! assert_eq!(child.center, Point::new(100.0, 125.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo and the sibling crates.
//! - `libm`: `no_std` float math through Kurbo.
//! - `serde`: `Serialize`/`Deserialize` for [`Output`](crate::output::Output) and its parts.
//! - `tracing`: debug events for drag transitions, warnings for rejected imports.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod engine;
pub mod hooks;
pub mod indicator;
pub mod output;
pub mod types;

pub use engine::FlowEngine;
pub use hooks::Hooks;
pub use output::{Attribute, BlockOutput, Field, Output, PayloadSource};
pub use types::{CanvasFrame, DownTarget, DragPhase, EngineConfig, PointerButtons, SurfaceOp};
