// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_flow_geometry --heading-base-level=0

//! Understory Flow Geometry: the coordinate arithmetic behind flowchart block trees.
//!
//! Everything here is a pure function over Kurbo values.
//! Nothing reads or writes a rendering surface, and nothing knows about block identity beyond an opaque key.
//! The tree and drag crates build on these pieces; they are also independently testable.
//!
//! - [`attach`]: decide which placed block a dragged item would snap under.
//! - [`siblings`]: lay-widths, row spans, and left-to-right sibling placement.
//! - [`offset`]: keep a laid-out tree from spilling past the canvas's left edge.
//! - [`autoscroll`]: scroll the canvas while a drag hovers near one of its edges.
//! - [`arrow`]: route the two-segment connector between a parent and a child.
//!
//! ## Conventions
//!
//! Blocks are described by their **center** and size, in canvas-local coordinates
//! (already adjusted for canvas origin and scroll).
//! `y` grows downward; children sit below their parent.
//! Float inputs are assumed to be finite; a NaN point never attaches and a NaN edge never wins a minimum.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Size};
//! use understory_flow_geometry::attach::{Candidate, first_attachment};
//! use understory_flow_geometry::siblings::{SiblingRow, row_span};
//!
//! // Three children with widths 30, 50, 30 and 10 units between them.
//! let span = row_span([30.0, 50.0, 30.0], 10.0);
//! assert_eq!(span, 130.0);
//!
//! let mut row = SiblingRow::centered(200.0, span, 10.0);
//! assert_eq!(row.place(30.0), 150.0);
//! assert_eq!(row.place(50.0), 200.0);
//! assert_eq!(row.place(30.0), 250.0);
//!
//! // First candidate whose attach region holds the drop point wins.
//! let candidates = [
//!     Candidate { key: 'a', center: Point::new(100.0, 100.0), size: Size::new(40.0, 20.0) },
//!     Candidate { key: 'b', center: Point::new(110.0, 100.0), size: Size::new(40.0, 20.0) },
//! ];
//! assert_eq!(first_attachment(Point::new(105.0, 100.0), candidates, 0.0), Some('a'));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod arrow;
pub mod attach;
pub mod autoscroll;
pub mod offset;
pub mod siblings;

pub use arrow::{ARROW_ANCHOR_OFFSET, ARROW_HEAD_HALF_WIDTH, Arrow, ArrowRouting};
pub use attach::{Candidate, DropPoint, attach_region, attaches, first_attachment};
