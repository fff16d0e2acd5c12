// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_flow_tree --heading-base-level=0

//! Understory Flow Tree: the block registry and centered tree layout for flowchart editors.
//!
//! ## Overview
//!
//! A flowchart here is a single rooted tree of rectangular blocks.
//! This crate owns the canonical block set and keeps it laid out:
//!
//! - [`Registry`]: blocks keyed by [`BlockId`], with a parent-to-children index and a stable
//!   insertion order. Structural operations return [`RegistryError`] instead of corrupting the tree.
//! - [`TempSet`]: a block and its descendants taken out of the registry while they are being
//!   dragged, then grafted under a new parent, restored, or re-rooted.
//! - [`Registry::layout`]: bottom-up subtree widths, then top-down centered placement.
//!   The root stays where it is; everything else follows from structure.
//! - [`Registry::correct_offset`]: shift the whole tree right when it spills past the left edge.
//! - [`BlockRecord`]: flat numeric snapshots for export and validated import.
//!
//! The crate does not render or own a pointer; see `understory_flow_drag` for the interaction layer.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_flow_tree::{Block, BlockId, LayoutConfig, Registry};
//!
//! let mut reg = Registry::new();
//! reg.add(Block::new(BlockId(0), None, Point::new(200.0, 50.0), Size::new(40.0, 20.0))).unwrap();
//! for (id, width) in [(1, 30.0), (2, 50.0), (3, 30.0)] {
//!     let block = Block::new(BlockId(id), Some(BlockId(0)), Point::ZERO, Size::new(width, 20.0));
//!     reg.add(block).unwrap();
//! }
//!
//! reg.layout(&LayoutConfig::new(10.0, 5.0));
//! assert_eq!(reg.get(BlockId(0)).unwrap().child_width, 130.0);
//! assert_eq!(reg.get(BlockId(2)).unwrap().center, Point::new(200.0, 75.0));
//!
//! // Take the middle block out and put it back.
//! let temp = reg.extract_subtree(BlockId(2)).unwrap();
//! assert_eq!(reg.len(), 3);
//! reg.restore(temp).unwrap();
//! assert_eq!(reg.child_ids(BlockId(0)), &[BlockId(1), BlockId(2), BlockId(3)]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo.
//! - `libm`: `no_std` float math through Kurbo.
//! - `serde`: `Serialize`/`Deserialize` for [`BlockId`], [`LayoutConfig`], and [`BlockRecord`].
//! - `tracing`: debug events for subtree moves and offset corrections.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod layout;
mod record;
mod registry;
mod subtree;
mod types;

pub use record::{BlockRecord, ImportError, ROOT_PARENT, parse_number};
pub use registry::{Registry, RegistryError};
pub use subtree::{MergeError, TempSet};
pub use types::{Block, BlockId, LayoutConfig};
