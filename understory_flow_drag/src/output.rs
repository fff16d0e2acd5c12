// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving and restoring a canvas.
//!
//! [`FlowEngine::output`] pairs the host's markup with the numeric block records and any
//! per-block payload the host reports through [`PayloadSource`]. [`FlowEngine::import`] takes
//! the same [`Output`] back.

use alloc::string::String;
use alloc::vec::Vec;

use understory_flow_tree::{BlockId, BlockRecord, Registry};

use crate::engine::FlowEngine;
use crate::types::{DragPhase, SurfaceOp};

/// A named value the user attached to a block's content.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
}

/// An attribute found on a block's rendered element or its descendants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Per-block part of an [`Output`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockOutput {
    /// Block id.
    pub id: BlockId,
    /// Parent id; `None` for the root.
    pub parent: Option<BlockId>,
    /// User fields collected from the block's content.
    pub data: Vec<Field>,
    /// Attributes collected from the block's content.
    pub attr: Vec<Attribute>,
}

/// A saved canvas.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Output {
    /// The canvas's rendered markup, opaque to the engine.
    pub markup: String,
    /// Flat numeric records for every block, in insertion order.
    pub blocks_arr: Vec<BlockRecord>,
    /// Structure and payload for every block, in insertion order.
    pub blocks: Vec<BlockOutput>,
}

/// Read side of the rendering surface used by [`FlowEngine::output`].
pub trait PayloadSource {
    /// Current markup of the whole canvas.
    fn markup(&self) -> String;

    /// User fields inside the rendered block `id`.
    fn fields(&self, id: BlockId) -> Vec<Field> {
        let _ = id;
        Vec::new()
    }

    /// Attributes on the rendered block `id` and its descendants.
    fn attributes(&self, id: BlockId) -> Vec<Attribute> {
        let _ = id;
        Vec::new()
    }
}

impl<S> FlowEngine<S> {
    /// Export the canvas. An empty canvas still carries its markup, with no records.
    pub fn output(&self, source: &impl PayloadSource) -> Output {
        let blocks = self
            .registry
            .iter()
            .map(|b| BlockOutput {
                id: b.id,
                parent: b.parent,
                data: source.fields(b.id),
                attr: source.attributes(b.id),
            })
            .collect();
        Output {
            markup: source.markup(),
            blocks_arr: self.registry.records(),
            blocks,
        }
    }

    /// Replace the canvas with a previously exported one.
    ///
    /// Stored `child_width` values are not trusted; every footprint is recomputed.
    ///
    /// A no-op while a drag is in progress, for an empty record list, and for records that fail
    /// validation; the current blocks stay untouched in each case.
    pub fn import(&mut self, state: &Output) -> Vec<SurfaceOp<S>> {
        let mut ops = Vec::new();
        if self.phase() != DragPhase::Idle || state.blocks_arr.is_empty() {
            return ops;
        }
        let registry = match Registry::from_records(&state.blocks_arr) {
            Ok(registry) => registry,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "import rejected");
                return ops;
            }
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(len = registry.len(), "canvas imported");
        self.registry = registry;
        ops.push(SurfaceOp::RestoreMarkup(state.markup.clone()));
        if self.registry.len() > 1 {
            self.relayout(&mut ops);
        } else {
            // A lone block stays where it was saved; only its cached footprint is refreshed.
            let layout = self.config().layout;
            self.registry.layout(&layout);
        }
        ops
    }
}
