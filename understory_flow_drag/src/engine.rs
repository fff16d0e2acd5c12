// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag state machine.
//!
//! ## States
//!
//! - `Idle`: nothing is being dragged.
//! - `PlacingNewBlock`: a block created from a template follows the pointer. It is not in the
//!   registry yet.
//! - `RearrangingSubtree`: a placed block and its descendants follow the pointer. They were moved
//!   out of the registry into a [`TempSet`] on pointer-down.
//!
//! Every `pointer_up` returns the machine to `Idle`.
//!
//! ## Resolution on release
//!
//! | Dragging | Attach target (allowed by `on_snapping`) | Otherwise |
//! |---|---|---|
//! | new block, registry empty | n/a | becomes the root if it landed on the canvas, else discarded |
//! | new block | added under the target | discarded |
//! | subtree with a previous parent | grafted under the target | restored under the previous parent if `on_rearrange` allows, else discarded |
//! | the root's tree | n/a | re-rooted at the drop point if it landed on the canvas, else discarded |
//!
//! A committed change is followed by ancestor width refresh, layout, offset correction, and
//! arrow routing, in that order. Lifting a subtree out on pointer-down runs the same layout over
//! the blocks left behind, so hit-testing during the drag sees the tree as it now is.

use alloc::vec::Vec;
use core::{fmt, mem};

use kurbo::{Point, Rect, Vec2};
use understory_flow_geometry::autoscroll::{clamp_scroll, edge_scroll};
use understory_flow_tree::{Block, BlockId, BlockRecord, Registry, TempSet};

use crate::hooks::Hooks;
use crate::indicator::IndicatorState;
use crate::types::{CanvasFrame, DownTarget, DragPhase, EngineConfig, PointerButtons, SurfaceOp};

#[derive(Debug)]
enum DragState {
    Idle,
    Placing { block: Block, grab: Vec2 },
    Rearranging { temp: TempSet, grab: Vec2 },
}

/// Pointer-driven engine for one canvas.
///
/// Owns the block [`Registry`] and the drag state. Feed it pointer events; apply the returned
/// [`SurfaceOp`]s to the rendering surface in order.
///
/// `S` is the host's handle for template elements.
pub struct FlowEngine<S> {
    pub(crate) registry: Registry,
    config: EngineConfig,
    frame: CanvasFrame,
    hooks: Hooks<S>,
    drag: DragState,
    indicator: IndicatorState,
}

impl<S> fmt::Debug for FlowEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowEngine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("frame", &self.frame)
            .field("hooks", &self.hooks)
            .field("phase", &self.phase())
            .field("indicator", &self.indicator)
            .finish_non_exhaustive()
    }
}

impl<S> FlowEngine<S> {
    /// Create an engine with an empty registry and no hooks.
    pub fn new(config: EngineConfig, frame: CanvasFrame) -> Self {
        Self {
            registry: Registry::new(),
            config,
            frame,
            hooks: Hooks::default(),
            drag: DragState::Idle,
            indicator: IndicatorState::new(),
        }
    }

    /// Replace the hooks.
    pub fn with_hooks(mut self, hooks: Hooks<S>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Mutable access to the hooks.
    pub fn hooks_mut(&mut self) -> &mut Hooks<S> {
        &mut self.hooks
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current canvas frame, including scroll applied by auto-scroll.
    pub fn frame(&self) -> CanvasFrame {
        self.frame
    }

    /// Update the canvas frame after the host resized or scrolled the canvas.
    pub fn set_frame(&mut self, frame: CanvasFrame) {
        self.frame = frame;
    }

    /// The committed blocks.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Snapshot of every committed block.
    pub fn blocks(&self) -> Vec<BlockRecord> {
        self.registry.records()
    }

    /// Current drag state.
    pub fn phase(&self) -> DragPhase {
        match self.drag {
            DragState::Idle => DragPhase::Idle,
            DragState::Placing { .. } => DragPhase::PlacingNewBlock,
            DragState::Rearranging { .. } => DragPhase::RearrangingSubtree,
        }
    }

    /// The block following the pointer, if any.
    pub fn dragged(&self) -> Option<&Block> {
        match &self.drag {
            DragState::Idle => None,
            DragState::Placing { block, .. } => Some(block),
            DragState::Rearranging { temp, .. } => Some(temp.anchor_block()),
        }
    }

    /// Block the drop indicator is currently shown under.
    pub fn indicator(&self) -> Option<BlockId> {
        self.indicator.current()
    }

    /// Handle a pointer press on `target` at `point`.
    ///
    /// Starts a placement on a template or a rearrangement on a placed block.
    /// Ignored while a drag is in progress, for presses that are not a plain primary press,
    /// and for ids that are not registered.
    pub fn pointer_down(
        &mut self,
        target: DownTarget<S>,
        point: Point,
        buttons: PointerButtons,
    ) -> Vec<SurfaceOp<S>> {
        let mut ops = Vec::new();
        if !matches!(self.drag, DragState::Idle) || !buttons.initiates_drag() {
            return ops;
        }
        match target {
            DownTarget::Template { source, rect } => {
                let id = self.registry.next_id();
                let block = Block::new(id, None, rect.center(), rect.size());
                self.hooks.block_grabbed(&source);
                ops.push(SurfaceOp::SpawnBlock {
                    id,
                    source,
                    top_left: rect.origin(),
                });
                ops.push(SurfaceOp::SetDragging { id, dragging: true });
                #[cfg(feature = "tracing")]
                tracing::debug!(id = id.0, "placing new block");
                self.drag = DragState::Placing {
                    block,
                    grab: point - rect.origin(),
                };
            }
            DownTarget::Block(id) => {
                let Some(top_left) = self.registry.get(id).map(Block::top_left) else {
                    return ops;
                };
                let Ok(temp) = self.registry.extract_subtree(id) else {
                    return ops;
                };
                self.hooks.grab(id);
                ops.push(SurfaceOp::SetDragging { id, dragging: true });
                if temp.previous_parent().is_some() {
                    ops.push(SurfaceOp::RemoveArrow { child: id });
                }
                ops.extend(
                    temp.offsets()
                        .map(|(member, offset)| SurfaceOp::GroupUnder {
                            anchor: id,
                            member,
                            offset,
                        }),
                );
                // The blocks left behind close the gap for the rest of the drag.
                if !self.registry.is_empty() {
                    self.relayout(&mut ops);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(id = id.0, len = temp.len(), "rearranging subtree");
                self.drag = DragState::Rearranging {
                    temp,
                    grab: point - top_left,
                };
            }
            DownTarget::Canvas => {}
        }
        ops
    }

    /// Handle pointer motion.
    ///
    /// Moves the dragged item, auto-scrolls near the canvas edges, and updates the drop indicator.
    pub fn pointer_move(&mut self, point: Point) -> Vec<SurfaceOp<S>> {
        let mut ops = Vec::new();
        let Some(rect) = self.follow(point, &mut ops) else {
            return ops;
        };
        self.autoscroll(point, &mut ops);
        let target = self.attach_target(rect);
        if self.indicator.update(target) {
            ops.push(SurfaceOp::Indicator { target });
        }
        ops
    }

    /// Handle pointer release: resolve the drag and return to idle.
    pub fn pointer_up(&mut self, point: Point) -> Vec<SurfaceOp<S>> {
        let mut ops = Vec::new();
        let Some(rect) = self.follow(point, &mut ops) else {
            return ops;
        };
        if self.indicator.clear() {
            ops.push(SurfaceOp::Indicator { target: None });
        }
        let target = self.attach_target(rect);
        match mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Idle => {}
            DragState::Placing { block, .. } => {
                ops.push(SurfaceOp::SetDragging {
                    id: block.id,
                    dragging: false,
                });
                self.hooks.block_released();
                self.commit_new(block, target, &mut ops);
            }
            DragState::Rearranging { temp, .. } => {
                let id = temp.anchor();
                ops.push(SurfaceOp::SetDragging {
                    id,
                    dragging: false,
                });
                ops.push(SurfaceOp::ReleaseGroup { anchor: id });
                self.hooks.release();
                self.commit_rearrange(temp, target, &mut ops);
            }
        }
        ops
    }

    /// Remove every block and abandon any drag in progress.
    pub fn clear(&mut self) -> Vec<SurfaceOp<S>> {
        let mut ops = Vec::new();
        if self.indicator.clear() {
            ops.push(SurfaceOp::Indicator { target: None });
        }
        self.drag = DragState::Idle;
        self.registry.clear();
        ops.push(SurfaceOp::Clear);
        ops
    }

    /// Move the dragged item so the grab point sits under `point`; returns its new rectangle.
    fn follow(&mut self, point: Point, ops: &mut Vec<SurfaceOp<S>>) -> Option<Rect> {
        let (id, rect) = match &mut self.drag {
            DragState::Idle => return None,
            DragState::Placing { block, grab } => {
                let rect = Rect::from_origin_size(point - *grab, block.size);
                block.center = rect.center();
                (block.id, rect)
            }
            DragState::Rearranging { temp, grab } => {
                let rect = Rect::from_origin_size(point - *grab, temp.anchor_block().size);
                temp.move_anchor_to(rect.center());
                (temp.anchor(), rect)
            }
        };
        ops.push(SurfaceOp::MoveBlock {
            id,
            top_left: rect.origin(),
        });
        Some(rect)
    }

    fn autoscroll(&mut self, point: Point, ops: &mut Vec<SurfaceOp<S>>) {
        let Some(delta) = edge_scroll(
            self.frame.view(),
            point,
            self.config.autoscroll_edge,
            self.config.autoscroll_step,
        ) else {
            return;
        };
        let (scroll, applied) = clamp_scroll(self.frame.scroll, delta);
        if applied != Vec2::ZERO {
            self.frame.scroll = scroll;
            ops.push(SurfaceOp::ScrollBy(applied));
        }
    }

    fn attach_target(&self, dragged: Rect) -> Option<BlockId> {
        let point = self.config.drop_point.point(dragged);
        self.registry
            .attach_target(point, self.config.layout.padding_x)
    }

    fn commit_new(&mut self, mut block: Block, target: Option<BlockId>, ops: &mut Vec<SurfaceOp<S>>) {
        let id = block.id;
        if self.registry.is_empty() {
            if self.frame.lands_inside(block.rect()) && self.hooks.snapping(id, true, None) {
                self.admit(block, None, ops);
            } else {
                #[cfg(feature = "tracing")]
                tracing::debug!(id = id.0, "first block dropped off canvas or vetoed");
                ops.push(SurfaceOp::RemoveBlock { id });
            }
            return;
        }
        match target {
            Some(parent) if self.hooks.snapping(id, false, Some(parent)) => {
                block.parent = Some(parent);
                self.admit(block, Some(parent), ops);
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(id = id.0, ?target, "new block discarded");
                ops.push(SurfaceOp::RemoveBlock { id });
            }
        }
    }

    fn admit(&mut self, block: Block, parent: Option<BlockId>, ops: &mut Vec<SurfaceOp<S>>) {
        let id = block.id;
        match self.registry.add(block) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(id = id.0, ?parent, "block placed");
                if let Some(parent) = parent {
                    self.registry
                        .refresh_ancestors(parent, self.config.layout.padding_x);
                }
                self.relayout(ops);
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(id = id.0, error = %_err, "block rejected by registry");
                ops.push(SurfaceOp::RemoveBlock { id });
            }
        }
    }

    fn commit_rearrange(
        &mut self,
        temp: TempSet,
        target: Option<BlockId>,
        ops: &mut Vec<SurfaceOp<S>>,
    ) {
        let id = temp.anchor();
        if let Some(parent) = target {
            if self.hooks.snapping(id, false, Some(parent)) {
                match self.registry.graft(temp, parent) {
                    Ok(()) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(id = id.0, parent = parent.0, "subtree attached");
                        self.registry
                            .refresh_ancestors(parent, self.config.layout.padding_x);
                        self.relayout(ops);
                    }
                    Err(err) => self.discard(err.temp, ops),
                }
                return;
            }
        }
        match temp.previous_parent() {
            Some(previous) => {
                if !self.hooks.rearrange(id, previous) {
                    self.discard(temp, ops);
                    return;
                }
                match self.registry.restore(temp) {
                    Ok(()) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(id = id.0, parent = previous.0, "subtree restored");
                        self.relayout(ops);
                    }
                    Err(err) => self.discard(err.temp, ops),
                }
            }
            None => {
                let inside = self.frame.lands_inside(temp.anchor_block().rect());
                if !(self.registry.is_empty() && inside && self.hooks.snapping(id, true, None)) {
                    self.discard(temp, ops);
                    return;
                }
                match self.registry.reroot(temp) {
                    Ok(()) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(id = id.0, "tree re-rooted");
                        self.relayout(ops);
                    }
                    Err(err) => self.discard(err.temp, ops),
                }
            }
        }
    }

    fn discard(&mut self, temp: TempSet, ops: &mut Vec<SurfaceOp<S>>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(id = temp.anchor().0, len = temp.len(), "subtree discarded");
        ops.extend(temp.ids().map(|id| SurfaceOp::RemoveBlock { id }));
    }

    /// Lay out, correct the offset, and emit positions and arrows for every block.
    pub(crate) fn relayout(&mut self, ops: &mut Vec<SurfaceOp<S>>) {
        let layout = self.config.layout;
        self.registry.layout(&layout);
        self.registry.correct_offset(0.0, self.config.offset_margin);
        ops.extend(self.registry.iter().map(|b| SurfaceOp::MoveBlock {
            id: b.id,
            top_left: b.top_left(),
        }));
        ops.extend(
            self.registry
                .arrows(layout.padding_y)
                .into_iter()
                .map(|(child, arrow)| SurfaceOp::SetArrow { child, arrow }),
        );
    }
}
