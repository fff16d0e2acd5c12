// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host hooks invoked at drag transitions.
//!
//! Every hook is optional. Notification hooks default to doing nothing;
//! gate hooks default to allowing the transition.

use alloc::boxed::Box;
use core::fmt;

use understory_flow_tree::BlockId;

type Notify = Box<dyn FnMut()>;

/// Host callbacks.
///
/// `S` is the host's template handle type, as in [`DownTarget::Template`](crate::DownTarget::Template).
pub struct Hooks<S> {
    /// A template was grabbed to create a new block.
    pub on_block_grabbed: Option<Box<dyn FnMut(&S)>>,
    /// A new block was released, whether or not it was kept.
    pub on_block_released: Option<Notify>,
    /// A placed block was grabbed for rearranging.
    pub on_grab: Option<Box<dyn FnMut(BlockId)>>,
    /// A rearranged block was released.
    pub on_release: Option<Notify>,
    /// Gate for every attach: `(dragged, is_first_block, proposed_parent)`.
    ///
    /// `is_first_block` is `true` with no parent when the dragged item would become the root.
    /// Returning `false` vetoes the attach, which then resolves as if no target was found.
    pub on_snapping: Option<Box<dyn FnMut(BlockId, bool, Option<BlockId>) -> bool>>,
    /// Gate for restoring a released subtree under its previous parent: `(dragged, previous_parent)`.
    ///
    /// Returning `false` discards the subtree instead.
    pub on_rearrange: Option<Box<dyn FnMut(BlockId, BlockId) -> bool>>,
}

impl<S> Default for Hooks<S> {
    fn default() -> Self {
        Self {
            on_block_grabbed: None,
            on_block_released: None,
            on_grab: None,
            on_release: None,
            on_snapping: None,
            on_rearrange: None,
        }
    }
}

impl<S> fmt::Debug for Hooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_block_grabbed", &self.on_block_grabbed.is_some())
            .field("on_block_released", &self.on_block_released.is_some())
            .field("on_grab", &self.on_grab.is_some())
            .field("on_release", &self.on_release.is_some())
            .field("on_snapping", &self.on_snapping.is_some())
            .field("on_rearrange", &self.on_rearrange.is_some())
            .finish()
    }
}

impl<S> Hooks<S> {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`Hooks::on_block_grabbed`].
    pub fn with_block_grabbed(mut self, f: impl FnMut(&S) + 'static) -> Self {
        self.on_block_grabbed = Some(Box::new(f));
        self
    }

    /// Set [`Hooks::on_block_released`].
    pub fn with_block_released(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_block_released = Some(Box::new(f));
        self
    }

    /// Set [`Hooks::on_grab`].
    pub fn with_grab(mut self, f: impl FnMut(BlockId) + 'static) -> Self {
        self.on_grab = Some(Box::new(f));
        self
    }

    /// Set [`Hooks::on_release`].
    pub fn with_release(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_release = Some(Box::new(f));
        self
    }

    /// Set [`Hooks::on_snapping`].
    pub fn with_snapping(
        mut self,
        f: impl FnMut(BlockId, bool, Option<BlockId>) -> bool + 'static,
    ) -> Self {
        self.on_snapping = Some(Box::new(f));
        self
    }

    /// Set [`Hooks::on_rearrange`].
    pub fn with_rearrange(mut self, f: impl FnMut(BlockId, BlockId) -> bool + 'static) -> Self {
        self.on_rearrange = Some(Box::new(f));
        self
    }

    pub(crate) fn block_grabbed(&mut self, source: &S) {
        if let Some(f) = &mut self.on_block_grabbed {
            f(source);
        }
    }

    pub(crate) fn block_released(&mut self) {
        if let Some(f) = &mut self.on_block_released {
            f();
        }
    }

    pub(crate) fn grab(&mut self, id: BlockId) {
        if let Some(f) = &mut self.on_grab {
            f(id);
        }
    }

    pub(crate) fn release(&mut self) {
        if let Some(f) = &mut self.on_release {
            f();
        }
    }

    pub(crate) fn snapping(
        &mut self,
        dragged: BlockId,
        is_first: bool,
        parent: Option<BlockId>,
    ) -> bool {
        self.on_snapping
            .as_mut()
            .is_none_or(|f| f(dragged, is_first, parent))
    }

    pub(crate) fn rearrange(&mut self, dragged: BlockId, previous_parent: BlockId) -> bool {
        self.on_rearrange
            .as_mut()
            .is_none_or(|f| f(dragged, previous_parent))
    }
}
