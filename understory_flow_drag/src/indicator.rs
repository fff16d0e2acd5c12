// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop indicator state: report the attach target only when it changes.
//!
//! ## Minimal example
//!
//! ```
//! use understory_flow_drag::indicator::IndicatorState;
//! use understory_flow_tree::BlockId;
//!
//! let mut ind = IndicatorState::new();
//! assert!(ind.update(Some(BlockId(1))));
//! assert!(!ind.update(Some(BlockId(1))));
//! assert!(ind.update(None));
//! assert!(!ind.clear());
//! ```

use understory_flow_tree::BlockId;

/// Tracks which block, if any, the drop indicator is shown under.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IndicatorState {
    current: Option<BlockId>,
}

impl IndicatorState {
    /// Hidden indicator.
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Block the indicator is currently shown under.
    pub fn current(&self) -> Option<BlockId> {
        self.current
    }

    /// Move the indicator to `target`. Returns `true` if the surface needs updating.
    pub fn update(&mut self, target: Option<BlockId>) -> bool {
        let changed = self.current != target;
        self.current = target;
        changed
    }

    /// Hide the indicator. Returns `true` if it was shown.
    pub fn clear(&mut self) -> bool {
        self.update(None)
    }
}
