// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat block records for export and import.
//!
//! A [`BlockRecord`] is the numeric snapshot of one block as a host stores it:
//! every field is a plain number and the root's parent is `-1`.
//! Records are validated before they reach a [`Registry`]; a malformed number never
//! propagates into layout.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};

use crate::registry::{Registry, RegistryError};
use crate::types::{Block, BlockId};

/// Parent value that marks the root.
pub const ROOT_PARENT: f64 = -1.0;

/// One block as flat numbers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlockRecord {
    /// Block id; a non-negative integer.
    pub id: f64,
    /// Parent id, or [`ROOT_PARENT`].
    pub parent: f64,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Cached subtree footprint.
    #[cfg_attr(feature = "serde", serde(alias = "childwidth"))]
    pub child_width: f64,
}

/// Parse a host-supplied number. Anything unparsable becomes NaN.
pub fn parse_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

impl BlockRecord {
    /// Snapshot a block.
    pub fn from_block(block: &Block) -> Self {
        Self {
            id: f64::from(block.id.0),
            parent: block.parent.map_or(ROOT_PARENT, |p| f64::from(p.0)),
            x: block.center.x,
            y: block.center.y,
            width: block.size.width,
            height: block.size.height,
            child_width: block.child_width,
        }
    }

    /// Build a record from string name/value pairs.
    ///
    /// Missing or malformed fields become NaN and are caught by validation on import.
    /// Unknown names are ignored.
    pub fn parse<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut r = Self {
            id: f64::NAN,
            parent: f64::NAN,
            x: f64::NAN,
            y: f64::NAN,
            width: f64::NAN,
            height: f64::NAN,
            child_width: f64::NAN,
        };
        for (name, value) in fields {
            let slot = match name {
                "id" => &mut r.id,
                "parent" => &mut r.parent,
                "x" => &mut r.x,
                "y" => &mut r.y,
                "width" => &mut r.width,
                "height" => &mut r.height,
                "childWidth" | "childwidth" | "child_width" => &mut r.child_width,
                _ => continue,
            };
            *slot = parse_number(value);
        }
        r
    }

    fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("id", self.id),
            ("parent", self.parent),
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("childWidth", self.child_width),
        ]
    }

    /// Validate and convert; `index` is only used for error reporting.
    pub fn to_block(&self, index: usize) -> Result<Block, ImportError> {
        if let Some((field, _)) = self.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ImportError::NonFinite { index, field });
        }
        let id = to_id(self.id).ok_or(ImportError::InvalidId { index, field: "id" })?;
        let parent = if self.parent == ROOT_PARENT {
            None
        } else {
            Some(to_id(self.parent).ok_or(ImportError::InvalidId {
                index,
                field: "parent",
            })?)
        };
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ImportError::NegativeSize { index });
        }
        Ok(Block {
            id,
            parent,
            center: Point::new(self.x, self.y),
            size: Size::new(self.width, self.height),
            child_width: self.child_width,
        })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "range and integrality are checked around the cast"
)]
fn to_id(v: f64) -> Option<BlockId> {
    if !(0.0..=f64::from(u32::MAX)).contains(&v) {
        return None;
    }
    let raw = v as u32;
    (f64::from(raw) == v).then_some(BlockId(raw))
}

/// Reasons an import is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportError {
    /// A numeric field is NaN or infinite.
    NonFinite {
        /// Record position.
        index: usize,
        /// Field name.
        field: &'static str,
    },
    /// An id or parent is not a non-negative integer in range.
    InvalidId {
        /// Record position.
        index: usize,
        /// Field name.
        field: &'static str,
    },
    /// Width or height is negative.
    NegativeSize {
        /// Record position.
        index: usize,
    },
    /// The records do not form a single valid tree.
    Registry(RegistryError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { index, field } => {
                write!(f, "record {index}: `{field}` is not a finite number")
            }
            Self::InvalidId { index, field } => {
                write!(f, "record {index}: `{field}` is not a valid block id")
            }
            Self::NegativeSize { index } => write!(f, "record {index}: negative size"),
            Self::Registry(e) => write!(f, "invalid tree: {e}"),
        }
    }
}

impl core::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for ImportError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl Registry {
    /// Build a registry from flat records.
    ///
    /// Every record is validated first. Records may appear in any order; a block is admitted
    /// once its parent is present, and among admissible blocks the given order is kept.
    /// Stored `child_width` values are taken as-is; run [`Registry::layout`] to refresh them.
    pub fn from_records(records: &[BlockRecord]) -> Result<Self, ImportError> {
        let mut pending = records
            .iter()
            .enumerate()
            .map(|(index, r)| r.to_block(index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut registry = Self::new();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for block in pending {
                match block.parent {
                    Some(parent) if !registry.contains(parent) => deferred.push(block),
                    _ => registry.add(block)?,
                }
            }
            if deferred.len() == before {
                // No progress: every remaining parent is absent or part of a cycle.
                let stuck = &deferred[0];
                return Err(RegistryError::MissingParent {
                    id: stuck.id,
                    parent: stuck.parent.unwrap_or(stuck.id),
                }
                .into());
            }
            pending = deferred;
        }
        Ok(registry)
    }

    /// Snapshot every block, in insertion order.
    pub fn records(&self) -> Vec<BlockRecord> {
        self.iter().map(BlockRecord::from_block).collect()
    }
}
