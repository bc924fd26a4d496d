// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use thiserror::Error;

use super::material::PieceKind;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CapturedError {
    #[error("Cannot hold more than {max} pieces of kind {kind:?}")]
    Overflow { kind: PieceKind, max: u8 },
    #[error("No piece of kind {0:?} is held")]
    Underflow(PieceKind),
}
use CapturedError::*;

// Most significant first. Kings are not part of the packed form.
const RADIX_ORDER: [PieceKind; 7] = [
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
    PieceKind::Pawn,
];

/// Pieces held in hand by one side, available to drop.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapturedSet([u8; 8]);

impl CapturedSet {
    /// Number of distinct packed values.
    pub const PACKED_LIMIT: u32 = 106_875;
    pub const PACKED_BITS: usize = 17;

    pub const fn empty() -> Self {
        Self([0; 8])
    }

    #[inline]
    pub fn count(&self, kind: PieceKind) -> u8 {
        self.0[kind.to_index()]
    }

    #[inline]
    pub fn contains(&self, kind: PieceKind) -> bool {
        self.count(kind) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|&count| count as usize).sum()
    }

    pub fn try_add(&mut self, kind: PieceKind) -> Result<()> {
        let max = kind.max_count();
        let count = &mut self.0[kind.to_index()];
        if *count >= max {
            return Err(Overflow { kind, max }.into());
        }
        *count += 1;
        Ok(())
    }

    /// Adds a captured piece. Counts past a full set are kept as they are;
    /// such a set cannot be packed.
    pub fn add(&mut self, kind: PieceKind) {
        let count = &mut self.0[kind.to_index()];
        *count = count.saturating_add(1);
    }

    pub fn try_remove(&mut self, kind: PieceKind) -> Result<()> {
        let count = &mut self.0[kind.to_index()];
        if *count == 0 {
            return Err(Underflow(kind).into());
        }
        *count -= 1;
        Ok(())
    }

    /// Held kinds with a non-zero count, in hand order.
    pub fn held(&self) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        PieceKind::HAND_ORDER
            .into_iter()
            .map(|kind| (kind, self.count(kind)))
            .filter(|(_, count)| *count > 0)
    }

    /// Mixed-radix form. `None` when a king is held or a count exceeds a
    /// full set.
    pub fn to_packed(&self) -> Option<u32> {
        if self.contains(PieceKind::King) {
            return None;
        }
        let mut value = 0u32;
        for kind in RADIX_ORDER {
            let count = self.count(kind);
            if count > kind.max_count() {
                return None;
            }
            value = value * (kind.max_count() as u32 + 1) + count as u32;
        }
        Some(value)
    }

    pub fn from_packed(mut value: u32) -> Option<Self> {
        if value >= Self::PACKED_LIMIT {
            return None;
        }
        let mut result = Self::empty();
        for kind in RADIX_ORDER.into_iter().rev() {
            let radix = kind.max_count() as u32 + 1;
            result.0[kind.to_index()] = (value % radix) as u8;
            value /= radix;
        }
        debug_assert_eq!(value, 0);
        Some(result)
    }

    #[cfg(test)]
    pub fn with(mut self, kind: PieceKind, count: u8) -> Self {
        self.0[kind.to_index()] = count;
        self
    }
}

impl Index<PieceKind> for CapturedSet {
    type Output = u8;
    fn index(&self, kind: PieceKind) -> &Self::Output {
        &self.0[kind.to_index()]
    }
}

impl fmt::Display for CapturedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "なし");
        }
        for (i, (kind, count)) in self.held().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", kind)?;
            if count > 1 {
                write!(f, "{}", count)?;
            }
        }
        Ok(())
    }
}
