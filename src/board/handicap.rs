// Copyright 2023 Tobin Edwards
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
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use super::material::{Cell, Material, PieceFace};
use super::square::{File, Rank, Square};
use Square::*;

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum HandicapError {
    #[error("Handicap id is out of range (expecting 0..8)")]
    OutOfRange,
}

/// Starting layouts. Every handicap removes pieces from the First side's
/// standard layout; First still moves first.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum Handicap {
    #[default]
    Even,
    LanceDown,
    BishopDown,
    RookDown,
    RookLanceDown,
    TwoPiecesDown,
    FourPiecesDown,
    SixPiecesDown,
}

impl Handicap {
    pub fn try_from_index(index: usize) -> Result<Self> {
        Self::iter()
            .nth(index)
            .ok_or_else(|| HandicapError::OutOfRange.into())
    }

    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// Squares emptied from the even layout.
    pub const fn removed(&self) -> &'static [Square] {
        use Handicap::*;
        match self {
            Even => &[],
            LanceDown => &[S99],
            BishopDown => &[S88],
            RookDown => &[S28],
            RookLanceDown => &[S28, S99],
            TwoPiecesDown => &[S28, S88],
            FourPiecesDown => &[S28, S88, S99, S19],
            SixPiecesDown => &[S28, S88, S99, S19, S29, S89],
        }
    }

    pub fn layout(&self) -> &'static [Cell; 81] {
        &LAYOUTS[self.to_index()]
    }
}

impl fmt::Display for Handicap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Handicap::*;
        let s = match self {
            Even => "平手",
            LanceDown => "香落ち",
            BishopDown => "角落ち",
            RookDown => "飛車落ち",
            RookLanceDown => "飛香落ち",
            TwoPiecesDown => "二枚落ち",
            FourPiecesDown => "四枚落ち",
            SixPiecesDown => "六枚落ち",
        };
        write!(f, "{}", s)
    }
}

fn even_layout() -> [Cell; 81] {
    use PieceFace::*;
    // Indexed by file, 1 through 9.
    const BACK_RANK: [PieceFace; 9] = [Lance, Knight, Silver, Gold, King, Gold, Silver, Knight, Lance];
    let mut cells: [Cell; 81] = [None; 81];
    let mut place = |square: Square, material: Material| {
        cells[square.to_index()] = Some(material);
    };
    for file in File::iter() {
        let face = BACK_RANK[file.to_index()];
        place(Square::new(file, Rank::Rank1), Material::second(face));
        place(Square::new(file, Rank::Rank3), Material::second(Pawn));
        place(Square::new(file, Rank::Rank7), Material::first(Pawn));
        place(Square::new(file, Rank::Rank9), Material::first(face));
    }
    place(S82, Material::second(Rook));
    place(S22, Material::second(Bishop));
    place(S88, Material::first(Bishop));
    place(S28, Material::first(Rook));
    cells
}

static LAYOUTS: Lazy<Vec<[Cell; 81]>> = Lazy::new(|| {
    let even = even_layout();
    Handicap::iter()
        .map(|handicap| {
            let mut cells = even;
            for square in handicap.removed() {
                cells[square.to_index()] = None;
            }
            cells
        })
        .collect()
});
