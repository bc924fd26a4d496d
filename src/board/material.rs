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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::square::{Mask, Offset, Rank, Square};

/// The contents of a single square.
pub type Cell = Option<Material>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    side: Side,
    face: PieceFace,
}

impl Material {
    #[inline]
    pub const fn new(side: Side, face: PieceFace) -> Self {
        Self { side, face }
    }

    #[inline]
    pub const fn first(face: PieceFace) -> Self {
        Self::new(First, face)
    }

    #[inline]
    pub const fn second(face: PieceFace) -> Self {
        Self::new(Second, face)
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn face(&self) -> PieceFace {
        self.face
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.face.kind()
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.face == PieceFace::King
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side, self.face)
    }
}

use Side::{First, Second};

/// The two players. `First` moves first and starts on ranks 7 to 9.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// Rank delta of one step forward.
    #[inline]
    pub const fn direction(&self) -> isize {
        match self {
            First => -1,
            Second => 1,
        }
    }

    /// How many ranks lie between `rank` and this side's far edge.
    /// Zero means `rank` is the far edge itself.
    #[inline]
    pub const fn ranks_ahead(&self, rank: Rank) -> usize {
        match self {
            First => rank.to_index(),
            Second => 8 - rank.to_index(),
        }
    }
}

impl Not for Side {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            First => Second,
            Second => First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            First => write!(f, "▲"),
            Second => write!(f, "▽"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(first: T, second: T) -> Self {
        Self((first, second))
    }
}

impl<T> Pair<T> {
    pub fn first(&self) -> &T {
        &self.0 .0
    }
    pub fn first_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn second(&self) -> &T {
        &self.0 .1
    }
    pub fn second_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first().hash(state);
        self.second().hash(state);
    }
}

impl<T> Index<Side> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Side) -> &Self::Output {
        match index {
            First => self.first(),
            Second => self.second(),
        }
    }
}

impl<T> IndexMut<Side> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        match index {
            First => self.first_mut(),
            Second => self.second_mut(),
        }
    }
}

/// The eight kinds of piece, independent of promotion.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
}

impl PieceKind {
    /// The order in which held pieces are listed and offered for drops.
    pub const HAND_ORDER: [PieceKind; 8] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// Number of pieces of this kind in a full set.
    pub const fn max_count(&self) -> u8 {
        use PieceKind::*;
        match self {
            Pawn => 18,
            Lance | Knight | Silver | Gold => 4,
            Bishop | Rook | King => 2,
        }
    }

    pub const fn can_promote(&self) -> bool {
        !matches!(self, PieceKind::Gold | PieceKind::King)
    }

    /// The face a piece of this kind shows when unpromoted (and when dropped).
    pub const fn face(&self) -> PieceFace {
        PieceFace::from_index(self.to_index())
    }

    /// Whether a piece of this kind, dropped by `side` onto `rank`, would
    /// still have a forward move.
    pub const fn can_drop_on(&self, side: Side, rank: Rank) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::Lance => side.ranks_ahead(rank) >= 1,
            PieceKind::Knight => side.ranks_ahead(rank) >= 2,
            _ => true,
        }
    }

    pub const fn is_king(&self) -> bool {
        matches!(self, PieceKind::King)
    }
    pub const fn is_pawn(&self) -> bool {
        matches!(self, PieceKind::Pawn)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face())
    }
}

/// A piece kind as it shows on the board, promoted or not.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum PieceFace {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
    Tokin,
    PromotedLance,
    PromotedKnight,
    PromotedSilver,
    Horse,
    Dragon,
}

impl PieceFace {
    pub const fn from_index(index: usize) -> Self {
        use PieceFace::*;
        debug_assert!(index < 14);
        const VALUES: [PieceFace; 14] = [
            Pawn,
            Lance,
            Knight,
            Silver,
            Gold,
            Bishop,
            Rook,
            King,
            Tokin,
            PromotedLance,
            PromotedKnight,
            PromotedSilver,
            Horse,
            Dragon,
        ];
        VALUES[index]
    }

    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    pub const fn kind(&self) -> PieceKind {
        use PieceFace::*;
        match self {
            Pawn | Tokin => PieceKind::Pawn,
            Lance | PromotedLance => PieceKind::Lance,
            Knight | PromotedKnight => PieceKind::Knight,
            Silver | PromotedSilver => PieceKind::Silver,
            Gold => PieceKind::Gold,
            Bishop | Horse => PieceKind::Bishop,
            Rook | Dragon => PieceKind::Rook,
            King => PieceKind::King,
        }
    }

    pub const fn is_promoted(&self) -> bool {
        self.to_index() >= PieceFace::Tokin.to_index()
    }

    pub const fn can_promote(&self) -> bool {
        !self.is_promoted() && self.kind().can_promote()
    }

    /// The promoted face, or `self` when this face cannot promote.
    pub const fn promoted(&self) -> Self {
        use PieceFace::*;
        match self {
            Pawn => Tokin,
            Lance => PromotedLance,
            Knight => PromotedKnight,
            Silver => PromotedSilver,
            Bishop => Horse,
            Rook => Dragon,
            _ => *self,
        }
    }

    pub const fn glyph(&self) -> char {
        const VALUES: [char; 14] = [
            '歩', '香', '桂', '銀', '金', '角', '飛', '玉', 'と', '杏', '圭', '全', '馬', '竜',
        ];
        VALUES[self.to_index()]
    }

    /// Single-step offsets for this face when moved by `side`.
    #[inline]
    pub fn steps(&self, side: Side) -> &'static [Offset] {
        &STEPS[side][self.to_index()]
    }

    /// Sliding directions for this face when moved by `side`.
    #[inline]
    pub fn slides(&self, side: Side) -> &'static [Offset] {
        &SLIDES[side][self.to_index()]
    }

    /// Squares reachable from `square` by a single step, ignoring occupancy.
    #[inline]
    pub fn step_mask(&self, side: Side, square: Square) -> Mask {
        STEP_MASKS[side][self.to_index()][square]
    }
}

impl fmt::Display for PieceFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

const PAWN_STEPS: [Offset; 1] = [Offset::new(0, -1)];
const KNIGHT_STEPS: [Offset; 2] = [Offset::new(-1, -2), Offset::new(1, -2)];
const SILVER_STEPS: [Offset; 5] = [
    Offset::new(-1, -1),
    Offset::new(0, -1),
    Offset::new(1, -1),
    Offset::new(-1, 1),
    Offset::new(1, 1),
];
const GOLD_STEPS: [Offset; 6] = [
    Offset::new(-1, -1),
    Offset::new(0, -1),
    Offset::new(1, -1),
    Offset::new(-1, 0),
    Offset::new(1, 0),
    Offset::new(0, 1),
];
const KING_STEPS: [Offset; 8] = [
    Offset::new(-1, -1),
    Offset::new(0, -1),
    Offset::new(1, -1),
    Offset::new(-1, 0),
    Offset::new(1, 0),
    Offset::new(-1, 1),
    Offset::new(0, 1),
    Offset::new(1, 1),
];
const ORTHOGONALS: [Offset; 4] = [
    Offset::new(0, -1),
    Offset::new(-1, 0),
    Offset::new(1, 0),
    Offset::new(0, 1),
];
const DIAGONALS: [Offset; 4] = [
    Offset::new(-1, -1),
    Offset::new(1, -1),
    Offset::new(-1, 1),
    Offset::new(1, 1),
];
const LANCE_SLIDES: [Offset; 1] = [Offset::new(0, -1)];

// Tables are written from the First side's point of view.
fn first_steps(face: PieceFace) -> &'static [Offset] {
    use PieceFace::*;
    match face {
        Pawn => &PAWN_STEPS,
        Lance | Bishop | Rook => &[],
        Knight => &KNIGHT_STEPS,
        Silver => &SILVER_STEPS,
        Gold | Tokin | PromotedLance | PromotedKnight | PromotedSilver => &GOLD_STEPS,
        King => &KING_STEPS,
        Horse => &ORTHOGONALS,
        Dragon => &DIAGONALS,
    }
}

fn first_slides(face: PieceFace) -> &'static [Offset] {
    use PieceFace::*;
    match face {
        Lance => &LANCE_SLIDES,
        Bishop | Horse => &DIAGONALS,
        Rook | Dragon => &ORTHOGONALS,
        _ => &[],
    }
}

fn mirrored_tables(table: fn(PieceFace) -> &'static [Offset]) -> Pair<Vec<Vec<Offset>>> {
    let first: Vec<Vec<Offset>> = PieceFace::iter().map(|face| table(face).to_vec()).collect();
    let second = first
        .iter()
        .map(|offsets| offsets.iter().map(|offset| offset.mirrored()).collect())
        .collect();
    Pair::new(first, second)
}

static STEPS: Lazy<Pair<Vec<Vec<Offset>>>> = Lazy::new(|| mirrored_tables(first_steps));

static SLIDES: Lazy<Pair<Vec<Vec<Offset>>>> = Lazy::new(|| mirrored_tables(first_slides));

static STEP_MASKS: Lazy<Pair<Vec<[Mask; 81]>>> = Lazy::new(|| {
    let masks = |side: Side| -> Vec<[Mask; 81]> {
        PieceFace::iter()
            .map(|face| {
                let mut array = [Mask::empty(); 81];
                for square in Square::iter() {
                    array[square] = Mask::from_squares(
                        face.steps(side).iter().filter_map(|offset| square + offset),
                    );
                }
                array
            })
            .collect()
    };
    Pair::new(masks(First), masks(Second))
});
