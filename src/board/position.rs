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
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::sync::Arc;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::trace;

use super::captured::CapturedSet;
use super::check;
use super::handicap::Handicap;
use super::material::{Cell, Material, Pair, Side};
use super::moves::{Action, MoveError};
use super::square::{File, Mask, Rank, Square};
use super::Turn;

use Side::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PositionError {
    #[error("{0} has more than one king")]
    MultipleKings(Side),
}

/// The 81 cells, indexed by `Square`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([Cell; 81]);

impl Board {
    pub const fn empty() -> Self {
        Self([None; 81])
    }

    pub const fn from_cells(cells: [Cell; 81]) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[Cell; 81] {
        &self.0
    }

    /// Occupied squares and their contents, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Material)> + '_ {
        Square::iter().filter_map(|square| self[square].map(|material| (square, material)))
    }

    fn occupancy(&self) -> Pair<Mask> {
        let mut masks = Pair::new(Mask::empty(), Mask::empty());
        for (square, material) in self.pieces() {
            masks[material.side()] |= square;
        }
        masks
    }
}

impl Index<Square> for Board {
    type Output = Cell;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Board {
    #[inline]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

/// Terminal state of a position.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ongoing,
    /// The side to move is checkmated; holds the winner.
    Checkmate(Side),
    /// A king was taken by the previous action; holds the winner.
    KingCaptured(Side),
}

/// An immutable game state. Applying an action yields a new position that
/// shares this one as its predecessor.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    occupancy: Pair<Mask>,
    captured: Pair<CapturedSet>,
    turn: Side,
    handicap: Handicap,
    ply: Option<u16>,
    previous: Option<Arc<Position>>,
    last_action: Option<Action>,
    king_taken_by: Option<Side>,
    checkmate: OnceCell<bool>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new(Handicap::default())
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.turn == other.turn && self.board == other.board && self.captured == other.captured
    }
}

impl Eq for Position {}

impl Position {
    pub fn new(handicap: Handicap) -> Self {
        let mut position = Self::build(Board::from_cells(*handicap.layout()), Pair::default(), First);
        position.handicap = handicap;
        position
    }

    fn build(board: Board, captured: Pair<CapturedSet>, turn: Side) -> Self {
        Self {
            occupancy: board.occupancy(),
            board,
            captured,
            turn,
            handicap: Handicap::Even,
            ply: None,
            previous: None,
            last_action: None,
            king_taken_by: None,
            checkmate: OnceCell::new(),
        }
    }

    /// Builds a position from nine rows, top row first (rank 1) and each row
    /// listed from file 9 down to file 1, as a board diagram is read.
    pub fn from_rows(turn: Side, rows: &[[Cell; 9]; 9], captured: Pair<CapturedSet>) -> Result<Self> {
        let mut board = Board::empty();
        for (rank, row) in Rank::iter().zip(rows.iter()) {
            for (file, cell) in File::iter().rev().zip(row.iter()) {
                board[Square::new(file, rank)] = *cell;
            }
        }
        Self::from_board(turn, board, captured)
    }

    /// Builds a position after checking that neither side has more than
    /// one king. Piece totals are not otherwise checked.
    pub fn from_board(turn: Side, board: Board, captured: Pair<CapturedSet>) -> Result<Self> {
        let mut kings = Pair::<usize>::default();
        for (_, material) in board.pieces().filter(|(_, material)| material.is_king()) {
            kings[material.side()] += 1;
        }
        for side in Side::iter() {
            if kings[side] > 1 {
                return Err(PositionError::MultipleKings(side).into());
            }
        }
        Ok(Self::build(board, captured, turn))
    }

    /// The inverse of `from_rows`.
    pub fn rows(&self) -> [[Cell; 9]; 9] {
        let mut rows = [[None; 9]; 9];
        for (rank, row) in Rank::iter().zip(rows.iter_mut()) {
            for (file, cell) in File::iter().rev().zip(row.iter_mut()) {
                *cell = self.board[Square::new(file, rank)];
            }
        }
        rows
    }

    /// A detached copy with `side` to move, used to test drops for the
    /// side not on move.
    pub(super) fn with_turn(&self, side: Side) -> Self {
        Self::build(self.board, self.captured, side)
    }

    /// Starts counting plies from `ply`.
    pub fn with_ply(mut self, ply: u16) -> Self {
        self.ply = Some(ply);
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    #[inline]
    pub fn captured(&self, side: Side) -> &CapturedSet {
        &self.captured[side]
    }
    #[inline]
    pub fn handicap(&self) -> Handicap {
        self.handicap
    }
    #[inline]
    pub fn ply(&self) -> Option<u16> {
        self.ply
    }
    #[inline]
    pub fn previous(&self) -> Option<&Arc<Position>> {
        self.previous.as_ref()
    }
    #[inline]
    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    /// Whether the side to move is checkmated. Computed once per position.
    pub fn is_checkmate(&self) -> bool {
        *self.checkmate.get_or_init(|| check::detect(self))
    }

    pub fn status(&self) -> Status {
        if let Some(side) = self.king_taken_by {
            Status::KingCaptured(side)
        } else if self.is_checkmate() {
            Status::Checkmate(!self.turn)
        } else {
            Status::Ongoing
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status() {
            Status::Ongoing => None,
            Status::Checkmate(side) | Status::KingCaptured(side) => Some(side),
        }
    }

    /// Applies `action`, recording a private copy of `self` as predecessor.
    pub fn apply(&self, action: Action) -> Result<Position> {
        self.successor(Arc::new(self.clone()), action)
    }

    /// Applies `action`, sharing `self` as predecessor.
    pub fn apply_shared(self: &Arc<Self>, action: Action) -> Result<Position> {
        self.successor(Arc::clone(self), action)
    }

    fn successor(&self, previous: Arc<Position>, action: Action) -> Result<Position> {
        if self.king_taken_by.is_some() {
            return Err(MoveError::GameOver.into());
        }
        let mut next = Self {
            board: self.board,
            occupancy: self.occupancy,
            captured: self.captured,
            turn: !self.turn,
            handicap: self.handicap,
            ply: self.ply.map(|ply| ply.saturating_add(1)),
            previous: Some(previous),
            last_action: Some(action),
            king_taken_by: None,
            checkmate: OnceCell::new(),
        };
        match action {
            Action::Move { side, from, to, face } => {
                if side != self.turn || from == to {
                    return Err(MoveError::InvalidAction.into());
                }
                let Some(material) = self.board[from] else {
                    return Err(MoveError::InvalidAction.into());
                };
                let current = material.face();
                let face_matches =
                    face == current || (current.can_promote() && face == current.promoted());
                if material.side() != side || !face_matches {
                    return Err(MoveError::InvalidAction.into());
                }
                if let Some(captured) = self.board[to] {
                    if captured.side() == side {
                        return Err(MoveError::InvalidAction.into());
                    }
                    next.remove(to);
                    if captured.is_king() {
                        next.king_taken_by = Some(side);
                    } else {
                        next.captured[side].add(captured.kind());
                    }
                }
                next.remove(from);
                next.place(to, Material::new(side, face));
            }
            Action::Drop { side, to, kind } => {
                if side != self.turn || kind.is_king() || self.board[to].is_some() {
                    return Err(MoveError::InvalidAction.into());
                }
                next.captured[side]
                    .try_remove(kind)
                    .map_err(|_| MoveError::InvalidAction)?;
                next.place(to, Material::new(side, kind.face()));
            }
            Action::Terminal { .. } => return Err(MoveError::InvalidAction.into()),
        }
        trace!(action = %action, ply = ?next.ply, "applied action");
        Ok(next)
    }

    fn place(&mut self, square: Square, material: Material) {
        debug_assert!(self.board[square].is_none());
        self.board[square] = Some(material);
        self.occupancy[material.side()] |= square;
    }

    fn remove(&mut self, square: Square) -> Cell {
        let cell = self.board[square].take();
        if let Some(material) = cell {
            self.occupancy[material.side()] = self.occupancy[material.side()] - square;
        }
        cell
    }
}

// Unlinks the predecessor chain one position at a time; a recursive drop
// of a long game overflows the stack.
impl Drop for Position {
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(position) = previous {
            previous = match Arc::try_unwrap(position) {
                Ok(mut position) => position.previous.take(),
                Err(_) => None,
            };
        }
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Side {
        self.turn
    }
}

impl Index<Square> for Position {
    type Output = Cell;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.board[index]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Pos for Position {}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let encoded = self.to_base64().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PositionVisitor;
        impl<'de> serde::de::Visitor<'de> for PositionVisitor {
            type Value = Position;
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a base64 encoded position")
            }
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Position::from_base64(value).map_err(E::custom)
            }
        }
        deserializer.deserialize_str(PositionVisitor)
    }
}

pub trait Pos: Turn + AsRef<Position> {
    #[inline]
    fn contents(&self, square: Square) -> &Cell {
        let pos: &Position = self.as_ref();
        &pos.board[square]
    }
    #[inline]
    fn occupied_by(&self, side: Side) -> Mask {
        let pos: &Position = self.as_ref();
        pos.occupancy[side]
    }
    #[inline]
    fn ours(&self) -> Mask {
        self.occupied_by(self.turn())
    }
    #[inline]
    fn occupied(&self) -> Mask {
        self.occupied_by(First) | self.occupied_by(Second)
    }
    #[inline]
    fn vacant(&self) -> Mask {
        !self.occupied()
    }
    #[inline]
    fn is_vacant(&self, square: Square) -> bool {
        !self.occupied().contains(square)
    }
    #[inline]
    fn our_captured(&self) -> &CapturedSet {
        let pos: &Position = self.as_ref();
        pos.captured(self.turn())
    }
}

#[cfg(test)]
impl Position {
    pub fn empty() -> Self {
        Self::build(Board::empty(), Pair::default(), First)
    }
    pub fn set_contents(mut self, square: Square, value: Cell) -> Self {
        self.board[square] = value;
        self.occupancy = self.board.occupancy();
        self
    }
    pub fn set_turn(mut self, turn: Side) -> Self {
        self.turn = turn;
        self
    }
    pub fn set_captured(mut self, side: Side, captured: CapturedSet) -> Self {
        self.captured[side] = captured;
        self
    }
}
