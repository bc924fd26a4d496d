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

use tracing::trace;

use super::material::{Material, PieceFace, Side};
use super::moves::{Action, LegalActions};
use super::position::{Pos, Position};
use super::square::Square;
use super::Turn;

pub trait Checks: LegalActions {
    fn king_square(&self, side: Side) -> Option<Square> {
        let pos: &Position = self.as_ref();
        let king = Some(Material::new(side, PieceFace::King));
        pos.occupied_by(side).iter().find(|&square| pos[square] == king)
    }

    /// Capturing moves, one per enemy piece that can reach `side`'s king.
    /// Empty when `side` is not in check or has no king on the board.
    fn attackers_of_king(&self, side: Side) -> Vec<Action> {
        let pos: &Position = self.as_ref();
        let Some(king) = self.king_square(side) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        for from in pos.occupied_by(!side).iter() {
            if self.destinations(from).contains(king) {
                if let Some(material) = pos[from] {
                    let face = material.face();
                    result.push(Action::Move { side: !side, from, to: king, face });
                }
            }
        }
        result
    }

    fn is_check(&self) -> bool {
        let pos: &Position = self.as_ref();
        !self.attackers_of_king(pos.turn()).is_empty()
    }
}

impl Checks for Position {}

/// Decides whether the side to move is checkmated.
///
/// Only the first checking piece found is considered. The side to move
/// escapes if it can capture that piece, or move its king, and end up with
/// no attackers on its king. Interposing a piece is not tried.
pub(super) fn detect(pos: &Position) -> bool {
    let side = pos.turn();
    let attackers = pos.attackers_of_king(side);
    let Some(Action::Move { from: checker, .. }) = attackers.first().copied() else {
        return false;
    };
    let escapes = |action: &Action| {
        pos.apply(*action)
            .map(|next| next.attackers_of_king(side).is_empty())
            .unwrap_or(false)
    };
    if pos.actions_onto(checker, side).iter().any(escapes) {
        trace!(side = ?side, checker = %checker, "checker can be captured");
        return false;
    }
    if let Some(king) = pos.king_square(side) {
        if pos.actions_from(king).iter().any(escapes) {
            trace!(side = ?side, king = %king, "king can escape");
            return false;
        }
    }
    trace!(side = ?side, checks = attackers.len(), "checkmate");
    true
}
