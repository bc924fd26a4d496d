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

//! Legality predicates shared by move generation and the checkmate detector.
//! None of these fail; an illegal action is simply never generated.

use strum::IntoEnumIterator;

use super::material::{Material, PieceFace, PieceKind, Side};
use super::moves::Action;
use super::position::{Pos, Position};
use super::square::{File, Rank, Square};
use super::Turn;

/// The three ranks nearest the opponent's edge.
#[inline]
pub fn in_promotion_zone(side: Side, rank: Rank) -> bool {
    side.ranks_ahead(rank) < 3
}

pub fn can_promote(side: Side, face: PieceFace, from: Square, to: Square) -> bool {
    face.can_promote()
        && (in_promotion_zone(side, from.rank()) || in_promotion_zone(side, to.rank()))
}

/// False when an unpromoted pawn, lance or knight would be left on a rank
/// with no forward move.
pub fn can_stay_unpromoted(side: Side, face: PieceFace, to: Square) -> bool {
    face.is_promoted() || face.kind().can_drop_on(side, to.rank())
}

pub fn is_double_pawn(pos: &Position, side: Side, file: File) -> bool {
    let pawn = Some(Material::new(side, PieceFace::Pawn));
    Rank::iter().any(|rank| pos[Square::new(file, rank)] == pawn)
}

/// Whether dropping a pawn on `to` would checkmate the opponent outright.
pub fn is_pawn_drop_mate(pos: &Position, side: Side, to: Square) -> bool {
    let drop = Action::Drop { side, to, kind: PieceKind::Pawn };
    let after_drop = if pos.turn() == side {
        pos.apply(drop)
    } else {
        pos.with_turn(side).apply(drop)
    };
    after_drop.map(|next| next.is_checkmate()).unwrap_or(false)
}

pub fn can_drop(pos: &Position, side: Side, kind: PieceKind, to: Square) -> bool {
    if kind.is_king() || !pos.captured(side).contains(kind) || !pos.is_vacant(to) {
        return false;
    }
    if !kind.can_drop_on(side, to.rank()) {
        return false;
    }
    if kind.is_pawn() {
        return !is_double_pawn(pos, side, to.file()) && !is_pawn_drop_mate(pos, side, to);
    }
    true
}
