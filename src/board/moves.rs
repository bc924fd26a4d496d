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
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::material::{PieceFace, PieceKind, Side};
use super::position::{Pos, Position};
use super::rules;
use super::square::{Mask, Square};
use super::Turn;
use crate::EndReason;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("Action does not match the position")]
    InvalidAction,
    #[error("The game is already over")]
    GameOver,
    #[error("Not a legal action")]
    IllegalAction,
}
use MoveError::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// A step or slide. `face` is the face after the move, so it differs
    /// from the face on `from` when the move promotes.
    Move {
        side: Side,
        from: Square,
        to: Square,
        face: PieceFace,
    },
    /// A held piece placed on an empty square, always unpromoted.
    Drop {
        side: Side,
        to: Square,
        kind: PieceKind,
    },
    Terminal {
        reason: Option<EndReason>,
        winner: Option<Side>,
    },
}

impl Action {
    pub fn side(&self) -> Option<Side> {
        match self {
            Action::Move { side, .. } | Action::Drop { side, .. } => Some(*side),
            Action::Terminal { .. } => None,
        }
    }

    pub fn to(&self) -> Option<Square> {
        match self {
            Action::Move { to, .. } | Action::Drop { to, .. } => Some(*to),
            Action::Terminal { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { side, from, to, face } => write!(
                f,
                "{}{}{}({}{})",
                side,
                to,
                face,
                from.file().to_char(),
                from.rank().to_char()
            ),
            Action::Drop { side, to, kind } => write!(f, "{}{}{}打", side, to, kind),
            Action::Terminal { reason, winner } => {
                match winner {
                    Some(side) => write!(f, "まで{}の勝ち", side)?,
                    None => write!(f, "まで勝負つかず")?,
                }
                if let Some(reason) = reason {
                    write!(f, "({})", reason)?;
                }
                Ok(())
            }
        }
    }
}

pub trait LegalActions: AsRef<Position> {
    /// Squares the piece on `from` could reach, before any promotion or
    /// self-check consideration. Empty when `from` is empty.
    fn destinations(&self, from: Square) -> Mask {
        let pos: &Position = self.as_ref();
        let Some(material) = pos[from] else {
            return Mask::empty();
        };
        let side = material.side();
        let face = material.face();
        let ours = pos.occupied_by(side);
        let theirs = pos.occupied_by(!side);
        let mut mask = face.step_mask(side, from) - ours;
        for dir in face.slides(side) {
            let mut next = from + dir;
            while let Some(square) = next {
                if ours.contains(square) {
                    break;
                }
                mask |= square;
                if theirs.contains(square) {
                    break;
                }
                next = square + dir;
            }
        }
        mask
    }

    /// Move actions for the piece on `from`, for whichever side owns it.
    fn actions_from(&self, from: Square) -> Vec<Action> {
        let pos: &Position = self.as_ref();
        let Some(material) = pos[from] else {
            return Vec::new();
        };
        let side = material.side();
        let face = material.face();
        let mut result = Vec::new();
        for to in self.destinations(from).iter() {
            if rules::can_stay_unpromoted(side, face, to) {
                result.push(Action::Move { side, from, to, face });
            }
            if rules::can_promote(side, face, from, to) {
                result.push(Action::Move { side, from, to, face: face.promoted() });
            }
        }
        result
    }

    /// Move actions by `side` that land on `to`.
    fn actions_onto(&self, to: Square, side: Side) -> Vec<Action> {
        let pos: &Position = self.as_ref();
        pos.occupied_by(side)
            .iter()
            .flat_map(|from| self.actions_from(from))
            .filter(|action| action.to() == Some(to))
            .collect()
    }

    fn drop_actions(&self, side: Side, kind: PieceKind) -> Vec<Action> {
        let pos: &Position = self.as_ref();
        if kind.is_king() || !pos.captured(side).contains(kind) {
            return Vec::new();
        }
        pos.vacant()
            .iter()
            .filter(|&to| rules::can_drop(pos, side, kind, to))
            .map(|to| Action::Drop { side, to, kind })
            .collect()
    }

    /// Every action available to the side to move, square by square:
    /// moves from its own pieces, drops onto empty squares.
    fn legal_actions(&self) -> Vec<Action> {
        let pos: &Position = self.as_ref();
        let side = pos.turn();
        let ours = pos.ours();
        let held: Vec<PieceKind> = pos
            .our_captured()
            .held()
            .map(|(kind, _)| kind)
            .filter(|kind| !kind.is_king())
            .collect();
        let mut result = Vec::new();
        for square in Square::iter() {
            if ours.contains(square) {
                result.extend(self.actions_from(square));
            } else if pos.is_vacant(square) {
                for &kind in &held {
                    if rules::can_drop(pos, side, kind, square) {
                        result.push(Action::Drop { side, to: square, kind });
                    }
                }
            }
        }
        result
    }

    fn validate_action(&self, action: Action) -> Result<Action> {
        let pos: &Position = self.as_ref();
        let legal = match action {
            Action::Move { side, from, .. } => {
                side == pos.turn() && self.actions_from(from).contains(&action)
            }
            Action::Drop { side, to, kind } => {
                side == pos.turn() && rules::can_drop(pos, side, kind, to)
            }
            Action::Terminal { .. } => false,
        };
        if !legal {
            return Err(IllegalAction.into());
        }
        Ok(action)
    }
}

impl LegalActions for Position {}

#[cfg(test)]
mod tests {
    use crate::*;
    use PieceFace::*;
    use Square::*;

    fn destinations(pos: &Position, from: Square) -> Vec<Square> {
        pos.destinations(from).iter().collect()
    }

    #[test]
    fn test_start_position_has_30_actions() {
        let pos = Position::default();
        assert_eq!(pos.legal_actions().len(), 30);
    }
    #[test]
    fn test_second_pieces_do_not_move_first() {
        let pos = Position::default();
        assert!(pos
            .legal_actions()
            .iter()
            .all(|action| action.side() == Some(Side::First)));
        let next = pos.apply(pos.legal_actions()[0]).unwrap();
        assert_eq!(next.legal_actions().len(), 30);
    }
    #[test]
    fn test_empty_square_has_no_destinations() {
        let pos = Position::default();
        assert!(pos.destinations(S55).is_empty());
        assert!(pos.actions_from(S55).is_empty());
    }
    #[test]
    fn test_slides_stop_at_blockers() {
        let pos = Position::empty()
            .set_contents(S55, Some(Material::first(Rook)))
            .set_contents(S53, Some(Material::second(Pawn)))
            .set_contents(S57, Some(Material::first(Pawn)));
        let dests = destinations(&pos, S55);
        assert!(dests.contains(&S54));
        assert!(dests.contains(&S53));
        assert!(!dests.contains(&S52));
        assert!(dests.contains(&S56));
        assert!(!dests.contains(&S57));
        assert_eq!(dests.len(), 2 + 1 + 8);
    }
    #[test]
    fn test_second_lance_slides_down() {
        let pos = Position::empty()
            .set_turn(Side::Second)
            .set_contents(S11, Some(Material::second(Lance)));
        assert_eq!(
            destinations(&pos, S11),
            vec![S12, S13, S14, S15, S16, S17, S18, S19]
        );
    }
    #[test]
    fn test_dragon_adds_diagonal_steps() {
        let pos = Position::empty().set_contents(S55, Some(Material::first(Dragon)));
        let dests = destinations(&pos, S55);
        assert_eq!(dests.len(), 16 + 4);
        assert!(dests.contains(&S44));
        assert!(!dests.contains(&S33));
    }
    #[test]
    fn test_promotion_choice_entering_zone() {
        let pos = Position::empty().set_contents(S74, Some(Material::first(Pawn)));
        assert_eq!(
            pos.actions_from(S74),
            vec![
                Action::Move { side: Side::First, from: S74, to: S73, face: Pawn },
                Action::Move { side: Side::First, from: S74, to: S73, face: Tokin },
            ]
        );
    }
    #[test]
    fn test_pawn_must_promote_on_last_rank() {
        let pos = Position::empty().set_contents(S72, Some(Material::first(Pawn)));
        assert_eq!(
            pos.actions_from(S72),
            vec![Action::Move { side: Side::First, from: S72, to: S71, face: Tokin }]
        );
    }
    #[test]
    fn test_knight_must_promote_on_last_two_ranks() {
        let pos = Position::empty()
            .set_turn(Side::Second)
            .set_contents(S26, Some(Material::second(Knight)));
        let actions = pos.actions_from(S26);
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|action| matches!(
            action,
            Action::Move { face: PromotedKnight, .. }
        )));
    }
    #[test]
    fn test_leaving_zone_may_promote() {
        let pos = Position::empty().set_contents(S33, Some(Material::first(Silver)));
        let actions = pos.actions_from(S33);
        // five destinations, each with and without promotion
        assert_eq!(actions.len(), 10);
        assert!(actions.contains(&Action::Move {
            side: Side::First,
            from: S33,
            to: S44,
            face: PromotedSilver
        }));
    }
    #[test]
    fn test_gold_and_promoted_never_promote() {
        let pos = Position::empty()
            .set_contents(S33, Some(Material::first(Gold)))
            .set_contents(S77, Some(Material::first(Horse)));
        assert_eq!(pos.actions_from(S33).len(), 6);
        assert!(pos
            .actions_from(S77)
            .iter()
            .all(|action| matches!(action, Action::Move { face: Horse, .. })));
    }
    #[test]
    fn test_two_pawns_rule() {
        let pos = Position::empty()
            .set_contents(S59, Some(Material::first(King)))
            .set_contents(S57, Some(Material::first(Pawn)))
            .set_captured(Side::First, CapturedSet::default().with(PieceKind::Pawn, 1));
        let drops = pos.drop_actions(Side::First, PieceKind::Pawn);
        assert!(!drops.is_empty());
        assert!(drops
            .iter()
            .all(|action| action.to().map(|to| to.file()) != Some(File::File5)));
        assert!(drops
            .iter()
            .all(|action| action.to().map(|to| to.rank()) != Some(Rank::Rank1)));
        // 8 files, ranks 2 to 9
        assert_eq!(drops.len(), 8 * 8);
    }
    #[test]
    fn test_promoted_pawn_does_not_block_drops() {
        let pos = Position::empty()
            .set_contents(S53, Some(Material::first(Tokin)))
            .set_captured(Side::First, CapturedSet::default().with(PieceKind::Pawn, 1));
        let drops = pos.drop_actions(Side::First, PieceKind::Pawn);
        assert!(drops.contains(&Action::Drop {
            side: Side::First,
            to: S55,
            kind: PieceKind::Pawn
        }));
    }
    #[test]
    fn test_no_drops_without_held_pieces() {
        let pos = Position::empty();
        assert!(pos.drop_actions(Side::First, PieceKind::Gold).is_empty());
        let pos = pos.set_captured(Side::First, CapturedSet::default().with(PieceKind::King, 1));
        assert!(pos.drop_actions(Side::First, PieceKind::King).is_empty());
        assert!(pos.legal_actions().is_empty());
    }
    #[test]
    fn test_drops_in_legal_actions() {
        let pos = Position::empty()
            .set_captured(Side::First, CapturedSet::default().with(PieceKind::Gold, 1));
        let actions = pos.legal_actions();
        assert_eq!(actions.len(), 81);
        assert_eq!(
            actions[0],
            Action::Drop { side: Side::First, to: S11, kind: PieceKind::Gold }
        );
    }
    #[test]
    fn test_validate_action() {
        let pos = Position::default();
        let action = Action::Move { side: Side::First, from: S77, to: S76, face: Pawn };
        assert_eq!(pos.validate_action(action).unwrap(), action);
        let illegal = Action::Move { side: Side::First, from: S77, to: S75, face: Pawn };
        let err = pos.validate_action(illegal).unwrap_err();
        assert_eq!(err.downcast_ref::<MoveError>(), Some(&MoveError::IllegalAction));
        let promote = Action::Move { side: Side::First, from: S77, to: S76, face: Tokin };
        assert!(pos.validate_action(promote).is_err());
    }
    #[test]
    fn test_action_display() {
        let action = Action::Move { side: Side::First, from: S77, to: S76, face: Pawn };
        assert_eq!(action.to_string(), "▲７六歩(77)");
        let action = Action::Drop { side: Side::Second, to: S55, kind: PieceKind::Bishop };
        assert_eq!(action.to_string(), "▽５五角打");
        let action = Action::Terminal {
            reason: Some(EndReason::Checkmate),
            winner: Some(Side::First),
        };
        assert_eq!(action.to_string(), "まで▲の勝ち(詰み)");
        let action = Action::Terminal { reason: Some(EndReason::Repetition), winner: None };
        assert_eq!(action.to_string(), "まで勝負つかず(千日手)");
    }
}
