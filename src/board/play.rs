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
#[cfg(feature = "random")]
use rand::{seq::SliceRandom, Rng};
use std::ops::Index;
use std::sync::Arc;
use tracing::{debug, info};

use super::handicap::Handicap;
use super::history::Line;
use super::material::{Cell, Side};
use super::moves::{Action, LegalActions, MoveError};
use super::position::{Pos, Position, Status};
use super::square::Square;
use super::Turn;
use crate::{EndReason, GameId, GameResult};

/// Drives a single game: accepts legal actions for the side to move and
/// records the outcome once the game ends.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    position: Arc<Position>,
    result: Option<GameResult>,
    terminal: Option<Action>,
}

impl Game {
    pub fn new(id: GameId, handicap: Handicap) -> Self {
        Self::from_position(id, Position::new(handicap).with_ply(0))
    }

    #[cfg(feature = "random")]
    pub fn random(handicap: Handicap) -> Self {
        Self::new(GameId::random(), handicap)
    }

    /// Continues play from an arbitrary position. The game is over at once
    /// if that position is already decided.
    pub fn from_position(id: GameId, position: Position) -> Self {
        let mut game = Self {
            id,
            position: Arc::new(position),
            result: None,
            terminal: None,
        };
        game.update_result();
        game
    }

    /// Rebuilds a game by submitting `actions` in order.
    pub fn replay(id: GameId, handicap: Handicap, actions: &[Action]) -> Result<Self> {
        let mut game = Self::new(id, handicap);
        for action in actions {
            game.submit_action(*action)?;
        }
        Ok(game)
    }

    #[inline]
    pub fn id(&self) -> GameId {
        self.id
    }
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }
    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }
    #[inline]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// The closing action, once the game has ended.
    #[inline]
    pub fn terminal_action(&self) -> Option<Action> {
        self.terminal
    }

    /// Empty once the game is over.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return Vec::new();
        }
        self.position.legal_actions()
    }

    pub fn line(&self) -> Line {
        self.position.line()
    }

    pub fn submit_action(&mut self, action: Action) -> Result<()> {
        if self.is_over() {
            return Err(MoveError::GameOver.into());
        }
        let action = self.position.validate_action(action)?;
        let next = self.position.apply_shared(action)?;
        debug!(game = self.id.value(), action = %action, ply = ?next.ply(), "accepted action");
        self.position = Arc::new(next);
        self.update_result();
        Ok(())
    }

    /// Ends the game in favour of the other side.
    pub fn resign(&mut self, side: Side) -> Result<Action> {
        if self.is_over() {
            return Err(MoveError::GameOver.into());
        }
        Ok(self.finish(GameResult::Win(!side, EndReason::Resignation)))
    }

    /// Plays uniformly random legal actions for both sides until the game
    /// ends or `max_plies` actions have been submitted.
    #[cfg(feature = "random")]
    pub fn play_random<R: Rng + ?Sized>(&mut self, rng: &mut R, max_plies: usize) -> Result<Option<GameResult>> {
        for _ in 0..max_plies {
            let actions = self.legal_actions();
            let Some(&action) = actions.choose(rng) else {
                break;
            };
            self.submit_action(action)?;
        }
        Ok(self.result)
    }

    fn update_result(&mut self) {
        let result = match self.position.status() {
            Status::Ongoing => return,
            Status::Checkmate(side) => GameResult::Win(side, EndReason::Checkmate),
            Status::KingCaptured(side) => GameResult::Win(side, EndReason::KingCaptured),
        };
        self.finish(result);
    }

    fn finish(&mut self, result: GameResult) -> Action {
        info!(game = self.id.value(), ?result, "game over");
        let terminal = Action::Terminal {
            reason: Some(result.reason()),
            winner: result.winner(),
        };
        self.terminal = Some(terminal);
        self.result = Some(result);
        terminal
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameId::default(), Handicap::default())
    }
}

impl Turn for Game {
    #[inline]
    fn turn(&self) -> Side {
        self.position.turn()
    }
}

impl Index<Square> for Game {
    type Output = Cell;
    fn index(&self, index: Square) -> &Self::Output {
        self.position.index(index)
    }
}

impl AsRef<Position> for Game {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl Pos for Game {}
