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

#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Side;

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(u64);

impl GameId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
    #[cfg(feature = "random")]
    pub fn random() -> Self {
        Self(thread_rng().gen())
    }
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win(Side, EndReason),
    Draw(EndReason),
}

impl GameResult {
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameResult::Win(side, _) => Some(*side),
            GameResult::Draw(_) => None,
        }
    }
    pub fn reason(&self) -> EndReason {
        match self {
            GameResult::Win(_, reason) | GameResult::Draw(reason) => *reason,
        }
    }
}

/// Why a game ended.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    Resignation,
    Checkmate,
    Foul,
    KingCaptured,
    // Both kings entered; decided by points
    Impasse,
    Repetition,
    Draw,
}

impl EndReason {
    pub fn try_from_str(s: &str) -> Option<Self> {
        use EndReason::*;
        match s {
            "投了" => Some(Resignation),
            "詰み" => Some(Checkmate),
            "反則" => Some(Foul),
            "玉取り" => Some(KingCaptured),
            "持将棋" => Some(Impasse),
            "千日手" => Some(Repetition),
            "引き分け" => Some(Draw),
            _ => None,
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EndReason::*;
        let s = match self {
            Resignation => "投了",
            Checkmate => "詰み",
            Foul => "反則",
            KingCaptured => "玉取り",
            Impasse => "持将棋",
            Repetition => "千日手",
            Draw => "引き分け",
        };
        write!(f, "{}", s)
    }
}
