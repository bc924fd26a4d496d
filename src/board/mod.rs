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

//! Shogi board and rules engine
//!
//! A _board_ holds the state of a game of shogi and provides the core
//! mechanisms to generate, validate and apply actions. The following
//! features are supported:
//!
//! [x] Standard piece movement, captures and drops
//! [x] Promotion zone, forced promotion and the two-pawns rule
//! [x] No checkmate by pawn drop
//! [x] Check and checkmate detection (captures and king moves only)
//! [x] Handicap starting layouts
//! [x] Compact binary and base64 position codec (even games only)
//! [x] Text board diagrams
//! [x] Review prior positions
//! [ ] Repetition (sennichite)
//! [ ] Impasse (jishogi) scoring
//! [ ] Time Controls
//!
//! Some of the key abstractions include:
//!
//! * A `Square` names one of the 81 squares by `File` (1..9, counted
//!   from the First side's right) and `Rank` (1..9, counted from the
//!   Second side's edge). Squares display the traditional way, e.g.
//!   `７六`, and parse from either `"76"` or `"７六"`.
//!
//! * A `Mask` is a 128-bit value in which 81 bits map to squares. Masks
//!   combine with `|`, `&`, `-` and `!`, and `iter()` walks the set squares
//!   in index order.
//!
//! * A `Material` is a `PieceFace` owned by a `Side`. There are eight
//!   `PieceKind`s and fourteen faces (six of them promoted). Movement is
//!   defined once for the First side and mirrored for the Second.
//!
//! * A `CapturedSet` counts the pieces a side holds in hand.
//!
//! * A `Position` is immutable. `apply` returns a successor whose
//!   `previous` shares the position it came from, so a history is a
//!   tree of reference-counted nodes. `ancestors()` and `line()` walk it.
//!
//! * The `LegalActions` trait generates moves and drops, and `Checks`
//!   finds attackers of a king. Whether a position is checkmate is
//!   decided lazily and remembered.
//!
//! * A `Game` plays both sides, accepting only legal actions and
//!   recording the result once a king is captured, a side is mated or a
//!   player resigns.
//!

mod captured;
mod check;
mod codec;
mod diagram;
mod handicap;
mod history;
mod material;
mod moves;
mod play;
mod position;
pub mod rules;
mod square;

pub use captured::*;
pub use check::*;
pub use codec::*;
pub use diagram::*;
pub use handicap::*;
pub use history::*;
pub use material::*;
pub use moves::*;
pub use play::*;
pub use position::*;
pub use square::*;

pub trait Turn {
    fn turn(&self) -> Side;
}
