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

use std::ops::Index;
use std::sync::Arc;

use super::material::{Cell, Side};
use super::moves::Action;
use super::position::{Pos, Position};
use super::square::Square;
use super::Turn;

/// Walks the predecessor chain, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Position>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Position;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous().map(Arc::as_ref);
        Some(current)
    }
}

impl Position {
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.previous().map(Arc::as_ref),
        }
    }

    /// The path from the root of this position's history down to a copy of
    /// this position, positioned at the end.
    pub fn line(&self) -> Line {
        let mut positions = vec![Arc::new(self.clone())];
        let mut next = self.previous().cloned();
        while let Some(position) = next {
            next = position.previous().cloned();
            positions.push(position);
        }
        positions.reverse();
        Line::new(positions)
    }
}

#[allow(clippy::len_without_is_empty)]
pub trait Review {
    fn len(&self) -> usize;
    fn offset(&self) -> usize;
    fn get(&self, offset: usize) -> Option<&Position>;

    #[inline]
    fn at_start(&self) -> bool {
        self.offset() == 0
    }
    #[inline]
    fn at_end(&self) -> bool {
        self.offset() + 1 == self.len()
    }
    #[inline]
    fn first(&self) -> &Position {
        self.get(0).expect("Review::first - out of bounds")
    }
    #[inline]
    fn last(&self) -> &Position {
        self.get(self.len() - 1).expect("Review::last - out of bounds")
    }
    #[inline]
    fn current(&self) -> &Position {
        self.get(self.offset())
            .expect("Review::current - out of bounds")
    }
}

pub trait ReviewMut: Review {
    fn set_offset(&mut self, offset: usize);

    #[inline]
    fn forward(&mut self) {
        if !self.at_end() {
            self.set_offset(self.offset() + 1);
        }
    }
    #[inline]
    fn back(&mut self) {
        if !self.at_start() {
            self.set_offset(self.offset() - 1);
        }
    }
    #[inline]
    fn skip_to_start(&mut self) {
        self.set_offset(0);
    }
    #[inline]
    fn skip_to_end(&mut self) {
        self.set_offset(self.len() - 1);
    }
}

/// A root-to-leaf sequence of shared positions with a review cursor.
#[derive(Debug, Clone)]
pub struct Line {
    offset: usize,
    positions: Vec<Arc<Position>>,
}

impl Line {
    fn new(positions: Vec<Arc<Position>>) -> Self {
        debug_assert!(!positions.is_empty());
        Self {
            offset: positions.len() - 1,
            positions,
        }
    }

    /// The actions that lead from the first position to the last.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.positions
            .iter()
            .skip(1)
            .filter_map(|position| position.last_action())
    }
}

impl Turn for Line {
    fn turn(&self) -> Side {
        self.current().turn()
    }
}

impl Review for Line {
    #[inline]
    fn len(&self) -> usize {
        self.positions.len()
    }
    #[inline]
    fn offset(&self) -> usize {
        self.offset
    }
    #[inline]
    fn get(&self, offset: usize) -> Option<&Position> {
        self.positions.get(offset).map(Arc::as_ref)
    }
}

impl ReviewMut for Line {
    #[inline]
    fn set_offset(&mut self, offset: usize) {
        debug_assert!(offset < self.len());
        self.offset = offset.min(self.len() - 1);
    }
}

impl Index<Square> for Line {
    type Output = Cell;
    fn index(&self, index: Square) -> &Self::Output {
        self.current().index(index)
    }
}

impl AsRef<Position> for Line {
    fn as_ref(&self) -> &Position {
        self.current()
    }
}

impl Pos for Line {}

#[cfg(test)]
mod tests {
    use crate::*;
    use PieceFace::*;
    use Square::*;

    fn opening() -> Position {
        let pos = Position::default().with_ply(0);
        let pos = pos
            .apply(Action::Move { side: Side::First, from: S77, to: S76, face: Pawn })
            .unwrap();
        let pos = pos
            .apply(Action::Move { side: Side::Second, from: S33, to: S34, face: Pawn })
            .unwrap();
        pos.apply(Action::Move { side: Side::First, from: S88, to: S22, face: Horse })
            .unwrap()
    }

    #[test]
    fn test_ancestors() {
        let pos = opening();
        let plies: Vec<_> = pos.ancestors().map(|p| p.ply()).collect();
        assert_eq!(plies, vec![Some(2), Some(1), Some(0)]);
        assert_eq!(pos.ancestors().last(), Some(&Position::default()));
        assert_eq!(Position::default().ancestors().count(), 0);
    }
    #[test]
    fn test_line_review() {
        let pos = opening();
        let mut line = pos.line();
        assert_eq!(line.len(), 4);
        assert!(line.at_end());
        assert_eq!(line.current(), &pos);
        assert_eq!(line.contents(S22), &Some(Material::first(Horse)));
        assert_eq!(line.turn(), Side::Second);

        line.back();
        assert_eq!(line.offset(), 2);
        assert_eq!(line[S22], Some(Material::second(Bishop)));
        line.skip_to_start();
        assert!(line.at_start());
        assert_eq!(line.current(), &Position::default());
        line.back();
        assert!(line.at_start());
        line.forward();
        assert_eq!(line.current().ply(), Some(1));
        line.skip_to_end();
        assert_eq!(line.current(), line.last());
        line.forward();
        assert!(line.at_end());
    }
    #[test]
    fn test_line_actions() {
        let line = opening().line();
        let actions: Vec<String> = line.actions().map(|action| action.to_string()).collect();
        assert_eq!(actions, vec!["▲７六歩(77)", "▽３四歩(33)", "▲２二馬(88)"]);
    }
}
