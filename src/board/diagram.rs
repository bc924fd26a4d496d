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

use anyhow::Result;
use thiserror::Error;

use super::captured::CapturedSet;
use super::material::{Cell, Material, Pair, PieceFace, PieceKind, Side};
use super::position::Position;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Expecting 9 board rows, found {0}")]
    RowCount(usize),
    #[error("Expecting 9 cells in row: {0}")]
    BadRow(String),
    #[error("Unrecognized cell: {0}")]
    BadCell(String),
    #[error("Unrecognized captured pieces: {0}")]
    BadCaptured(String),
    #[error("Unrecognized line: {0}")]
    UnknownLine(String),
}
use DiagramError::*;

const EMPTY_CELL: &str = "　　";

/// Generate the text diagram for a position: the Second side's captured
/// pieces, nine board rows from rank 一 with file 9 on the left, then the
/// First side's captured pieces.
pub fn to_diagram(pos: &Position) -> String {
    let mut s = String::new();
    s.push_str(&format!("後手持駒:{}\n", pos.captured(Side::Second)));
    for row in pos.rows() {
        s.push('|');
        for cell in row {
            match cell {
                None => s.push_str(EMPTY_CELL),
                Some(material) => {
                    s.push_str(&material.side().to_string());
                    s.push(cell_glyph(material));
                }
            }
            s.push('|');
        }
        s.push('\n');
    }
    s.push_str(&format!("先手持駒:{}\n", pos.captured(Side::First)));
    s
}

/// Parse a text diagram into a position with `turn` to move.
///
/// Lines may end with `\n`, `\r` or `\r\n`. Blank lines are ignored. A
/// missing captured line means nothing is held.
pub fn from_diagram(text: &str, turn: Side) -> Result<Position> {
    let mut rows: Vec<[Cell; 9]> = Vec::new();
    let mut captured = Pair::<CapturedSet>::default();
    for line in text.split(['\r', '\n']).map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with('|') {
            rows.push(parse_row(line)?);
        } else if let Some((label, items)) = line.split_once(':') {
            let side = captured_label(label).ok_or_else(|| UnknownLine(line.to_string()))?;
            captured[side] = parse_captured(items)?;
        } else {
            return Err(UnknownLine(line.to_string()).into());
        }
    }
    let rows: [[Cell; 9]; 9] = rows.try_into().map_err(|rows: Vec<_>| RowCount(rows.len()))?;
    Position::from_rows(turn, &rows, captured)
}

fn cell_glyph(material: Material) -> char {
    match (material.side(), material.face()) {
        (Side::Second, PieceFace::King) => '王',
        (_, face) => face.glyph(),
    }
}

fn captured_label(label: &str) -> Option<Side> {
    match label.trim() {
        "先手持駒" | "▲持駒" | "☗持駒" => Some(Side::First),
        "後手持駒" | "▽持駒" | "△持駒" | "☖持駒" => Some(Side::Second),
        _ => None,
    }
}

fn parse_row(line: &str) -> Result<[Cell; 9]> {
    let inner = line.trim_start_matches('|').trim_end_matches('|');
    let cells: Vec<&str> = inner.split('|').collect();
    if cells.len() != 9 {
        return Err(BadRow(line.to_string()).into());
    }
    let mut row = [None; 9];
    for (cell, text) in row.iter_mut().zip(cells) {
        *cell = parse_cell(text)?;
    }
    Ok(row)
}

fn parse_cell(text: &str) -> Result<Cell> {
    let trimmed = text.trim_matches(|c: char| c == ' ' || c == '　');
    if trimmed.is_empty() {
        return Ok(None);
    }
    let mut chars = trimmed.chars();
    let (Some(marker), Some(glyph), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(BadCell(text.to_string()).into());
    };
    let side = match marker {
        '▲' | '☗' => Side::First,
        '▽' | '△' | '☖' => Side::Second,
        _ => return Err(BadCell(text.to_string()).into()),
    };
    let face = face_from_glyph(glyph).ok_or_else(|| BadCell(text.to_string()))?;
    Ok(Some(Material::new(side, face)))
}

fn face_from_glyph(glyph: char) -> Option<PieceFace> {
    use PieceFace::*;
    let face = match glyph {
        '歩' => Pawn,
        '香' => Lance,
        '桂' => Knight,
        '銀' => Silver,
        '金' => Gold,
        '角' => Bishop,
        '飛' => Rook,
        '玉' | '王' => King,
        'と' => Tokin,
        '杏' => PromotedLance,
        '圭' => PromotedKnight,
        '全' => PromotedSilver,
        '馬' => Horse,
        '竜' | '龍' => Dragon,
        _ => return None,
    };
    Some(face)
}

fn parse_captured(items: &str) -> Result<CapturedSet> {
    let mut set = CapturedSet::empty();
    let items = items.trim();
    if items.is_empty() || items == "なし" {
        return Ok(set);
    }
    for item in items.split([',', '、', '，']).map(str::trim) {
        let mut chars = item.chars();
        let kind = chars
            .next()
            .and_then(face_from_glyph)
            .filter(|face| !face.is_promoted())
            .map(|face| face.kind())
            .ok_or_else(|| BadCaptured(item.to_string()))?;
        let digits: String = chars
            .map(|c| match c {
                '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
                _ => c,
            })
            .collect();
        let count: u8 = if digits.is_empty() {
            1
        } else {
            digits.parse().map_err(|_| BadCaptured(item.to_string()))?
        };
        for _ in 0..count {
            set.try_add(kind)?;
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use crate::*;

    const START: &str = "後手持駒:なし
|▽香|▽桂|▽銀|▽金|▽王|▽金|▽銀|▽桂|▽香|
|　　|▽飛|　　|　　|　　|　　|　　|▽角|　　|
|▽歩|▽歩|▽歩|▽歩|▽歩|▽歩|▽歩|▽歩|▽歩|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|
|　　|▲角|　　|　　|　　|　　|　　|▲飛|　　|
|▲香|▲桂|▲銀|▲金|▲玉|▲金|▲銀|▲桂|▲香|
先手持駒:なし
";

    #[test]
    fn test_start_position_diagram() {
        assert_eq!(to_diagram(&Position::default()), START);
        let pos = from_diagram(START, Side::First).unwrap();
        assert_eq!(pos, Position::default());
    }
    #[test]
    fn test_carriage_returns_and_alternate_glyphs() {
        let text = START
            .replace('\n', "\r")
            .replace("▲玉", "▲王")
            .replace("後手持駒:なし", "▽持駒:なし");
        let pos = from_diagram(&text, Side::First).unwrap();
        assert_eq!(pos, Position::default());
    }
    #[test]
    fn test_captured_lines() {
        let text = START
            .replace("後手持駒:なし", "後手持駒:歩")
            .replace("|▽歩|▽歩|▽歩|▽歩|▽歩|", "|▽歩|▽歩|▽歩|▽歩|　　|")
            .replace("先手持駒:なし", "先手持駒:");
        let pos = from_diagram(&text, Side::Second).unwrap();
        assert_eq!(pos.turn(), Side::Second);
        assert_eq!(pos.captured(Side::Second).count(PieceKind::Pawn), 1);
        assert!(pos.captured(Side::First).is_empty());
        assert!(to_diagram(&pos).starts_with("後手持駒:歩\n"));
    }
    #[test]
    fn test_counted_captured_pieces() {
        let text = START
            .replace("先手持駒:なし", "先手持駒:桂,歩7")
            .replace("|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|▲歩|", &format!("|{}", "　　|".repeat(9)))
            .replace("|▲香|▲桂|", "|▲香|　　|");
        let pos = from_diagram(&text, Side::First).unwrap();
        assert_eq!(pos.captured(Side::First).count(PieceKind::Pawn), 7);
        assert_eq!(pos.captured(Side::First).count(PieceKind::Knight), 1);
        assert!(to_diagram(&pos).ends_with("先手持駒:桂,歩7\n"));
    }
    #[test]
    fn test_malformed_diagrams() {
        let err = from_diagram("後手持駒:なし\n先手持駒:なし\n", Side::First).unwrap_err();
        assert_eq!(err.downcast_ref::<DiagramError>(), Some(&DiagramError::RowCount(0)));

        let text = START.replace("|▽香|▽桂|", "|▽香|▽Ｘ|");
        let err = from_diagram(&text, Side::First).unwrap_err();
        assert!(matches!(err.downcast_ref::<DiagramError>(), Some(DiagramError::BadCell(_))));

        let text = START.replace("|▽香|▽桂|", "|▽香|");
        let err = from_diagram(&text, Side::First).unwrap_err();
        assert!(matches!(err.downcast_ref::<DiagramError>(), Some(DiagramError::BadRow(_))));

        let text = START.replace("先手持駒:なし", "先手持駒:と");
        let err = from_diagram(&text, Side::First).unwrap_err();
        assert!(matches!(err.downcast_ref::<DiagramError>(), Some(DiagramError::BadCaptured(_))));

        let text = START.replace("先手持駒:なし", "持駒:なし");
        let err = from_diagram(&text, Side::First).unwrap_err();
        assert!(matches!(err.downcast_ref::<DiagramError>(), Some(DiagramError::UnknownLine(_))));
    }
    #[test]
    fn test_second_king_rejected() {
        let text = START.replacen("|▲歩|", "|▲玉|", 1);
        let err = from_diagram(&text, Side::First).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PositionError>(),
            Some(&PositionError::MultipleKings(Side::First))
        );
    }
}
