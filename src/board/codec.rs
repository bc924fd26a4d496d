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

//! Compact binary form of a position, and its base64 text wrapping.
//!
//! Bits are written most significant first:
//!
//! * 1 bit variant tag (`0` for the even layout; nothing else is supported)
//! * 1 bit side to move (`0` First, `1` Second)
//! * each square, rank 1 to 9 and file 1 to 9 within a rank: `0` when
//!   empty, otherwise a face code followed by 1 bit for the owning side
//! * 17 bits for each side's captured set, First then Second
//!
//! The last byte is padded with zeros.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::captured::CapturedSet;
use super::handicap::Handicap;
use super::material::{Material, Pair, PieceFace, Side};
use super::position::{Board, Position};
use super::square::{File, Rank, Square};
use super::Turn;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("Only the even layout can be encoded")]
    UnsupportedVariant,
    #[error("Unexpected end of data")]
    Truncated,
    #[error("Unknown piece code")]
    UnknownFace,
    #[error("Captured pieces out of range")]
    CapturedOutOfRange,
    #[error("Unexpected data after the position")]
    TrailingBits,
    #[error("Malformed base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
use CodecError::*;

// (code, width) indexed by face. See `read_face` for the decoding side.
const FACE_CODES: [(u16, usize); 14] = [
    (0b10, 2),          // Pawn
    (0b11101, 5),       // Lance
    (0b11100, 5),       // Knight
    (0b1101, 4),        // Silver
    (0b1100, 4),        // Gold
    (0b111101, 6),      // Bishop
    (0b1111100, 7),     // Rook
    (0b111100, 6),      // King
    (0b1111101, 7),     // Tokin
    (0b1111111011, 10), // PromotedLance
    (0b1111111010, 10), // PromotedKnight
    (0b111111100, 9),   // PromotedSilver
    (0b11111100, 8),    // Horse
    (0b11111101, 8),    // Dragon
];

#[derive(Debug, Default)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[self.len / 8] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    fn push_bits(&mut self, value: u32, width: usize) {
        for shift in (0..width).rev() {
            self.push((value >> shift) & 1 == 1);
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn read(&mut self) -> Result<bool, CodecError> {
        let byte = self.bytes.get(self.offset / 8).ok_or(Truncated)?;
        let bit = byte & (0x80 >> (self.offset % 8)) != 0;
        self.offset += 1;
        Ok(bit)
    }

    fn read_bits(&mut self, width: usize) -> Result<u32, CodecError> {
        let mut value = 0;
        for _ in 0..width {
            value = (value << 1) | self.read()? as u32;
        }
        Ok(value)
    }

    /// Reads a square: `None` for `0`, otherwise a face code.
    fn read_face(&mut self) -> Result<Option<PieceFace>, CodecError> {
        use PieceFace::*;
        let mut ones = 0;
        while ones < 8 && self.read()? {
            ones += 1;
        }
        let face = match ones {
            0 => return Ok(None),
            1 => Pawn,
            2 => self.pick(Gold, Silver)?,
            3 => self.pick(Knight, Lance)?,
            4 => self.pick(King, Bishop)?,
            5 => self.pick(Rook, Tokin)?,
            6 => self.pick(Horse, Dragon)?,
            7 => {
                if self.read()? {
                    self.pick(PromotedKnight, PromotedLance)?
                } else {
                    PromotedSilver
                }
            }
            _ => return Err(UnknownFace),
        };
        Ok(Some(face))
    }

    fn pick(&mut self, zero: PieceFace, one: PieceFace) -> Result<PieceFace, CodecError> {
        Ok(if self.read()? { one } else { zero })
    }

    /// Everything after the last field must be zero padding within the
    /// final byte.
    fn finish(mut self) -> Result<(), CodecError> {
        if self.bytes.len() != (self.offset + 7) / 8 {
            return Err(TrailingBits);
        }
        while self.offset % 8 != 0 {
            if self.read()? {
                return Err(TrailingBits);
            }
        }
        Ok(())
    }
}

// Rank-major, file ascending within a rank.
fn codec_order() -> impl Iterator<Item = Square> {
    Rank::iter().flat_map(|rank| File::iter().map(move |file| Square::new(file, rank)))
}

impl Position {
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.handicap() != Handicap::Even {
            return Err(UnsupportedVariant.into());
        }
        let mut writer = BitWriter::default();
        writer.push(false);
        writer.push(self.turn() == Side::Second);
        for square in codec_order() {
            match self[square] {
                None => writer.push(false),
                Some(material) => {
                    let (code, width) = FACE_CODES[material.face().to_index()];
                    writer.push_bits(code as u32, width);
                    writer.push(material.side() == Side::Second);
                }
            }
        }
        for side in Side::iter() {
            let packed = self.captured(side).to_packed().ok_or(CapturedOutOfRange)?;
            writer.push_bits(packed, CapturedSet::PACKED_BITS);
        }
        Ok(writer.into_bytes())
    }

    pub fn decode(bytes: &[u8]) -> Result<Position> {
        let mut reader = BitReader::new(bytes);
        if reader.read()? {
            return Err(UnsupportedVariant.into());
        }
        let turn = if reader.read()? { Side::Second } else { Side::First };
        let mut board = Board::empty();
        for square in codec_order() {
            if let Some(face) = reader.read_face()? {
                let side = if reader.read()? { Side::Second } else { Side::First };
                board[square] = Some(Material::new(side, face));
            }
        }
        let mut captured = Pair::<CapturedSet>::default();
        for side in Side::iter() {
            let packed = reader.read_bits(CapturedSet::PACKED_BITS)?;
            captured[side] = CapturedSet::from_packed(packed).ok_or(CapturedOutOfRange)?;
        }
        reader.finish()?;
        Position::from_board(turn, board, captured)
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.encode()?))
    }

    pub fn from_base64(text: &str) -> Result<Position> {
        let bytes = STANDARD.decode(text).map_err(CodecError::from)?;
        Self::decode(&bytes)
    }
}
