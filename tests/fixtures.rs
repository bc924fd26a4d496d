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

use riff_shogi::*;
use Square::*;

const TEST1: &str = "後手持駒:桂\r\
|▽香|▲竜|　　|　　|　　|　　|　　|　　|▽香|\r\
|　　|　　|▲金|　　|▲竜|　　|　　|　　|　　|\r\
|▽歩|▲全|　　|　　|▽金|　　|▽歩|▽桂|▽歩|\r\
|　　|▽歩|　　|　　|▽王|　　|▽銀|　　|　　|\r\
|　　|　　|　　|▲金|▲角|　　|　　|　　|　　|\r\
|　　|　　|▽香|▲歩|▲歩|▲銀|▲桂|　　|　　|\r\
|▲歩|▲歩|　　|　　|　　|▲歩|▲銀|　　|▲歩|\r\
|　　|　　|　　|▲金|　　|　　|　　|▲歩|　　|\r\
|▲香|　　|　　|▲玉|　　|　　|　　|▽馬|　　|\r\
先手持駒:桂,歩7";

const SAMPLE1: &str = "後手持駒:歩5,香,銀,金,角\r\
|▽香|▽桂|　　|▲竜|　　|　　|　　|　　|　　|\r\
|　　|　　|　　|　　|　　|　　|　　|▲と|　　|\r\
|▽歩|　　|▽歩|▽銀|▽歩|　　|▲竜|　　|　　|\r\
|　　|　　|▽桂|　　|　　|　　|　　|▽歩|　　|\r\
|▲歩|▽王|▲金|　　|　　|　　|▲歩|▽銀|　　|\r\
|　　|　　|▲歩|　　|▲歩|　　|　　|　　|　　|\r\
|　　|▲歩|　　|▲歩|　　|▲金|　　|　　|　　|\r\
|　　|　　|　　|▲銀|　　|　　|　　|▽と|　　|\r\
|▲香|▲桂|　　|▲金|　　|　　|▽飛|　　|　　|\r\
先手持駒:桂,香,歩2";

const SAMPLE2: &str = "後手持駒:歩2,香2,銀\r\
|　　|　　|　　|　　|　　|　　|　　|▲と|　　|\r\
|　　|　　|　　|　　|　　|　　|　　|　　|▲金|\r\
|　　|　　|　　|　　|　　|▽歩|▲竜|　　|　　|\r\
|▽歩|　　|　　|　　|▽銀|　　|▽歩|▽金|▽王|\r\
|　　|　　|▽銀|　　|▽桂|　　|　　|▽歩|▽歩|\r\
|　　|▽香|　　|▲歩|▲桂|▲歩|　　|　　|　　|\r\
|　　|▽金|▲歩|　　|▲歩|　　|　　|▽馬|　　|\r\
|　　|　　|　　|▲桂|▲銀|　　|　　|▽竜|　　|\r\
|　　|　　|▲玉|▲金|　　|　　|　　|▽圭|　　|\r\
先手持駒:歩6,桂,角";

const SAMPLE3: &str = "後手持駒:歩2,香2,銀\r\
|　　|　　|　　|　　|　　|　　|　　|▲と|　　|\r\
|　　|　　|　　|　　|　　|　　|　　|　　|▲金|\r\
|　　|　　|　　|　　|　　|▽歩|▲竜|　　|　　|\r\
|▽歩|　　|　　|　　|▽銀|　　|▽歩|▽金|▽王|\r\
|　　|　　|▽銀|　　|▽桂|　　|　　|▽歩|▽歩|\r\
|　　|▽香|　　|▲歩|▲桂|▲歩|　　|　　|　　|\r\
|　　|　　|▲歩|　　|▲歩|　　|　　|▽馬|　　|\r\
|　　|▽金|　　|▲桂|▲銀|　　|　　|▽竜|　　|\r\
|　　|　　|▲玉|▲金|　　|　　|　　|▽圭|　　|\r\
先手持駒:歩6,桂,角";

const PAWN_DROP: &str = "後手持駒:なし
|　　|　　|　　|　　|　　|　　|　　|▽香|▽王|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|▲金|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|　　|　　|　　|　　|　　|
|　　|　　|　　|　　|▲玉|　　|　　|　　|　　|
先手持駒:歩";

fn fixtures() -> Vec<(&'static str, Position, bool)> {
    [
        ("test1", TEST1, Side::Second, true),
        ("sample1", SAMPLE1, Side::Second, true),
        ("sample2", SAMPLE2, Side::Second, false),
        ("sample3", SAMPLE3, Side::First, true),
    ]
    .into_iter()
    .map(|(name, text, turn, mate)| (name, from_diagram(text, turn).unwrap(), mate))
    .collect()
}

fn perft(pos: &Position, depth: usize) -> usize {
    if depth == 0 {
        return 1;
    }
    pos.legal_actions()
        .into_iter()
        .map(|action| perft(&pos.apply(action).unwrap(), depth - 1))
        .sum()
}

#[test]
fn checkmate_fixtures() {
    for (name, pos, mate) in fixtures() {
        assert_eq!(pos.is_checkmate(), mate, "{name}");
        if mate {
            assert!(pos.is_check(), "{name}");
        }
        let expected = if mate { Status::Checkmate(!pos.turn()) } else { Status::Ongoing };
        assert_eq!(pos.status(), expected, "{name}");
    }
}

#[test]
fn fixtures_survive_codec_and_diagram() {
    for (name, pos, mate) in fixtures() {
        let decoded = Position::from_base64(&pos.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, pos, "{name}");
        assert_eq!(decoded.is_checkmate(), mate, "{name}");

        let reparsed = from_diagram(&to_diagram(&pos), pos.turn()).unwrap();
        assert_eq!(reparsed, pos, "{name}");
    }
}

#[test]
fn start_position_move_counts() {
    let pos = Position::default();
    assert_eq!(perft(&pos, 1), 30);
    assert_eq!(perft(&pos, 2), 900);
    assert_eq!(perft(&pos, 3), 25470);
}

#[test]
fn reachable_positions_round_trip() {
    let start = Position::default();
    for first in start.legal_actions() {
        let pos = start.apply(first).unwrap();
        for second in pos.legal_actions() {
            let next = pos.apply(second).unwrap();
            let bytes = next.encode().unwrap();
            assert_eq!(Position::decode(&bytes).unwrap(), next, "{first} {second}");
        }
    }
}

#[test]
fn pawn_drop_mate_agrees_with_detector() {
    let pos = from_diagram(PAWN_DROP, Side::First).unwrap();
    assert_eq!(pos.status(), Status::Ongoing);
    let drops = pos.drop_actions(Side::First, PieceKind::Pawn);
    assert!(!drops.iter().any(|action| action.to() == Some(S12)));
    assert!(drops.iter().any(|action| action.to() == Some(S13)));
    assert!(!rules::can_drop(&pos, Side::First, PieceKind::Pawn, S12));

    let mated = pos
        .apply(Action::Drop { side: Side::First, to: S12, kind: PieceKind::Pawn })
        .unwrap();
    assert!(mated.is_checkmate());
    assert_eq!(mated.winner(), Some(Side::First));
}

#[test]
fn king_capture_decides_without_checkmate() {
    let text = PAWN_DROP.replace(
        "|　　|　　|　　|　　|　　|　　|　　|　　|　　|\n|　　|　　|　　|　　|　　|　　|　　|▲金|",
        "|　　|　　|　　|　　|　　|　　|　　|　　|▲金|\n|　　|　　|　　|　　|　　|　　|　　|▲金|",
    );
    let pos = from_diagram(&text, Side::First).unwrap();
    assert_eq!(pos.contents(S12), &Some(Material::first(PieceFace::Gold)));
    let taken = pos
        .apply(Action::Move { side: Side::First, from: S12, to: S11, face: PieceFace::Gold })
        .unwrap();
    assert_eq!(taken.status(), Status::KingCaptured(Side::First));
    assert_eq!(taken.winner(), Some(Side::First));
    assert_eq!(taken.captured(Side::First).count(PieceKind::King), 0);
    let err = taken
        .apply(Action::Move { side: Side::Second, from: S21, to: S22, face: PieceFace::Lance })
        .unwrap_err();
    assert_eq!(err.downcast_ref::<MoveError>(), Some(&MoveError::GameOver));
}

#[cfg(feature = "random")]
#[test]
fn random_games_round_trip() {
    use rand::{rngs::StdRng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(2018);
    for id in 0..8 {
        let mut game = Game::new(GameId::new(id), Handicap::Even);
        game.play_random(&mut rng, 120).unwrap();
        let line = game.line();
        for offset in 0..line.len() {
            let pos = line.get(offset).unwrap();
            let decoded = Position::from_base64(&pos.to_base64().unwrap()).unwrap();
            assert_eq!(&decoded, pos);
        }
    }
}
