use chess_stego::EncodedGames;
use shakmaty::{Chess, Position};

/// Messages covering ASCII, multi-byte UTF-8 and whitespace.
#[allow(dead_code)]
pub const SAMPLE_MESSAGES: &[&str] = &[
    "",
    "a",
    "hi",
    "Hello, world!",
    "meet at the usual place at 9pm",
    "naïve café – 日本語 🎉",
    "line one\nline two\ttabbed",
];

/// Replay every encoded game from the standard start, asserting each move is legal.
pub fn assert_games_legal(encoded: &EncodedGames) {
    for (g, game) in encoded.games.iter().enumerate() {
        let mut pos = Chess::default();
        for (ply, mv) in game.moves.iter().enumerate() {
            assert!(
                pos.legal_moves().contains(mv),
                "game {g} ply {ply}: illegal move {mv:?}"
            );
            pos.play_unchecked(mv.clone());
        }
    }
}
