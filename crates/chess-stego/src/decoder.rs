//! Games → message. Every move is re-derived against the key: a move that
//! equals the data move for its own piece and destination color carries
//! three bits, anything else is noise.

use chess_core::board::position_key;
use chess_core::pgn::{read_games, GameRecord};
use shakmaty::Position;
use tracing::{debug, warn};

use crate::bitstream::BitCollector;
use crate::classify::{DecisionPoint, MoveClass};
use crate::codec::StegoCodec;
use crate::oracle::OracleContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub games: usize,
    pub data_moves: usize,
    pub noise_moves: usize,
    pub bits: usize,
}

impl StegoCodec {
    /// Recover the message hidden in `pgn`. Malformed or foreign input
    /// yields an empty or garbled string, never an error.
    pub fn decode(&self, pgn: &str) -> String {
        self.decode_with_report(pgn).0
    }

    pub fn decode_with_report(&self, pgn: &str) -> (String, DecodeReport) {
        let games = match read_games(pgn) {
            Ok(games) => games,
            Err(e) => {
                warn!(error = %e, "Failed to read PGN stream");
                Vec::new()
            }
        };

        let mut collector = BitCollector::new();
        let mut report = DecodeReport {
            games: games.len(),
            ..DecodeReport::default()
        };

        for (index, game) in games.iter().enumerate() {
            let data_before = report.data_moves;
            self.collect_game(game, &mut collector, &mut report);
            debug!(
                game = index,
                moves = game.moves.len(),
                data_moves = report.data_moves - data_before,
                "Game decoded"
            );
        }

        report.bits = collector.len();
        (collector.into_message(&self.config), report)
    }

    fn collect_game(&self, game: &GameRecord, collector: &mut BitCollector, report: &mut DecodeReport) {
        let mut board = game.start.clone();

        for (move_index, mv) in game.moves.iter().enumerate() {
            let fen = position_key(&board);
            let ctx = OracleContext {
                seed: &self.seed,
                move_index,
                position: &fen,
            };

            match DecisionPoint::new(&board, ctx, &self.mapping).classify(mv) {
                MoveClass::Data(chunk) => {
                    collector.push_chunk(chunk);
                    report.data_moves += 1;
                }
                MoveClass::Noise => report.noise_moves += 1,
            }

            board.play_unchecked(mv.clone());
        }
    }
}
