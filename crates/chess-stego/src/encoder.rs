//! Message → games.
//!
//! Each ply plays the data move for the next 3-bit chunk when one exists,
//! otherwise a noise move the decoder will skip. A game ends when the
//! bitstream is exhausted, the move cap is hit, or no move of either kind
//! exists; encoding then continues in a fresh game from the same bit.

use chess_core::board::position_key;
use chess_core::game_data::GameMetadata;
use chess_core::pgn::write_game;
use shakmaty::{Chess, Move, Position};
use tracing::{debug, warn};

use crate::bitstream::Bitstream;
use crate::classify::DecisionPoint;
use crate::codec::StegoCodec;
use crate::config::BITS_PER_MOVE;
use crate::oracle::OracleContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    /// All bits were written.
    Complete,
    MoveCap,
    /// Neither a data move nor a safe noise move was available.
    Stuck,
}

#[derive(Clone, Debug)]
pub struct EncodedGame {
    pub moves: Vec<Move>,
    pub data_moves: usize,
    pub end: GameEnd,
}

impl EncodedGame {
    pub fn to_pgn(&self) -> String {
        write_game(&self.moves, &GameMetadata::default())
    }
}

#[derive(Clone, Debug)]
pub struct EncodedGames {
    pub games: Vec<EncodedGame>,
    /// The message was cut to fit the length prefix.
    pub truncated: bool,
}

impl EncodedGames {
    /// All games as PGN, separated by a blank line.
    pub fn to_pgn(&self) -> String {
        self.games
            .iter()
            .map(EncodedGame::to_pgn)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn total_moves(&self) -> usize {
        self.games.iter().map(|g| g.moves.len()).sum()
    }
}

impl StegoCodec {
    /// Embed `message` in one or more games. Never fails.
    pub fn encode(&self, message: &str) -> EncodedGames {
        self.encode_from(message, Chess::default())
    }

    /// Like [`StegoCodec::encode`], but the first game starts from `opening`.
    /// Every later game starts from the standard position.
    pub(crate) fn encode_from(&self, message: &str, opening: Chess) -> EncodedGames {
        let stream = Bitstream::from_message(message, &self.config);
        let mut games = Vec::new();
        let mut pos = 0;
        let mut unproductive = 0;
        let mut opening = Some(opening);

        while pos < stream.len() {
            let board = opening.take().unwrap_or_default();
            let game = self.encode_game(board, &stream, pos, unproductive);
            let consumed = game.data_moves * BITS_PER_MOVE;
            debug!(
                game = games.len(),
                moves = game.moves.len(),
                data_moves = game.data_moves,
                end = ?game.end,
                "Game finished"
            );
            games.push(game);
            pos += consumed;

            if consumed > 0 {
                unproductive = 0;
                continue;
            }

            unproductive += 1;
            warn!(attempt = unproductive, bit = pos, "Game consumed no bits, retrying with new noise");
            if unproductive >= self.config.max_unproductive_games {
                warn!(
                    remaining_bits = stream.len() - pos,
                    "Giving up after repeated unproductive games"
                );
                break;
            }
        }

        EncodedGames {
            games,
            truncated: stream.was_truncated(),
        }
    }

    /// Play one game from `board` starting at bit `start`. `salt` varies
    /// noise choices between retries of a game that made no progress.
    fn encode_game(
        &self,
        mut board: Chess,
        stream: &Bitstream,
        start: usize,
        salt: usize,
    ) -> EncodedGame {
        let mut moves = Vec::new();
        let mut data_moves = 0;
        let mut bit = start;

        let end = loop {
            if bit >= stream.len() {
                break GameEnd::Complete;
            }
            if moves.len() >= self.config.max_moves_per_game {
                break GameEnd::MoveCap;
            }

            let fen = position_key(&board);
            let ctx = OracleContext {
                seed: &self.seed,
                move_index: moves.len(),
                position: &fen,
            };
            let mut point = DecisionPoint::new(&board, ctx, &self.mapping);

            let data = stream
                .chunk_at(bit)
                .and_then(|chunk| point.data_move_for_chunk(chunk));

            let mv = match data {
                Some(mv) => {
                    bit += BITS_PER_MOVE;
                    data_moves += 1;
                    mv
                }
                None => match point.noise_move(salt) {
                    Some(mv) => mv,
                    None => break GameEnd::Stuck,
                },
            };

            board.play_unchecked(mv.clone());
            moves.push(mv);
        };

        EncodedGame {
            moves,
            data_moves,
            end,
        }
    }
}
