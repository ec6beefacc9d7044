//! Data-move derivation shared by the encoder and the decoder.
//!
//! The encoder's noise-safety check and the decoder's move classification
//! both go through [`DecisionPoint::classify`], so the two cannot drift apart.

use std::collections::HashMap;

use chess_core::board::{legal_moves_of_role_to_color, sort_canonical, square_color_bit};
use shakmaty::{Chess, Move, Position, Role};

use crate::bitstream::Chunk;
use crate::key::PieceMapping;
use crate::oracle::{select, OracleContext, Purpose};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveClass {
    /// The move is the deterministic data move for its piece and color.
    Data(Chunk),
    Noise,
}

/// One ply: a position plus the oracle context for choices made at it.
/// Data moves are computed once per (role, color) and cached.
pub struct DecisionPoint<'a> {
    pos: &'a Chess,
    ctx: OracleContext<'a>,
    mapping: &'a PieceMapping,
    data_moves: HashMap<(Role, u8), Option<Move>>,
}

impl<'a> DecisionPoint<'a> {
    pub fn new(pos: &'a Chess, ctx: OracleContext<'a>, mapping: &'a PieceMapping) -> Self {
        Self {
            pos,
            ctx,
            mapping,
            data_moves: HashMap::new(),
        }
    }

    /// The move that encodes `(role, color_bit)` here, if any legal move fits.
    pub fn data_move(&mut self, role: Role, color_bit: u8) -> Option<Move> {
        let pos = self.pos;
        let ctx = self.ctx;
        self.data_moves
            .entry((role, color_bit))
            .or_insert_with(|| {
                let mut candidates = legal_moves_of_role_to_color(pos, role, color_bit);
                sort_canonical(&mut candidates);
                select(&candidates, &ctx, Purpose::Data).map(|i| candidates.swap_remove(i))
            })
            .clone()
    }

    /// Data move for a chunk of the bitstream.
    pub fn data_move_for_chunk(&mut self, chunk: Chunk) -> Option<Move> {
        self.data_move(self.mapping.role_for(chunk.piece_code), chunk.color_bit)
    }

    pub fn classify(&mut self, mv: &Move) -> MoveClass {
        let role = mv.role();
        let Some(piece_code) = self.mapping.code_for(role) else {
            return MoveClass::Noise;
        };
        let color_bit = square_color_bit(mv.to());

        match self.data_move(role, color_bit) {
            Some(data) if data == *mv => MoveClass::Data(Chunk {
                piece_code,
                color_bit,
            }),
            _ => MoveClass::Noise,
        }
    }

    /// A legal move the decoder will classify as noise, chosen by the oracle.
    pub fn noise_move(&mut self, salt: usize) -> Option<Move> {
        let pos = self.pos;
        let mut safe: Vec<Move> = pos
            .legal_moves()
            .into_iter()
            .filter(|mv| self.classify(mv) == MoveClass::Noise)
            .collect();
        sort_canonical(&mut safe);
        let ctx = self.ctx;
        select(&safe, &ctx, Purpose::Noise { salt }).map(|i| safe.swap_remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::board::position_key;

    use crate::config::CodecConfig;
    use crate::key::{derive_piece_mapping, derive_seed};

    #[test]
    fn test_data_move_is_classified_as_data() {
        let seed = derive_seed("test");
        let mapping = derive_piece_mapping(&seed, CodecConfig::default().encoding_pieces);
        let pos = Chess::default();
        let fen = position_key(&pos);
        let ctx = OracleContext { seed: &seed, move_index: 0, position: &fen };
        let mut point = DecisionPoint::new(&pos, ctx, &mapping);

        let mv = point.data_move(Role::Knight, 1).unwrap();
        assert_eq!(mv.role(), Role::Knight);
        assert_eq!(square_color_bit(mv.to()), 1);

        let expected = Chunk {
            piece_code: mapping.code_for(Role::Knight).unwrap(),
            color_bit: 1,
        };
        assert_eq!(point.classify(&mv), MoveClass::Data(expected));
    }

    #[test]
    fn test_no_data_move_for_blocked_piece() {
        let seed = derive_seed("test");
        let mapping = derive_piece_mapping(&seed, CodecConfig::default().encoding_pieces);
        let pos = Chess::default();
        let fen = position_key(&pos);
        let ctx = OracleContext { seed: &seed, move_index: 0, position: &fen };
        let mut point = DecisionPoint::new(&pos, ctx, &mapping);

        assert!(point.data_move(Role::Bishop, 0).is_none());
        assert!(point.data_move(Role::Rook, 1).is_none());
    }

    #[test]
    fn test_noise_move_never_classifies_as_data() {
        let seed = derive_seed("noise");
        let mapping = derive_piece_mapping(&seed, CodecConfig::default().encoding_pieces);
        let mut pos = Chess::default();

        for move_index in 0..30 {
            let fen = position_key(&pos);
            let ctx = OracleContext { seed: &seed, move_index, position: &fen };
            let mut point = DecisionPoint::new(&pos, ctx, &mapping);

            let Some(mv) = point.noise_move(0) else { break };
            assert_eq!(point.classify(&mv), MoveClass::Noise);
            pos.play_unchecked(mv.clone());
        }
    }

    #[test]
    fn test_exactly_one_data_move_per_piece_and_color() {
        let seed = derive_seed("count");
        let mapping = derive_piece_mapping(&seed, CodecConfig::default().encoding_pieces);
        let pos = Chess::default();
        let fen = position_key(&pos);
        let ctx = OracleContext { seed: &seed, move_index: 0, position: &fen };
        let mut point = DecisionPoint::new(&pos, ctx, &mapping);

        let data_count = pos
            .legal_moves()
            .iter()
            .filter(|mv| matches!(point.classify(mv), MoveClass::Data(_)))
            .count();
        // Pawns and knights each reach both colors from the start.
        assert_eq!(data_count, 4);
    }
}
