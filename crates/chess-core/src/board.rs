//! Board queries used by the codec. All functions are read-only on the position.

use shakmaty::{fen::Fen, CastlingMode, Chess, EnPassantMode, Move, Position, Role, Square};

/// Color bit of a square: parity of file + rank.
/// a1 (dark) is 0, h1 (light) is 1.
pub fn square_color_bit(square: Square) -> u8 {
    ((square.file() as u32 + square.rank() as u32) % 2) as u8
}

/// Legal moves made by a piece of the given role for the side to move.
pub fn legal_moves_of_role(pos: &Chess, role: Role) -> Vec<Move> {
    pos.legal_moves()
        .into_iter()
        .filter(|m| m.role() == role)
        .collect()
}

/// Legal moves of the given role whose destination square has the given color bit.
pub fn legal_moves_of_role_to_color(pos: &Chess, role: Role, color_bit: u8) -> Vec<Move> {
    pos.legal_moves()
        .into_iter()
        .filter(|m| m.role() == role && square_color_bit(m.to()) == color_bit)
        .collect()
}

/// Canonical textual form of a move (UCI, standard castling notation).
pub fn uci_key(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

/// Sort moves into the canonical order both sides of the codec agree on.
pub fn sort_canonical(moves: &mut [Move]) {
    moves.sort_by_cached_key(uci_key);
}

/// Full FEN of the position, used as the position key for deterministic choices.
pub fn position_key(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}
