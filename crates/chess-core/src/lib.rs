//! Chess rules plumbing shared by the codec: move filters, position keys,
//! and PGN reading/writing on top of shakmaty and pgn-reader.

pub mod board;
pub mod game_data;
pub mod pgn;

pub use shakmaty;
