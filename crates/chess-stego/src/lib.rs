//! Hide byte messages in the move sequences of ordinary-looking chess games.
//!
//! A key selects which piece and destination-square color carry each 3-bit
//! chunk and, through a stateless oracle, which legal move is played. The
//! decoder re-derives those choices from the game text and the key alone.

pub mod bitstream;
pub mod classify;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod key;
pub mod oracle;
pub mod text;

pub use codec::{decode_pgn_to_message, encode_message_to_pgn, StegoCodec};
pub use config::CodecConfig;
pub use decoder::DecodeReport;
pub use encoder::{EncodedGame, EncodedGames, GameEnd};
pub use error::StegoError;
