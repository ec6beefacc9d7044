//! Codec configuration with environment overrides

use std::env;

use shakmaty::Role;
use tracing::info;

use crate::error::StegoError;

/// Bits carried by one data move: two select the piece, one the destination color.
pub const BITS_PER_MOVE: usize = 3;

/// Upper bound for the length prefix so the bit count fits a `u32`.
const MAX_LENGTH_BITS: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Pieces assigned to the 2-bit codes after the key shuffle. Other roles
    /// never carry data.
    pub encoding_pieces: [Role; 4],

    /// Width of the big-endian message bit-count prefix
    pub length_bits: usize,

    /// Plies per game before a new game is started
    pub max_moves_per_game: usize,

    /// Consecutive games that consume no bits before the encoder gives up
    pub max_unproductive_games: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encoding_pieces: [Role::Pawn, Role::Knight, Role::Bishop, Role::Rook],
            length_bits: 16,
            max_moves_per_game: 80,
            max_unproductive_games: 64,
        }
    }
}

impl CodecConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, StegoError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`CodecConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StegoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("STEGO_LENGTH_BITS") {
            config.length_bits = raw.trim().parse().map_err(|_| {
                StegoError::InvalidConfig(format!("STEGO_LENGTH_BITS is not a number: {raw}"))
            })?;
        }

        if let Some(raw) = lookup("STEGO_MAX_MOVES_PER_GAME") {
            config.max_moves_per_game = raw.trim().parse().map_err(|_| {
                StegoError::InvalidConfig(format!(
                    "STEGO_MAX_MOVES_PER_GAME is not a number: {raw}"
                ))
            })?;
        }

        config.validate()?;
        info!(
            length_bits = config.length_bits,
            max_moves_per_game = config.max_moves_per_game,
            "Codec config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        for (i, role) in self.encoding_pieces.iter().enumerate() {
            if self.encoding_pieces[..i].contains(role) {
                return Err(StegoError::InvalidConfig(format!(
                    "encoding piece {role:?} listed twice"
                )));
            }
        }

        if self.length_bits == 0 || self.length_bits > MAX_LENGTH_BITS {
            return Err(StegoError::InvalidConfig(format!(
                "length prefix must be 1..={MAX_LENGTH_BITS} bits, got {}",
                self.length_bits
            )));
        }

        if self.max_moves_per_game == 0 {
            return Err(StegoError::InvalidConfig(
                "max moves per game must be at least 1".to_string(),
            ));
        }

        if self.max_unproductive_games == 0 {
            return Err(StegoError::InvalidConfig(
                "max unproductive games must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Largest message bit count the length prefix can express.
    pub fn max_message_bits(&self) -> usize {
        let bits = (1u64 << self.length_bits) - 1;
        usize::try_from(bits).unwrap_or(usize::MAX)
    }

    pub fn is_encoding_piece(&self, role: Role) -> bool {
        self.encoding_pieces.contains(&role)
    }
}
