use crate::config::CodecConfig;
use crate::error::StegoError;
use crate::key::{derive_piece_mapping, derive_seed, PieceMapping, Seed};

/// Key material and parameters for one encode/decode session. Nothing is
/// shared between codecs, so differently keyed codecs can run side by side.
#[derive(Clone, Debug)]
pub struct StegoCodec {
    pub(crate) config: CodecConfig,
    pub(crate) seed: Seed,
    pub(crate) mapping: PieceMapping,
}

impl StegoCodec {
    pub fn new(key: &str, config: CodecConfig) -> Result<Self, StegoError> {
        config.validate()?;
        Ok(Self::build(key, config))
    }

    /// Codec with the default configuration.
    pub fn with_defaults(key: &str) -> Self {
        Self::build(key, CodecConfig::default())
    }

    fn build(key: &str, config: CodecConfig) -> Self {
        let seed = derive_seed(key);
        let mapping = derive_piece_mapping(&seed, config.encoding_pieces);
        Self {
            config,
            seed,
            mapping,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn mapping(&self) -> &PieceMapping {
        &self.mapping
    }
}

/// Encode `message` with the default configuration and return PGN text.
pub fn encode_message_to_pgn(message: &str, key: &str) -> String {
    StegoCodec::with_defaults(key).encode(message).to_pgn()
}

/// Decode PGN text produced by [`encode_message_to_pgn`].
pub fn decode_pgn_to_message(pgn: &str, key: &str) -> String {
    StegoCodec::with_defaults(key).decode(pgn)
}
