//! Key derivation: the 256-bit seed and the key-shuffled piece mapping.

use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use shakmaty::Role;

/// SHA-256 digest of the key, read as a big-endian 256-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seed(pub [u8; 32]);

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

pub fn derive_seed(key: &str) -> Seed {
    Seed(Sha256::digest(key.as_bytes()).into())
}

/// Bijection between the 2-bit codes `00..=11` and the encoding pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceMapping {
    by_code: [Role; 4],
}

impl PieceMapping {
    /// Piece for a 2-bit code. Only the low two bits are used.
    pub fn role_for(&self, code: u8) -> Role {
        self.by_code[usize::from(code & 0b11)]
    }

    /// 2-bit code for a piece, `None` for roles that carry no data.
    pub fn code_for(&self, role: Role) -> Option<u8> {
        self.by_code.iter().position(|&r| r == role).map(|i| i as u8)
    }

    pub fn roles(&self) -> [Role; 4] {
        self.by_code
    }
}

/// Shuffle `pieces` with a generator seeded from the key seed and assign
/// codes in shuffled order.
pub fn derive_piece_mapping(seed: &Seed, pieces: [Role; 4]) -> PieceMapping {
    let mut rng = ChaCha20Rng::from_seed(seed.0);
    let mut by_code = pieces;
    by_code.shuffle(&mut rng);
    PieceMapping { by_code }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;

    const PIECES: [Role; 4] = [Role::Pawn, Role::Knight, Role::Bishop, Role::Rook];

    #[test]
    fn test_seed_is_sha256() {
        assert_eq!(
            derive_seed("").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            derive_seed("abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_mapping_is_bijective() {
        let mapping = derive_piece_mapping(&derive_seed("test"), PIECES);
        for role in PIECES {
            let code = mapping.code_for(role).unwrap();
            assert_eq!(mapping.role_for(code), role);
        }
        assert_eq!(mapping.code_for(Role::Queen), None);
        assert_eq!(mapping.code_for(Role::King), None);
    }

    #[test]
    fn test_mapping_is_stable() {
        let seed = derive_seed("stable key");
        let config = CodecConfig::default();
        assert_eq!(
            derive_piece_mapping(&seed, config.encoding_pieces),
            derive_piece_mapping(&seed, config.encoding_pieces)
        );
    }

    #[test]
    fn test_mapping_depends_on_key() {
        let first = derive_piece_mapping(&derive_seed("key-0"), PIECES);
        let differs = (1..16).any(|i| {
            derive_piece_mapping(&derive_seed(&format!("key-{i}")), PIECES) != first
        });
        assert!(differs);
    }
}
