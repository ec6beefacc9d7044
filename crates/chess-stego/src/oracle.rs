//! Deterministic selection among canonically sorted candidates.
//!
//! Every call hashes `(seed, move index, position key, purpose)` and seeds a
//! fresh ChaCha20 generator from the digest, so a choice depends only on
//! those four values. Encoder and decoder reach identical indices without
//! sharing any generator state.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::key::Seed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purpose {
    Data,
    /// Noise choices are never re-derived by the decoder, so the salt may
    /// vary between encoding attempts.
    Noise { salt: usize },
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Data => f.write_str("data"),
            Purpose::Noise { salt: 0 } => f.write_str("noise"),
            Purpose::Noise { salt } => write!(f, "noise#{salt}"),
        }
    }
}

/// Decision point shared by every oracle call made at one ply.
#[derive(Clone, Copy, Debug)]
pub struct OracleContext<'a> {
    pub seed: &'a Seed,
    pub move_index: usize,
    /// FEN of the position before the move
    pub position: &'a str,
}

impl OracleContext<'_> {
    fn composite_key(&self, purpose: Purpose) -> String {
        format!(
            "{}:{}:{}:{}",
            self.seed, self.move_index, self.position, purpose
        )
    }
}

/// Pick an index into `candidates`, or `None` when there is nothing to pick.
/// Callers must sort `candidates` canonically first.
pub fn select<T>(candidates: &[T], ctx: &OracleContext<'_>, purpose: Purpose) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let digest: [u8; 32] = Sha256::digest(ctx.composite_key(purpose).as_bytes()).into();
    let mut rng = ChaCha20Rng::from_seed(digest);
    // Sample in u64 so the draw does not depend on the platform's usize width.
    let index = rng.gen_range(0..candidates.len() as u64);
    Some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::derive_seed;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_empty_candidates() {
        let seed = derive_seed("k");
        let ctx = OracleContext { seed: &seed, move_index: 0, position: START_FEN };
        assert_eq!(select::<u8>(&[], &ctx, Purpose::Data), None);
    }

    #[test]
    fn test_single_candidate() {
        let seed = derive_seed("k");
        let ctx = OracleContext { seed: &seed, move_index: 3, position: START_FEN };
        assert_eq!(select(&["only"], &ctx, Purpose::Data), Some(0));
    }

    #[test]
    fn test_is_pure() {
        let seed = derive_seed("test");
        let candidates: Vec<u32> = (0..20).collect();
        for move_index in 0..50 {
            let ctx = OracleContext { seed: &seed, move_index, position: START_FEN };
            let first = select(&candidates, &ctx, Purpose::Data).unwrap();
            let second = select(&candidates, &ctx, Purpose::Data).unwrap();
            assert_eq!(first, second);
            assert!(first < candidates.len());
        }
    }

    #[test]
    fn test_context_changes_choice() {
        let seed_a = derive_seed("a");
        let seed_b = derive_seed("b");
        let candidates: Vec<u32> = (0..1000).collect();

        let pick = |seed: &Seed, move_index: usize, purpose: Purpose| {
            let ctx = OracleContext { seed, move_index, position: START_FEN };
            select(&candidates, &ctx, purpose).unwrap()
        };

        let base = pick(&seed_a, 0, Purpose::Data);
        let varied = [
            pick(&seed_b, 0, Purpose::Data),
            pick(&seed_a, 1, Purpose::Data),
            pick(&seed_a, 0, Purpose::Noise { salt: 0 }),
            pick(&seed_a, 0, Purpose::Noise { salt: 1 }),
        ];
        assert!(varied.iter().any(|&i| i != base));
    }

    #[test]
    fn test_purpose_tags() {
        assert_eq!(Purpose::Data.to_string(), "data");
        assert_eq!(Purpose::Noise { salt: 0 }.to_string(), "noise");
        assert_eq!(Purpose::Noise { salt: 2 }.to_string(), "noise#2");
    }
}
