//! Message framing: `length_bits` big-endian bit count, UTF-8 message bits,
//! zero padding up to a whole number of move chunks.

use tracing::warn;

use crate::config::{CodecConfig, BITS_PER_MOVE};

/// Three bits consumed by one data move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Two-bit code looked up in the key's piece mapping.
    pub piece_code: u8,
    /// Color of the destination square, 0 for dark and 1 for light.
    pub color_bit: u8,
}

#[derive(Clone, Debug)]
pub struct Bitstream {
    bits: Vec<bool>,
    truncated: bool,
}

impl Bitstream {
    /// Frame `message`. A message longer than the length prefix can describe
    /// is cut at the last character boundary that fits.
    pub fn from_message(message: &str, config: &CodecConfig) -> Self {
        let max_bytes = config.max_message_bits() / 8;
        let mut end = message.len();
        let truncated = end > max_bytes;
        if truncated {
            end = max_bytes;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            warn!(
                original_bytes = message.len(),
                kept_bytes = end,
                "Message exceeds length prefix capacity, truncating"
            );
        }
        let payload = &message.as_bytes()[..end];

        let message_bits = payload.len() * 8;
        let mut bits = Vec::with_capacity(config.length_bits + message_bits + BITS_PER_MOVE);
        push_bits(&mut bits, message_bits as u64, config.length_bits);
        for &byte in payload {
            push_bits(&mut bits, u64::from(byte), 8);
        }
        while bits.len() % BITS_PER_MOVE != 0 {
            bits.push(false);
        }

        Self { bits, truncated }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// The chunk starting at bit `pos`, if three bits remain.
    pub fn chunk_at(&self, pos: usize) -> Option<Chunk> {
        let bits = self.bits.get(pos..pos + BITS_PER_MOVE)?;
        Some(Chunk {
            piece_code: (u8::from(bits[0]) << 1) | u8::from(bits[1]),
            color_bit: u8::from(bits[2]),
        })
    }
}

fn push_bits(bits: &mut Vec<bool>, value: u64, width: usize) {
    for shift in (0..width).rev() {
        bits.push((value >> shift) & 1 == 1);
    }
}

/// Bits recovered from data moves, in game order.
#[derive(Clone, Debug, Default)]
pub struct BitCollector {
    bits: Vec<bool>,
}

impl BitCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunk(&mut self, chunk: Chunk) {
        self.bits.push(chunk.piece_code & 0b10 != 0);
        self.bits.push(chunk.piece_code & 0b01 != 0);
        self.bits.push(chunk.color_bit != 0);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Read the length prefix and rebuild the message. Too few bits for a
    /// prefix yields an empty string, invalid UTF-8 is replaced.
    pub fn into_message(self, config: &CodecConfig) -> String {
        if self.bits.len() < config.length_bits {
            return String::new();
        }

        let (prefix, rest) = self.bits.split_at(config.length_bits);
        let msg_len = prefix
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit));
        let take = usize::try_from(msg_len).unwrap_or(usize::MAX).min(rest.len());

        let bytes: Vec<u8> = rest[..take]
            .chunks(8)
            .map(|byte| {
                byte.iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << (7 - i)))
            })
            .collect();

        String::from_utf8_lossy(&bytes).into_owned()
    }
}
