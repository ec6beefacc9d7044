//! Reading PGN files in whatever text encoding they were saved with.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::StegoError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8Bom,
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

/// Read a PGN file, trying UTF-8 with BOM, UTF-16, UTF-8, then Latin-1.
pub fn read_pgn_file(path: &Path) -> Result<String, StegoError> {
    let raw = fs::read(path).map_err(|source| StegoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding) =
        decode_text(&raw).ok_or_else(|| StegoError::UnsupportedEncoding(path.to_path_buf()))?;
    debug!(path = %path.display(), ?encoding, bytes = raw.len(), "PGN file read");
    Ok(text)
}

/// Decode raw bytes with the first encoding that accepts them.
pub fn decode_text(raw: &[u8]) -> Option<(String, TextEncoding)> {
    if let Some(body) = raw.strip_prefix(UTF8_BOM) {
        if let Ok(text) = std::str::from_utf8(body) {
            return Some((text.to_string(), TextEncoding::Utf8Bom));
        }
    }

    if let Some(body) = raw.strip_prefix(UTF16_LE_BOM) {
        if let Some(text) = decode_utf16(body, u16::from_le_bytes) {
            return Some((text, TextEncoding::Utf16Le));
        }
    }

    if let Some(body) = raw.strip_prefix(UTF16_BE_BOM) {
        if let Some(text) = decode_utf16(body, u16::from_be_bytes) {
            return Some((text, TextEncoding::Utf16Be));
        }
    }

    // PGN text never contains NUL, so NUL bytes mean unmarked UTF-16. This has
    // to run before the UTF-8 attempt: ASCII in UTF-16 is also valid UTF-8.
    if let Some(decoded) = decode_unmarked_utf16(raw) {
        return Some(decoded);
    }

    if let Ok(text) = std::str::from_utf8(raw) {
        return Some((text.to_string(), TextEncoding::Utf8));
    }

    Some((raw.iter().map(|&b| char::from(b)).collect(), TextEncoding::Latin1))
}

/// Byte order follows where the NULs sit: high bytes of ASCII units are
/// odd-indexed in little-endian text and even-indexed in big-endian text.
fn decode_unmarked_utf16(raw: &[u8]) -> Option<(String, TextEncoding)> {
    if !raw.contains(&0) {
        return None;
    }

    let odd_nuls = raw.iter().skip(1).step_by(2).filter(|&&b| b == 0).count();
    let even_nuls = raw.iter().step_by(2).filter(|&&b| b == 0).count();

    if odd_nuls >= even_nuls {
        decode_utf16(raw, u16::from_le_bytes).map(|text| (text, TextEncoding::Utf16Le))
    } else {
        decode_utf16(raw, u16::from_be_bytes).map(|text| (text, TextEncoding::Utf16Be))
    }
}

fn decode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if body.len() % 2 != 0 {
        return None;
    }
    let units = body.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}
