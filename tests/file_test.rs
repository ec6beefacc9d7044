//! Integration tests: PGN files in different text encodings decode the same.

use std::io::Write;

use chess_stego::text::read_pgn_file;
use chess_stego::{encode_message_to_pgn, StegoCodec, StegoError};

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file
}

#[test]
fn test_decode_from_utf8_file() {
    let pgn = encode_message_to_pgn("from a file", "disk");
    let file = write_temp(pgn.as_bytes());

    let text = read_pgn_file(file.path()).unwrap();
    assert_eq!(StegoCodec::with_defaults("disk").decode(&text), "from a file");
}

#[test]
fn test_decode_from_utf8_bom_file() {
    let pgn = encode_message_to_pgn("bom", "disk");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(pgn.as_bytes());
    let file = write_temp(&bytes);

    let text = read_pgn_file(file.path()).unwrap();
    assert!(!text.starts_with('\u{FEFF}'));
    assert_eq!(StegoCodec::with_defaults("disk").decode(&text), "bom");
}

#[test]
fn test_decode_from_utf16_file() {
    let pgn = encode_message_to_pgn("wide chars", "disk");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in pgn.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let file = write_temp(&bytes);

    let text = read_pgn_file(file.path()).unwrap();
    assert_eq!(StegoCodec::with_defaults("disk").decode(&text), "wide chars");
}

#[test]
fn test_decode_from_unmarked_utf16_file() {
    let pgn = encode_message_to_pgn("no bom", "disk");
    let bytes: Vec<u8> = pgn.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let file = write_temp(&bytes);

    let text = read_pgn_file(file.path()).unwrap();
    assert!(!text.contains('\0'));
    assert_eq!(StegoCodec::with_defaults("disk").decode(&text), "no bom");
}

#[test]
fn test_missing_file() {
    let err = read_pgn_file(std::path::Path::new("/nonexistent/games.pgn")).unwrap_err();
    assert!(matches!(err, StegoError::Io { .. }));
}
