//! Tests for charset detection and conversion.

use kestrel_browser::CharsetError;
use kestrel_browser::charset::{CHUNK_SIZE, convert_to_utf8, is_utf8, needs_conversion};
use kestrel_common::MimeType;
use quickcheck_macros::quickcheck;

// ========== detection ==========

#[test]
fn test_utf8_labels() {
    assert!(is_utf8("utf-8"));
    assert!(is_utf8("UTF8"));
    assert!(is_utf8(" unicode-1-1-utf-8 "));
    assert!(!is_utf8("latin1"));
    assert!(!is_utf8("no-such-charset"));
}

#[test]
fn test_needs_conversion() {
    let latin = MimeType::parse("text/plain; charset=iso-8859-1");
    assert!(needs_conversion(&latin, b"abc"));
    assert!(!needs_conversion(&latin, b""));

    let utf8 = MimeType::parse("text/gemini; charset=UTF-8");
    assert!(!needs_conversion(&utf8, b"abc"));

    let undeclared = MimeType::parse("text/gemini");
    assert!(!needs_conversion(&undeclared, b"abc"));

    let image = MimeType::parse("image/png; charset=iso-8859-1");
    assert!(!needs_conversion(&image, b"abc"));
}

// ========== conversion ==========

#[test]
fn test_shift_jis() {
    let text = convert_to_utf8(b"ab\x82\xa0cd", "shift_jis").unwrap();
    assert_eq!(text, "abあcd");
}

#[test]
fn test_latin1() {
    let text = convert_to_utf8(b"caf\xe9", "iso-8859-1").unwrap();
    assert_eq!(text, "café");
}

#[test]
fn test_malformed_utf8_single_replacement() {
    let text = convert_to_utf8(b"abc\xFFdef", "utf-8").unwrap();
    assert_eq!(text, "abc\u{FFFD}def");
    assert_eq!(text.matches('\u{FFFD}').count(), 1);
}

#[test]
fn test_bad_trail_byte_keeps_following_text() {
    let text = convert_to_utf8(b"a\x82 b", "shift_jis").unwrap();
    assert_eq!(text, "a\u{FFFD} b");
}

#[test]
fn test_truncated_sequence_at_end() {
    let text = convert_to_utf8(b"ab\x82", "shift_jis").unwrap();
    assert_eq!(text, "ab\u{FFFD}");
}

#[test]
fn test_output_larger_than_one_chunk() {
    // Every byte doubles in size, so the output spans several chunks.
    let input = vec![0xE9; 5000];
    let text = convert_to_utf8(&input, "windows-1252").unwrap();
    assert!(text.len() > CHUNK_SIZE);
    assert_eq!(text.chars().count(), 5000);
    assert!(text.chars().all(|c| c == 'é'));
}

#[test]
fn test_unknown_charset() {
    let err = convert_to_utf8(b"abc", "klingon-8").unwrap_err();
    assert_eq!(err, CharsetError::UnsupportedCharset("klingon-8".to_string()));
}

#[test]
fn test_empty_input() {
    assert_eq!(convert_to_utf8(b"", "iso-8859-1").unwrap(), "");
}

// ========== properties ==========

#[quickcheck]
fn prop_valid_utf8_round_trips(text: String) -> bool {
    convert_to_utf8(text.as_bytes(), "utf-8").is_ok_and(|out| out == text)
}

#[quickcheck]
fn prop_single_byte_charset_keeps_length(bytes: Vec<u8>) -> bool {
    // windows-1252 maps every byte to exactly one character.
    convert_to_utf8(&bytes, "windows-1252").is_ok_and(|out| out.chars().count() == bytes.len())
}

#[quickcheck]
fn prop_arbitrary_bytes_never_fail(bytes: Vec<u8>) -> bool {
    bytes.is_empty() || convert_to_utf8(&bytes, "shift_jis").is_ok_and(|out| !out.is_empty())
}
