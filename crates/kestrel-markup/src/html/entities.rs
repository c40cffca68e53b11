//! Character reference decoding.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The full table defines 2,231 entities; the common ones are enough for
//! the documents served over the small-web protocols.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Maps entity names (without `&` and `;`) to their replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("hellip", "\u{2026}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("euro", "\u{20AC}"),
        ("pound", "\u{00A3}"),
        ("yen", "\u{00A5}"),
        ("cent", "\u{00A2}"),
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("deg", "\u{00B0}"),
        ("para", "\u{00B6}"),
        ("sect", "\u{00A7}"),
        ("larr", "\u{2190}"),
        ("rarr", "\u{2192}"),
        ("uarr", "\u{2191}"),
        ("darr", "\u{2193}"),
    ])
});

/// Decode all character references in `text`.
///
/// Unknown names and malformed references are kept verbatim. Numeric
/// references outside the Unicode range decode to U+FFFD.
#[must_use]
pub fn decode(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match decode_reference(tail) {
            Some((replacement, consumed)) => {
                out.push_str(&replacement);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one reference at the start of `tail` (just after the `&`).
/// Returns the replacement and the number of bytes consumed.
fn decode_reference(tail: &str) -> Option<(String, usize)> {
    let end = tail
        .char_indices()
        .take(32)
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '#'))
        .map_or(tail.len().min(32), |(i, _)| i);
    let name = &tail[..end];
    let consumed = if tail[end..].starts_with(';') { end + 1 } else { end };

    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        let c = char::from_u32(code)
            .filter(|&c| c != '\0')
            .unwrap_or('\u{FFFD}');
        return Some((c.to_string(), consumed));
    }

    NAMED_ENTITIES
        .get(name)
        .map(|replacement| ((*replacement).to_string(), consumed))
}
