//! Line splitting, UTF-16 offsets, and character classification.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// Character classes used to split a line into words.
///
/// The classes follow the word motions of modal editors: runs of the same
/// class form one token, so `foo.bar` splits into `foo`, `.` and `bar`, while
/// ideographs and kana each form their own runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Seed value that never matches a real character.
    Invalid,
    /// Spaces, tabs and other separators.
    Blank,
    /// Punctuation and symbols.
    Punctuation,
    /// Letters, digits, underscore and anything not otherwise listed.
    Word,
    /// Pictographs and dingbats.
    Emoji,
    /// Superscript digits and letters.
    Superscript,
    /// Subscript digits and letters.
    Subscript,
    /// Braille patterns.
    Braille,
    /// Japanese hiragana.
    Hiragana,
    /// Japanese katakana.
    Katakana,
    /// CJK ideographs.
    Ideograph,
    /// Korean hangul syllables.
    Hangul,
}

const CLASS_TABLE: &[(RangeInclusive<u32>, CharClass)] = &[
    (0x037e..=0x037e, CharClass::Punctuation),
    (0x0387..=0x0387, CharClass::Punctuation),
    (0x055a..=0x055f, CharClass::Punctuation),
    (0x0589..=0x0589, CharClass::Punctuation),
    (0x05be..=0x05be, CharClass::Punctuation),
    (0x05c0..=0x05c0, CharClass::Punctuation),
    (0x05c3..=0x05c3, CharClass::Punctuation),
    (0x05f3..=0x05f4, CharClass::Punctuation),
    (0x060c..=0x060c, CharClass::Punctuation),
    (0x061b..=0x061b, CharClass::Punctuation),
    (0x061f..=0x061f, CharClass::Punctuation),
    (0x066a..=0x066d, CharClass::Punctuation),
    (0x06d4..=0x06d4, CharClass::Punctuation),
    (0x0700..=0x070d, CharClass::Punctuation),
    (0x0964..=0x0965, CharClass::Punctuation),
    (0x0970..=0x0970, CharClass::Punctuation),
    (0x0e4f..=0x0e4f, CharClass::Punctuation),
    (0x0e5a..=0x0e5b, CharClass::Punctuation),
    (0x0f04..=0x0f12, CharClass::Punctuation),
    (0x0f3a..=0x0f3d, CharClass::Punctuation),
    (0x104a..=0x104f, CharClass::Punctuation),
    (0x10fb..=0x10fb, CharClass::Punctuation),
    (0x1361..=0x1368, CharClass::Punctuation),
    (0x1680..=0x1680, CharClass::Blank),
    (0x17d4..=0x17dc, CharClass::Punctuation),
    (0x1800..=0x180a, CharClass::Punctuation),
    (0x2000..=0x200b, CharClass::Blank),
    (0x200c..=0x2027, CharClass::Punctuation),
    (0x2028..=0x2029, CharClass::Blank),
    (0x202a..=0x202e, CharClass::Punctuation),
    (0x202f..=0x202f, CharClass::Blank),
    (0x2030..=0x205e, CharClass::Punctuation),
    (0x205f..=0x205f, CharClass::Blank),
    (0x2060..=0x206f, CharClass::Punctuation),
    (0x2070..=0x207f, CharClass::Superscript),
    (0x2080..=0x2094, CharClass::Subscript),
    (0x20a0..=0x25ff, CharClass::Punctuation),
    (0x2600..=0x27bf, CharClass::Emoji),
    (0x27c0..=0x27ff, CharClass::Punctuation),
    (0x2800..=0x28ff, CharClass::Braille),
    (0x2900..=0x2bff, CharClass::Punctuation),
    (0x2e00..=0x2e7f, CharClass::Punctuation),
    (0x3000..=0x3000, CharClass::Blank),
    (0x3001..=0x3020, CharClass::Punctuation),
    (0x3030..=0x3030, CharClass::Punctuation),
    (0x303d..=0x303d, CharClass::Punctuation),
    (0x3040..=0x309f, CharClass::Hiragana),
    (0x30a0..=0x30ff, CharClass::Katakana),
    (0x3300..=0x9fff, CharClass::Ideograph),
    (0xac00..=0xd7a3, CharClass::Hangul),
    (0xf900..=0xfaff, CharClass::Ideograph),
    (0xfd3e..=0xfd3f, CharClass::Punctuation),
    (0xfe30..=0xfe6b, CharClass::Punctuation),
    (0xff00..=0xff0f, CharClass::Punctuation),
    (0xff1a..=0xff20, CharClass::Punctuation),
    (0xff3b..=0xff40, CharClass::Punctuation),
    (0xff5b..=0xff65, CharClass::Punctuation),
];

/// Classifies a single character.
///
/// Characters outside the Basic Multilingual Plane are word characters.
#[must_use]
pub fn classify(ch: char) -> CharClass {
    let code = u32::from(ch);
    if code < 0x100 {
        return match ch {
            ' ' | '\t' | '\0' | '\u{a0}' => CharClass::Blank,
            '_' => CharClass::Word,
            _ if ch.is_alphanumeric() => CharClass::Word,
            _ => CharClass::Punctuation,
        };
    }

    CLASS_TABLE
        .binary_search_by(|(range, _)| {
            if *range.end() < code {
                Ordering::Less
            } else if *range.start() > code {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .ok()
        .and_then(|index| CLASS_TABLE.get(index))
        .map_or(CharClass::Word, |(_, class)| *class)
}

/// Classifies every UTF-16 code unit of `units` on its own.
///
/// Surrogates are never paired up: each half of a pair, like an unpaired
/// surrogate, is a word unit. Characters outside the Basic Multilingual
/// Plane therefore join the surrounding word.
#[must_use]
pub fn classify_units(units: &[u16]) -> Vec<CharClass> {
    units
        .iter()
        .map(|unit| char::from_u32(u32::from(*unit)).map_or(CharClass::Word, classify))
        .collect()
}

/// Splits `text` on `\n`, keeping a trailing empty line after a final newline.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Encodes a line as UTF-16 code units.
#[must_use]
pub fn to_utf16(line: &str) -> Vec<u16> {
    line.encode_utf16().collect()
}

/// Length of `line` in UTF-16 code units.
#[must_use]
pub fn utf16_len(line: &str) -> usize {
    line.encode_utf16().count()
}

/// Converts an offset or count into a protocol `u32`, saturating on overflow.
#[must_use]
pub fn protocol_offset(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
