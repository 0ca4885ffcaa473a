//! Finds the word under the cursor.

use crate::text::{CharClass, classify_units};

/// Half-open span of UTF-16 code units within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    /// First code unit of the run.
    pub start: usize,
    /// One past the last code unit of the run.
    pub end: usize,
}

impl WordSpan {
    /// Decodes the spanned code units of `line`.
    #[must_use]
    pub fn text(self, line: &[u16]) -> String {
        line.get(self.start..self.end)
            .map(String::from_utf16_lossy)
            .unwrap_or_default()
    }

    /// Whether the span covers no code units.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

/// Returns the run of same-class code units that contains `cursor`.
///
/// A cursor sitting on a class boundary belongs to the run that starts there.
/// A cursor at the end of the line belongs to the final run. The span is
/// empty only for an empty line.
#[must_use]
pub fn word_at(line: &[u16], cursor: usize) -> WordSpan {
    let mut start = 0;
    let mut previous = CharClass::Invalid;
    for (index, class) in classify_units(line).into_iter().enumerate() {
        if class != previous {
            if index > cursor {
                return WordSpan { start, end: index };
            }
            start = index;
        }
        previous = class;
    }
    WordSpan {
        start,
        end: line.len(),
    }
}
