//! Accent- and case-insensitive text comparison.

use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block.
const COMBINING_DIACRITICS: RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Decompose to NFD, drop combining diacritics and lowercase.
///
/// `"Miércoles"` and `"MIERCOLES"` both fold to `"miercoles"`.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// [`fold`] with surrounding whitespace removed.
pub fn fold_trimmed(text: &str) -> String {
    fold(text.trim())
}

/// True when `haystack` contains `needle` after folding both.
///
/// An empty (or all-whitespace) needle matches everything.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold_trimmed(needle);
    needle.is_empty() || fold(haystack).contains(&needle)
}
