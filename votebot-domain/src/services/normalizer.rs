use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison key for a display name.
///
/// Lowercases, strips accents through canonical decomposition, keeps only
/// `[a-z0-9 ]` and collapses runs of spaces. Never fails: names made only of
/// symbols or non-latin letters map to the empty string.
pub fn normalize_name(raw: &str) -> String {
    let filtered: String = raw
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == ' ')
        .collect();
    filtered
        .split(' ')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
