//! String helpers for name matching and slug derivation.

/// Returns `None` if the string is empty or whitespace, otherwise `Some(s)`.
///
/// ```
/// use levelwright_domain::common::none_if_empty;
///
/// assert_eq!(none_if_empty("wizard"), Some("wizard"));
/// assert_eq!(none_if_empty("  "), None);
/// ```
pub fn none_if_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Lowercase-hyphenated identifier derived from a display name.
///
/// Runs of non-alphanumeric characters collapse to a single hyphen and
/// apostrophes are dropped, so `"Champion's Reaction"` becomes
/// `"champions-reaction"`.
///
/// ```
/// use levelwright_domain::common::slugify;
///
/// assert_eq!(slugify("Half-Elf"), "half-elf");
/// assert_eq!(slugify("  Wizard  "), "wizard");
/// ```
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_hyphen = false;
    for c in s.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Case-insensitive whole-word containment.
///
/// `needle` may span several words; it matches only when the characters on
/// either side of the occurrence are not alphanumeric.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();

    let mut start = 0;
    while let Some(pos) = haystack[start..].find(&needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        // advance one char past the failed match start
        start = begin
            + haystack[begin..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Wizard"), "wizard");
        assert_eq!(slugify("Champion's Reaction"), "champions-reaction");
        assert_eq!(slugify("Dwarf -- Ancient's Blood"), "dwarf-ancients-blood");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("Power Attack", "power attack"));
        assert!(contains_word("Fighter Dedication; trained in Athletics", "Fighter Dedication"));
        assert!(!contains_word("Reactive Shield", "active shield"));
        assert!(!contains_word("Shielded", "shield"));
        assert!(contains_word("shield, block", "shield"));
    }

    #[test]
    fn test_contains_word_empty_needle() {
        assert!(!contains_word("anything", ""));
        assert!(!contains_word("anything", "   "));
    }

    #[test]
    fn test_eq_ignore_case() {
        assert!(eq_ignore_case("Fireball", " fireball "));
        assert!(!eq_ignore_case("Fireball", "Fire Ball"));
    }

    #[test]
    fn test_none_if_empty() {
        assert_eq!(none_if_empty(""), None);
        assert_eq!(none_if_empty("a"), Some("a"));
    }
}
