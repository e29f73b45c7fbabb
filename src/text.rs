//! Text canonicalization used to prepare reference phrases and to compare
//! decoder output against them.

/// Czech diacritic folding table: one accented letter to one plain letter.
const DIACRITICS: &[(char, char)] = &[
    ('á', 'a'),
    ('č', 'c'),
    ('ď', 'd'),
    ('é', 'e'),
    ('ě', 'e'),
    ('í', 'i'),
    ('ň', 'n'),
    ('ó', 'o'),
    ('ř', 'r'),
    ('š', 's'),
    ('ť', 't'),
    ('ú', 'u'),
    ('ů', 'u'),
    ('ý', 'y'),
    ('ž', 'z'),
];

/// Canonicalizes text: trims surrounding whitespace, lowercases, and folds
/// Czech diacritics. Total and idempotent.
pub fn fold(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(fold_char)
        .collect()
}

fn fold_char(c: char) -> char {
    DIACRITICS
        .iter()
        .find(|(accented, _)| *accented == c)
        .map(|(_, plain)| *plain)
        .unwrap_or(c)
}

/// Strips every character outside the Unicode letter category, keeping
/// multi-byte letters intact.
pub fn letters_only(input: &str) -> String {
    input.chars().filter(|c| c.is_alphabetic()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_trims_and_lowercases() {
        assert_eq!(fold("  AhOj  "), "ahoj");
    }

    #[test]
    fn fold_replaces_czech_diacritics() {
        assert_eq!(fold("Příliš žluťoučký kůň"), "prilis zlutoucky kun");
    }

    #[test]
    fn fold_is_idempotent() {
        for s in ["", "  Čau Světe  ", "ŘEŘICHA", "abc 123", "A "] {
            let once = fold(s);
            assert_eq!(fold(&once), once);
        }
    }

    #[test]
    fn letters_only_strips_non_letters() {
        assert_eq!(letters_only("a1b2 c!ď."), "abcď");
        assert_eq!(letters_only("42"), "");
    }

    #[test]
    fn letters_only_keeps_multibyte_letters() {
        assert_eq!(letters_only("žluťoučký, kůň!"), "žluťoučkýkůň");
    }
}
