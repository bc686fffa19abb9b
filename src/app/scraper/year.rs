//! Publication year heuristic
//!
//! Titles on the listing page often carry the year they belong to, either
//! as a bare token or in a phrase like "cântico do congresso de 2024".

use std::sync::LazyLock;

use regex::Regex;

static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(202[0-9])\b"));

static CONGRESS_YEAR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:congresso de|congress of) (\d{4})\b"));

static OF_YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(?:de|of) (\d{4})\b"));

fn compile(pattern: &str) -> Regex {
    // Patterns are literals above; failure is a programming error
    Regex::new(pattern).expect("year pattern must compile")
}

/// Extract a year from `title`
///
/// Patterns are tried in order and the first match wins:
/// a bare `202x` token, then "congresso de YYYY", then "de YYYY".
pub fn extract_year(title: &str) -> Option<u32> {
    [&*BARE_YEAR, &*CONGRESS_YEAR, &*OF_YEAR]
        .into_iter()
        .find_map(|pattern| {
            pattern
                .captures(title)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .filter(|year| *year > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_year_token() {
        assert_eq!(extract_year("Canção A 2023"), Some(2023));
        assert_eq!(extract_year("2029 em destaque"), Some(2029));
    }

    #[test]
    fn test_bare_token_must_be_a_whole_word() {
        assert_eq!(extract_year("Faixa 12024"), None);
    }

    #[test]
    fn test_congress_phrase() {
        assert_eq!(extract_year("Cântico do congresso de 2019"), Some(2019));
        assert_eq!(extract_year("Song of the Congress of 2018"), Some(2018));
    }

    #[test]
    fn test_generic_of_phrase() {
        assert_eq!(extract_year("Melodias de 2015"), Some(2015));
        assert_eq!(extract_year("Best of 1999"), Some(1999));
    }

    #[test]
    fn test_first_pattern_wins() {
        // Bare 202x beats the congress phrase even when it appears later
        assert_eq!(extract_year("Congresso de 2019 (reedição 2024)"), Some(2024));
    }

    #[test]
    fn test_no_match_is_unknown() {
        assert_eq!(extract_year("Canção B"), None);
        assert_eq!(extract_year("Salmo 1990"), None);
        assert_eq!(extract_year(""), None);
    }
}
