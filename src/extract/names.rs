//! Author-name heuristic
//!
//! A shared predicate deciding whether a line of cover text is plausibly a
//! personal name. Used both to pick author lines and to keep author-like
//! lines out of title selection.

/// Words that mark publishing apparatus rather than a person
const EXCLUDED_WORDS: [&str; 6] = ["press", "books", "publishing", "edition", "series", "volume"];

/// Function words common in titles but absent from names
const COMMON_WORDS: [&str; 9] = ["the", "and", "of", "in", "on", "at", "to", "for", "with"];

/// True if the text is plausibly a personal name.
///
/// Requires 2-4 words, each capitalized and 2-15 characters long, no
/// publishing vocabulary, no title function words, and a character makeup
/// of mostly letters plus the punctuation found in real names (periods in
/// initials, apostrophes, hyphens).
pub fn is_probable_author_name(text: &str) -> bool {
    let trimmed = text.trim();
    let words: Vec<&str> = trimmed.split_whitespace().collect();

    if !(2..=4).contains(&words.len()) {
        return false;
    }

    for word in &words {
        let len = word.chars().count();
        if !(2..=15).contains(&len) {
            return false;
        }
        let first = match word.chars().next() {
            Some(c) => c,
            None => return false,
        };
        if !first.is_uppercase() {
            return false;
        }
        let lower = word.to_lowercase();
        let stripped = lower.trim_matches(|c: char| !c.is_alphanumeric());
        if EXCLUDED_WORDS.contains(&stripped) {
            return false;
        }
        if COMMON_WORDS.contains(&stripped) {
            return false;
        }
    }

    let total = trimmed.chars().count();
    let name_chars = trimmed
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-'))
        .count();

    name_chars as f32 / total as f32 > 0.85
}
