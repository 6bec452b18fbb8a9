//! ISBN Resolution
//!
//! Extracts ISBN-10/13 values from recognized cover text and from manually
//! entered strings. Recognition output confuses a handful of glyphs in
//! number runs (colon for 8, l/I for 1, O for 0); those are corrected
//! before checksum validation, so a misread printed ISBN still resolves.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::IdentifyError;

// Optional "ISBN" label, then 10-17 characters of digits, confusable
// glyphs, and separators, optionally ending in a check X.
static RE_FRAME_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:ISBN[:\s]*)?([0-9IlO][0-9IlO:\- ]{8,15}[0-9IlOXx])")
        .expect("valid frame candidate regex")
});

static RE_ISBN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ISBN(?:-1[03])?\s*:?\s*").expect("valid isbn label regex")
});

static RE_GROUPED_13: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:[\- ]?\d){12}").expect("valid grouped-13 regex"));

static RE_GROUPED_10: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:[\- ]?[\dXx]){9}").expect("valid grouped-10 regex"));

/// A checksum-validated ISBN.
///
/// Stored normalized: 10 or 13 characters, digits plus an optional trailing
/// `X` (ISBN-10 only), no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn {
    digits: String,
}

impl Isbn {
    /// Validate a normalized (separator-free) string as an ISBN
    pub fn parse(normalized: &str) -> Option<Self> {
        let upper = normalized.to_uppercase();
        let valid = match upper.len() {
            13 => is_valid_isbn13(&upper),
            10 => is_valid_isbn10(&upper),
            _ => false,
        };
        valid.then_some(Self { digits: upper })
    }

    /// The normalized form: no separators, uppercase check digit
    pub fn normalized(&self) -> &str {
        &self.digits
    }

    /// True for 13-digit values
    pub fn is_isbn13(&self) -> bool {
        self.digits.len() == 13
    }

    /// True for 13-digit values carrying the Bookland prefix (978/979)
    pub fn is_book_isbn13(&self) -> bool {
        self.is_isbn13() && (self.digits.starts_with("978") || self.digits.starts_with("979"))
    }

    /// Hyphenated display form.
    ///
    /// Uses a fixed grouping (prefix-group-publisher-title-check); real
    /// registrant ranges vary, so this is a display convenience only.
    pub fn formatted(&self) -> String {
        let d = &self.digits;
        if self.is_isbn13() {
            format!(
                "{}-{}-{}-{}-{}",
                &d[..3],
                &d[3..4],
                &d[4..6],
                &d[6..12],
                &d[12..]
            )
        } else {
            format!("{}-{}-{}-{}", &d[..1], &d[1..3], &d[3..9], &d[9..])
        }
    }

    /// The ISBN-13 form, converting from ISBN-10 when needed
    pub fn to_isbn13(&self) -> Isbn {
        if self.is_isbn13() {
            self.clone()
        } else {
            // Validated ISBN-10 always converts
            let converted = convert_isbn10_to_isbn13(&self.digits)
                .unwrap_or_else(|| self.digits.clone());
            Isbn { digits: converted }
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// ISBN-13 checksum: alternating 1/3 weights over all 13 digits, total
/// divisible by 10
pub fn is_valid_isbn13(s: &str) -> bool {
    if s.len() != 13 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = s
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();
    sum % 10 == 0
}

/// ISBN-10 checksum: positional weights 10 down to 1, `X` worth 10 in the
/// check position, total divisible by 11
pub fn is_valid_isbn10(s: &str) -> bool {
    if s.len() != 10 {
        return false;
    }
    let mut sum = 0u32;
    for (i, c) in s.chars().enumerate() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'X' if i == 9 => 10,
            _ => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

/// Convert a valid ISBN-10 to its ISBN-13 form: prefix 978, keep the first
/// nine digits, recompute the check digit
pub fn convert_isbn10_to_isbn13(isbn10: &str) -> Option<String> {
    if !is_valid_isbn10(&isbn10.to_uppercase()) {
        return None;
    }
    let mut result = String::with_capacity(13);
    result.push_str("978");
    result.push_str(&isbn10[..9]);

    let sum: u32 = result
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();
    let check = (10 - sum % 10) % 10;
    result.push(char::from_digit(check, 10)?);
    Some(result)
}

/// Replace glyphs the recognition engine commonly confuses in number runs
fn correct_ocr_confusions(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ':' => '8',
            'l' | 'I' => '1',
            'O' | 'o' => '0',
            other => other,
        })
        .collect()
}

/// Drop everything except digits and the check character
fn strip_separators(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Find a valid ISBN in raw frame text.
///
/// Works on unfiltered recognition output; candidates are pattern-matched,
/// OCR-corrected, stripped, and checksum-validated. The first candidate
/// that validates wins.
pub fn resolve_from_frame_text(text: &str) -> Option<Isbn> {
    for caps in RE_FRAME_CANDIDATE.captures_iter(text) {
        let Some(run) = caps.get(1) else { continue };
        let corrected = correct_ocr_confusions(run.as_str());
        let stripped = strip_separators(&corrected);
        if let Some(isbn) = Isbn::parse(&stripped) {
            debug!(isbn = %isbn, "resolved ISBN from frame text");
            return Some(isbn);
        }
    }
    None
}

/// Parse a manually entered or labeled ISBN string.
///
/// With `require_isbn_prefix` set, the source text must carry an explicit
/// "ISBN" marker, and only Bookland-prefixed ISBN-13 values are accepted;
/// without it, the caller has independent evidence the text is an ISBN, so
/// non-Bookland ISBN-13 and ISBN-10 values pass too.
pub fn parse_manual_entry(text: &str, require_isbn_prefix: bool) -> Result<Isbn, IdentifyError> {
    if require_isbn_prefix && !text.to_uppercase().contains("ISBN") {
        return Err(IdentifyError::InvalidIsbnFormat);
    }

    let unlabeled = RE_ISBN_LABEL.replace_all(text, "");
    let corrected = correct_ocr_confusions(&unlabeled);

    let accept = |isbn: Isbn| -> Option<Isbn> {
        if isbn.is_book_isbn13() || !require_isbn_prefix {
            Some(isbn)
        } else {
            None
        }
    };

    for m in RE_GROUPED_13.find_iter(&corrected) {
        if let Some(isbn) = Isbn::parse(&strip_separators(m.as_str())).and_then(accept) {
            return Ok(isbn);
        }
    }
    for m in RE_GROUPED_10.find_iter(&corrected) {
        if let Some(isbn) = Isbn::parse(&strip_separators(m.as_str())).and_then(accept) {
            return Ok(isbn);
        }
    }

    // Last resort: strip everything and revalidate the remainder
    Isbn::parse(&strip_separators(&corrected))
        .and_then(accept)
        .ok_or(IdentifyError::InvalidIsbnFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn13_checksum() {
        assert!(is_valid_isbn13("9780134685991"));
        assert!(is_valid_isbn13("9780140328721"));
        assert!(!is_valid_isbn13("9780134685992"));
        assert!(!is_valid_isbn13("978013468599"));
        assert!(!is_valid_isbn13("97801346859a1"));
    }

    #[test]
    fn test_isbn10_checksum() {
        assert!(is_valid_isbn10("0134685997"));
        assert!(is_valid_isbn10("080442957X"));
        assert!(!is_valid_isbn10("0134685998"));
        assert!(!is_valid_isbn10("013468599"));
        // X only counts in the check position
        assert!(!is_valid_isbn10("0X34685997"));
    }

    #[test]
    fn test_isbn10_to_isbn13_conversion() {
        let converted = convert_isbn10_to_isbn13("0134685997").unwrap();
        assert_eq!(converted, "9780134685991");
        assert!(is_valid_isbn13(&converted));

        let converted = convert_isbn10_to_isbn13("080442957X").unwrap();
        assert!(is_valid_isbn13(&converted));
        assert!(converted.starts_with("978"));

        assert!(convert_isbn10_to_isbn13("0134685998").is_none());
    }

    #[test]
    fn test_bookland_prefix() {
        let isbn = Isbn::parse("9780134685991").unwrap();
        assert!(isbn.is_book_isbn13());

        let isbn10 = Isbn::parse("0134685997").unwrap();
        assert!(!isbn10.is_book_isbn13());
        assert!(isbn10.to_isbn13().is_book_isbn13());
    }

    #[test]
    fn test_formatted() {
        let isbn = Isbn::parse("9780134685991").unwrap();
        assert_eq!(isbn.formatted(), "978-0-13-468599-1");

        let isbn10 = Isbn::parse("0134685997").unwrap();
        assert_eq!(isbn10.formatted(), "0-13-468599-7");
    }

    #[test]
    fn test_frame_text_with_ocr_noise() {
        // O misread for 0, colon noise inside the digit run
        let text = "cover blurb ISBN: 978-O-13-468599-1 printed in usa";
        let isbn = resolve_from_frame_text(text).unwrap();
        assert_eq!(isbn.normalized(), "9780134685991");
    }

    #[test]
    fn test_frame_text_confusable_glyphs() {
        // l and I misread for 1
        let isbn = resolve_from_frame_text("978-0-l3-468599-I").unwrap();
        assert_eq!(isbn.normalized(), "9780134685991");
    }

    #[test]
    fn test_frame_text_skips_invalid_runs() {
        assert!(resolve_from_frame_text("call 555-123-4567 today").is_none());
        assert!(resolve_from_frame_text("no numbers here").is_none());
    }

    #[test]
    fn test_frame_text_first_valid_wins() {
        let text = "978-0-13-468599-2 then 978-0-14-032872-1";
        let isbn = resolve_from_frame_text(text).unwrap();
        assert_eq!(isbn.normalized(), "9780140328721");
    }

    #[test]
    fn test_manual_entry_labeled() {
        let isbn = parse_manual_entry("ISBN-13: 978-0-13-468599-1", true).unwrap();
        assert_eq!(isbn.normalized(), "9780134685991");

        let isbn = parse_manual_entry("isbn 0-13-468599-7", false).unwrap();
        assert_eq!(isbn.normalized(), "0134685997");
    }

    #[test]
    fn test_manual_entry_requires_marker() {
        assert!(matches!(
            parse_manual_entry("978-0-13-468599-1", true),
            Err(IdentifyError::InvalidIsbnFormat)
        ));
        assert!(parse_manual_entry("978-0-13-468599-1", false).is_ok());
    }

    #[test]
    fn test_manual_entry_bookland_policy() {
        // ISBN-10 with an ISBN label: rejected when Bookland is required
        assert!(parse_manual_entry("ISBN 0-13-468599-7", true).is_err());
        assert!(parse_manual_entry("0-13-468599-7", false).is_ok());
    }

    #[test]
    fn test_manual_entry_fallback_strip() {
        let isbn = parse_manual_entry("ISBN ... 9/7/8/0/1/3/4/6/8/5/9/9/1", true).unwrap();
        assert_eq!(isbn.normalized(), "9780134685991");
    }

    #[test]
    fn test_manual_entry_rejects_bad_checksum() {
        assert!(matches!(
            parse_manual_entry("ISBN: 978-0-13-468599-2", true),
            Err(IdentifyError::InvalidIsbnFormat)
        ));
    }
}
