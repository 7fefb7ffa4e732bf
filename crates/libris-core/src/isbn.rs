//! ISBN normalization and checksum validation
//!
//! The normalized form is the catalogue's secondary key: every character
//! that is not an ASCII digit or `X` is dropped and the rest is uppercased,
//! so `"978-0-13-235088-4"` and `"9780132350884"` name the same book.

/// Normalize an ISBN string into its catalogue key form.
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

/// Check whether an ISBN carries a valid ISBN-10 or ISBN-13 checksum.
///
/// The catalogue accepts any non-blank key; this is only used to warn
/// about likely typos.
pub fn is_valid_isbn(isbn: &str) -> bool {
    let normalized = normalize_isbn(isbn);
    match normalized.len() {
        10 => validate_isbn10(&normalized),
        13 => validate_isbn13(&normalized),
        _ => false,
    }
}

/// Validate ISBN-10 checksum
fn validate_isbn10(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

/// Validate ISBN-13 checksum
fn validate_isbn13(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let Some(value) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { value } else { value * 3 };
    }
    sum % 10 == 0
}
