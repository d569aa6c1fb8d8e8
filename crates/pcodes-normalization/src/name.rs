//! Administrative name normalization.

use unicode_normalization::UnicodeNormalization;

use pcodes_model::CellValue;

/// Clean a name cell. Blank cells yield `None`.
///
/// With `transliterate`, the text is NFKD-decomposed and reduced to ASCII,
/// trimmed, and title-cased when it was uniformly upper or lower case.
/// Without it, the text is only trimmed.
pub fn normalize_name(cell: &CellValue, transliterate: bool) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    let text = cell.to_text();
    if !transliterate {
        return Some(text.trim().to_string());
    }
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let trimmed = ascii.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_uniform_case(trimmed) {
        Some(title_case(trimmed))
    } else {
        Some(trimmed.to_string())
    }
}

/// True when the text has cased letters and all of them share one case.
pub fn is_uniform_case(text: &str) -> bool {
    let mut has_upper = false;
    let mut has_lower = false;
    for c in text.chars() {
        has_upper |= c.is_uppercase();
        has_lower |= c.is_lowercase();
    }
    has_upper != has_lower
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_uppercase() || c.is_lowercase();
    }
    out
}
