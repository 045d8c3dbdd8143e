//! Character classification and the casing rules applied at commit time.

/// Letter class used to decide whether two fragments form a joinable word.
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

/// Returns the only character of `s`, or `None` for empty and multi-character strings.
pub fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

pub fn is_single_letter(s: &str) -> bool {
    single_char(s).is_some_and(is_letter)
}

/// Casing for committed output. A single character follows shift mode
/// (upper under shift, lower otherwise); longer literals such as `". "`
/// pass through untouched.
pub fn output_case(text: &str, shift: bool) -> String {
    match single_char(text) {
        Some(c) if shift => c.to_uppercase().collect(),
        Some(c) => c.to_lowercase().collect(),
        None => text.to_string(),
    }
}

/// Casing for key faces: the whole label follows shift mode.
pub fn display_case(text: &str, shift: bool) -> String {
    if shift {
        text.to_uppercase()
    } else {
        text.to_lowercase()
    }
}

/// Count of `char`s, the unit every caret-relative offset is expressed in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
