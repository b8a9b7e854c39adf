// Identifier slugs for report ids

use once_cell::sync::Lazy;
use regex::Regex;

/// Any run of characters that is not a letter, combining mark or decimal digit
static SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{Nd}]+").expect("invalid slug separator regex"));

/// Lower-case `name` and collapse every separator run into a single `-`.
///
/// Letters of any script survive: `"обед"` stays `"обед"`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    SEPARATOR_REGEX
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
