//! URL slug derivation for niche names

/// Derive a URL-safe slug from arbitrary text.
///
/// Lowercases the input, drops everything that is not an ASCII letter, digit,
/// underscore, whitespace or hyphen, then collapses each run of
/// whitespace/underscore/hyphen into a single `-`. Leading and trailing
/// separators are trimmed.
///
/// The result is deterministic but not unique; uniqueness belongs to storage.
///
/// # Examples
///
/// ```
/// use nicheboard_common::slug::slugify;
///
/// assert_eq!(slugify("Health & Fitness!"), "health-fitness");
/// assert_eq!(slugify("  Hobbies & DIY  "), "hobbies-diy");
/// assert_eq!(slugify("snake_case--name"), "snake-case-name");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if is_separator_space(c) || c == '_' || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Whitespace as slug separators see it: Unicode `White_Space` minus NEL
/// (U+0085), plus the byte-order mark (U+FEFF)
fn is_separator_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}
