//! Comma-separated tag strings

/// Split a comma-separated tag string into trimmed, non-empty tokens.
///
/// Order is preserved. `None` and empty input both yield an empty list.
///
/// ```
/// use nicheboard_common::tags::parse_tags;
///
/// assert_eq!(parse_tags(Some(" a, b ,, c ")), vec!["a", "b", "c"]);
/// assert!(parse_tags(None).is_empty());
/// ```
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Join tags with `", "`
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
