//! Entity services
//!
//! One module per entity. Each maps create/read/update/delete onto the
//! persistence gateway and applies the write-path rules: required-field and
//! range checks, optional-field normalization (blank becomes null), derived
//! fields (slug, ICE score) and `updated_at` stamping.

use chrono::{DateTime, Utc};
use nicheboard_common::{join_tags, parse_tags};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

pub mod highlights;
pub mod ideas;
pub mod niches;
pub mod subreddits;

/// Service failure
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request data failed validation; nothing was written
    #[error("{0}")]
    Validation(String),

    /// Persistence gateway failure
    #[error(transparent)]
    Store(#[from] nicheboard_common::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn invalid<T>(message: impl Into<String>) -> ServiceResult<T> {
    Err(ServiceError::Validation(message.into()))
}

/// Tags as sent by clients: a comma-separated string or a list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Text(String),
    List(Vec<String>),
}

impl TagsInput {
    /// Canonical stored form (`"a, b, c"`), or `None` when no tag survives
    pub fn normalized(&self) -> Option<String> {
        let tags = match self {
            TagsInput::Text(text) => parse_tags(Some(text.as_str())),
            TagsInput::List(list) => parse_tags(Some(list.join(",").as_str())),
        };
        if tags.is_empty() {
            None
        } else {
            Some(join_tags(&tags))
        }
    }
}

impl From<&str> for TagsInput {
    fn from(value: &str) -> Self {
        TagsInput::Text(value.to_string())
    }
}

/// Blank strings are stored as null
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn tags_field(value: Option<&TagsInput>) -> ServiceResult<Option<String>> {
    let tags = value.and_then(TagsInput::normalized);
    check_max_len(tags.as_deref(), 500, "Tags must be less than 500 characters")?;
    Ok(tags)
}

pub(crate) fn check_max_len(value: Option<&str>, max: usize, message: &str) -> ServiceResult<()> {
    match value {
        Some(v) if v.chars().count() > max => invalid(message),
        _ => Ok(()),
    }
}

/// Absolute http(s) URL of at most `max` characters; returns it trimmed
pub(crate) fn check_url(value: &str, max: usize, length_message: &str) -> ServiceResult<String> {
    let value = value.trim();
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => return invalid("Must be a valid URL"),
    }
    check_max_len(Some(value), max, length_message)?;
    Ok(value.to_string())
}

pub(crate) fn parse_id(value: &str, message: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(value.trim()).or_else(|_| invalid(message))
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_input_normalization() {
        assert_eq!(
            TagsInput::from(" woodworking ,plans,, diy ").normalized().as_deref(),
            Some("woodworking, plans, diy")
        );
        assert_eq!(
            TagsInput::List(vec!["app".into(), " mobile ".into(), "".into()])
                .normalized()
                .as_deref(),
            Some("app, mobile")
        );
        assert_eq!(TagsInput::from(" , ").normalized(), None);
    }

    #[test]
    fn test_tags_input_deserializes_both_shapes() {
        let text: TagsInput = serde_json::from_str(r#""a, b""#).unwrap();
        let list: TagsInput = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(text.normalized(), list.normalized());
    }

    #[test]
    fn test_optional_text_blanks_become_none() {
        assert_eq!(optional_text(Some(String::new())), None);
        assert_eq!(optional_text(Some("   ".into())), None);
        assert_eq!(optional_text(Some("x".into())).as_deref(), Some("x"));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_check_url() {
        assert_eq!(
            check_url("https://example.com", 500, "too long").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            check_url("  https://example.com/path \n", 500, "too long").unwrap(),
            "https://example.com/path"
        );

        let err = check_url("not a url", 500, "too long").unwrap_err();
        assert_eq!(err.to_string(), "Must be a valid URL");
        assert!(check_url("ftp://example.com", 500, "too long").is_err());

        let err = check_url("https://example.com/abcdef", 20, "too long").unwrap_err();
        assert_eq!(err.to_string(), "too long");
        assert!(check_url("  https://example.com/ab  ", 22, "too long").is_ok());
    }

    #[test]
    fn test_check_max_len_counts_characters() {
        assert!(check_max_len(Some("ééé"), 3, "too long").is_ok());
        assert!(check_max_len(Some("éééé"), 3, "too long").is_err());
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("7f1f2c2e-8a55-4b3e-9f3c-0d6b9d0a1c11", "bad").is_ok());
        assert_eq!(parse_id("niche-1", "bad").unwrap_err().to_string(), "bad");
    }
}
