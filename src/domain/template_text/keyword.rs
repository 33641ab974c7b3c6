//! Template text entries: a slug keyword mapped to a snippet.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Keyword of a template text entry.
///
/// Slug syntax: ASCII letters, digits, `_` and `-`, at least one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateKeyword(String);

impl TemplateKeyword {
    pub fn new(keyword: impl Into<String>) -> Result<Self, ValidationError> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(ValidationError::empty_field("keyword"));
        }
        if !keyword.chars().all(is_slug_char) {
            return Err(ValidationError::invalid_format(
                "keyword",
                format!("'{}' may only contain letters, digits, '_' and '-'", keyword),
            ));
        }
        Ok(Self(keyword))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl TryFrom<String> for TemplateKeyword {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TemplateKeyword::new(value)
    }
}

impl From<TemplateKeyword> for String {
    fn from(k: TemplateKeyword) -> Self {
        k.0
    }
}

impl fmt::Display for TemplateKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored snippet, inserted wherever `{{keyword}}` appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateText {
    pub keyword: TemplateKeyword,
    pub text: String,
}

impl TemplateText {
    pub fn new(keyword: TemplateKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_slugs() {
        for ok in ["foo", "safety-rules", "room_2", "A1"] {
            assert!(TemplateKeyword::new(ok).is_ok(), "{}", ok);
        }
    }

    #[test]
    fn rejects_non_slugs() {
        for bad in ["", "two words", "dot.ted", "brace}", "ümlaut"] {
            assert!(TemplateKeyword::new(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<TemplateKeyword>("\"ok-key\"").is_ok());
        assert!(serde_json::from_str::<TemplateKeyword>("\"not ok\"").is_err());
    }
}
