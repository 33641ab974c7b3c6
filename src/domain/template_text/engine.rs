//! `{{keyword}}` substitution.
//!
//! Placeholders whose keyword is in the snapshot are replaced; anything else
//! (unknown keywords, malformed or unterminated placeholders) is copied
//! verbatim so editors can spot it. Inserted text is never rescanned.

use std::collections::HashMap;

use super::keyword::{is_slug_char, TemplateText};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Immutable keyword→text mapping, read once per render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSnapshot {
    entries: HashMap<String, String>,
}

impl TemplateSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TemplateText>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.keyword.as_str().to_string(), e.text))
                .collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries.get(keyword).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self, text: &str) -> String {
        render(text, self)
    }
}

/// Replaces every known `{{ keyword }}` in `text`.
pub fn render(text: &str, snapshot: &TemplateSnapshot) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(OPEN) {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + OPEN.len()..];

        let Some(close) = after_open.find(CLOSE) else {
            // Unterminated: copy the remainder as-is.
            out.push_str(&rest[open..]);
            return out;
        };

        let inner = &after_open[..close];
        let keyword = inner.trim();
        if is_keyword(keyword) {
            match snapshot.get(keyword) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[open..open + OPEN.len() + close + CLOSE.len()]),
            }
            rest = &after_open[close + CLOSE.len()..];
        } else {
            // Not a placeholder; emit one brace and rescan from the next,
            // so `{{x {{foo}}` still resolves `foo`.
            out.push('{');
            rest = &rest[open + 1..];
        }
    }

    out.push_str(rest);
    out
}

fn is_keyword(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(is_slug_char)
}
