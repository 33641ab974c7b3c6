//! Dual plain/HTML text, the ticketing service's multipart text format.

use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

/// Text sent to the ticketing service in both plain and rich form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipartText {
    pub text: String,
    pub html: String,
}

impl MultipartText {
    /// Same content in both parts (used for event names).
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            html: text.clone(),
            text,
        }
    }

    /// Keeps the markdown source as the plain part and renders the HTML part.
    pub fn from_markdown(markdown: impl Into<String>) -> Self {
        let text = markdown.into();
        let html = markdown_to_html(&text);
        Self { text, html }
    }
}

/// Renders markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
