//! Template text module.
//!
//! Editors define snippets under a keyword and reference them in course
//! descriptions as `{{keyword}}`. Rendering works on an immutable
//! [`TemplateSnapshot`] so concurrent edits never affect a render in flight.

mod engine;
mod keyword;

pub use engine::{render, TemplateSnapshot};
pub use keyword::{TemplateKeyword, TemplateText};
