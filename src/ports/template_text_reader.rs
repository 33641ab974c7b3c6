//! Template text reader port.
//!
//! Each render reads a fresh, immutable snapshot of the keyword store.

use crate::domain::foundation::DomainError;
use crate::domain::template_text::TemplateSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait TemplateTextReader: Send + Sync {
    /// Reads every keyword→text entry as of now.
    async fn snapshot(&self) -> Result<TemplateSnapshot, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_text_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn TemplateTextReader) {}
    }
}
