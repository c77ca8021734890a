//! Output unit of the reconstructor

use serde::Serialize;

/// One piece of reconstructed statement text with its annotation, if the
/// matcher attached one to the node this text came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub annotation: Option<String>,
}

impl Fragment {
    /// Fragment with no annotation (keywords, punctuation, untouched text)
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotation: None,
        }
    }

    /// Fragment carrying a node's annotation
    pub fn annotated(text: impl Into<String>, annotation: Option<String>) -> Self {
        Self {
            text: text.into(),
            annotation,
        }
    }

    /// Returns true when an annotation is attached
    pub fn has_annotation(&self) -> bool {
        self.annotation.is_some()
    }
}
