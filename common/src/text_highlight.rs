//! Highlighted snippet spans handed to result views.

use serde::{Deserialize, Serialize};


/// A run of snippet text that is either plain or inside `<strong>` markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightTextSpan {
    pub text: String,
    pub is_highlighted: bool,
    /// Running number of highlighted spans within one snippet; 0 for plain spans.
    pub index: u64,
}

impl HighlightTextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_highlighted: false, index: 0 }
    }
}
