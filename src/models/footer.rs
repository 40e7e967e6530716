//! Footer settings appended to new drafts

use serde::{Deserialize, Serialize};

/// Whether a footer is enabled and what it says
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterState {
    /// Footer is enabled
    pub enabled: bool,
    /// Footer text (without the leading separator)
    pub text: String,
}

impl FooterState {
    /// Create a new footer state
    pub fn new(enabled: bool, text: impl Into<String>) -> Self {
        Self {
            enabled,
            text: text.into(),
        }
    }

    /// Text a freshly cleared draft starts with.
    ///
    /// A single space separates the footer from whatever the user types in
    /// front of it; a disabled footer yields an empty draft.
    pub fn draft_prefix(&self) -> String {
        if self.enabled {
            format!(" {}", self.text)
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_prefix() {
        assert_eq!(FooterState::new(true, "#wren").draft_prefix(), " #wren");
        assert_eq!(FooterState::new(false, "#wren").draft_prefix(), "");
        assert_eq!(FooterState::default().draft_prefix(), "");
    }
}
