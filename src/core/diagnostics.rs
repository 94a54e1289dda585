//! Cycle-scoped collection of non-fatal problems.
//!
//! Partial failures never abort a fetch cycle. Each stage records what it
//! could not do here, and the finished report carries the list so consumers
//! can see why an item is missing data.
//!
//! # Example
//!
//! ```rust
//! use publish_status::core::Diagnostics;
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.push("Live query failed: timeout");
//!
//! // Repeats of the same message are recorded once
//! diagnostics.push("Live query failed: timeout");
//! assert_eq!(diagnostics.len(), 1);
//! ```

use std::collections::HashSet;

/// Ordered, deduplicated diagnostic messages for one fetch cycle.
///
/// Owned by the cycle that creates it and handed to the report at the end,
/// so it needs no interior mutability.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<String>,
    seen: HashSet<String>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. Returns `false` if it was already recorded.
    pub fn push(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if !self.seen.insert(message.clone()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Append every message of `other`, keeping first-seen order.
    pub fn extend<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.push(message);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_deduplicates_and_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.push("b"));
        assert!(diagnostics.push("a"));
        assert!(!diagnostics.push("b"));
        assert_eq!(diagnostics.messages(), ["b", "a"]);
    }

    #[test]
    fn test_extend() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push("x");
        diagnostics.extend(vec!["y".to_string(), "x".to_string()]);
        assert_eq!(diagnostics.into_messages(), vec!["x", "y"]);
    }
}
