//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]

use crate::ai::TextGenerator;
use crate::error::{Error, Result};
use std::cell::RefCell;

/// A mock text generator for testing.
///
/// Returns a canned reply (or a canned failure) and records every prompt it
/// was given.
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    reply: Option<String>,
    prompts: RefCell<Vec<String>>,
}

impl MockTextGenerator {
    /// A generator that answers every prompt with the given text.
    #[must_use]
    pub fn replying(reply: &str) -> Self {
        Self { reply: Some(reply.to_string()), prompts: RefCell::new(Vec::new()) }
    }

    /// A generator that fails every request as unavailable.
    #[must_use]
    pub fn failing() -> Self {
        Self { reply: None, prompts: RefCell::new(Vec::new()) }
    }

    /// The most recent prompt, if any request was made.
    #[must_use]
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.borrow().last().cloned()
    }

    /// How many requests were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl TextGenerator for MockTextGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone().ok_or(Error::AiUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_prompts() {
        let generator = MockTextGenerator::replying("ok");
        assert_eq!(generator.last_prompt(), None);

        assert_eq!(generator.generate("primeiro").unwrap(), "ok");
        assert_eq!(generator.generate("segundo").unwrap(), "ok");

        assert_eq!(generator.last_prompt().as_deref(), Some("segundo"));
        assert_eq!(generator.call_count(), 2);
    }

    #[test]
    fn test_failing_mock_errors() {
        let generator = MockTextGenerator::failing();
        assert!(matches!(generator.generate("x"), Err(Error::AiUnavailable)));
        assert_eq!(generator.call_count(), 1);
    }
}
