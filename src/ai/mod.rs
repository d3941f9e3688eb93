//! AI assistance: prompt construction and the hosted text-generation client.
//!
//! The rest of the crate only sees [`TextGenerator`]; failures of the hosted
//! API collapse into one generic, user-facing error so a broken AI key never
//! takes more than the modal content with it.

pub mod gemini;
pub mod prompts;

use crate::error::Result;
use crate::tasks::models::Task;

pub use gemini::{GeminiClient, GeminiConfig};

/// Trait for the text-generation collaborator.
pub trait TextGenerator {
    /// Generate text for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::AiUnavailable`] when the collaborator
    /// cannot be reached or returns no usable text.
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// High-level AI actions offered by the dashboard.
pub struct AiAssistant<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> AiAssistant<'a> {
    /// Wrap a text generator.
    #[must_use]
    pub const fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    fn generate_or(&self, prompt: &str, empty_fallback: &str) -> Result<String> {
        let text = self.generator.generate(prompt)?;
        if text.trim().is_empty() {
            Ok(empty_fallback.to_string())
        } else {
            Ok(text)
        }
    }

    /// A 4-6 step checklist for completing the task, in Portuguese.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be rendered or the generator
    /// fails.
    pub fn action_plan(&self, task: &Task) -> Result<String> {
        let prompt = prompts::action_plan(task)?;
        self.generate_or(&prompt, "Não foi possível gerar o plano de ação.")
    }

    /// A short formal message (with subject line) about the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be rendered or the generator
    /// fails.
    pub fn communication_draft(&self, task: &Task) -> Result<String> {
        let prompt = prompts::communication_draft(task)?;
        self.generate_or(&prompt, "Não foi possível gerar o rascunho de comunicado.")
    }

    /// A concise status summary over the whole task list with one top
    /// priority recommendation.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be rendered or the generator
    /// fails.
    pub fn smart_summary(&self, tasks: &[Task]) -> Result<String> {
        let prompt = prompts::smart_summary(tasks)?;
        self.generate_or(&prompt, "Não foi possível gerar o resumo inteligente.")
    }
}
