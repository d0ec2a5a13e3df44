use crate::error::{interaction_error, AssistantResult};
use inquire::Text;

/// Capability seam for interactive prompts so flows can be driven by a
/// scripted double in tests
pub trait Interaction {
    /// Show one prompt and return the operator's reply
    fn ask(&self, prompt: &str) -> AssistantResult<String>;
}

/// Console prompt backed by inquire
pub struct ConsolePrompt;

impl Interaction for ConsolePrompt {
    fn ask(&self, prompt: &str) -> AssistantResult<String> {
        Text::new(prompt)
            .prompt()
            .map_err(|e| interaction_error(&format!("Prompt failed: {}", e)))
    }
}
