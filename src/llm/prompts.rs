//! Prompt templates for the completion endpoints.

/// Used by `/generate` when the caller sends no prompt.
pub const DEFAULT_TASK_PROMPT: &str =
    "Find content for template, create it, and send to today's contacts.";

/// Used by `/greet` when the caller sends no name.
pub const DEFAULT_GREETING_NAME: &str = "Friend";

pub fn greeting_prompt(name: &str) -> String {
    format!("Write a short, warm, festive Diwali greeting message for {}.", name)
}
