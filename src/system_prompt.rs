//! Persona preamble sent as the first turn of every completion request

/// Base system prompt establishing the assistant's role
pub const DEFAULT_PERSONA: &str =
    "You are a helpful and friendly assistant that helps the users of a chat application.";

/// Build the system prompt, preferring a non-blank override
#[must_use]
pub fn build_system_prompt(persona_override: Option<&str>) -> String {
    persona_override
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PERSONA)
        .to_string()
}
