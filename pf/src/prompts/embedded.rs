//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Pipeline analysis prompt
pub const ANALYZE: &str = include_str!("../../prompts/analyze.pmt");

/// Subtask decomposition prompt
pub const SUBTASKS: &str = include_str!("../../prompts/subtasks.pmt");

/// Chat assistant system instruction
pub const ASSISTANT: &str = include_str!("../../prompts/assistant.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "analyze" => Some(ANALYZE),
        "subtasks" => Some(SUBTASKS),
        "assistant" => Some(ASSISTANT),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_analyze() {
        let analyze = get_embedded("analyze").unwrap();
        assert!(analyze.contains("PrismaFlow Intelligence Engine"));
        assert!(analyze.contains("3 sentences max"));
        assert!(analyze.contains("{{task_summary}}"));
    }

    #[test]
    fn test_get_embedded_subtasks() {
        let subtasks = get_embedded("subtasks").unwrap();
        assert!(subtasks.contains("exactly 4"));
        assert!(subtasks.contains("{{title}}"));
        assert!(subtasks.contains("{{description}}"));
    }

    #[test]
    fn test_get_embedded_assistant() {
        let assistant = get_embedded("assistant").unwrap();
        assert!(assistant.contains("Neural Assistant"));
        assert!(assistant.contains("{{task_context}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
