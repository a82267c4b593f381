//! AI advisory client
//!
//! Turns a task list into a pipeline summary, subtask suggestions, and a
//! chat conversation. Nothing here touches stored records: callers pass the
//! tasks they already hold.

mod conversation;

pub use conversation::{ChatReply, Conversation};

use std::sync::Arc;

use prismastore::Task;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::llm::{self, CompletionRequest, LlmClient, LlmError};
use crate::prompts::PromptLoader;

/// Returned by `analyze_tasks` for an empty pipeline
pub const EMPTY_PIPELINE_MESSAGE: &str = "Initialize your pipeline with objectives to enable neural analysis.";

/// Returned by `analyze_tasks` when the model produced no text
pub const SYNTHESIS_FAILED_MESSAGE: &str = "Neural synthesis failed. Re-attempting connection...";

/// Shown by front ends when analysis fails in transport
pub const ANALYSIS_UNAVAILABLE_MESSAGE: &str = "Prisma intelligence service is currently unavailable.";

/// Shown by front ends when a chat reply carried no text
pub const CHAT_INTERRUPTED_MESSAGE: &str = "Neural connection interrupted.";

/// Shown by front ends when a chat message fails in transport
pub const CHAT_FAILED_MESSAGE: &str = "Error: Neural synthesis failed.";

/// Returned by `suggest_subtasks` when the structured reply cannot be parsed
pub const FALLBACK_SUBTASKS: [&str; 4] = [
    "Establish initial parameters",
    "Execute core logic",
    "Validate outputs",
    "Finalize deployment",
];

/// Default sampling temperature for pipeline analysis
pub const DEFAULT_ANALYSIS_TEMPERATURE: f32 = 0.7;

/// Advisory operations over an LLM client
pub struct Advisor {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    analysis_temperature: f32,
}

impl Advisor {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        Self {
            llm,
            prompts,
            analysis_temperature: DEFAULT_ANALYSIS_TEMPERATURE,
        }
    }

    /// Build an advisor from configuration, creating the LLM client
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        debug!("Advisor::from_config: called");
        let llm = llm::create_client(&config.llm)?;
        let prompts = PromptLoader::new(config.advisor.prompts_dir.as_ref());
        Ok(Self::new(llm, prompts).with_analysis_temperature(config.advisor.analysis_temperature))
    }

    pub fn with_analysis_temperature(mut self, temperature: f32) -> Self {
        self.analysis_temperature = temperature;
        self
    }

    /// Strategic summary of `tasks`, at most three sentences
    ///
    /// An empty list short-circuits without a remote call.
    pub async fn analyze_tasks(&self, tasks: &[Task]) -> Result<String, LlmError> {
        debug!(count = tasks.len(), "analyze_tasks: called");
        if tasks.is_empty() {
            debug!("analyze_tasks: empty pipeline, skipping remote call");
            return Ok(EMPTY_PIPELINE_MESSAGE.to_string());
        }

        let prompt = self.render("analyze", &json!({ "task_summary": task_summary(tasks) }))?;
        let request = CompletionRequest::prompt(prompt).with_temperature(self.analysis_temperature);
        let response = self.llm.complete(request).await?;

        match response.text {
            Some(text) => {
                info!(count = tasks.len(), "Analyzed pipeline");
                Ok(text)
            }
            None => {
                warn!(finish_reason = ?response.finish_reason, "analyze_tasks: response carried no text");
                Ok(SYNTHESIS_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Four actionable subtasks for `task`
    ///
    /// Absent or malformed structured output yields `FALLBACK_SUBTASKS`.
    /// Transport errors propagate.
    pub async fn suggest_subtasks(&self, task: &Task) -> Result<Vec<String>, LlmError> {
        debug!(task_id = %task.id, "suggest_subtasks: called");
        let prompt = self.render(
            "subtasks",
            &json!({ "title": task.title, "description": task.description }),
        )?;
        let request = CompletionRequest::prompt(prompt).with_schema(subtask_schema());
        let response = self.llm.complete(request).await?;

        let Some(text) = response.text else {
            warn!(task_id = %task.id, "suggest_subtasks: response carried no text");
            return Ok(fallback_subtasks());
        };

        match serde_json::from_str::<Vec<String>>(&text) {
            Ok(subtasks) => {
                info!(task_id = %task.id, count = subtasks.len(), "Suggested subtasks");
                Ok(subtasks)
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "suggest_subtasks: malformed structured output");
                Ok(fallback_subtasks())
            }
        }
    }

    /// Open a conversation primed with the current task list
    ///
    /// No remote call happens until the first message. The task context is
    /// fixed at creation.
    pub fn create_chat(&self, tasks: &[Task]) -> Result<Conversation, LlmError> {
        debug!(count = tasks.len(), "create_chat: called");
        let instruction = self.render("assistant", &json!({ "task_context": task_context(tasks) }))?;
        Ok(Conversation::new(self.llm.clone(), instruction))
    }

    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, LlmError> {
        self.prompts
            .render(template, context)
            .map_err(|e| LlmError::Template(e.to_string()))
    }
}

/// One line per task: `- {title} (Priority: {p}, Due: {d}, Status: Done|Pending)`
fn task_summary(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| {
            format!(
                "- {} (Priority: {}, Due: {}, Status: {})",
                t.title,
                t.priority,
                t.due_date,
                if t.completed { "Done" } else { "Pending" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `{title} [{priority}]` joined with ", "
fn task_context(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| format!("{} [{}]", t.title, t.priority))
        .collect::<Vec<_>>()
        .join(", ")
}

fn subtask_schema() -> serde_json::Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn fallback_subtasks() -> Vec<String> {
    FALLBACK_SUBTASKS.iter().map(|s| s.to_string()).collect()
}
