use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AgentError, AgentResult};
use crate::ollama::{ChatModel, ChatRequest};
use crate::tools::{CreateNoteArgs, ReadNoteArgs, ToolSpec};

/// Validated decision: which tool to run and with what arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CreateNote(CreateNoteArgs),
    ReadNote(ReadNoteArgs),
    ListNotes,
}

impl Intent {
    pub const TOOL_NAMES: [&'static str; 3] = ["create_note", "read_note", "list_notes"];

    pub fn tool_name(&self) -> &'static str {
        match self {
            Intent::CreateNote(_) => "create_note",
            Intent::ReadNote(_) => "read_note",
            Intent::ListNotes => "list_notes",
        }
    }

    /// Decode and validate raw model output.
    ///
    /// Expected shape: `{"tool": "<name>", "arguments": {...}}`, or
    /// `{"tool": "none"}` when nothing applies.
    pub fn from_model_output(raw: &str) -> AgentResult<Self> {
        let text = strip_code_fence(raw);
        let value: Value = serde_json::from_str(text)
            .map_err(|e| AgentError::Validation(format!("response is not valid JSON ({})", e)))?;

        let decision = value
            .as_object()
            .ok_or_else(|| AgentError::Validation("response is not a JSON object".to_string()))?;
        let tool = decision
            .get("tool")
            .and_then(Value::as_str)
            .ok_or_else(|| AgentError::Validation("missing string field 'tool'".to_string()))?;
        let arguments = decision.get("arguments").cloned().unwrap_or(Value::Null);

        match tool {
            "none" => Err(AgentError::NoMatchingTool),
            "create_note" => {
                let args: CreateNoteArgs = decode_arguments(tool, arguments)?;
                require_title(tool, &args.title)?;
                Ok(Intent::CreateNote(args))
            }
            "read_note" => {
                let args: ReadNoteArgs = decode_arguments(tool, arguments)?;
                require_title(tool, &args.title)?;
                Ok(Intent::ReadNote(args))
            }
            "list_notes" => match arguments {
                Value::Null => Ok(Intent::ListNotes),
                Value::Object(map) if map.is_empty() => Ok(Intent::ListNotes),
                other => Err(AgentError::Validation(format!(
                    "list_notes takes no arguments, got {}",
                    other
                ))),
            },
            other => {
                log::debug!("Known tools: {}", Self::TOOL_NAMES.join(", "));
                Err(AgentError::UnknownTool(other.to_string()))
            }
        }
    }
}

fn decode_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> AgentResult<T> {
    if arguments.is_null() {
        return Err(AgentError::Validation(format!("{} requires arguments", tool)));
    }
    serde_json::from_value(arguments)
        .map_err(|e| AgentError::Validation(format!("invalid arguments for {}: {}", tool, e)))
}

fn require_title(tool: &str, title: &str) -> AgentResult<()> {
    if title.trim().is_empty() {
        return Err(AgentError::Validation(format!("{} requires a non-empty title", tool)));
    }
    Ok(())
}

/// Models sometimes wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Turns free text into a validated [`Intent`] with one model round trip.
pub struct IntentResolver<M: ChatModel> {
    model: M,
    tools: Vec<ToolSpec>,
    temperature: f32,
    top_p: f32,
}

impl<M: ChatModel> IntentResolver<M> {
    pub fn new(model: M, tools: Vec<ToolSpec>, temperature: f32, top_p: f32) -> Self {
        Self {
            model,
            tools,
            temperature,
            top_p,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn resolve(&self, user_input: &str) -> AgentResult<Intent> {
        log::info!("Resolver: asking {} for an intent", self.model.name());

        let raw = self
            .model
            .chat(ChatRequest {
                system_prompt: Self::build_system_prompt(&self.tools),
                user_prompt: Self::build_user_prompt(user_input),
                temperature: self.temperature,
                top_p: self.top_p,
                json_format: true,
            })
            .await?;

        log::debug!("Resolver: raw model output: {}", raw);

        let intent = Intent::from_model_output(&raw).inspect_err(|e| {
            log::warn!("Resolver: rejected model output: {}", e);
        })?;
        log::debug!("Resolver: intent {:?}", intent);
        Ok(intent)
    }

    fn build_system_prompt(tools: &[ToolSpec]) -> String {
        let mut prompt = String::from(
            "You are an intent extraction assistant for a note-taking tool. \
Read the user's request and choose exactly one of the tools below.\n\n## TOOLS\n\n",
        );

        for tool in tools {
            prompt.push_str(&format!(
                "- `{}`: {}\n  arguments schema: {}\n",
                tool.name, tool.description, tool.parameters
            ));
        }

        prompt.push_str(
            r#"
## OUTPUT

Respond with a single JSON object and nothing else:
{"tool": "<tool name>", "arguments": { ... }}

- For create_note, pick a clear, descriptive title and put the actual note text in "body".
- For read_note, use the title exactly as the user gave it.
- For list_notes, use "arguments": {}.
- If the request does not fit any tool, respond with {"tool": "none"}.

Example: "Take a note about the meeting tomorrow" ->
{"tool": "create_note", "arguments": {"title": "Meeting Tomorrow", "body": "Meeting scheduled for tomorrow"}}

Example: "show me all my notes" ->
{"tool": "list_notes", "arguments": {}}"#,
        );

        prompt
    }

    fn build_user_prompt(user_input: &str) -> String {
        format!("User request:\n\n---\n{}\n---", user_input.trim())
    }
}
