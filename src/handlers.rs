use crate::agent::NoteAgent;
use crate::config::Config;
use crate::error::AgentError;
use crate::ollama::ChatModel;

/// Slash commands understood by the prompt loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Quit,
    Unknown(String),
}

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Nothing,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let name = line.strip_prefix('/')?.split_whitespace().next().unwrap_or("");
    let command = match name.to_lowercase().as_str() {
        "help" => Command::Help,
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    };
    Some(command)
}

pub fn banner<M: ChatModel>(agent: &NoteAgent<M>, config: &Config) -> String {
    format!(
        "📝 Notes agent is running!\n   \
        Model: {} ({})\n   \
        Endpoint: {}\n   \
        Notes directory: {}\n   \
        Type /help for help, /quit to stop",
        agent.model().name(),
        config.ai_model.provider,
        config.ai_model.endpoint,
        agent.store().dir().display()
    )
}

pub fn help_text() -> &'static str {
    "📖 How to use the notes agent:\n\n\
    Just describe what you want in plain language, for example:\n\
    - Take a note about the meeting tomorrow at 10\n\
    - Read my note about the meeting\n\
    - Show me all my notes\n\n\
    Commands:\n\
    /help   - Show this message\n\
    /status - Show model and storage status\n\
    /quit   - Exit"
}

pub async fn status_text<M: ChatModel>(agent: &NoteAgent<M>, config: &Config) -> String {
    let online = agent.model().health_check().await;
    let notes = match agent.store().list() {
        Ok(notes) => notes.len().to_string(),
        Err(e) => format!("unavailable ({})", e),
    };

    format!(
        "🤖 Status\n\n\
        AI provider: {}\n\
        Model: {}\n\
        Endpoint: {} ({})\n\
        Notes directory: {}\n\
        Notes: {}",
        config.ai_model.provider,
        agent.model().name(),
        config.ai_model.endpoint,
        if online { "reachable" } else { "unreachable" },
        agent.store().dir().display(),
        notes
    )
}

pub fn render_error(error: &AgentError) -> String {
    let mut message = format!("❌ Error: {}", error);
    if matches!(
        error,
        AgentError::EndpointUnreachable { .. } | AgentError::Timeout { .. }
    ) {
        message.push_str("\n💡 Check that Ollama is running: ollama list");
    }
    message
}

/// Handle one line of user input.
pub async fn handle_line<M: ChatModel>(
    agent: &NoteAgent<M>,
    config: &Config,
    line: &str,
) -> Reply {
    let line = line.trim();
    if line.is_empty() {
        return Reply::Nothing;
    }

    if let Some(command) = parse_command(line) {
        return match command {
            Command::Help => Reply::Print(help_text().to_string()),
            Command::Status => Reply::Print(status_text(agent, config).await),
            Command::Quit => Reply::Quit,
            Command::Unknown(name) => {
                Reply::Print(format!("Unknown command '/{}'. Use /help for the list.", name))
            }
        };
    }

    match agent.handle_request(line).await {
        Ok(output) => Reply::Print(output.to_string()),
        Err(e) => {
            log::error!("Request failed: {}", e);
            Reply::Print(render_error(&e))
        }
    }
}
