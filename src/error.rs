use thiserror::Error;

/// Errors surfaced to the user for a single request.
///
/// None of these are fatal: the interactive loop reports them and keeps
/// accepting input.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Model output did not match the expected decision or argument schema.
    #[error("model output did not match the expected tool schema: {0}")]
    Validation(String),

    #[error("model selected an unknown tool: {0}")]
    UnknownTool(String),

    /// The model explicitly declined to pick a tool.
    #[error("no tool matches this request; try asking to create, read or list notes")]
    NoMatchingTool,

    #[error("note not found: {0}")]
    NotFound(String),

    #[error("a note named '{0}' already exists")]
    DuplicateNote(String),

    #[error("inference endpoint unreachable at {endpoint}: {message}")]
    EndpointUnreachable { endpoint: String, message: String },

    #[error("inference endpoint did not answer within {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("inference endpoint error ({status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("note storage error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;
