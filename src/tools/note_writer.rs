use serde::Deserialize;

use super::{Tool, ToolOutput};
use crate::error::AgentResult;
use crate::store::NoteStore;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteArgs {
    pub title: String,
    pub body: String,
}

/// Creates a new note; fails if one with the same title exists.
pub struct NoteWriter {
    store: NoteStore,
}

impl NoteWriter {
    pub fn new(store: NoteStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for NoteWriter {
    type Input = CreateNoteArgs;
    type Output = ToolOutput;

    fn name(&self) -> &str {
        "create_note"
    }

    fn description(&self) -> &str {
        "Create a new note with a short descriptive title and the note body. \
        Fails if a note with that title already exists."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Short descriptive title of the note" },
                "body": { "type": "string", "description": "Full text of the note" }
            },
            "required": ["title", "body"]
        })
    }

    async fn run(&self, args: CreateNoteArgs) -> AgentResult<ToolOutput> {
        let filename = self.store.create(&args.title, &args.body)?;
        let title = self.store.normalize_title(&args.title)?;

        log::info!("NoteWriter: saved {}", filename);
        Ok(ToolOutput::Created { title, filename })
    }
}
