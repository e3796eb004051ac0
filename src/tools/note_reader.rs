use serde::Deserialize;

use super::Tool;
use crate::error::AgentResult;
use crate::store::{Note, NoteStore};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadNoteArgs {
    pub title: String,
}

/// Reads a single note by title.
pub struct NoteReader {
    store: NoteStore,
}

impl NoteReader {
    pub fn new(store: NoteStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for NoteReader {
    type Input = ReadNoteArgs;
    type Output = Note;

    fn name(&self) -> &str {
        "read_note"
    }

    fn description(&self) -> &str {
        "Read an existing note by its title and return its content."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Title of the note to read" }
            },
            "required": ["title"]
        })
    }

    async fn run(&self, args: ReadNoteArgs) -> AgentResult<Note> {
        let note = self.store.read(&args.title)?;
        log::info!("NoteReader: read '{}' ({} chars)", note.title, note.body.len());
        Ok(note)
    }
}
