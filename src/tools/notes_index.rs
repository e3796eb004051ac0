use super::Tool;
use crate::error::AgentResult;
use crate::store::{NoteStore, NoteSummary};

/// Lists every note in the notes directory.
pub struct NotesIndex {
    store: NoteStore,
}

impl NotesIndex {
    pub fn new(store: NoteStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for NotesIndex {
    type Input = ();
    type Output = Vec<NoteSummary>;

    fn name(&self) -> &str {
        "list_notes"
    }

    fn description(&self) -> &str {
        "List the titles of all existing notes. Takes no arguments."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, _input: ()) -> AgentResult<Vec<NoteSummary>> {
        self.store.list()
    }
}
