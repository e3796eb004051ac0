pub mod note_reader;
pub mod note_writer;
pub mod notes_index;

pub use note_reader::{NoteReader, ReadNoteArgs};
pub use note_writer::{CreateNoteArgs, NoteWriter};
pub use notes_index::NotesIndex;

use std::fmt;

use crate::error::AgentResult;
use crate::intent::Intent;
use crate::store::{Note, NoteStore, NoteSummary};

/// Tool trait for agent-orchestrated operations.
///
/// Not object-safe (associated types). The registry calls tools by
/// concrete type, not `dyn Tool`.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the tool's arguments, shown to the model.
    fn parameters(&self) -> serde_json::Value;
    async fn run(&self, input: Self::Input) -> AgentResult<Self::Output>;
}

/// Name, purpose and argument schema of a tool, as presented to the model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    fn of<T: Tool>(tool: &T) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters(),
        }
    }
}

/// Result of running a tool.
#[derive(Debug, Clone)]
pub enum ToolOutput {
    Created { title: String, filename: String },
    Note(Note),
    Listing(Vec<NoteSummary>),
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::Created { title, filename } => {
                write!(f, "Note '{}' created successfully ({})", title, filename)
            }
            ToolOutput::Note(note) => write!(f, "Note '{}':\n{}", note.title, note.body),
            ToolOutput::Listing(notes) if notes.is_empty() => write!(f, "No notes found"),
            ToolOutput::Listing(notes) => {
                write!(f, "Found {} note(s):", notes.len())?;
                for note in notes {
                    write!(f, "\n- {}", note.title)?;
                    if let Some(modified) = note.modified {
                        write!(f, " ({})", modified.format("%Y-%m-%d %H:%M"))?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Fixed mapping from validated intent to the handler that serves it.
pub struct ToolRegistry {
    writer: NoteWriter,
    reader: NoteReader,
    index: NotesIndex,
}

impl ToolRegistry {
    pub fn new(store: NoteStore) -> Self {
        Self {
            writer: NoteWriter::new(store.clone()),
            reader: NoteReader::new(store.clone()),
            index: NotesIndex::new(store),
        }
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::of(&self.writer),
            ToolSpec::of(&self.reader),
            ToolSpec::of(&self.index),
        ]
    }

    pub async fn dispatch(&self, intent: Intent) -> AgentResult<ToolOutput> {
        log::info!("Registry: dispatching {}", intent.tool_name());
        match intent {
            Intent::CreateNote(args) => self.writer.run(args).await,
            Intent::ReadNote(args) => self.reader.run(args).await.map(ToolOutput::Note),
            Intent::ListNotes => self.index.run(()).await.map(ToolOutput::Listing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;

    fn registry() -> (tempfile::TempDir, ToolRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = ToolRegistry::new(NoteStore::new(dir.path(), "txt"));
        (dir, registry)
    }

    #[test]
    fn test_specs_cover_every_intent() {
        let (_dir, registry) = registry();
        let names: Vec<String> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, Intent::TOOL_NAMES);
    }

    #[tokio::test]
    async fn test_dispatch_round_trip() {
        let (_dir, registry) = registry();

        let created = registry
            .dispatch(Intent::CreateNote(CreateNoteArgs {
                title: "Groceries".to_string(),
                body: "milk, eggs".to_string(),
            }))
            .await
            .unwrap();
        assert!(matches!(
            created,
            ToolOutput::Created { ref filename, .. } if filename == "groceries.txt"
        ));

        let read = registry
            .dispatch(Intent::ReadNote(ReadNoteArgs {
                title: "groceries".to_string(),
            }))
            .await
            .unwrap();
        assert!(matches!(read, ToolOutput::Note(ref n) if n.body == "milk, eggs"));

        let listed = registry.dispatch(Intent::ListNotes).await.unwrap();
        assert!(matches!(listed, ToolOutput::Listing(ref l) if l.len() == 1));
    }

    #[tokio::test]
    async fn test_dispatch_read_missing() {
        let (_dir, registry) = registry();
        let result = registry
            .dispatch(Intent::ReadNote(ReadNoteArgs {
                title: "nope".to_string(),
            }))
            .await;
        assert!(matches!(result, Err(AgentError::NotFound(_))));
    }

    #[test]
    fn test_display_listing() {
        assert_eq!(ToolOutput::Listing(vec![]).to_string(), "No notes found");

        let listing = ToolOutput::Listing(vec![
            NoteSummary { title: "a".to_string(), modified: None },
            NoteSummary { title: "b".to_string(), modified: None },
        ]);
        assert_eq!(listing.to_string(), "Found 2 note(s):\n- a\n- b");
    }
}
