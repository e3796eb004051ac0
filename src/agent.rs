use crate::config::Config;
use crate::error::AgentResult;
use crate::intent::IntentResolver;
use crate::ollama::ChatModel;
use crate::store::NoteStore;
use crate::tools::{ToolOutput, ToolRegistry};

/// Agent that resolves a request to a tool and runs it.
pub struct NoteAgent<M: ChatModel> {
    resolver: IntentResolver<M>,
    registry: ToolRegistry,
    store: NoteStore,
}

impl<M: ChatModel> NoteAgent<M> {
    pub fn new(config: &Config, model: M) -> Self {
        let store = NoteStore::new(&config.storage.notes_dir, &config.storage.extension);
        let registry = ToolRegistry::new(store.clone());
        let resolver = IntentResolver::new(
            model,
            registry.specs(),
            config.ai_model.temperature,
            config.ai_model.top_p,
        );

        Self {
            resolver,
            registry,
            store,
        }
    }

    pub fn model(&self) -> &M {
        self.resolver.model()
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Handle one user request: resolve the intent, then dispatch it.
    ///
    /// Resolution and validation finish before any handler runs, so a
    /// rejected model response never touches the notes directory.
    pub async fn handle_request(&self, user_input: &str) -> AgentResult<ToolOutput> {
        log::info!("Agent: Step 1 - Resolving intent");
        let intent = self.resolver.resolve(user_input).await?;

        log::info!("Agent: Step 2 - Running {}", intent.tool_name());
        self.registry.dispatch(intent).await
    }
}
