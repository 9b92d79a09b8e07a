use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::extraction::schema::Schema;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is read-only after startup: the schema and the completion
/// client are built once in `main` and never mutated, so requests share them
/// without locking.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion capability. Production: `HfCompletionClient`.
    pub completion: Arc<dyn CompletionClient>,
    pub schema: Arc<Schema>,
}
