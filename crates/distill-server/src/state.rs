//! Server state management.

use std::sync::Arc;

use distill_core::{Analyzer, CompletionService, DistillConfig};

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub config: Arc<DistillConfig>,
}

impl AppState {
    /// Create state around an existing completion service.
    pub fn new(config: DistillConfig, completion: Arc<dyn CompletionService>) -> Self {
        let analyzer = Analyzer::new(&config, completion);
        Self {
            analyzer: Arc::new(analyzer),
            config: Arc::new(config),
        }
    }
}
