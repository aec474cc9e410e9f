//! Build application state from configuration.

use distill_core::{DistillConfig, DistillResult};
use distill_llm::CompletionFactory;

use crate::state::AppState;

/// Create the completion provider named in `config` and wrap it in state.
pub fn create_state(config: DistillConfig) -> DistillResult<AppState> {
    let completion = CompletionFactory::create(config.completion.clone())?;
    Ok(AppState::new(config, completion))
}

/// Load configuration from the file named by `DISTILL_CONFIG`, or from the environment.
pub fn load_config() -> DistillResult<DistillConfig> {
    match std::env::var("DISTILL_CONFIG") {
        Ok(path) => {
            tracing::info!(path = %path, "Loading configuration file");
            DistillConfig::from_file_with_env(&path)
        }
        Err(_) => DistillConfig::from_env(),
    }
}
