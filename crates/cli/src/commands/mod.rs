//! Command handlers for the Gita CLI.

pub mod ask;
pub mod stats;

pub use ask::AskCommand;
pub use stats::StatsCommand;

use gita_core::{config::AppConfig, AppResult};
use gita_knowledge::{EngineConfig, WisdomEngine};

/// Read the engine settings and load the corpus they point at.
pub async fn load_engine(config: &AppConfig) -> AppResult<WisdomEngine> {
    config.validate()?;

    let mut engine_config = EngineConfig::load(&config.config_path())?;
    engine_config.embedding = engine_config
        .embedding
        .with_provider(config.embedding_provider.as_deref());

    WisdomEngine::load(&config.corpus_dir, &engine_config).await
}
