//! Stats command handler.

use clap::Args;
use gita_core::{config::AppConfig, AppResult};
use gita_knowledge::CorpusStats;

/// Show corpus statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let engine = super::load_engine(config).await?;
        let stats = engine.stats();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("Corpus: {}", config.corpus_dir.display());
            println!(
                "Encoder: {} ({})",
                engine.provider().provider_name(),
                engine.provider().model_name()
            );
            print!("{}", render_text(&stats));
        }

        Ok(())
    }
}

fn render_text(stats: &CorpusStats) -> String {
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    format!(
        "Vectors: {} (dim {})\nChunks: {}\nVerses: {} across {} chapters\nThemes: {}\nLife domains: {}\n",
        stats.vectors_count,
        stats.dimensions,
        stats.chunks_count,
        stats.verses_count,
        stats.chapters_count,
        join(&stats.themes),
        join(&stats.life_domains),
    )
}
