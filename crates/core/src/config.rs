//! Configuration management for the Gita wisdom engine.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config files (.gita/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Only process-level settings live here. Retrieval tuning, embedding and
//! classifier tables are read from the same YAML file by `gita-knowledge`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Attribution attached to answers by front ends.
pub const DEFAULT_SOURCE: &str = "vivekavani.com";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .gita/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Directory holding the prebuilt corpus artifacts
    pub corpus_dir: PathBuf,

    /// Embedding provider override (e.g., "trigram", "fastembed")
    pub embedding_provider: Option<String>,

    /// Attribution string reported alongside answers
    pub source: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Process-level subset of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    corpus: Option<CorpusSection>,
    logging: Option<LoggingSection>,
    source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CorpusSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let corpus_dir = workspace.join("rag_base");
        Self {
            workspace,
            config_file: None,
            corpus_dir,
            embedding_provider: None,
            source: DEFAULT_SOURCE.to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `GITA_WORKSPACE`: Override workspace path
    /// - `GITA_CONFIG`: Path to config file
    /// - `GITA_CORPUS_DIR`: Directory with index, metadata, chunks and verses
    /// - `GITA_EMBEDDING_PROVIDER`: Embedding provider name
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use gita_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Corpus: {:?}", config.corpus_dir);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with the workspace and config file chosen
    /// by the caller (e.g. CLI flags) so the right YAML file is merged.
    pub fn load_from(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
    ) -> AppResult<Self> {
        let mut config = Self::default();

        let workspace =
            workspace.or_else(|| std::env::var_os("GITA_WORKSPACE").map(PathBuf::from));
        if let Some(workspace) = workspace {
            config.corpus_dir = workspace.join("rag_base");
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var_os("GITA_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config.config_path();
        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(dir) = std::env::var("GITA_CORPUS_DIR") {
            config.corpus_dir = PathBuf::from(dir);
        }

        if let Ok(provider) = std::env::var("GITA_EMBEDDING_PROVIDER") {
            config.embedding_provider = Some(provider);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Path of the YAML file this configuration reads.
    pub fn config_path(&self) -> PathBuf {
        match self.config_file {
            Some(ref cf) => cf.clone(),
            None => self.gita_dir().join("config.yaml"),
        }
    }

    /// Merge YAML configuration file into this config.
    ///
    /// Relative corpus directories resolve against the workspace.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(dir) = config_file.corpus.and_then(|c| c.dir) {
            result.corpus_dir = result.workspace.join(dir);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(source) = config_file.source {
            result.source = source;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        corpus_dir: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            if self.corpus_dir == self.workspace.join("rag_base") {
                self.corpus_dir = workspace.join("rag_base");
            }
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(corpus_dir) = corpus_dir {
            self.corpus_dir = corpus_dir;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .gita directory.
    pub fn gita_dir(&self) -> PathBuf {
        self.workspace.join(".gita")
    }

    /// Validate that the corpus directory is usable.
    pub fn validate(&self) -> AppResult<()> {
        if !self.corpus_dir.is_dir() {
            return Err(AppError::Config(format!(
                "Corpus directory not found: {:?}",
                self.corpus_dir
            )));
        }
        Ok(())
    }
}
