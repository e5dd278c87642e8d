//! Read-only corpus store.
//!
//! Built once at startup from the prebuilt artifacts and shared (behind an
//! `Arc`) by every query. Nothing here is mutated after construction.

use crate::config::CorpusFiles;
use crate::index;
use crate::types::{Chunk, CorpusStats, VectorRecord, VerseRecord};
use crate::vector_index::{FlatIndex, VectorIndex};
use gita_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use walkdir::WalkDir;

/// In-memory lookup tables plus the vector index.
pub struct CorpusStore {
    index: Box<dyn VectorIndex>,
    metadata: Vec<VectorRecord>,
    chunks: HashMap<u64, Chunk>,
    verses: HashMap<(u32, u32), VerseRecord>,
    encoder: Option<String>,
}

impl std::fmt::Debug for CorpusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusStore")
            .field("vectors", &self.index.len())
            .field("dimensions", &self.index.dimensions())
            .field("chunks", &self.chunks.len())
            .field("verses", &self.verses.len())
            .field("encoder", &self.encoder)
            .finish()
    }
}

impl CorpusStore {
    /// Assemble a store from already-loaded parts.
    ///
    /// Checks that the metadata is aligned with the index and that every
    /// metadata row has a chunk. Verses are optional per key.
    pub fn new(
        index: Box<dyn VectorIndex>,
        metadata: Vec<VectorRecord>,
        chunks: Vec<Chunk>,
        verses: Vec<VerseRecord>,
    ) -> AppResult<Self> {
        if metadata.len() != index.len() {
            return Err(AppError::Integrity(format!(
                "Index holds {} vectors but metadata has {} rows",
                index.len(),
                metadata.len()
            )));
        }

        let chunks: HashMap<u64, Chunk> = chunks.into_iter().map(|c| (c.id, c)).collect();

        if let Some((position, record)) = metadata
            .iter()
            .enumerate()
            .find(|(_, r)| !chunks.contains_key(&r.id))
        {
            return Err(AppError::Integrity(format!(
                "Metadata row {} references chunk {} which does not exist",
                position, record.id
            )));
        }

        let verses = verses
            .into_iter()
            .map(|v| ((v.chapter, v.verse), v))
            .collect();

        Ok(Self {
            index,
            metadata,
            chunks,
            verses,
            encoder: None,
        })
    }

    /// Record the encoder id the index was built with.
    pub fn with_encoder(mut self, model: impl Into<String>) -> Self {
        self.encoder = Some(model.into());
        self
    }

    /// Load every artifact from `corpus_dir`.
    pub fn load(corpus_dir: &Path, files: &CorpusFiles) -> AppResult<Self> {
        tracing::info!("Loading corpus from {:?}", corpus_dir);

        let conn = index::open_index(&files.index_path(corpus_dir))?;
        let vectors = index::load_vectors(&conn)?;
        let encoder = index::load_encoder(&conn)?;
        let index = FlatIndex::new(vectors)?;

        let metadata: Vec<VectorRecord> = read_json(&files.metadata_path(corpus_dir))?;
        let chunks: Vec<Chunk> = read_json(&files.chunks_path(corpus_dir))?;
        let verses = load_verses(&files.verses_dir(corpus_dir))?;

        let mut store = Self::new(Box::new(index), metadata, chunks, verses)?;
        store.encoder = encoder;

        tracing::info!(
            "Corpus loaded: {} vectors (dim {}), {} chunks, {} verses",
            store.index.len(),
            store.index.dimensions(),
            store.chunks.len(),
            store.verses.len()
        );

        Ok(store)
    }

    /// The vector index.
    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    /// Encoder id recorded in the index, if any.
    pub fn encoder(&self) -> Option<&str> {
        self.encoder.as_deref()
    }

    /// Resolve an index position to its metadata and chunk.
    ///
    /// A miss means the index and the tables are out of sync.
    pub fn resolve(&self, position: usize) -> AppResult<(&VectorRecord, &Chunk)> {
        let record = self.metadata.get(position).ok_or_else(|| {
            AppError::Integrity(format!("Index position {} has no metadata", position))
        })?;

        let chunk = self.chunks.get(&record.id).ok_or_else(|| {
            AppError::Integrity(format!(
                "Index position {} references missing chunk {}",
                position, record.id
            ))
        })?;

        Ok((record, chunk))
    }

    /// Look up canonical verse text.
    pub fn verse(&self, chapter: u32, verse: u32) -> Option<&VerseRecord> {
        self.verses.get(&(chapter, verse))
    }

    /// Summarize the loaded corpus.
    pub fn stats(&self) -> CorpusStats {
        let chapters: BTreeSet<u32> = self.verses.keys().map(|(c, _)| *c).collect();
        let themes = self
            .metadata
            .iter()
            .flat_map(|r| r.themes.iter().cloned())
            .collect();
        let life_domains = self
            .metadata
            .iter()
            .flat_map(|r| r.life_domains.iter().cloned())
            .collect();

        CorpusStats {
            vectors_count: self.index.len(),
            chunks_count: self.chunks.len(),
            verses_count: self.verses.len(),
            chapters_count: chapters.len(),
            dimensions: self.index.dimensions(),
            themes,
            life_domains,
        }
    }
}

/// Parse a JSON array file.
fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Corpus(format!("Failed to read {:?}: {}", path, e)))?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Corpus(format!("Failed to parse {:?}: {}", path, e)))
}

/// Load every `*.json` verse file in `dir`, in file name order.
fn load_verses(dir: &Path) -> AppResult<Vec<VerseRecord>> {
    if !dir.is_dir() {
        return Err(AppError::Corpus(format!(
            "Verse directory not found: {:?}",
            dir
        )));
    }

    let mut verses = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry
            .map_err(|e| AppError::Corpus(format!("Failed to list {:?}: {}", dir, e)))?;
        let path = entry.path();

        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }

        let chapter: Vec<VerseRecord> = read_json(path)?;
        tracing::debug!("Loaded {} verses from {:?}", chapter.len(), path);
        verses.extend(chapter);
    }

    Ok(verses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: u64, chapter: u32, verse: u32) -> VectorRecord {
        VectorRecord {
            id,
            chapter,
            verse,
            themes: ["karma_yoga".to_string()].into_iter().collect(),
            life_domains: BTreeSet::new(),
        }
    }

    fn chunk(id: u64, text: &str) -> Chunk {
        Chunk {
            id,
            text: text.to_string(),
        }
    }

    fn flat(n: usize) -> Box<dyn VectorIndex> {
        Box::new(FlatIndex::new(vec![vec![1.0, 0.0]; n]).unwrap())
    }

    #[test]
    fn test_metadata_length_must_match_index() {
        let result = CorpusStore::new(flat(2), vec![record(1, 2, 47)], vec![chunk(1, "a")], vec![]);
        assert!(matches!(result, Err(AppError::Integrity(_))));
    }

    #[test]
    fn test_missing_chunk_is_fatal() {
        let result = CorpusStore::new(flat(1), vec![record(9, 2, 47)], vec![chunk(1, "a")], vec![]);
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
        assert!(err.to_string().contains("chunk 9"));
    }

    #[test]
    fn test_resolve_and_verse_lookup() {
        let store = CorpusStore::new(
            flat(2),
            vec![record(10, 2, 47), record(11, 2, 47)],
            vec![chunk(10, "first"), chunk(11, "second")],
            vec![VerseRecord {
                chapter: 2,
                verse: 47,
                sanskrit: "karmaṇy evādhikāras te".to_string(),
                translation: "You have a right to perform your duty".to_string(),
            }],
        )
        .unwrap();

        let (meta, text) = store.resolve(1).unwrap();
        assert_eq!(meta.id, 11);
        assert_eq!(text.text, "second");
        assert!(matches!(store.resolve(2), Err(AppError::Integrity(_))));

        assert!(store.verse(2, 47).is_some());
        assert!(store.verse(3, 1).is_none());
    }

    #[test]
    fn test_stats() {
        let store = CorpusStore::new(
            flat(1),
            vec![record(1, 2, 47)],
            vec![chunk(1, "a"), chunk(2, "b")],
            vec![],
        )
        .unwrap();

        let stats = store.stats();
        assert_eq!(stats.vectors_count, 1);
        assert_eq!(stats.chunks_count, 2);
        assert_eq!(stats.dimensions, 2);
        assert!(stats.themes.contains("karma_yoga"));
        assert_eq!(store.encoder(), None);
        assert_eq!(
            store.with_encoder("all-MiniLM-L6-v2").encoder(),
            Some("all-MiniLM-L6-v2")
        );
    }

    #[test]
    fn test_load_verses_skips_non_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("chapter_02.json"),
            r#"[{"chapter": 2, "verse": 47, "sanskrit": "s", "translation": "t"}]"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("chapter_01.json"),
            r#"[{"chapter": 1, "verse": 1, "sanskrit": "s", "translation": "t"}]"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("README.txt"), "not a verse").unwrap();

        let verses = load_verses(temp.path()).unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].chapter, 1);
    }

    #[test]
    fn test_load_verses_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            load_verses(&temp.path().join("gita_json")),
            Err(AppError::Corpus(_))
        ));
    }
}
