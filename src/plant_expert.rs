use std::path::Path;

use crate::error::PlantMatchError;
use crate::plant_record::PlantRecord;
use crate::search::embedding_engine::TextEmbedder;
use crate::search::vector_index::{SimilarityIndex, VectorIndex};

/// Long-lived retrieval service: owns the corpus, the injected embedder and
/// the similarity index. The index is built once at construction and shared
/// read-only by every request afterwards.
pub struct PlantExpert {
    embedder: Box<dyn TextEmbedder>,
    index: VectorIndex,
    corpus: Vec<PlantRecord>,
}

impl PlantExpert {
    /// Builds the service, embedding every record's canonical text up front.
    /// Any failure here is fatal: without a corpus and an index no retrieval
    /// can proceed.
    pub fn new(
        records: Vec<PlantRecord>,
        embedder: Box<dyn TextEmbedder>,
    ) -> Result<Self, PlantMatchError> {
        let index = Self::build_index(&records, embedder.as_ref())?;
        Ok(Self {
            embedder,
            index,
            corpus: records,
        })
    }

    /// Like [`PlantExpert::new`], but reuses a saved index snapshot when it
    /// matches the corpus and embedder: same dimension, same row count, and
    /// the same fingerprint of the records' embedding texts, so an edited
    /// corpus can never be served rankings built from the old one. Otherwise
    /// the index is rebuilt in full and the snapshot replaced; the service
    /// only ever publishes a fully built index.
    pub fn with_index_cache(
        records: Vec<PlantRecord>,
        embedder: Box<dyn TextEmbedder>,
        cache_path: &Path,
    ) -> Result<Self, PlantMatchError> {
        let fingerprint = corpus_fingerprint(&records);
        if cache_path.exists() {
            match VectorIndex::load(cache_path, embedder.dimension(), fingerprint) {
                Ok(index) if index.len() == records.len() => {
                    return Ok(Self {
                        embedder,
                        index,
                        corpus: records,
                    });
                }
                Ok(index) => {
                    println!(
                        "Index cache has {} rows but corpus has {} records; rebuilding.",
                        index.len(),
                        records.len()
                    );
                }
                Err(e) => {
                    println!("Index cache unusable ({}); rebuilding.", e);
                }
            }
        }

        let index = Self::build_index(&records, embedder.as_ref())?;
        if let Err(e) = index.save(cache_path, fingerprint) {
            // A failed cache write is not fatal; the in-memory index is whole.
            eprintln!("Warning: failed to save index cache to {:?}: {}", cache_path, e);
        }
        Ok(Self {
            embedder,
            index,
            corpus: records,
        })
    }

    fn build_index(
        records: &[PlantRecord],
        embedder: &dyn TextEmbedder,
    ) -> Result<VectorIndex, PlantMatchError> {
        let texts: Vec<String> = records.iter().map(|r| r.embedding_text()).collect();
        let embeddings = embedder.embed(&texts).map_err(|e| {
            PlantMatchError::DataUnavailable(format!("failed to embed plant corpus: {}", e))
        })?;

        if embeddings.len() != records.len() {
            return Err(PlantMatchError::DataUnavailable(format!(
                "embedder returned {} vectors for {} records",
                embeddings.len(),
                records.len()
            )));
        }

        VectorIndex::build(embedder.dimension(), &embeddings).map_err(|e| {
            PlantMatchError::DataUnavailable(format!("failed to build embedding index: {}", e))
        })
    }

    pub fn corpus(&self) -> &[PlantRecord] {
        &self.corpus
    }

    /// Ranks the corpus by semantic similarity to `query`, then walks the
    /// ranked order applying the hard filters until `top_k` records are
    /// accepted or the list is exhausted. Filters prune, never reorder.
    ///
    /// Returning fewer than `top_k` records, or none at all, is a valid
    /// outcome, not an error.
    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        region: Option<&str>,
        native_only: bool,
    ) -> Result<Vec<&PlantRecord>, PlantMatchError> {
        if query.trim().is_empty() {
            return Err(PlantMatchError::InvalidQuery(
                "query text is empty".to_string(),
            ));
        }
        if top_k == 0 {
            return Err(PlantMatchError::InvalidQuery(
                "top_k must be at least 1".to_string(),
            ));
        }

        let query_embedding = self.embedder.embed_one(query).map_err(|e| {
            PlantMatchError::InvalidQuery(format!("failed to embed query {:?}: {}", query, e))
        })?;

        let ranked = self.index.rank(&query_embedding);

        let mut results = Vec::with_capacity(top_k.min(self.corpus.len()));
        for (idx, _score) in ranked {
            let plant = &self.corpus[idx];

            if native_only && !plant.is_native() {
                continue;
            }
            if let Some(state) = region {
                if !plant.suits_state(state) {
                    continue;
                }
            }

            results.push(plant);
            if results.len() >= top_k {
                break;
            }
        }

        Ok(results)
    }
}

// FNV-1a over every record's embedding text, with a separator byte so record
// boundaries matter. Identifies the exact corpus content an index snapshot was
// built from; row counts alone cannot detect in-place edits.
fn corpus_fingerprint(records: &[PlantRecord]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for record in records {
        for byte in record.embedding_text().bytes().chain(std::iter::once(0)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}
