//! Cosine-similarity index over per-record embeddings.
#![forbid(unsafe_code)]

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

type Float = f32;

/// Ranking contract: given a query vector, score every corpus entry and return
/// the full list ordered by descending similarity, ties broken by insertion
/// order so results are reproducible.
///
/// `VectorIndex` is the linear-scan reference implementation; an approximate
/// nearest-neighbor structure can substitute behind the same contract without
/// affecting callers.
pub trait SimilarityIndex {
    fn rank(&self, query: &[Float]) -> Vec<(usize, Float)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Persisted form of the index: row-major matrix as base64 little-endian f32.
/// The fingerprint ties the snapshot to the exact corpus content it was built
/// from; a snapshot alone cannot tell whether records changed in place.
#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
    embedding_dim: usize,
    rows: usize,
    #[serde(default)]
    fingerprint: u64,
    #[serde(with = "base64_bytes")]
    matrix: Vec<Float>,
}

mod base64_bytes {
    use super::*;
    use bytemuck::cast_slice;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(vec: &[Float], serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = cast_slice(vec);
        let b64 = general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&b64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Float>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)?;
        if bytes.len() % 4 != 0 {
            return Err(serde::de::Error::custom("matrix bytes not a multiple of 4"));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| Float::from_le_bytes(chunk.try_into().unwrap()))
            .collect())
    }
}

/// In-memory embedding index. Row `i` is the L2-normalized embedding of corpus
/// record `i`; the whole index is rebuilt when the corpus changes.
#[derive(Debug)]
pub struct VectorIndex {
    embedding_dim: usize,
    matrix: Vec<Float>,
}

impl VectorIndex {
    /// Builds the index from one embedding per corpus record. Rejects rows
    /// with a wrong dimension or non-finite components; rows are normalized
    /// before storage so ranking reduces to a dot product.
    pub fn build(embedding_dim: usize, embeddings: &[Vec<Float>]) -> Result<Self> {
        let mut matrix = Vec::with_capacity(embeddings.len() * embedding_dim);
        for (idx, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != embedding_dim {
                anyhow::bail!(
                    "Embedding at index {} has dimension {}, expected {}",
                    idx,
                    embedding.len(),
                    embedding_dim
                );
            }
            if embedding.iter().any(|v| !v.is_finite()) {
                anyhow::bail!("Embedding at index {} contains NaN or Infinity", idx);
            }
            matrix.extend_from_slice(&normalize(embedding));
        }
        Ok(Self {
            embedding_dim,
            matrix,
        })
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Saves the index to a JSON snapshot, tagged with a fingerprint of the
    /// corpus content the embeddings were computed from.
    pub fn save(&self, path: &Path, fingerprint: u64) -> Result<()> {
        let snapshot = IndexSnapshot {
            embedding_dim: self.embedding_dim,
            rows: self.len(),
            fingerprint,
            matrix: self.matrix.clone(),
        };
        let serialized = serde_json::to_string(&snapshot)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Loads a previously saved snapshot, validating it against the expected
    /// dimension, corpus fingerprint, and internal consistency. A fingerprint
    /// mismatch means the corpus changed since the snapshot was built, so row
    /// `i` can no longer be trusted to correspond to corpus entry `i`.
    pub fn load(path: &Path, expected_dim: usize, expected_fingerprint: u64) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot: IndexSnapshot = serde_json::from_str(&contents)?;

        if snapshot.embedding_dim != expected_dim {
            anyhow::bail!(
                "Embedding dimension mismatch: snapshot has {}, expected {}",
                snapshot.embedding_dim,
                expected_dim
            );
        }
        if snapshot.fingerprint != expected_fingerprint {
            anyhow::bail!(
                "Corpus fingerprint mismatch: snapshot has {:#018x}, expected {:#018x}",
                snapshot.fingerprint,
                expected_fingerprint
            );
        }
        let expected_len = snapshot.rows * snapshot.embedding_dim;
        if snapshot.matrix.len() != expected_len {
            anyhow::bail!(
                "Matrix size mismatch: expected {}, got {}",
                expected_len,
                snapshot.matrix.len()
            );
        }

        Ok(Self {
            embedding_dim: snapshot.embedding_dim,
            matrix: snapshot.matrix,
        })
    }
}

impl SimilarityIndex for VectorIndex {
    fn rank(&self, query: &[Float]) -> Vec<(usize, Float)> {
        if self.is_empty() {
            return Vec::new();
        }
        if query.len() != self.embedding_dim {
            eprintln!(
                "Query embedding dimension mismatch. Expected {}, got {}.",
                self.embedding_dim,
                query.len()
            );
            return Vec::new();
        }

        let query_norm = normalize(query);
        let mut scored: Vec<(usize, Float)> = self
            .matrix
            .par_chunks(self.embedding_dim)
            .enumerate()
            .map(|(idx, row)| (idx, dot_product(row, &query_norm)))
            .collect();

        scored.sort_by(compare_by_descending_score);
        scored
    }

    fn len(&self) -> usize {
        if self.embedding_dim == 0 {
            0
        } else {
            self.matrix.len() / self.embedding_dim
        }
    }
}

// Descending by score, ascending by index on ties; NaN scores sort last so a
// degenerate embedding can never float to the top.
fn compare_by_descending_score(a: &(usize, Float), b: &(usize, Float)) -> Ordering {
    let by_score = b.1.partial_cmp(&a.1).unwrap_or_else(|| {
        if a.1.is_nan() && !b.1.is_nan() {
            Ordering::Greater
        } else if !a.1.is_nan() && b.1.is_nan() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    });
    by_score.then_with(|| a.0.cmp(&b.0))
}

#[inline]
fn dot_product(vec1: &[Float], vec2: &[Float]) -> Float {
    vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum()
}

/// Normalize a vector to unit length. A zero vector stays zero rather than
/// producing NaN components.
pub fn normalize(vector: &[Float]) -> Vec<Float> {
    let norm_sq: Float = vector.iter().map(|&x| x * x).sum();
    if norm_sq == 0.0 {
        return vec![0.0; vector.len()];
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    vector.iter().map(|&x| x * inv_norm).collect()
}
