use anyhow::Result;
use model2vec_rs::model::StaticModel;

const EMBEDDING_MODEL_ID: &str = "minishlab/potion-base-32M";

pub const MODEL2VEC_DIMENSION: usize = 512;

pub const HASHING_DIMENSION: usize = 256;

/// Fixed, deterministic text-to-vector model. Corpus and query embeddings must
/// come from the same implementation so that cosine scores are comparable.
pub trait TextEmbedder: Send + Sync {
    fn dimension(&self) -> usize;

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(&[text.to_string()])?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Failed to generate embedding for text: {}", text))
    }
}

/// Static-embedding model (model2vec). Downloaded from the hub on first use,
/// deterministic for a given model version.
pub struct Model2VecEmbedder {
    model: StaticModel,
}

impl Model2VecEmbedder {
    pub fn new() -> Result<Self> {
        let model = StaticModel::from_pretrained(EMBEDDING_MODEL_ID, None, None, None)?;
        Ok(Self { model })
    }
}

impl TextEmbedder for Model2VecEmbedder {
    fn dimension(&self) -> usize {
        // model2vec-rs does not expose the dimension from the loaded config,
        // so we rely on the pinned model's published dimension.
        MODEL2VEC_DIMENSION
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}

/// Offline fallback: FNV-1a signed feature hashing over lowercase alphanumeric
/// tokens, L2-normalized. Much weaker semantically than the static model, but
/// fully deterministic with no model download, which is what tests and
/// air-gapped runs need.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(HASHING_DIMENSION)
    }
}

fn fnv1a_64(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl TextEmbedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            let mut vector = vec![0.0f32; self.dimension];
            for token in text
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
            {
                let hash = fnv1a_64(token);
                let bucket = (hash % self.dimension as u64) as usize;
                let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
                vector[bucket] += sign;
            }

            let norm_sq: f32 = vector.iter().map(|x| x * x).sum();
            if norm_sq > 0.0 {
                let inv_norm = 1.0 / norm_sq.sqrt();
                for x in vector.iter_mut() {
                    *x *= inv_norm;
                }
            }
            embeddings.push(vector);
        }
        Ok(embeddings)
    }
}
