pub mod data_loader;
pub mod embedding_engine;
pub mod vector_index;

// Re-export key structs/functions for easier access from outside the search module
pub use data_loader::{load_plant_corpus, parse_plant_corpus};
pub use embedding_engine::{HashingEmbedder, Model2VecEmbedder, TextEmbedder};
pub use embedding_engine::{HASHING_DIMENSION, MODEL2VEC_DIMENSION};
pub use vector_index::{SimilarityIndex, VectorIndex};
