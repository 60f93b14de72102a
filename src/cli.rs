use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Natural-language question about plants
    pub query: String,

    /// Path to the plant corpus JSON snapshot
    #[arg(short, long, default_value = "plant_corpus.json")]
    pub corpus: String,

    /// Maximum number of plants to retrieve
    #[arg(short = 'k', long, default_value_t = 5)]
    pub top_k: usize,

    /// Only consider plants suitable for this state
    #[arg(short, long)]
    pub state: Option<String>,

    /// Only consider native plants
    #[arg(long)]
    pub native_only: bool,

    /// Reuse/save a prebuilt embedding index at this path
    #[arg(long)]
    pub index_cache: Option<String>,

    /// Use the offline hashing embedder instead of the model2vec model
    #[arg(long)]
    pub hash_embedder: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
