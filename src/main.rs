use anyhow::{Context, Result};
use plant_match::answer_builder::render_answer;
use plant_match::cli::parse_args;
use plant_match::plant_expert::PlantExpert;
use plant_match::safety::SafetyFilter;
use plant_match::search::data_loader::parse_plant_corpus;
use plant_match::search::embedding_engine::{HashingEmbedder, Model2VecEmbedder, TextEmbedder};
use std::path::Path;
use tokio::fs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();

    println!("Loading plant corpus from '{}'...", cli_args.corpus);
    let corpus_json = fs::read_to_string(&cli_args.corpus)
        .await
        .with_context(|| format!("Failed to read corpus file '{}'", cli_args.corpus))?;
    let records = parse_plant_corpus(&corpus_json)?;
    println!("Corpus loaded: {} plant records.", records.len());

    let embedder: Box<dyn TextEmbedder> = if cli_args.hash_embedder {
        println!("Using offline hashing embedder.");
        Box::new(HashingEmbedder::default())
    } else {
        println!("Initializing embedding model (this may take a moment)...");
        Box::new(Model2VecEmbedder::new().context("Failed to initialize embedding model")?)
    };

    let expert = match &cli_args.index_cache {
        Some(cache) => PlantExpert::with_index_cache(records, embedder, Path::new(cache))?,
        None => PlantExpert::new(records, embedder)?,
    };
    println!("Embedding index ready.\n");

    let results = expert.retrieve(
        &cli_args.query,
        cli_args.top_k,
        cli_args.state.as_deref(),
        cli_args.native_only,
    )?;

    let answer = render_answer(&cli_args.query, &results);
    let answer = SafetyFilter::default().annotate(answer);

    println!("{}", answer.text);

    if !answer.sources.is_empty() {
        println!("\nPlants used for this answer:");
        for plant in &answer.sources {
            println!(
                " - {} ({}, {})",
                plant.plant_name,
                if plant.common_name.is_empty() {
                    "—"
                } else {
                    &plant.common_name
                },
                plant.origin_type
            );
        }
    }

    Ok(())
}
