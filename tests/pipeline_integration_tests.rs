//! End-to-end pipeline tests: retrieve -> render -> annotate over a small
//! Kerala-flavoured corpus, using the offline hashing embedder.

use plant_match::answer_builder::{render_answer, NO_MATCH_MESSAGE};
use plant_match::error::PlantMatchError;
use plant_match::plant_expert::PlantExpert;
use plant_match::safety::{SafetyFilter, DISCLAIMER, SAFETY_WARNING};
use plant_match::search::data_loader::parse_plant_corpus;
use plant_match::search::embedding_engine::HashingEmbedder;

const KERALA_CORPUS: &str = r#"[
    {
        "plant_name": "Ocimum tenuiflorum",
        "common_name": "Tulsi",
        "origin_type": "native",
        "carbon_score": 7.5,
        "suitable_states": ["Kerala"],
        "medicinal_uses": "cough cold respiratory ailments",
        "risk_notes": ""
    },
    {
        "plant_name": "Nerium oleander",
        "common_name": "Oleander",
        "origin_type": "exotic",
        "carbon_score": 4.0,
        "suitable_states": ["Kerala"],
        "medicinal_uses": "traditional external use for cough formulations",
        "risk_notes": "highly toxic, can be fatal"
    }
]"#;

fn kerala_expert() -> PlantExpert {
    let records = parse_plant_corpus(KERALA_CORPUS).unwrap();
    PlantExpert::new(records, Box::new(HashingEmbedder::default())).unwrap()
}

#[test]
fn filtered_query_excludes_exotic_oleander_regardless_of_similarity() {
    let expert = kerala_expert();
    let results = expert
        .retrieve("plants for cough in Kerala", 5, Some("Kerala"), true)
        .unwrap();

    assert!(results.iter().all(|p| p.plant_name != "Nerium oleander"));
    assert!(results.iter().any(|p| p.plant_name == "Ocimum tenuiflorum"));

    let answer = SafetyFilter::default().annotate(render_answer("plants for cough in Kerala", &results));
    assert!(!answer.text.contains(SAFETY_WARNING));
    assert!(answer.text.contains(DISCLAIMER));
}

#[test]
fn unfiltered_query_carries_toxicity_warning_on_oleander_block() {
    let expert = kerala_expert();
    let results = expert
        .retrieve("plants for cough in Kerala", 5, None, false)
        .unwrap();
    assert_eq!(results.len(), 2);

    let answer = SafetyFilter::default().annotate(render_answer("plants for cough in Kerala", &results));

    let oleander_block = answer
        .text
        .split("### 🌿 ")
        .find(|b| b.starts_with("Nerium oleander"))
        .unwrap();
    assert!(oleander_block.contains(SAFETY_WARNING));

    let tulsi_block = answer
        .text
        .split("### 🌿 ")
        .find(|b| b.starts_with("Ocimum tenuiflorum"))
        .unwrap();
    assert!(!tulsi_block.contains(SAFETY_WARNING));
}

#[test]
fn unknown_region_flows_through_to_canonical_no_match_answer() {
    let expert = kerala_expert();
    let results = expert
        .retrieve("plants for cough", 5, Some("Rajasthan"), false)
        .unwrap();
    assert!(results.is_empty());

    let answer = SafetyFilter::default().annotate(render_answer("plants for cough", &results));
    assert!(answer.text.contains(NO_MATCH_MESSAGE));
    assert!(answer.text.contains(DISCLAIMER));
}

#[test]
fn pipeline_is_reproducible_end_to_end() {
    let expert = kerala_expert();
    let filter = SafetyFilter::default();

    let run = || {
        let results = expert
            .retrieve("plants for cough in Kerala", 5, None, false)
            .unwrap();
        filter.annotate(render_answer("plants for cough in Kerala", &results)).text
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_queries_are_rejected_before_ranking() {
    let expert = kerala_expert();
    assert!(matches!(
        expert.retrieve("", 5, None, false),
        Err(PlantMatchError::InvalidQuery(_))
    ));
    assert!(matches!(
        expert.retrieve("plants for cough", 0, None, false),
        Err(PlantMatchError::InvalidQuery(_))
    ));
}

#[test]
fn double_annotation_does_not_duplicate_warnings() {
    let expert = kerala_expert();
    let filter = SafetyFilter::default();

    let results = expert
        .retrieve("plants for cough in Kerala", 5, None, false)
        .unwrap();
    let once = filter.annotate(render_answer("plants for cough in Kerala", &results));
    let twice = filter.annotate(once.clone());

    assert_eq!(once, twice);
    assert_eq!(twice.text.matches(SAFETY_WARNING).count(), 1);
    assert_eq!(twice.text.matches(DISCLAIMER).count(), 1);
}
