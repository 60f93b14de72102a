use std::path::Path;

use crate::error::PlantMatchError;
use crate::plant_record::PlantRecord;

/// Parses a corpus snapshot from its JSON text.
///
/// Source order is preserved. Entries with a blank `plant_name` are skipped;
/// everything else defaults per the record schema. There is no partial-load
/// mode: malformed JSON or an empty corpus fails the whole load.
pub fn parse_plant_corpus(json: &str) -> Result<Vec<PlantRecord>, PlantMatchError> {
    let raw: Vec<PlantRecord> = serde_json::from_str(json)
        .map_err(|e| PlantMatchError::DataUnavailable(format!("corpus JSON malformed: {}", e)))?;

    let mut records = Vec::with_capacity(raw.len());
    for mut record in raw {
        if record.plant_name.trim().is_empty() {
            continue;
        }
        if record.carbon_score < 0.0 || !record.carbon_score.is_finite() {
            record.carbon_score = 0.0;
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(PlantMatchError::DataUnavailable(
            "corpus contains no valid plant records".to_string(),
        ));
    }

    Ok(records)
}

/// Loads the corpus snapshot from disk. Idempotent; any failure is fatal to
/// the caller since no retrieval can proceed without a corpus.
pub fn load_plant_corpus(path: &Path) -> Result<Vec<PlantRecord>, PlantMatchError> {
    if !path.exists() {
        return Err(PlantMatchError::DataUnavailable(format!(
            "corpus file not found at {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        PlantMatchError::DataUnavailable(format!("failed to read corpus file {:?}: {}", path, e))
    })?;

    parse_plant_corpus(&contents)
}
