use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ecological origin of a plant relative to the region the corpus covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OriginType {
    Native,
    Exotic,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OriginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginType::Native => write!(f, "native"),
            OriginType::Exotic => write!(f, "exotic"),
            OriginType::Unknown => write!(f, "unknown"),
        }
    }
}

// The source snapshot uses explicit JSON nulls for unknown fields; plain
// #[serde(default)] only covers absent keys, so nulls go through this helper.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One plant species/cultivar entry in the corpus.
///
/// All optional fields default at the load boundary, so downstream logic can
/// treat every field as present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    /// Scientific name. Never empty once loaded; the corpus loader drops
    /// entries with a blank name.
    pub plant_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plant_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub family: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub climate_zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_type: OriginType,
    /// Non-negative; missing values become 0 and negatives are clamped to 0
    /// by the corpus loader.
    #[serde(default, deserialize_with = "null_as_default")]
    pub carbon_score: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suitable_states: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medicinal_uses: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pharmacology: String,
}

impl PlantRecord {
    /// Canonical text projection used to compute the record's embedding.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {}",
            self.plant_name, self.common_name, self.medicinal_uses
        )
    }

    pub fn is_native(&self) -> bool {
        self.origin_type == OriginType::Native
    }

    pub fn suits_state(&self, state: &str) -> bool {
        self.suitable_states.iter().any(|s| s == state)
    }
}
