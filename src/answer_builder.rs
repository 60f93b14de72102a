use crate::plant_record::PlantRecord;

/// Canonical message for an empty retrieval result. Callers never receive a
/// blank answer.
pub const NO_MATCH_MESSAGE: &str =
    "No matching plants found for your question. Try adjusting the filters or rephrasing.";

const MEDICINAL_USE_SNIPPET_CHARS: usize = 120;
const RISK_SNIPPET_CHARS: usize = 80;

/// Assembled answer plus the records it was grounded on, so callers can show
/// provenance separately from the narrative text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAnswer {
    pub text: String,
    pub sources: Vec<PlantRecord>,
}

/// Renders a grounded answer: one markdown block per record, in the order the
/// retriever returned them. Pure function of its inputs; no re-ranking, no
/// randomness.
pub fn render_answer(query: &str, records: &[&PlantRecord]) -> RenderedAnswer {
    if records.is_empty() {
        return RenderedAnswer {
            text: NO_MATCH_MESSAGE.to_string(),
            sources: Vec::new(),
        };
    }

    let mut lines = Vec::new();
    lines.push(format!(
        "Based on your question: **{}**, here are relevant plants:\n",
        query
    ));

    for plant in records {
        lines.push(format!("### 🌿 {}", plant.plant_name));
        lines.push(format!(
            "- Common name: {}",
            non_empty_or(&plant.common_name, "—")
        ));
        lines.push(format!("- Native status: {}", plant.origin_type));
        lines.push(format!(
            "- Medicinal use: {}",
            non_empty_or(&plant.medicinal_uses, "Traditional use")
        ));
        lines.push(format!("- Carbon score: {}", plant.carbon_score));
        lines.push(String::new()); // spacing
    }

    RenderedAnswer {
        text: lines.join("\n"),
        sources: records.iter().map(|p| (*p).clone()).collect(),
    }
}

/// Compact context digest over the retrieved records, with per-field and
/// total character budgets. Useful for callers that wrap the core in a
/// prompting layer; the core itself only renders templates.
pub fn build_context(records: &[&PlantRecord], max_chars: usize) -> String {
    let blocks: Vec<String> = records
        .iter()
        .map(|p| {
            format!(
                "Plant: {}\nNative: {}\nUses: {}\nSafety: {}\n",
                p.plant_name,
                p.origin_type,
                truncate_chars(&p.medicinal_uses, MEDICINAL_USE_SNIPPET_CHARS),
                truncate_chars(&p.risk_notes, RISK_SNIPPET_CHARS),
            )
        })
        .collect();

    truncate_chars(&blocks.join("\n"), max_chars)
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

// Character-based truncation; byte slicing would panic inside multi-byte
// sequences (plant names and notes are not ASCII-only).
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
