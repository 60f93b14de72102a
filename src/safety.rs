use crate::answer_builder::RenderedAnswer;
use crate::plant_record::PlantRecord;

/// Default risk indicators, matching the toxicity heuristic the corpus was
/// built with. Treated as configuration: callers can supply their own set.
pub const DEFAULT_RISK_KEYWORDS: &[&str] = &["toxic", "poison", "fatal"];

pub const SAFETY_WARNING: &str =
    "⚠️ **Safety warning:** This plant may be toxic. Avoid if children or pets are present.";

pub const DISCLAIMER: &str =
    "_Traditional knowledge, not a prescription. Consult a qualified practitioner before any medicinal use._";

/// Keyword-based toxicity annotator. Scans source records rather than the
/// rendered prose, appends warnings, and never removes content.
pub struct SafetyFilter {
    keywords: Vec<String>,
}

impl Default for SafetyFilter {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_KEYWORDS)
    }
}

impl SafetyFilter {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// A record is flagged when its risk notes or pharmacology text contains
    /// any risk keyword, case-insensitively.
    pub fn is_flagged(&self, record: &PlantRecord) -> bool {
        let risk = record.risk_notes.to_lowercase();
        let pharma = record.pharmacology.to_lowercase();
        self.keywords
            .iter()
            .any(|k| risk.contains(k) || pharma.contains(k))
    }

    /// Appends the fixed warning sentence to each flagged record's block and
    /// a single trailing disclaimer. Blocks are matched to sources by
    /// position, so duplicate plant names are independently flaggable.
    ///
    /// Monotonic and idempotent: content is only ever added, and annotating
    /// an already annotated answer changes nothing.
    pub fn annotate(&self, answer: RenderedAnswer) -> RenderedAnswer {
        let mut lines: Vec<String> = answer.text.lines().map(String::from).collect();

        let heading_indices: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with("### "))
            .map(|(i, _)| i)
            .collect();

        // Walk blocks back to front so insertions don't shift pending indices.
        for block in (0..heading_indices.len()).rev() {
            let record = match answer.sources.get(block) {
                Some(record) => record,
                None => continue,
            };
            if !self.is_flagged(record) {
                continue;
            }

            let start = heading_indices[block];
            let end = heading_indices
                .get(block + 1)
                .copied()
                .unwrap_or(lines.len());
            if lines[start..end].iter().any(|line| line == SAFETY_WARNING) {
                continue;
            }

            // Insert after the block's last non-empty line, before spacing.
            let mut insert_at = end;
            while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
                insert_at -= 1;
            }
            lines.insert(insert_at, SAFETY_WARNING.to_string());
        }

        let mut text = lines.join("\n");
        // Structural check: the disclaimer counts only as the trailing line.
        // A substring test would be fooled by a query echo or record text
        // that happens to quote the disclaimer.
        if !text.trim_end().ends_with(DISCLAIMER) {
            text.push_str("\n\n");
            text.push_str(DISCLAIMER);
        }

        RenderedAnswer {
            text,
            sources: answer.sources,
        }
    }
}
