//! Prompt building helpers

use crate::core::lesson::LearningObjective;
use crate::stages::lesson::LessonSection;
use serde::Serialize;

/// Number of content sections shown in overview blocks
const OVERVIEW_SECTIONS: usize = 3;

/// Characters of section content shown in overview blocks
const OVERVIEW_CHARS: usize = 100;

/// Preamble followed by the raw input and a format reminder
pub fn with_input_data<T: Serialize + ?Sized>(preamble: &str, input: &T) -> String {
    let data = serde_json::to_string(input).unwrap_or_default();
    format!(
        "{}\n\nInput data: {}\nPlease provide your response in the specified JSON format.",
        preamble, data
    )
}

/// `- description (Key Concept: concept)` per objective
pub fn objectives_list(objectives: &[LearningObjective]) -> String {
    objectives
        .iter()
        .map(|obj| {
            let concept = if obj.key_concept.is_empty() {
                "N/A"
            } else {
                obj.key_concept.as_str()
            };
            format!("- {} (Key Concept: {})", obj.description, concept)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First few sections with their content cut short
pub fn sections_overview(sections: &[LessonSection]) -> String {
    sections
        .iter()
        .take(OVERVIEW_SECTIONS)
        .map(|s| {
            let heading = if s.heading.is_empty() {
                "Untitled Section"
            } else {
                s.heading.as_str()
            };
            format!("- {}: {}...", heading, truncate(&s.content, OVERVIEW_CHARS))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- item` per entry, or `fallback` when empty
pub fn bullet_list(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        return fallback.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` to at most `max` characters on a char boundary
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
