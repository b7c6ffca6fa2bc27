//! Deterministic offline model client

use crate::agent::{AgentError, LanguageModel, StructuredRequest};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Returns canned, schema-valid responses without contacting any model
///
/// Values such as the topic or lesson title are read from the request
/// context, falling back to `Label: value` lines in the prompt.
#[derive(Debug, Clone, Default)]
pub struct StubClient;

impl StubClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageModel for StubClient {
    async fn generate(&self, prompt: &str, model: &str, _temperature: f32) -> Result<String, AgentError> {
        debug!("stub text generation with model {}", model);
        let preview: String = prompt.chars().take(50).collect();
        Ok(format!("Generated response for prompt: {}...", preview))
    }

    async fn generate_structured(&self, request: StructuredRequest<'_>) -> Result<Value, AgentError> {
        debug!("stub structured generation of {}", request.schema.name);
        let ctx = request.context;
        let prompt = request.prompt;

        let value = match request.schema.name {
            "TopicValidatorOutput" => {
                let topic = lookup(ctx, prompt, "topic", "Topic")?.unwrap_or_else(|| "General".to_string());
                json!({
                    "original_topic": topic,
                    "refined_topic": topic,
                    "is_valid": true,
                    "validation_message": "Topic is suitable for a lesson",
                    "suggested_scope": format!("An introduction to {}", topic),
                    "prerequisites": [],
                })
            }
            "LearningObjectivesOutput" => {
                let topic = lookup(ctx, prompt, "topic", "Topic")?.unwrap_or_else(|| "the topic".to_string());
                let objectives: Vec<Value> = ["Understand", "Apply", "Analyze"]
                    .iter()
                    .map(|verb| {
                        json!({
                            "description": format!("{} the core ideas of {}", verb, topic),
                            "key_concept": format!("{} {}", verb, topic),
                        })
                    })
                    .collect();
                json!({
                    "objectives": objectives,
                    "difficulty": "beginner",
                    "alignment_note": "Objectives progress from recall to analysis",
                })
            }
            "LessonBodyOutput" => {
                let topic = lookup(ctx, prompt, "topic", "Topic")?.unwrap_or_else(|| "the topic".to_string());
                let sections: Vec<Value> = ["Introduction", "Core Concepts", "Putting It Together"]
                    .iter()
                    .map(|heading| {
                        json!({
                            "heading": heading,
                            "content": format!("{} of {}.", heading, topic),
                            "key_points": [format!("{} matters", heading)],
                            "learning_objectives_covered": [],
                        })
                    })
                    .collect();
                let mut key_terms = Map::new();
                key_terms.insert(topic.clone(), json!("The subject of this lesson"));
                json!({
                    "sections": sections,
                    "estimated_duration_minutes": 45,
                    "key_terms": key_terms,
                    "summary": format!("A short lesson on {}.", topic),
                })
            }
            "ExampleGeneratorOutput" => {
                let count = ctx
                    .get("num_examples")
                    .and_then(Value::as_u64)
                    .unwrap_or(2)
                    .clamp(1, 5);
                let examples: Vec<Value> = (1..=count)
                    .map(|i| {
                        json!({
                            "title": format!("Example {}", i),
                            "description": format!("Worked example number {}", i),
                            "key_takeaway": format!("Takeaway {}", i),
                        })
                    })
                    .collect();
                json!({ "examples": examples, "additional_resources": [] })
            }
            "QuizDraft" => {
                let questions: Vec<Value> = (1..=3)
                    .map(|i| {
                        json!({
                            "question": format!("Question {}?", i),
                            "options": ["Option A", "Option B", "Option C", "Option D"],
                            "correct_answer": 0,
                            "explanation": "Option A is correct",
                            "learning_objectives": [],
                        })
                    })
                    .collect();
                json!({ "questions": questions, "assessment_criteria": {} })
            }
            "CoursePlan" => {
                let topic = lookup(ctx, prompt, "topic", "Topic")?.unwrap_or_else(|| "General".to_string());
                json!({
                    "course_title": format!("Introduction to {}", topic),
                    "course_description": format!("A course about {}", topic),
                    "modules": [
                        {
                            "title": format!("Getting Started with {}", topic),
                            "description": "Foundations",
                            "learning_objectives": ["Learn the basics"],
                            "num_lessons": 3,
                        },
                        {
                            "title": format!("Advanced {}", topic),
                            "description": "Deeper topics",
                            "learning_objectives": ["Master advanced ideas"],
                            "num_lessons": 4,
                        },
                    ],
                })
            }
            "LessonDraft" => {
                let course = lookup(ctx, prompt, "course_topic", "Course")?.unwrap_or_default();
                let module = lookup(ctx, prompt, "module_title", "Module")?.unwrap_or_default();
                let lesson = lookup(ctx, prompt, "lesson_title", "Lesson")?.unwrap_or_default();
                json!({
                    "title": lesson,
                    "summary": format!("{} in {} ({})", lesson, module, course),
                    "objectives": [format!("Understand {}", lesson)],
                    "key_points": ["Key idea", "Common pitfalls", "Practice"],
                })
            }
            "ReviewFeedback" => json!({
                "is_approved": true,
                "feedback": "Looks good",
                "suggestions": [],
            }),
            other => {
                return Err(AgentError::Internal(format!(
                    "stub client has no response for schema {}",
                    other
                )))
            }
        };

        Ok(value)
    }
}

/// Read a string from the context, or from a `Label: value` prompt line
fn lookup(ctx: &Map<String, Value>, prompt: &str, key: &str, label: &str) -> Result<Option<String>, AgentError> {
    if let Some(value) = ctx.get(key).and_then(Value::as_str) {
        return Ok(Some(value.to_string()));
    }

    let pattern = format!(r"(?m)^{}:\s*(.+)$", regex::escape(label));
    let re = Regex::new(&pattern).map_err(|e| AgentError::Internal(format!("invalid pattern: {}", e)))?;
    Ok(re
        .captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SchemaSpec;

    fn request<'a>(name: &'static str, prompt: &'a str, context: &'a Map<String, Value>) -> StructuredRequest<'a> {
        StructuredRequest {
            schema: SchemaSpec { name, shape: "{}" },
            prompt,
            model: "gpt-4",
            temperature: 0.7,
            context,
        }
    }

    #[tokio::test]
    async fn test_text_generation_echoes_prompt_prefix() {
        let text = StubClient::new().generate("Explain closures", "gpt-4", 0.7).await.unwrap();
        assert_eq!(text, "Generated response for prompt: Explain closures...");
    }

    #[tokio::test]
    async fn test_topic_from_context() {
        let mut ctx = Map::new();
        ctx.insert("topic".to_string(), json!("Rust"));
        let value = StubClient::new()
            .generate_structured(request("TopicValidatorOutput", "", &ctx))
            .await
            .unwrap();
        assert_eq!(value["refined_topic"], "Rust");
        assert_eq!(value["is_valid"], true);
    }

    #[tokio::test]
    async fn test_lesson_draft_reads_prompt_labels() {
        let ctx = Map::new();
        let prompt = "Write a lesson.\nCourse: Rust\nModule: Basics\nLesson: Lesson 1\n";
        let value = StubClient::new()
            .generate_structured(request("LessonDraft", prompt, &ctx))
            .await
            .unwrap();
        assert_eq!(value["title"], "Lesson 1");
        assert_eq!(value["summary"], "Lesson 1 in Basics (Rust)");
    }

    #[tokio::test]
    async fn test_example_count_follows_context() {
        let mut ctx = Map::new();
        ctx.insert("num_examples".to_string(), json!(4));
        let value = StubClient::new()
            .generate_structured(request("ExampleGeneratorOutput", "", &ctx))
            .await
            .unwrap();
        assert_eq!(value["examples"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_schema_is_an_error() {
        let ctx = Map::new();
        let err = StubClient::new()
            .generate_structured(request("Mystery", "", &ctx))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Internal(_)));
    }
}
