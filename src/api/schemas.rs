//! HTTP request and response bodies

use crate::core::course::Course;
use crate::core::lesson::{Difficulty, Example, LearningObjective, QuizQuestion};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoQuery {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoResponse {
    pub result: String,
}

/// Body of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCourseRequest {
    pub topic: String,
    /// Model to generate with, the configured model when absent
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCourseResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateCourseResponse {
    pub fn ok(course: Course) -> Self {
        Self {
            success: true,
            course: Some(course),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            course: None,
            error: Some(error.into()),
        }
    }
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateLessonRequest {
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub learning_objectives: Option<Vec<String>>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default = "yes")]
    pub include_quiz: bool,
    #[serde(default = "yes")]
    pub include_examples: bool,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

impl GenerateLessonRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            difficulty: Difficulty::default(),
            learning_objectives: None,
            context: None,
            include_quiz: true,
            include_examples: true,
            custom_instructions: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSectionResponse {
    pub heading: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateLessonResponse {
    pub topic: String,
    pub difficulty: Difficulty,
    pub learning_objectives: Vec<LearningObjective>,
    pub sections: Vec<LessonSectionResponse>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    pub summary: String,
    pub estimated_duration_minutes: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lesson_request_defaults() {
        let request: GenerateLessonRequest = serde_json::from_value(json!({"topic": "Loops"})).unwrap();
        assert_eq!(request, GenerateLessonRequest::new("Loops"));
    }

    #[test]
    fn test_failed_course_response_omits_course() {
        let value = serde_json::to_value(GenerateCourseResponse::failed("boom")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "boom"}));
    }
}
