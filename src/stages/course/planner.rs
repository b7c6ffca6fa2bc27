//! Course structure planning

use crate::agent::SchemaSpec;
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::lesson::default_audience;
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "You are an expert curriculum designer. Plan a course \
as a sequence of modules. Each module has a title, a short description, its \
learning objectives and the number of lessons it needs.";

pub const MAX_MODULES: usize = 10;
pub const MAX_LESSONS_PER_MODULE: usize = 10;

fn default_num_lessons() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
}

impl PlannerInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            target_audience: default_audience(),
            learning_objectives: Vec::new(),
        }
    }
}

impl Validate for PlannerInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)
    }
}

/// Planned module, before any lesson is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePlan {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default = "default_num_lessons")]
    pub num_lessons: usize,
}

impl Validate for ModulePlan {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("title", &self.title)?;
        validation::in_range("num_lessons", self.num_lessons, 1, MAX_LESSONS_PER_MODULE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePlan {
    pub course_title: String,
    #[serde(default)]
    pub course_description: String,
    pub modules: Vec<ModulePlan>,
}

impl Validate for CoursePlan {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("course_title", &self.course_title)?;
        validation::len_between("modules", self.modules.len(), 1, MAX_MODULES)?;
        validation::each("modules", &self.modules)
    }
}

impl OutputSchema for CoursePlan {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "CoursePlan",
        shape: r#"{"course_title": "string", "course_description": "string", "modules": [{"title": "string", "description": "string", "learning_objectives": ["string"], "num_lessons": 3}]}"#,
    };
}

/// Plans the modules of a course
pub struct Planner {
    generator: Generator,
}

impl Planner {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &PlannerInput) -> String {
        format!(
            "{}\n\nTopic: {}\nTarget Audience: {}\nCourse Objectives:\n{}\n\nPlease provide your response in the specified JSON format.",
            INSTRUCTIONS,
            input.topic,
            input.target_audience,
            prompt::bullet_list(&input.learning_objectives, "Decide on suitable objectives"),
        )
    }
}

#[async_trait]
impl Stage for Planner {
    type Input = PlannerInput;
    type Output = CoursePlan;

    fn name(&self) -> &'static str {
        "plan_course"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError> {
        let prompt = self.prompt(&input);
        self.generator.generate(self.name(), &prompt, &input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_num_lessons_defaults_to_three() {
        let plan: ModulePlan = serde_json::from_value(json!({"title": "Basics"})).unwrap();
        assert_eq!(plan.num_lessons, 3);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_plan_bounds() {
        let module: ModulePlan = serde_json::from_value(json!({"title": "M", "num_lessons": 11})).unwrap();
        let plan = CoursePlan {
            course_title: "C".to_string(),
            course_description: String::new(),
            modules: vec![module],
        };
        assert_eq!(plan.validate().unwrap_err().field, "modules[0].num_lessons");

        let empty = CoursePlan {
            course_title: "C".to_string(),
            course_description: String::new(),
            modules: vec![],
        };
        assert_eq!(empty.validate().unwrap_err().field, "modules");
    }
}
