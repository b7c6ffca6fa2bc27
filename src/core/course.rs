//! Course domain aggregates

use serde::{Deserialize, Serialize};

/// A lesson within a course module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// A module groups related lessons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A generated course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub topic: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    /// Total number of lessons across all modules
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn module(&self, idx: usize) -> Option<&Module> {
        self.modules.get(idx)
    }

    pub fn lesson(&self, module: usize, lesson: usize) -> Option<&Lesson> {
        self.modules.get(module).and_then(|m| m.lessons.get(lesson))
    }

    pub fn lesson_mut(&mut self, module: usize, lesson: usize) -> Option<&mut Lesson> {
        self.modules
            .get_mut(module)
            .and_then(|m| m.lessons.get_mut(lesson))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(title: &str) -> Lesson {
        Lesson {
            title: title.to_string(),
            summary: String::new(),
            objectives: vec![],
            key_points: vec![],
        }
    }

    #[test]
    fn test_lesson_lookup() {
        let mut course = Course {
            topic: "Rust".to_string(),
            modules: vec![
                Module {
                    title: "Basics".to_string(),
                    description: String::new(),
                    lessons: vec![lesson("a"), lesson("b")],
                },
                Module {
                    title: "Traits".to_string(),
                    description: String::new(),
                    lessons: vec![lesson("c")],
                },
            ],
        };

        assert_eq!(course.lesson_count(), 3);
        assert_eq!(course.lesson(1, 0).map(|l| l.title.as_str()), Some("c"));
        assert!(course.lesson(1, 1).is_none());

        course.lesson_mut(0, 1).unwrap().summary = "updated".to_string();
        assert_eq!(course.lesson(0, 1).unwrap().summary, "updated");
    }
}
