//! CLI output formatting

use crate::core::course::Course;
use crate::core::lesson::LessonContent;
use crate::execution::WorkflowEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(bar_style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a workflow event for display
pub fn format_workflow_event(event: &WorkflowEvent) -> String {
    match event {
        WorkflowEvent::PipelineStarted {
            execution_id,
            pipeline,
        } => format!(
            "{} Starting {} generation ({})",
            ROCKET,
            style(pipeline).bold(),
            style(&execution_id.to_string()[..8]).dim()
        ),
        WorkflowEvent::StageStarted { stage } => format!("{} {}", SPINNER, style(stage).cyan()),
        WorkflowEvent::StageCompleted { stage } => format!("{} {}", CHECK, style(stage).green()),
        WorkflowEvent::CoursePlanned { total_lessons } => format!(
            "{} Planned {} lessons",
            INFO,
            style(total_lessons).cyan()
        ),
        WorkflowEvent::LessonReviewed { lesson, approved } => {
            if *approved {
                format!("{} {} approved", CHECK, style(lesson).green())
            } else {
                format!("{} {} needs changes", WARN, style(lesson).yellow())
            }
        }
        WorkflowEvent::PipelineCompleted { execution_id } => format!(
            "{} Generation ({}) {} completed",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            style("successfully").green()
        ),
        WorkflowEvent::PipelineFailed {
            execution_id,
            error,
        } => format!(
            "{} Generation ({}) {}: {}",
            CROSS,
            style(&execution_id.to_string()[..8]).dim(),
            style("failed").red(),
            style(error).dim()
        ),
    }
}

/// Render a lesson for the terminal
pub fn format_lesson(lesson: &LessonContent) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}, {} min)\n",
        style(&lesson.topic).bold(),
        style(lesson.difficulty).cyan(),
        lesson.estimated_duration_minutes
    ));
    if !lesson.summary.is_empty() {
        out.push_str(&format!("{}\n", style(&lesson.summary).dim()));
    }

    out.push_str(&format!("\n{}\n", style("Objectives").bold()));
    for obj in &lesson.learning_objectives {
        out.push_str(&format!("  - {}\n", obj.description));
    }

    out.push_str(&format!("\n{}\n", style("Sections").bold()));
    for section in &lesson.content_sections {
        let heading = section
            .get("heading")
            .and_then(Value::as_str)
            .unwrap_or("Untitled Section");
        out.push_str(&format!("  {}\n", style(heading).cyan()));
    }

    out.push_str(&format!("\n{}\n", style("Examples").bold()));
    for example in &lesson.examples {
        out.push_str(&format!("  - {}: {}\n", example.title, example.key_takeaway));
    }

    out.push_str(&format!("\n{}\n", style("Quiz").bold()));
    for (i, q) in lesson.quiz_questions.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, q.question));
        for (j, option) in q.options.iter().enumerate() {
            let marker = if j == q.correct_answer { "*" } else { " " };
            out.push_str(&format!("     {} {}\n", marker, option));
        }
    }
    out
}

/// Render a course outline for the terminal
pub fn format_course(course: &Course) -> String {
    let mut out = format!(
        "{} ({} modules, {} lessons)\n",
        style(&course.topic).bold(),
        course.modules.len(),
        course.lesson_count()
    );
    for (i, module) in course.modules.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", i + 1, style(&module.title).bold()));
        if !module.description.is_empty() {
            out.push_str(&format!("   {}\n", style(&module.description).dim()));
        }
        for lesson in &module.lessons {
            out.push_str(&format!("   - {}: {}\n", style(&lesson.title).cyan(), lesson.summary));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::course::{Lesson, Module};

    #[test]
    fn test_format_course_lists_lessons() {
        console::set_colors_enabled(false);
        let course = Course {
            topic: "Rust".to_string(),
            modules: vec![Module {
                title: "Basics".to_string(),
                description: String::new(),
                lessons: vec![Lesson {
                    title: "Lesson 1".to_string(),
                    summary: "Hello".to_string(),
                    objectives: vec![],
                    key_points: vec![],
                }],
            }],
        };
        let text = format_course(&course);
        assert!(text.contains("1 modules, 1 lessons"));
        assert!(text.contains("Lesson 1: Hello"));
    }

    #[test]
    fn test_format_review_event() {
        console::set_colors_enabled(false);
        let text = format_workflow_event(&WorkflowEvent::LessonReviewed {
            lesson: "Lesson 2".to_string(),
            approved: false,
        });
        assert!(text.contains("Lesson 2 needs changes"));
    }
}
