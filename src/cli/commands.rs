//! CLI command definitions

use crate::core::lesson::Difficulty;
use clap::Args;

/// Run the HTTP service
#[derive(Debug, Args, Clone)]
pub struct ServeCommand {
    /// Address to bind to (overrides settings)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides settings)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Generate a single lesson
#[derive(Debug, Args, Clone)]
pub struct LessonCommand {
    /// Lesson topic
    #[arg(short, long)]
    pub topic: String,

    /// Difficulty level: beginner, intermediate or advanced
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    pub difficulty: Difficulty,

    /// Additional context for the lesson
    #[arg(long)]
    pub context: Option<String>,

    /// Learning objectives to cover (repeatable)
    #[arg(long = "objective")]
    pub objectives: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Generate a course
#[derive(Debug, Args, Clone)]
pub struct CourseCommand {
    /// Course topic
    #[arg(short, long)]
    pub topic: String,

    /// Model to generate with (overrides settings)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Skip the review of each lesson
    #[arg(long)]
    pub no_review: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the effective settings
#[derive(Debug, Args, Clone)]
pub struct ConfigCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
