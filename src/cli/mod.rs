//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ConfigCommand, CourseCommand, LessonCommand, ServeCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Course and lesson generation service
#[derive(Debug, Parser, Clone)]
#[command(name = "coursegen")]
#[command(version)]
#[command(about = "Generate courses and lessons with a language model", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeCommand),

    /// Generate a single lesson
    Lesson(LessonCommand),

    /// Generate a course
    Course(CourseCommand),

    /// Show the effective settings
    Config(ConfigCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
