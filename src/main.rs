use anyhow::{Context, Result};
use coursegen::agent::{build_client, LanguageModel};
use coursegen::api::{self, AppState};
use coursegen::cli::commands::{ConfigCommand, CourseCommand, LessonCommand, ServeCommand};
use coursegen::cli::output::*;
use coursegen::cli::{Cli, Command};
use coursegen::core::config::Settings;
use coursegen::execution::{CourseWorkflow, LessonRequest, LessonWorkflow, WorkflowEvent};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Serve(cmd) => serve(cmd, settings).await?,
        Command::Lesson(cmd) => generate_lesson(cmd, &settings).await?,
        Command::Course(cmd) => generate_course(cmd, &settings).await?,
        Command::Config(cmd) => show_config(cmd, &settings)?,
    }

    Ok(())
}

fn create_client(settings: &Settings) -> Result<Arc<dyn LanguageModel>> {
    build_client(&settings.llm.client_config()).context("Failed to create model client")
}

async fn serve(cmd: &ServeCommand, mut settings: Settings) -> Result<()> {
    if let Some(host) = &cmd.host {
        settings.host = host.clone();
    }
    if let Some(port) = cmd.port {
        settings.port = port;
    }
    settings.validate()?;

    let llm = create_client(&settings)?;
    println!(
        "{} Serving {} on {}",
        ROCKET,
        style(&settings.app_name).bold(),
        style(settings.bind_address()).cyan()
    );

    api::serve(AppState::new(settings, llm)).await
}

async fn generate_lesson(cmd: &LessonCommand, settings: &Settings) -> Result<()> {
    let llm = create_client(settings)?;

    let mut request = LessonRequest::new(&cmd.topic)
        .with_difficulty(cmd.difficulty)
        .with_objectives(cmd.objectives.clone());
    if let Some(context) = &cmd.context {
        request = request.with_context(context);
    }

    let mut workflow = LessonWorkflow::new(llm, &settings.llm.model).with_temperature(settings.llm.temperature);
    if !cmd.json {
        workflow = workflow.on_event(|event| println!("{}", format_workflow_event(&event)));
    }

    match workflow.generate_lesson(request).await {
        Ok(lesson) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&lesson)?);
            } else {
                println!("\n{}", format_lesson(&lesson));
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", CROSS, style(&e).red());
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn generate_course(cmd: &CourseCommand, settings: &Settings) -> Result<()> {
    let llm = create_client(settings)?;
    let model = cmd.model.clone().unwrap_or_else(|| settings.llm.model.clone());

    let mut workflow = CourseWorkflow::new(llm, model).with_review(settings.review && !cmd.no_review);

    let progress = if cmd.json {
        None
    } else {
        let progress = create_progress_bar(0);
        let bar = progress.clone();
        workflow = workflow.on_event(move |event| match &event {
            WorkflowEvent::CoursePlanned { total_lessons } => {
                bar.set_length(*total_lessons as u64);
                bar.println(format_workflow_event(&event));
            }
            WorkflowEvent::StageStarted { stage } => bar.set_message(*stage),
            WorkflowEvent::StageCompleted { stage: "generate_content" } => bar.inc(1),
            WorkflowEvent::StageCompleted { .. } => {}
            _ => bar.println(format_workflow_event(&event)),
        });
        Some(progress)
    };

    let result = workflow.generate_course(&cmd.topic).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    match result {
        Ok(course) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&course)?);
            } else {
                println!("\n{}", format_course(&course));
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", CROSS, style(&e).red());
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn show_config(cmd: &ConfigCommand, settings: &Settings) -> Result<()> {
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    println!("{} Effective settings", INFO);
    println!("  App: {} ({})", style(&settings.app_name).bold(), settings.env);
    println!("  Listen: {}", style(settings.bind_address()).cyan());
    println!("  Log level: {}", settings.log_level);
    println!(
        "  Model: {} via {:?} (temperature {})",
        style(&settings.llm.model).cyan(),
        settings.llm.backend,
        settings.llm.temperature
    );
    if let Some(endpoint) = &settings.llm.endpoint {
        println!("  Endpoint: {}", style(endpoint).dim());
    }
    println!("  Review lessons: {}", settings.review);
    if settings.cors_origins.is_empty() {
        println!("  CORS: {}", style("any origin").yellow());
    } else {
        println!("  CORS: {}", settings.cors_origins.join(", "));
    }
    Ok(())
}
