//! Command-line entry point for `curriculum_core`.
//!
//! # Responsibility
//! - Verify core linkage and print the crate version.
//! - When `CURRICULUM_*` settings are present, fetch one course curriculum
//!   and print its outline.

use curriculum_core::{AjaxBackend, BackendConfig, CurriculumService};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("curriculum_core version={}", curriculum_core::core_version());

    if std::env::var_os("CURRICULUM_AJAX_URL").is_none() {
        return ExitCode::SUCCESS;
    }

    if let Ok(log_dir) = std::env::var("CURRICULUM_LOG_DIR") {
        if let Err(err) = curriculum_core::init_logging(curriculum_core::default_log_level(), &log_dir)
        {
            eprintln!("logging disabled: {err}");
        }
    }

    match print_outline() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_outline() -> Result<(), Box<dyn std::error::Error>> {
    let config = BackendConfig::from_env()?;
    let course_id = config.course_id.clone();
    let backend = AjaxBackend::new(config)?;

    let mut service = CurriculumService::new(course_id, Arc::new(backend));
    service.load()?;

    for topic in service.tree().topics() {
        println!("{} {}", topic.key, topic.title);
        for content in &topic.contents {
            println!("  {} {}", content.id, content.title);
        }
    }
    Ok(())
}
