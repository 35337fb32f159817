// insights/src/main.rs

mod cli;
mod commands;
mod output;

use clap::Parser;
use tracing::Level;

use insights_core::ErrorCategory;
use insights_core::InsightsError;
use insights_core::domain::DomainError;
use insights_core::infrastructure::error::InfrastructureError;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `--format json` output stays clean.
    // -v pour voir les étapes, -vv pour le détail
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command).await {
        report(&err);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            file,
            project_dir,
            format,
            save,
        } => commands::analyze::execute(file, project_dir, format, save).await,
        Commands::Quality {
            file,
            project_dir,
            min_score,
            format,
        } => commands::quality::execute(file, project_dir, min_score, format).await,
        Commands::Templates { project_dir, file } => {
            commands::templates::execute(project_dir, file).await
        }
        Commands::Scan {
            project_dir,
            data_dir,
            min_score,
            concurrency,
            format,
        } => commands::scan::execute(project_dir, data_dir, min_score, concurrency, format).await,
        Commands::Alerts {
            project_dir,
            action,
        } => commands::alerts::execute(project_dir, action).await,
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}

fn category_of(err: &anyhow::Error) -> Option<ErrorCategory> {
    if let Some(e) = err.downcast_ref::<InsightsError>() {
        return Some(e.category());
    }
    if let Some(e) = err.downcast_ref::<InfrastructureError>() {
        return Some(e.category());
    }
    err.downcast_ref::<DomainError>().map(DomainError::category)
}

fn report(err: &anyhow::Error) {
    eprintln!("❌ {:#}", err);
    if let Some(category) = category_of(err) {
        let guidance = category.guidance();
        let actions: Vec<&str> = guidance.actions.iter().map(|a| a.as_str()).collect();
        eprintln!("   {}: {}", guidance.title, guidance.message);
        eprintln!("   Next steps: {}", actions.join(", "));
    }
}
