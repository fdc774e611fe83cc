//! Prompt Registry CLI entry point

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use promptreg::cli::{Cli, Commands};
use promptreg::commands;
use promptreg::error::{PromptRegError, Result};

/// Check if the current working directory is within a git repository
fn check_git_repository(workspace_path: Option<PathBuf>) -> Result<()> {
    let start_dir = match workspace_path {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| PromptRegError::IoError {
            message: format!("Failed to get current directory: {}", e),
        })?,
    };

    if git2::Repository::discover(&start_dir).is_err() {
        return Err(PromptRegError::NotInGitRepository);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "promptreg=debug"
    } else {
        "promptreg=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Version and completions can run outside a git repository
    let needs_git_repo = matches!(
        cli.command,
        Commands::Install(_)
            | Commands::Uninstall(_)
            | Commands::List(_)
            | Commands::Mode(_)
            | Commands::Validate
    );

    if needs_git_repo {
        if let Err(e) = check_git_repository(cli.workspace.clone()) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.workspace, args),
        Commands::Uninstall(args) => commands::uninstall::run(cli.workspace, args),
        Commands::List(args) => commands::list::run(cli.workspace, args),
        Commands::Mode(args) => commands::mode::run(cli.workspace, args),
        Commands::Validate => commands::validate::run(cli.workspace),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
