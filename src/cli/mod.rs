//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - list: List command arguments
//! - mode: Commit-mode command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod list;
pub mod mode;
pub mod uninstall;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use mode::ModeArgs;
pub use uninstall::UninstallArgs;

use crate::installer::InstallScope;
use crate::store::CommitMode;

/// Prompt Registry - lockfile-backed bundle manager
///
/// Tracks installed prompt, instruction and MCP server bundles in a pair of
/// repository-rooted lockfiles.
#[derive(Parser, Debug)]
#[command(
    name = "promptreg",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Lockfile-backed registry for prompt, instruction and MCP server bundles",
    long_about = "Prompt Registry installs bundles of prompts, instructions and MCP server \
                  definitions into a repository and tracks them in two lockfiles: a committed \
                  one for shared bundles and a git-excluded one for local-only bundles.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  promptreg install ./staged --id code-review      \x1b[90m# Record in the committed lockfile\x1b[0m\n   \
                  promptreg install ./staged --id scratch --local-only \x1b[90m# Keep the record out of version control\x1b[0m\n   \
                  promptreg mode code-review local-only            \x1b[90m# Move a bundle between lockfiles\x1b[0m\n   \
                  promptreg list --detailed                        \x1b[90m# Show installed bundles and drifted files\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Repository directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "PROMPTREG_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a staged bundle into the repository
    Install(InstallArgs),

    /// Remove an installed bundle
    Uninstall(UninstallArgs),

    /// List installed bundles from both lockfiles
    List(ListArgs),

    /// Move a bundle between the committed and local lockfiles
    Mode(ModeArgs),

    /// Validate the committed lockfile against its schema
    Validate,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Commit mode as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Record in the committed lockfile
    Commit,
    /// Record in the git-excluded local lockfile
    LocalOnly,
}

impl From<ModeArg> for CommitMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Commit => CommitMode::Commit,
            ModeArg::LocalOnly => CommitMode::LocalOnly,
        }
    }
}

/// Install scope as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Tool-owned storage in the user's data directory
    User,
    /// `.github/` directories at the repository root
    Repository,
}

impl From<ScopeArg> for InstallScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::User => InstallScope::User,
            ScopeArg::Repository => InstallScope::Repository,
        }
    }
}
