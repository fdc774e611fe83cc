use clap::Parser;
use std::path::PathBuf;

use super::ScopeArg;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install into the committed lockfile:\n    promptreg install ./staged --id code-review --version 1.0.0\n\n\
                   Install as local-only (git-excluded record):\n    promptreg install ./staged --id scratch --local-only\n\n\
                   Install into user storage instead of .github/:\n    promptreg install ./staged --id personal --scope user\n\n\
                   Record provenance:\n    promptreg install ./staged --id code-review \\\n        --source-type github --source-url https://github.com/acme/prompts")]
pub struct InstallArgs {
    /// Directory containing the staged (already extracted) bundle content
    pub staged: PathBuf,

    /// Bundle id to record
    #[arg(long = "id")]
    pub bundle_id: String,

    /// Bundle version to record
    #[arg(long, default_value = "0.0.0")]
    pub version: String,

    /// Source URL the bundle came from (defaults to the staged directory)
    #[arg(long = "source-url")]
    pub source_url: Option<String>,

    /// Source type the bundle came from
    #[arg(long = "source-type", default_value = "local")]
    pub source_type: String,

    /// Source branch the bundle was fetched from
    #[arg(long)]
    pub branch: Option<String>,

    /// Where the bundle's files land
    #[arg(long, value_enum, default_value_t = ScopeArg::Repository)]
    pub scope: ScopeArg,

    /// Keep the record in the git-excluded local lockfile
    #[arg(long = "local-only")]
    pub local_only: bool,
}
