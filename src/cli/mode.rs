use clap::Parser;

use super::ModeArg;

/// Arguments for the mode command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Move a bundle out of the committed lockfile:\n    promptreg mode scratch local-only\n\n\
                   Share a local bundle with the team:\n    promptreg mode scratch commit")]
pub struct ModeArgs {
    /// Bundle id to move
    pub bundle_id: String,

    /// Target commit mode
    #[arg(value_enum)]
    pub mode: ModeArg,
}
