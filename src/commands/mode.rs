//! Commit-mode command implementation

use console::Style;
use std::path::PathBuf;

use crate::cli::ModeArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::store::CommitMode;

/// Run mode command
pub fn run(workspace: Option<PathBuf>, args: ModeArgs) -> Result<()> {
    let store = helpers::open_store(workspace)?;

    let mode: CommitMode = args.mode.into();
    store.update_commit_mode(&args.bundle_id, mode)?;

    println!(
        "Moved {} to {}",
        Style::new().bold().yellow().apply_to(&args.bundle_id),
        Style::new().cyan().apply_to(mode.as_str())
    );

    store.dispose();
    Ok(())
}
