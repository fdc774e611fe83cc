//! Uninstall command implementation

use console::Style;
use std::path::PathBuf;

use crate::cli::UninstallArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::installer;
use crate::mcp::McpServerManager;

/// Run uninstall command
pub fn run(workspace: Option<PathBuf>, args: UninstallArgs) -> Result<()> {
    let store = helpers::open_store(workspace)?;
    let mcp = McpServerManager::new(store.root());

    if !args.yes {
        let confirmed = inquire::Confirm::new(&format!(
            "Uninstall bundle '{}' and delete its installed files?",
            args.bundle_id
        ))
        .with_default(false)
        .prompt()?;
        if !confirmed {
            println!("Aborted.");
            store.dispose();
            return Ok(());
        }
    }

    let removed = installer::uninstall(&store, &mcp, &args.bundle_id)?;

    println!(
        "Uninstalled {}",
        Style::new().bold().yellow().apply_to(&args.bundle_id)
    );
    for path in &removed {
        println!("  removed {}", Style::new().dim().apply_to(path));
    }

    store.dispose();
    Ok(())
}
