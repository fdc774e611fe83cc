//! Install command implementation

use console::Style;
use std::path::PathBuf;

use crate::cli::InstallArgs;
use crate::commands::helpers;
use crate::config::lockfile::SourceEntry;
use crate::error::Result;
use crate::installer::{self, InstallRequest};
use crate::mcp::McpServerManager;
use crate::store::CommitMode;

/// Run install command
pub fn run(workspace: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let store = helpers::open_store(workspace)?;
    let mcp = McpServerManager::new(store.root());

    let commit_mode = if args.local_only {
        CommitMode::LocalOnly
    } else {
        CommitMode::Commit
    };

    let mut source = SourceEntry::new(
        &args.source_type,
        args.source_url
            .clone()
            .unwrap_or_else(|| format!("file://{}", args.staged.display())),
    );
    source.branch = args.branch.clone();

    let request = InstallRequest {
        bundle_id: args.bundle_id.clone(),
        version: args.version.clone(),
        staged_dir: args.staged.clone(),
        scope: args.scope.into(),
        commit_mode,
        source,
        hub: None,
        profile: None,
    };

    let outcome = installer::install(&store, &mcp, &request)?;

    println!(
        "Installed {} {} ({})",
        Style::new().bold().yellow().apply_to(&args.bundle_id),
        args.version,
        commit_mode
    );
    for file in &outcome.files {
        println!("  {}", Style::new().dim().apply_to(&file.path));
    }
    if !outcome.mcp_servers.is_empty() {
        println!("  {}", Style::new().bold().apply_to("MCP servers:"));
        for server in &outcome.mcp_servers {
            println!("    {}", Style::new().cyan().apply_to(server));
        }
    }

    store.dispose();
    Ok(())
}
