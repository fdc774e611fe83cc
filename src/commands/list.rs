//! List command implementation
//!
//! Lists the unified view over both lockfiles with each bundle's commit
//! mode, source and (in detailed mode) recorded files and local drift.

use console::Style;
use std::path::PathBuf;

use crate::cli::ListArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::store::{InstalledBundle, LockfileStore, ModificationKind};

/// Run list command
pub fn run(workspace: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let store = helpers::open_store(workspace)?;

    let installed = store.installed_bundles();
    if installed.is_empty() {
        println!("No bundles installed.");
        store.dispose();
        return Ok(());
    }

    println!("Installed bundles ({}):", installed.len());
    println!();
    for bundle in &installed {
        display_bundle(&store, bundle, args.detailed)?;
        println!();
    }

    store.dispose();
    Ok(())
}

fn display_bundle(store: &LockfileStore, bundle: &InstalledBundle, detailed: bool) -> Result<()> {
    println!(
        "  {} {} {}",
        Style::new().bold().yellow().apply_to(&bundle.id),
        bundle.entry.version,
        Style::new().dim().apply_to(format!("[{}]", bundle.commit_mode)),
    );

    if let Some(source) = &bundle.source {
        println!(
            "    {} {} ({})",
            Style::new().bold().apply_to("Source:"),
            source.url,
            source.source_type
        );
    } else {
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Source:"),
            Style::new().dim().apply_to(&bundle.entry.source_id)
        );
    }

    if !detailed {
        return Ok(());
    }

    if let Some(hub) = &bundle.entry.hub {
        println!("    {} {}", Style::new().bold().apply_to("Hub:"), hub);
    }
    if let Some(profile) = &bundle.entry.profile {
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Profile:"),
            profile
        );
    }

    let total = bundle.entry.files.len();
    let label = if total == 1 { "file" } else { "files" };
    println!(
        "    {} ({total} {label})",
        Style::new().bold().apply_to("Files:")
    );
    for file in &bundle.entry.files {
        println!("      {}", Style::new().dim().apply_to(&file.path));
    }

    let drifted = store.detect_modified_files(&bundle.id)?;
    if !drifted.is_empty() {
        println!(
            "    {}",
            Style::new().bold().red().apply_to("Locally modified:")
        );
        for modified in &drifted {
            let kind = match modified.kind {
                ModificationKind::Missing => "missing",
                ModificationKind::Modified { .. } => "modified",
            };
            println!(
                "      {} ({})",
                Style::new().red().apply_to(&modified.path),
                kind
            );
        }
    }

    Ok(())
}
