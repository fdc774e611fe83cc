//! Validate command implementation

use console::Style;
use std::path::PathBuf;

use crate::commands::helpers;
use crate::error::{Result, config_invalid};

/// Run validate command
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let store = helpers::open_store(workspace)?;
    let report = store.validate();
    store.dispose();

    for warning in &report.warnings {
        println!(
            "{} {}",
            Style::new().bold().yellow().apply_to("warning:"),
            warning
        );
    }
    for error in &report.errors {
        println!("{} {}", Style::new().bold().red().apply_to("error:"), error);
    }

    if report.valid {
        println!(
            "Lockfile is valid (schema {})",
            Style::new().cyan().apply_to(&report.schema_version)
        );
        Ok(())
    } else {
        Err(config_invalid(format!(
            "lockfile failed validation with {} error(s)",
            report.errors.len()
        )))
    }
}
