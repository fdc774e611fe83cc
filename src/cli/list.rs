use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show sources, files and locally modified files
    #[arg(long, short = 'd')]
    pub detailed: bool,
}
