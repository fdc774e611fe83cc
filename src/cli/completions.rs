use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    promptreg completions bash > ~/.bash_completion.d/promptreg\n\n\
                  Generate zsh completions:\n    promptreg completions zsh > ~/.zfunc/_promptreg\n\n\
                  Generate fish completions:\n    promptreg completions fish > ~/.config/fish/completions/promptreg.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
