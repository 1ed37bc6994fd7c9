//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::FocusError;

/// Print a completion script, or how to install one.
///
/// # Errors
///
/// Returns an error for an unsupported shell name.
pub fn completions(shell: &str, install: bool) -> Result<String, FocusError> {
    let shell_type = shell_from_str(shell).ok_or_else(|| {
        FocusError::Config(format!(
            "Unknown shell: {shell}. Supported: bash, zsh, fish, powershell, elvish"
        ))
    })?;

    if install {
        Ok(completion_install_instructions(shell_type))
    } else {
        generate_completions(shell_type)
    }
}

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the script isn't valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, FocusError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "focusdeck", &mut buf);
    String::from_utf8(buf).map_err(|e| FocusError::Parse(format!("UTF-8 error: {e}")))
}

/// Get shell from string name.
#[must_use]
pub fn shell_from_str(s: &str) -> Option<Shell> {
    match s.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" | "ps" | "pwsh" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc or ~/.bash_profile:
source <(focusdeck completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
focusdeck completions zsh > ~/.zsh/completions/_focusdeck
# Then add to ~/.zshrc:
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
focusdeck completions fish > ~/.config/fish/completions/focusdeck.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
focusdeck completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish completions directory:
focusdeck completions elvish > ~/.elvish/lib/focusdeck.elv
# Then add to ~/.elvish/rc.elv:
use focusdeck
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}
