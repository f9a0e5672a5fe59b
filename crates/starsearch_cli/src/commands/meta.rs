use std::io::Write;

use clap::CommandFactory;

use crate::Cli;

/// Write the completion script for `shell` to `out`.
fn write_completions(shell: clap_complete::Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, out);
}

pub(crate) fn handle_completions(
    shell: clap_complete::Shell,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    write_completions(shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: clap_complete::Shell) -> String {
        let mut out = Vec::new();
        write_completions(shell, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bash_completions_name_binary() {
        assert!(script(clap_complete::Shell::Bash).contains("_starsearch"));
    }

    #[test]
    fn test_zsh_completions_cover_commands_and_flags() {
        let zsh = script(clap_complete::Shell::Zsh);
        for word in ["update", "crawl", "search", "--token", "--limit"] {
            assert!(zsh.contains(word), "missing {word}");
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
