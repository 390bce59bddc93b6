//! Shell completion generation for compadre
//!
//! This module generates two families of scripts for bash, zsh, and fish:
//!
//! - compadre's own completion: the static clap_complete script enhanced
//!   with dynamic completion of spec'd tool names
//! - adapter scripts for a spec-described tool: the shell-side half of the
//!   completion protocol, calling the tool's `complete` sub-command (or the
//!   broker) and feeding its two channels to the shell's description
//!   primitives

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{CompadreError, ConfigError, Result};

/// Generate a shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
/// * `tool` - Generate an adapter script for this tool instead of
///   compadre's own completion
/// * `via_broker` - Route the tool's candidates through `compadre complete`
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion(shell_name: &str, tool: Option<&str>, via_broker: bool) -> Result<()> {
    let shell = parse_shell(shell_name)?;

    let script = match tool {
        Some(tool) => adapter_script(shell, tool, via_broker)?,
        None => broker_script(shell)?,
    };

    print!("{script}");
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(CompadreError::Config(ConfigError::Generic(format!(
            "Unsupported shell: {shell_name}. Supported shells: bash, zsh, fish"
        )))),
    }
}

/// The provider invocation an adapter script wraps
fn provider_invocation(tool: &str, via_broker: bool) -> String {
    if via_broker {
        format!("compadre complete --for {tool}")
    } else {
        format!("{tool} complete")
    }
}

/// Completion for the compadre binary itself, with dynamic tool names
fn broker_script(shell: Shell) -> Result<String> {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, "compadre", &mut buffer);

    let basic_completion = String::from_utf8_lossy(&buffer);

    let script = match shell {
        Shell::Bash => format!(
            r#"{basic_completion}

# Custom completion for spec'd tool names
_compadre_list_tools() {{
    compadre specs --names 2>/dev/null
}}

# Enhance the completion function
_compadre_enhanced() {{
    local cur="${{COMP_WORDS[COMP_CWORD]}}"
    local prev="${{COMP_WORDS[COMP_CWORD - 1]}}"

    # Check if previous word expects a tool name
    if [[ "$prev" == "--for" || "$prev" == "--tool" ]]; then
        COMPREPLY=($(compgen -W "$(_compadre_list_tools)" -- "$cur"))
        return 0
    fi

    # Fall back to default completion
    _compadre "$@"
}}

# Replace the completion function
complete -F _compadre_enhanced compadre
"#
        ),
        Shell::Zsh => format!(
            r#"{basic_completion}

# Custom completion for spec'd tool names
_compadre_list_tools() {{
    compadre specs --names 2>/dev/null
}}

# Tool name completion function
_compadre_tools() {{
    local -a tools
    tools=($(_compadre_list_tools))
    _describe 'tools' tools
}}

# Enhanced completion function
_compadre_enhanced() {{
    # Check if we're completing a tool name argument
    if [[ ${{words[CURRENT-1]}} == "--for" || ${{words[CURRENT-1]}} == "--tool" ]]; then
        _compadre_tools
        return 0
    fi

    # Otherwise use original completion
    _compadre "$@"
}}

# Replace the completion function
compdef _compadre_enhanced compadre
"#
        ),
        Shell::Fish => format!(
            r#"{basic_completion}

# Custom completion for spec'd tool names
function __compadre_list_tools
    compadre specs --names 2>/dev/null
end

# Add dynamic completion for --for/--tool
complete -c compadre -l for -f -a "(__compadre_list_tools)" -d "Spec'd tool"
complete -c compadre -l tool -f -a "(__compadre_list_tools)" -d "Spec'd tool"
"#
        ),
        _ => {
            return Err(CompadreError::Config(ConfigError::Generic(
                "Unsupported shell. Supported shells: bash, zsh, fish".to_string(),
            )));
        }
    };

    Ok(script)
}

/// Adapter script registering completion for a spec-described tool
fn adapter_script(shell: Shell, tool: &str, via_broker: bool) -> Result<String> {
    let provider = provider_invocation(tool, via_broker);

    let script = match shell {
        Shell::Bash => bash_adapter(tool, &provider),
        Shell::Zsh => zsh_adapter(tool, &provider),
        Shell::Fish => fish_adapter(tool, &provider),
        _ => {
            return Err(CompadreError::Config(ConfigError::Generic(
                "Unsupported shell. Supported shells: bash, zsh, fish".to_string(),
            )));
        }
    };

    Ok(script)
}

/// Bash adapter: one channel via compgen, descriptions dropped
fn bash_adapter(tool: &str, provider: &str) -> String {
    format!(
        r#"# Completion adapter for {tool}; candidates come from the tool itself.
_{tool}_provider() {{
    {provider} "$@" 2>/dev/null
}}

_{tool}_complete() {{
    local cur="${{COMP_WORDS[COMP_CWORD]}}"
    COMPREPLY=()

    if (( COMP_CWORD == 1 )); then
        local commands
        commands=$(_{tool}_provider | cut -d: -f1)
        COMPREPLY=($(compgen -W "${{commands}} --help" -- "$cur"))
        return 0
    fi

    local args opts
    args=$(_{tool}_provider --nth ${{COMP_CWORD}} -- "${{COMP_WORDS[@]}}" | cut -d: -f1)
    opts=$(_{tool}_provider --options -- "${{COMP_WORDS[1]}}" | cut -d: -f1)
    COMPREPLY=($(compgen -W "${{args}} ${{opts}}" -- "$cur"))
    return 0
}}

complete -F _{tool}_complete {tool}
"#
    )
}

/// Zsh adapter: commands/arguments and options as separate described groups
fn zsh_adapter(tool: &str, provider: &str) -> String {
    format!(
        r#"#compdef {tool}
# Completion adapter for {tool}; candidates come from the tool itself.

_{tool}_provider() {{
    {provider} "$@" 2>/dev/null
}}

_{tool}_complete() {{
    local -a commands args opts

    if (( CURRENT == 2 )); then
        commands=(${{(f)"$(_{tool}_provider)"}})
        commands+=('--help:Show help')
        _describe -t commands '{tool} command' commands
        return
    fi

    args=(${{(f)"$(_{tool}_provider --nth $((CURRENT - 1)) -- ${{words[@]}})"}})
    (( ${{#args}} )) && _describe -t arguments 'argument' args

    opts=(${{(f)"$(_{tool}_provider --options -- ${{words[2]}})"}})
    (( ${{#opts}} )) && _describe -t options 'option' opts

    return 0
}}

compdef _{tool}_complete {tool}
"#
    )
}

/// Fish adapter: first colon becomes the tab separator fish expects
fn fish_adapter(tool: &str, provider: &str) -> String {
    format!(
        r#"# Completion adapter for {tool}; candidates come from the tool itself.
function __{tool}_provider
    {provider} $argv 2>/dev/null
end

function __{tool}_commands
    __{tool}_provider | string replace ':' \t
end

function __{tool}_arguments
    set -l tokens (commandline -opc) (commandline -ct)
    __{tool}_provider --nth (count (commandline -opc)) -- $tokens | string replace ':' \t
end

function __{tool}_options
    set -l tokens (commandline -opc)
    __{tool}_provider --options -- $tokens[2] | string replace ':' \t
end

complete -c {tool} -f
complete -c {tool} -n '__fish_use_subcommand' -a '(__{tool}_commands)'
complete -c {tool} -n '__fish_use_subcommand' -a '--help' -d 'Show help'
complete -c {tool} -n 'not __fish_use_subcommand' -a '(__{tool}_arguments)'
complete -c {tool} -n 'not __fish_use_subcommand' -a '(__{tool}_options)'
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("powershell").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("Zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_provider_invocation() {
        assert_eq!(provider_invocation("redtime", false), "redtime complete");
        assert_eq!(
            provider_invocation("redtime", true),
            "compadre complete --for redtime"
        );
    }

    #[test]
    fn test_zsh_adapter_shape() {
        let script = zsh_adapter("redtime", "redtime complete");
        assert!(script.starts_with("#compdef redtime"));
        assert!(script.contains("--nth $((CURRENT - 1))"));
        assert!(script.contains("--options -- ${words[2]}"));
        assert!(script.contains("'--help:Show help'"));
        assert!(script.contains("2>/dev/null"));
    }

    #[test]
    fn test_bash_adapter_shape() {
        let script = bash_adapter("redtime", "redtime complete");
        assert!(script.contains("complete -F _redtime_complete redtime"));
        assert!(script.contains("--nth ${COMP_CWORD}"));
        assert!(script.contains("--help"));
    }

    #[test]
    fn test_fish_adapter_shape() {
        let script = fish_adapter("redtime", "redtime complete");
        assert!(script.contains("complete -c redtime"));
        assert!(script.contains("__fish_use_subcommand"));
        assert!(script.contains("--options -- $tokens[2]"));
    }

    #[test]
    fn test_broker_script_mentions_dynamic_tools() {
        let script = broker_script(Shell::Zsh).unwrap();
        assert!(script.contains("compadre specs --names"));
        assert!(script.contains("compdef _compadre_enhanced compadre"));
    }
}
