use crate::config::CommandConfig;
use crate::error::{BuildError, Result};
use std::fmt;
use std::process::Command;
use tracing::{debug, trace};

/// Executable name used when the caller doesn't supply one.
pub const DEFAULT_EXECUTABLE: &str = "CatGt";

impl CommandConfig {
    /// Render the invocation as an ordered argument list.
    ///
    /// Token 0 is `executable`, followed by `-dir=`, `-run=`, `-g=` and `-t=` (the
    /// last two only when set) and then every option in supply order. Values are
    /// never quoted, so the list can be passed to a process launcher as-is.
    pub fn render_tokens(&self, executable: &str) -> Result<Vec<String>> {
        if executable.is_empty() {
            return Err(BuildError::Configuration(
                "executable name must not be empty".to_string(),
            ));
        }

        let mut tokens = Vec::with_capacity(5 + self.options().len());
        tokens.push(executable.to_string());
        tokens.push(format!("-dir={}", self.base_path().to_string_lossy()));
        tokens.push(format!("-run={}", self.run_name()));
        if let Some(gate) = self.gate_index() {
            tokens.push(format!("-g={}", gate));
        }
        if let Some(trigger) = self.trigger_index() {
            tokens.push(format!("-t={}", trigger));
        }
        for option in self.options() {
            match option.value.to_flag(&option.flag) {
                Some(token) => {
                    trace!(option = %option.name, kind = option.value.kind(), %token, "rendered option");
                    tokens.push(token);
                }
                None => trace!(option = %option.name, "omitted false switch"),
            }
        }

        debug!(executable, tokens = tokens.len(), "rendered CatGt command");
        Ok(tokens)
    }

    /// Render the invocation as a single space-separated command line.
    ///
    /// Equal to `render_tokens(executable)?.join(" ")` unless some value contains
    /// whitespace. Such a value is wrapped in double quotes (for a flag only the
    /// part after `=`, for the executable the whole token), with `"` and `\`
    /// backslash-escaped inside the quotes.
    pub fn render_string(&self, executable: &str) -> Result<String> {
        let tokens = self.render_tokens(executable)?;
        let mut out = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(&quote_flag(token));
            } else {
                out.push_str(&quote_word(token));
            }
        }
        Ok(out)
    }

    /// Build a [`Command`] for `executable` with the rendered arguments.
    ///
    /// The command is returned unspawned; running it is up to the caller.
    pub fn to_process_command(&self, executable: &str) -> Result<Command> {
        let tokens = self.render_tokens(executable)?;
        let mut cmd = Command::new(&tokens[0]);
        cmd.args(&tokens[1..]);
        Ok(cmd)
    }
}

impl fmt::Display for CommandConfig {
    /// Writes the command line for [`DEFAULT_EXECUTABLE`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.render_string(DEFAULT_EXECUTABLE).map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

fn quote_flag(token: &str) -> String {
    match token.split_once('=') {
        Some((flag, value)) => format!("{}={}", flag, quote_word(value)),
        None => quote_word(token),
    }
}

fn quote_word(word: &str) -> String {
    if !word.chars().any(char::is_whitespace) {
        return word.to_string();
    }
    let mut out = String::with_capacity(word.len() + 2);
    out.push('"');
    for ch in word.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
