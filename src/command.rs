// src/command.rs

//! External command execution
//!
//! Every backend talks to its package manager through a `CommandRunner`.
//! `SystemRunner` spawns real processes; tests substitute scripted runners.

use crate::error::{Error, Result};
use regex::Regex;
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of one finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// stdout followed by stderr, lossily decoded
    pub output: String,
    /// Process exit code, -1 if the process was terminated by a signal
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs package manager commands on behalf of the backends
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, block until it exits, capture its output
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Check whether `path` names an executable file
    fn command_exists(&self, path: &str) -> bool;

    /// Run a command and test its output against `pattern`
    ///
    /// A spawn failure or a non-zero exit code counts as no match.
    fn probe(&self, program: &str, args: &[&str], pattern: &Regex) -> bool {
        match self.run(program, args) {
            Ok(out) => out.success() && pattern.is_match(&out.output),
            Err(e) => {
                debug!("Probe failed: {}", e);
                false
            }
        }
    }
}

/// `CommandRunner` backed by `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let command_line = render_command(program, args);
        debug!("Running: {}", command_line);

        let out = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::CommandSpawn {
                command: command_line,
                source,
            })?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        Ok(CommandOutput {
            output,
            exit_code: out.status.code().unwrap_or(-1),
        })
    }

    fn command_exists(&self, path: &str) -> bool {
        which::which(path).is_ok()
    }
}

/// Render a command line for log messages
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
