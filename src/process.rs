use std::{
    fmt::Display,
    io,
    os::unix::process::ExitStatusExt,
    process::{Command, ExitStatus, Stdio},
};

use log::debug;
use nix::sys::signal::Signal;

/// A program plus its arguments, ready to hand to a [`ProcessRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains(char::is_whitespace) && !word.contains('"') {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', "'\\''"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Exited(i32),
    Signaled(Signal),
}

impl ExitState {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }
        match status.signal().map(Signal::try_from) {
            Some(Ok(signal)) => Self::Signaled(signal),
            // Unknown signal numbers are folded into the shell convention.
            Some(Err(_)) | None => Self::Exited(128 + status.signal().unwrap_or(0)),
        }
    }
}

impl Display for ExitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit status {}", code),
            Self::Signaled(signal) => write!(f, "terminated by {}", signal),
        }
    }
}

/// Exit state and captured text of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub status: ExitState,
    pub stdout: String,
    pub stderr: String,
}

/// The only way the orchestrator talks to the outside world.
pub trait ProcessRunner {
    /// Run to completion with stdout and stderr captured, stdin closed.
    fn capture(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput>;
    /// Run to completion sharing this process' standard streams.
    fn inherit(&mut self, invocation: &Invocation) -> io::Result<ExitState>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command
    }
}

impl ProcessRunner for SystemRunner {
    fn capture(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        debug!("Capturing: {}", invocation);
        let output = Self::command(invocation).stdin(Stdio::null()).output()?;
        let status = ExitState::from(output.status);
        debug!("{} finished with {}", invocation.program, status);
        Ok(ProcessOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn inherit(&mut self, invocation: &Invocation) -> io::Result<ExitState> {
        debug!("Running: {}", invocation);
        let status = ExitState::from(Self::command(invocation).status()?);
        debug!("{} finished with {}", invocation.program, status);
        Ok(status)
    }
}
