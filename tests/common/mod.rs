#![allow(dead_code)]

use std::{collections::HashMap, fs, io, path::Path};

use buildrun::{ExitState, Invocation, ProcessOutput, ProcessRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Capture,
    Inherit,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Finished(ExitState, String),
    NotFound,
}

/// Records every invocation and answers from a script keyed by program name.
/// Unscripted programs succeed silently.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<(Call, Invocation)>,
    script: HashMap<String, Outcome>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, program: &str, outcome: Outcome) -> Self {
        self.script.insert(program.to_string(), outcome);
        self
    }

    pub fn fails(self, program: &str, code: i32, stderr: &str) -> Self {
        self.on(program, Outcome::Finished(ExitState::Exited(code), stderr.to_string()))
    }

    pub fn programs(&self) -> Vec<&str> {
        self.calls.iter().map(|(_, i)| i.program.as_str()).collect()
    }

    pub fn inherited(&self) -> Vec<&Invocation> {
        self.calls
            .iter()
            .filter(|(call, _)| *call == Call::Inherit)
            .map(|(_, i)| i)
            .collect()
    }

    fn answer(&self, invocation: &Invocation) -> io::Result<(ExitState, String)> {
        match self.script.get(&invocation.program) {
            Some(Outcome::Finished(status, stderr)) => Ok((*status, stderr.clone())),
            Some(Outcome::NotFound) => Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
            None => Ok((ExitState::Exited(0), String::new())),
        }
    }
}

impl ProcessRunner for Recorder {
    fn capture(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        self.calls.push((Call::Capture, invocation.clone()));
        let (status, stderr) = self.answer(invocation)?;
        Ok(ProcessOutput {
            status,
            stdout: String::new(),
            stderr,
        })
    }

    fn inherit(&mut self, invocation: &Invocation) -> io::Result<ExitState> {
        self.calls.push((Call::Inherit, invocation.clone()));
        Ok(self.answer(invocation)?.0)
    }
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "int main(void) { return 0; }\n").unwrap();
}
