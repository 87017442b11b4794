//! Scripted command runner shared by adapter tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::ports::CommandRunner;

/// Answers commands from a fixed script and records every invocation.
///
/// Commands are keyed by their space-joined command line. Anything not
/// scripted fails as if the tool were missing.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, cmdline: &str, stdout: &str) -> Self {
        self.responses.insert(cmdline.to_string(), stdout.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, program: &str) -> bool {
        self.calls()
            .iter()
            .any(|call| call.split(' ').next() == Some(program))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let cmdline = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(cmdline.clone());

        self.responses
            .get(&cmdline)
            .cloned()
            .ok_or_else(|| Error::CommandFailed(format!("{}: not scripted", cmdline)))
    }
}
