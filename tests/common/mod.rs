// Shared test helpers for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::{TempDir, tempdir};

use em_matrix_runner::core::directives::DirectiveSyntax;
use em_matrix_runner::core::discovery::TestCase;
use em_matrix_runner::infra::command::CommandRunner;
use em_matrix_runner::models::{ExitOutcome, Invocation};

/// Creates a project directory with the given files, paths relative to its root.
pub fn setup_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    for (relative, content) in files {
        let path = temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write project file");
    }
    temp_dir
}

/// Writes an `EmMatrix.toml` into `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("EmMatrix.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

/// A test case with the default directive syntax, as discovery would build it.
pub fn test_case(path: &str, content: &str) -> TestCase {
    TestCase::from_source(path, content, &DirectiveSyntax::default())
}

pub fn success() -> ExitOutcome {
    ExitOutcome::Success {
        output: String::new(),
    }
}

pub fn failure(code: i32, output: &str) -> ExitOutcome {
    ExitOutcome::Failed {
        code: Some(code),
        output: output.to_string(),
    }
}

/// A runner that never spawns anything: it records every invocation and
/// answers with whatever `respond` decides.
pub struct ScriptedRunner<F> {
    respond: F,
    calls: RefCell<Vec<Invocation>>,
}

impl<F> ScriptedRunner<F>
where
    F: Fn(&Invocation) -> ExitOutcome,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Invocations whose program is `program`, in call order.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|inv| inv.program == program)
            .cloned()
            .collect()
    }
}

impl<F> CommandRunner for ScriptedRunner<F>
where
    F: Fn(&Invocation) -> ExitOutcome,
{
    async fn run(&self, invocation: &Invocation, _timeout: Option<Duration>) -> ExitOutcome {
        self.calls.borrow_mut().push(invocation.clone());
        (self.respond)(invocation)
    }
}

/// A runner where everything succeeds.
pub fn always_passing() -> ScriptedRunner<fn(&Invocation) -> ExitOutcome> {
    fn pass(_: &Invocation) -> ExitOutcome {
        success()
    }
    ScriptedRunner::new(pass as fn(&Invocation) -> ExitOutcome)
}
