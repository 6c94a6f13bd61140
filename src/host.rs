//! Host context seam between the runner and whatever launches it.
//!
//! The runner never talks to its host directly: parameters come in and the
//! terminal-failure signal goes out through this trait, so tests can
//! substitute a recording host.

use std::cell::RefCell;
use std::collections::BTreeMap;

/// Interface the hosting orchestrator exposes to a stage.
pub trait HostContext {
    /// Read a named parameter, falling back to the documented default.
    /// Absence is never an error.
    fn param(&self, name: &str, default: &str) -> String;

    /// Mark the invocation as failed. Invoked at most once per stage run,
    /// and never on success.
    fn signal_failure(&self, message: &str);
}

/// Host backed by CLI flags.
///
/// The failure signal is recorded here; `main` turns it into stderr output
/// plus a nonzero process exit code. Only the first signal is kept.
#[derive(Debug, Default)]
pub struct CliHost {
    params: BTreeMap<String, String>,
    failure: RefCell<Option<String>>,
}

impl CliHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_param(&mut self, name: &str, value: String) {
        self.params.insert(name.to_string(), value);
    }

    /// The recorded failure message, if any stage signaled one.
    pub fn failure(&self) -> Option<String> {
        self.failure.borrow().clone()
    }
}

impl HostContext for CliHost {
    fn param(&self, name: &str, default: &str) -> String {
        self.params
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn signal_failure(&self, message: &str) {
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(message.to_string());
        }
    }
}
