//! Load stages and the diagnostic line announcing each one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Written once by the bootstrap before the load sequence starts.
pub const CALLING_LOAD: &str = "calling load...";

/// Position of a load in its straight-line sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NotStarted,
    Fetching,
    Buffering,
    Compiling,
    Instantiating,
    Running,
    Done,
    Failed,
}

impl Stage {
    /// The five stages that do work, in execution order.
    pub const STEPS: [Stage; 5] = [
        Stage::Fetching,
        Stage::Buffering,
        Stage::Compiling,
        Stage::Instantiating,
        Stage::Running,
    ];

    /// The progress line written before this stage begins.
    pub fn announcement(self) -> Option<&'static str> {
        match self {
            Stage::Fetching => Some("fetching main.wasm..."),
            Stage::Buffering => Some("getting wasm bytes..."),
            Stage::Compiling => Some("compiling webassembly module..."),
            Stage::Instantiating => Some("constructing webassembly instance..."),
            Stage::Running => Some("running webassembly main..."),
            Stage::NotStarted | Stage::Done | Stage::Failed => None,
        }
    }

    /// The stage that follows a successful `self`.
    pub fn next(self) -> Stage {
        match self {
            Stage::NotStarted => Stage::Fetching,
            Stage::Fetching => Stage::Buffering,
            Stage::Buffering => Stage::Compiling,
            Stage::Compiling => Stage::Instantiating,
            Stage::Instantiating => Stage::Running,
            Stage::Running | Stage::Done => Stage::Done,
            Stage::Failed => Stage::Failed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not started",
            Stage::Fetching => "fetching",
            Stage::Buffering => "buffering",
            Stage::Compiling => "compiling",
            Stage::Instantiating => "instantiating",
            Stage::Running => "running",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_follow_next() {
        let mut stage = Stage::NotStarted;
        for expected in Stage::STEPS {
            stage = stage.next();
            assert_eq!(stage, expected);
        }
        assert_eq!(stage.next(), Stage::Done);
        assert_eq!(Stage::Failed.next(), Stage::Failed);
    }

    #[test]
    fn test_every_step_is_announced() {
        let lines: Vec<_> = Stage::STEPS.iter().filter_map(|s| s.announcement()).collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "fetching main.wasm...");
        assert_eq!(lines[4], "running webassembly main...");
        assert!(Stage::Done.announcement().is_none());
    }
}
