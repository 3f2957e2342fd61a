//! Execution of build steps as child processes.

use std::process::Command;
use tracing::debug;

use super::recipe::BuildStep;
use crate::error::{ProvisionError, ProvisionResult};

/// Runs one build step to completion in the current working directory.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, step: &BuildStep) -> ProvisionResult<()>;
}

/// Spawns the real process with inherited stdio, so toolchain output streams
/// straight to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, step: &BuildStep) -> ProvisionResult<()> {
        debug!(step = step.label, command = %step.command_line(), "Spawning build step");

        let status = Command::new(step.program)
            .args(step.args)
            .status()
            .map_err(|source| ProvisionError::ToolchainSpawn {
                step: step.label,
                command: step.command_line(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProvisionError::Toolchain {
                step: step.label,
                command: step.command_line(),
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command_is_ok() {
        let step = BuildStep {
            label: "check",
            program: "true",
            args: &[],
        };
        assert!(SystemCommandRunner.run(&step).is_ok());
    }

    #[test]
    fn test_failing_command_reports_exit_code() {
        let step = BuildStep {
            label: "check",
            program: "sh",
            args: &["-c", "exit 3"],
        };
        let err = SystemCommandRunner.run(&step).unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::Toolchain {
                step: "check",
                code: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let step = BuildStep {
            label: "bootstrap",
            program: "./definitely-not-here.sh",
            args: &[],
        };
        let err = SystemCommandRunner.run(&step).unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::ToolchainSpawn {
                step: "bootstrap",
                ..
            }
        ));
    }
}
