use batt_core::{BattError, CommandRunner, Result};
use std::io;
use std::process::Stdio;
use tracing::{debug, warn};

/// Runs command lines without waiting for them.
///
/// The line is split into arguments with shell quoting rules and the
/// program is executed directly, so a missing or non-executable program is
/// a spawn error rather than a shell exit status.  Pipes and redirections
/// need an explicit `sh -c '…'`.
///
/// The child is reaped by a background task which logs its exit status.
/// Must be used inside a Tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn spawn(&self, command: &str) -> Result<()> {
        let spawn_error = |source| BattError::CommandSpawn {
            command: command.to_string(),
            source,
        };

        let argv = shell_words::split(command)
            .map_err(|e| spawn_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        let Some((program, args)) = argv.split_first() else {
            return Err(spawn_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty command line",
            )));
        };

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        let command = command.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!("'{command}' finished"),
                Ok(status) => warn!("'{command}' exited with {status}"),
                Err(e) => warn!("Cannot wait for '{command}': {e}"),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawns_without_waiting() {
        let marker = std::env::temp_dir().join(format!("batt-runner-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);

        let runner = ProcessRunner::new();
        runner
            .spawn(&format!("touch '{}'", marker.display()))
            .expect("touch should start");

        for _ in 0..100 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
        let _ = std::fs::remove_file(&marker);
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let command = "definitely-not-a-real-binary-xyz --flag";
        let err = ProcessRunner::new().spawn(command).unwrap_err();
        match err {
            BattError::CommandSpawn { command: c, source } => {
                assert_eq!(c, command);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unbalanced_quotes_and_empty_lines_are_rejected() {
        let runner = ProcessRunner::new();
        for command in ["notify-send 'low battery", "", "   "] {
            let err = runner.spawn(command).unwrap_err();
            assert!(
                matches!(err, BattError::CommandSpawn { ref source, .. } if source.kind() == io::ErrorKind::InvalidInput),
                "{command:?}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn explicit_shell_still_works() {
        let marker = std::env::temp_dir().join(format!("batt-runner-sh-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);

        ProcessRunner::new()
            .spawn(&format!("sh -c 'echo ok > \"{}\"'", marker.display()))
            .expect("sh should start");

        for _ in 0..100 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
        let _ = std::fs::remove_file(&marker);
    }
}
