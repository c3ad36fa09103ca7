use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Standard output followed by standard error.
    pub output: String,
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("command did not finish within {0:?}")]
    Timeout(Duration),
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("empty command line")]
    EmptyCommand,
}

/// Runs external commands on behalf of a prober.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn invoke(&self, argv: &[String], timeout: Duration) -> Result<Invocation, InvokeError>;
}

/// Spawns real processes through tokio.
///
/// A process still running when the timeout fires, or when the calling task
/// is aborted, is killed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

#[async_trait]
impl Executor for SystemExecutor {
    async fn invoke(&self, argv: &[String], timeout: Duration) -> Result<Invocation, InvokeError> {
        let (program, args) = argv.split_first().ok_or(InvokeError::EmptyCommand)?;

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| InvokeError::Timeout(timeout))?
            .map_err(|source| InvokeError::Spawn {
                program: program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(Invocation {
            output: text,
            exit_code: output.status.code(),
        })
    }
}
