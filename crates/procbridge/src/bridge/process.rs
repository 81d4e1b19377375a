//! Child process plumbing.
//!
//! One child per call: spawn with three pipes, feed stdin, drain stdout and
//! stderr, reap. The three pipe directions are driven concurrently from a
//! single task so a child that fills one pipe before touching another can
//! never wedge the parent.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};

use super::Stage;

/// Bytes a child wrote to its two output streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// How a child terminated, plus everything it wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, or `None` if the child was killed by a signal.
    pub code: Option<i32>,
    pub captured: Captured,
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Mid-flight pipe failures. Logged, never surfaced on their own.
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    #[error("failed to write child stdin: {0}")]
    Write(#[source] io::Error),
    #[error("failed to read child stdout: {0}")]
    ReadStdout(#[source] io::Error),
    #[error("failed to read child stderr: {0}")]
    ReadStderr(#[source] io::Error),
}

/// Spawn `program` with no arguments and all three stdio streams piped.
///
/// The child is killed if its handle is dropped before it has been reaped.
pub fn spawn(program: &Path) -> io::Result<Child> {
    Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Feed `input` to the child, collect both output streams, and wait for exit.
///
/// Pipe faults do not short-circuit: whatever was captured is still returned
/// alongside the exit code. Only a failure to wait on the child is an error.
pub async fn communicate(child: &mut Child, input: &[u8]) -> io::Result<ExitOutcome> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let mut captured = Captured::default();

    tracing::trace!(
        stage = %Stage::Collecting,
        bytes = input.len(),
        "writing child stdin while draining stdout and stderr"
    );

    let (written, read_out, read_err) = tokio::join!(
        feed(stdin, input),
        drain(stdout, &mut captured.stdout),
        drain(stderr, &mut captured.stderr),
    );

    let faults = [
        written.err(),
        read_out.err().map(PipeError::ReadStdout),
        read_err.err().map(PipeError::ReadStderr),
    ];
    for fault in faults.into_iter().flatten() {
        tracing::warn!(error = %fault, "Pipe fault, continuing to collect");
    }

    let status = child.wait().await?;
    tracing::trace!(
        stage = %Stage::Terminated,
        code = ?status.code(),
        stdout_bytes = captured.stdout.len(),
        stderr_bytes = captured.stderr.len(),
        "child terminated"
    );

    Ok(ExitOutcome {
        code: status.code(),
        captured,
    })
}

/// Write all of `input`, then close stdin so the child sees end-of-input.
async fn feed(stdin: Option<ChildStdin>, input: &[u8]) -> Result<(), PipeError> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    stdin.write_all(input).await.map_err(PipeError::Write)?;
    stdin.flush().await.map_err(PipeError::Write)?;
    drop(stdin);
    tracing::trace!(
        stage = %Stage::Writing,
        bytes = input.len(),
        "child stdin written and closed"
    );
    Ok(())
}

async fn drain<R>(reader: Option<R>, buf: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(mut reader) => reader.read_to_end(buf).await.map(|_| ()),
        None => Ok(()),
    }
}
