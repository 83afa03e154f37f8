// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess runner that streams output into the log as it is produced

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Errors from running a streamed process
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },
    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
    #[error("failed waiting for {program}: {message}")]
    Wait { program: String, message: String },
}

/// Log level for a forwarded output stream
#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Run `command` to completion, forwarding each stdout line at INFO and each
/// stderr line at ERROR while the process runs.
///
/// Returns the exit code; a process killed by a signal reports -1. A process
/// still running after `timeout` is killed and reported as
/// [`ProcessError::Timeout`].
pub async fn run_streaming(mut command: Command, timeout: Duration) -> Result<i32, ProcessError> {
    let program = command.as_std().get_program().to_string_lossy().to_string();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|e| ProcessError::Launch {
        program: program.clone(),
        message: e.to_string(),
    })?;

    let stdout = child
        .stdout
        .take()
        .map(|out| tokio::spawn(forward_lines(out, Stream::Stdout)));
    let stderr = child
        .stderr
        .take()
        .map(|err| tokio::spawn(forward_lines(err, Stream::Stderr)));

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return Err(ProcessError::Wait {
                program,
                message: e.to_string(),
            })
        }
        Err(_) => {
            if let Err(e) = child.kill().await {
                tracing::warn!(program = %program, error = %e, "failed to kill timed out process");
            }
            return Err(ProcessError::Timeout { program, timeout });
        }
    };

    // Drain whatever is left in the pipes before reporting the exit
    join_forwarders([stdout, stderr].into_iter().flatten()).await;

    Ok(status.code().unwrap_or(-1))
}

/// Wait for the output forwarders; returns how many of them failed
async fn join_forwarders<I>(tasks: I) -> usize
where
    I: IntoIterator<Item = JoinHandle<()>>,
{
    let mut failed = 0;
    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "output forwarder failed");
            failed += 1;
        }
    }
    failed
}

async fn forward_lines<R>(reader: R, stream: Stream)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim_end();
                if line.is_empty() {
                    continue;
                }
                match stream {
                    Stream::Stdout => tracing::info!("{}", line),
                    Stream::Stderr => tracing::error!("{}", line),
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading process output");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
