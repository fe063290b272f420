//! Command execution for shell variables
//!
//! Runs a command through the context's interpreter and captures its output,
//! waiting no longer than the context's shell timeout.

use crate::engine::context::Context;
use crate::error::{EvalError, EvalResult};
use crate::utils::deadline_after;
use std::io::{self, Read};
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Interval between checks on a running child
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run `cmd_str` and return its trimmed standard output
pub fn capture_output(cmd_str: &str, ctx: &Context) -> EvalResult<String> {
    let launch_error = |error: String| EvalError::ShellLaunch {
        command: cmd_str.to_string(),
        error,
    };

    let (program, interpreter_args) = ctx
        .interpreter
        .split_first()
        .ok_or_else(|| launch_error("no interpreter configured".to_string()))?;

    // Build the command
    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(cmd_str);

    let working_dir = ctx.working_dir();
    if working_dir.is_dir() {
        command.current_dir(&working_dir);
    }

    command.envs(&ctx.env);

    // Capture stdout only
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::null());

    debug!(command = cmd_str, dir = %working_dir.display(), "running shell variable");
    let mut child = command.spawn().map_err(|e| launch_error(e.to_string()))?;

    // Drain stdout while waiting on the child
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| launch_error("stdout not captured".to_string()))?;
    let output = spawn_reader(stdout);

    let deadline = deadline_after(ctx.shell_timeout);
    let status = wait_until(&mut child, deadline).map_err(|e| launch_error(e.to_string()))?;
    let Some(status) = status else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(EvalError::ShellTimeout {
            command: cmd_str.to_string(),
            timeout: ctx.shell_timeout,
        });
    };

    if !status.success() {
        warn!(command = cmd_str, code = ?status.code(), "shell variable exited unsuccessfully");
    }

    // Background processes can keep the pipe open after the child exits
    collect_output(cmd_str, &output, deadline, ctx.shell_timeout)
}

/// Read `source` to the end on a helper thread
fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> Receiver<io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = tx.send(source.read_to_end(&mut buf).map(|_| buf));
    });
    rx
}

/// Wait for the reader until `deadline` and decode its trimmed output
fn collect_output(
    cmd_str: &str,
    output: &Receiver<io::Result<Vec<u8>>>,
    deadline: Instant,
    timeout: Duration,
) -> EvalResult<String> {
    let launch_error = |error: String| EvalError::ShellLaunch {
        command: cmd_str.to_string(),
        error,
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    match output.recv_timeout(remaining) {
        Ok(Ok(bytes)) => Ok(String::from_utf8_lossy(&bytes).trim().to_string()),
        Ok(Err(e)) => Err(launch_error(format!("failed to read output: {}", e))),
        Err(RecvTimeoutError::Timeout) => {
            debug!(command = cmd_str, "stdout still open after the command exited");
            Err(EvalError::ShellTimeout {
                command: cmd_str.to_string(),
                timeout,
            })
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(launch_error("output reader stopped".to_string()))
        }
    }
}

/// Poll `child` until it exits or `deadline` passes; `None` means timed out
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
