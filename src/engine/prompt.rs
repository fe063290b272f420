//! Interactive input for `${input:id}`
//!
//! Prompts are an external collaborator: the engine only sees the
//! [`Prompter`] trait. Every prompt must give up after a bounded wait, and a
//! dismissed prompt reports [`EvalError::Cancelled`].

use crate::config::TaskInput;
use crate::error::{EvalError, EvalResult};
use colored::Colorize;
use crate::utils::deadline_after;
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Default time the terminal prompter waits for an answer
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(300);

/// Asks the user for task input values
pub trait Prompter: Send + Sync {
    /// Ask for free text (`promptString`)
    fn prompt_text(&self, title: &str, input: &TaskInput) -> EvalResult<String>;

    /// Ask to pick one of `input.options` (`pickString`), returning the option
    fn pick(&self, title: &str, input: &TaskInput) -> EvalResult<String>;
}

type LineResult = io::Result<Option<String>>;

/// Prompts on the controlling terminal, reading answers from stdin
///
/// Lines are read by one helper thread per prompter. A line typed after a
/// prompt timed out is kept and answers the next prompt. Password reads go
/// through the terminal directly and still use one thread per read.
#[derive(Debug)]
pub struct TerminalPrompter {
    timeout: Duration,
    lines: OnceLock<Mutex<Receiver<LineResult>>>,
}

impl TerminalPrompter {
    pub fn new(timeout: Duration) -> Self {
        TerminalPrompter {
            timeout,
            lines: OnceLock::new(),
        }
    }

    /// Prompter reading answers from `input` instead of stdin
    pub fn with_input<R>(timeout: Duration, input: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let prompter = Self::new(timeout);
        let _ = prompter.lines.set(Mutex::new(spawn_line_reader(input)));
        prompter
    }

    fn timed_out(&self, id: &str) -> EvalError {
        EvalError::PromptTimeout {
            id: id.to_string(),
            timeout: self.timeout,
        }
    }

    fn read_line(&self, id: &str, deadline: Instant) -> EvalResult<String> {
        let lines = self
            .lines
            .get_or_init(|| Mutex::new(spawn_line_reader(BufReader::new(io::stdin()))));
        let lines = lines.lock().unwrap_or_else(PoisonError::into_inner);

        let remaining = deadline.saturating_duration_since(Instant::now());
        match lines.recv_timeout(remaining) {
            Ok(Ok(Some(line))) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
            Ok(Err(e)) => Err(EvalError::Prompt(e.to_string())),
            Err(RecvTimeoutError::Timeout) => Err(self.timed_out(id)),
            // EOF means the user closed the prompt
            Ok(Ok(None)) | Err(RecvTimeoutError::Disconnected) => Err(EvalError::Cancelled),
        }
    }

    fn read_password(&self, id: &str, deadline: Instant) -> EvalResult<String> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(rpassword::read_password());
        });

        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Ok(password)) => Ok(password),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Err(EvalError::Cancelled),
            Ok(Err(e)) => Err(EvalError::Prompt(e.to_string())),
            Err(RecvTimeoutError::Timeout) => Err(self.timed_out(id)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(EvalError::Prompt("password reader stopped".to_string()))
            }
        }
    }
}

/// Forward lines from `input` until EOF or a read error
fn spawn_line_reader<R>(mut input: R) -> Receiver<LineResult>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || loop {
        let mut line = String::new();
        let result = match input.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(e) => Err(e),
        };
        let more = matches!(result, Ok(Some(_)));
        if tx.send(result).is_err() || !more {
            break;
        }
    });
    rx
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_TIMEOUT)
    }
}

impl Prompter for TerminalPrompter {
    fn prompt_text(&self, title: &str, input: &TaskInput) -> EvalResult<String> {
        let deadline = deadline_after(self.timeout);

        eprintln!("{}", title.bold());
        if input.default.is_empty() || input.password {
            eprint!("{}: ", input.description);
        } else {
            eprint!("{} [{}]: ", input.description, input.default);
        }

        let answer = if input.password {
            self.read_password(&input.id, deadline)?
        } else {
            self.read_line(&input.id, deadline)?
        };

        if answer.is_empty() {
            Ok(input.default.clone())
        } else {
            Ok(answer)
        }
    }

    fn pick(&self, title: &str, input: &TaskInput) -> EvalResult<String> {
        let deadline = deadline_after(self.timeout);

        eprintln!("{}", title.bold());
        if !input.description.is_empty() {
            eprintln!("{}", input.description);
        }
        for (i, option) in input.options.iter().enumerate() {
            eprintln!("  {}) {}", i + 1, option);
        }

        loop {
            eprint!("Select 1-{}: ", input.options.len());
            let answer = self.read_line(&input.id, deadline)?;
            let answer = answer.trim();

            if answer.is_empty() && input.options.contains(&input.default) {
                return Ok(input.default.clone());
            }
            if let Some(option) = input.options.iter().find(|o| o.as_str() == answer) {
                return Ok(option.clone());
            }
            if let Some(option) = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| input.options.get(i))
            {
                return Ok(option.clone());
            }

            eprintln!("{}", "Invalid selection".yellow());
        }
    }
}
