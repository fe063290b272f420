use colored::Colorize;
use std::process;
use taskvars::error::EvalError;

/// Exit code for a prompt the user cancelled
const EXIT_CANCELLED: i32 = 130;

fn main() {
    if let Err(e) = taskvars::cli::run() {
        let cancelled = e
            .chain()
            .filter_map(|cause| cause.downcast_ref::<EvalError>())
            .any(EvalError::is_cancellation);

        if cancelled {
            eprintln!("{}", "Cancelled".yellow());
            process::exit(EXIT_CANCELLED);
        }

        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(1);
    }
}
