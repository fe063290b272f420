//! Main CLI application

use crate::config::{
    build_context, find_config_file, parse_config_file, prompt_timeout, validate_config,
    HostConfig,
};
use crate::engine::{jsonpath, Context, JsonValue, SubstitutionEngine, TerminalPrompter};
use crate::error::{ConfigError, TaskVarsError};
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Verbosity {
    /// Log filter used when `RUST_LOG` is not set
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("taskvars")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Expand ${...} variables in task strings")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to taskvars.yml host file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print results and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no log output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("expand")
                .about("Expand variables in each TEXT and print the results, one per line")
                .arg(
                    Arg::new("texts")
                        .value_name("TEXT")
                        .required(true)
                        .num_args(1..),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail when a token names no known variable")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-input")
                        .long("no-input")
                        .help("Never prompt; ${input:...} fails instead")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list").about("List registered variable names"))
        .subcommand(
            Command::new("query")
                .about("Evaluate a path expression against a JSON file")
                .arg(
                    Arg::new("json")
                        .value_name("JSON_FILE")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                )
                .arg(Arg::new("path").value_name("PATH").required(true)),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .value_parser(value_parser!(Shell))
                        .required(true),
                ),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Install the stderr log subscriber
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    // Fails only when a subscriber is already installed, e.g. in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> anyhow::Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI application with explicit arguments
pub fn run_from<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().get_matches_from(args);
    init_logging(get_verbosity(&matches));

    let file = matches.get_one::<PathBuf>("file");

    match matches.subcommand() {
        Some(("expand", sub)) => {
            let texts: Vec<&String> = sub.get_many::<String>("texts").into_iter().flatten().collect();
            let interactive = !sub.get_flag("no-input");
            let (config, ctx) = load_host(file.map(PathBuf::as_path))?;
            let ctx = if interactive {
                attach_prompter(ctx, config.as_ref())
            } else {
                ctx
            };

            for line in expand(&ctx, &texts, sub.get_flag("strict"))? {
                println!("{}", line);
            }
        }
        Some(("list", _)) => {
            let engine = SubstitutionEngine::new();
            for name in engine.registry().names() {
                println!("{}", name);
            }
        }
        Some(("query", sub)) => {
            let json = sub.get_one::<PathBuf>("json").context("missing JSON_FILE")?;
            let path = sub.get_one::<String>("path").context("missing PATH")?;
            println!("{}", query(json, path)?);
        }
        Some(("completions", sub)) => {
            if let Some(shell) = sub.get_one::<Shell>("shell") {
                clap_complete::generate(*shell, &mut build_command(), "taskvars", &mut io::stdout());
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

/// Load the host file and build a context from it
///
/// An explicit `file` must exist. Otherwise the current directory and its
/// parents are searched, and the process defaults are used when nothing is
/// found.
pub fn load_host(file: Option<&Path>) -> anyhow::Result<(Option<HostConfig>, Context)> {
    let path = match file {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("host file '{}' does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => match find_config_file() {
            Ok(path) => path,
            Err(ConfigError::NotFound(searched)) => {
                debug!(searched = %searched, "no host file found, using defaults");
                return Ok((None, Context::new()));
            }
            Err(e) => return Err(e.into()),
        },
    };

    debug!(path = %path.display(), "loading host file");
    let config = parse_config_file(&path)
        .with_context(|| format!("failed to load host file '{}'", path.display()))?;
    validate_config(&config)
        .with_context(|| format!("invalid host file '{}'", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let ctx = build_context(&config, base_dir)?;

    Ok((Some(config), ctx))
}

fn attach_prompter(ctx: Context, config: Option<&HostConfig>) -> Context {
    let prompter = match config {
        Some(config) => TerminalPrompter::new(prompt_timeout(config)),
        None => TerminalPrompter::default(),
    };
    ctx.with_prompter(Arc::new(prompter))
}

/// Expand every text with the built-in variables
pub fn expand<S: AsRef<str>>(ctx: &Context, texts: &[S], strict: bool) -> Result<Vec<String>, TaskVarsError> {
    let engine = SubstitutionEngine::new();

    if strict {
        texts
            .iter()
            .map(|text| engine.evaluate_strict(ctx, text.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(TaskVarsError::from)
    } else {
        Ok(engine.evaluate_all(ctx, texts)?)
    }
}

/// Evaluate `path` against the JSON document in `json_file`
pub fn query(json_file: &Path, path: &str) -> anyhow::Result<String> {
    let contents = fs::read_to_string(json_file)
        .with_context(|| format!("failed to read '{}'", json_file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("'{}' is not valid JSON", json_file.display()))?;

    Ok(jsonpath::evaluate(&JsonValue::from(value), path)?)
}
