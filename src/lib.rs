pub mod attributes;
pub mod config;
pub mod frame;
pub mod logging;
pub mod markup;
pub mod palette;
pub mod render;
pub mod runner;
pub mod scene;
pub mod session;
pub mod styles;
pub mod terminal;
pub mod timeline;
pub mod ui;

use std::path::PathBuf;

pub use config::{AnimationStrategy, RenderOptions};
pub use render::{animate, render_at, RenderError, Renderer};
pub use session::{Chunk, Session, SessionError};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render(RenderArgs),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderArgs {
    /// Seconds into the recording; `None` renders the end.
    pub at: Option<f64>,
    pub animate: bool,
    pub strategy: Option<AnimationStrategy>,
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliParseError {
    MissingFileValue,
    MissingConfigValue,
    MissingStrategyValue,
    InvalidStrategy(String),
    UnexpectedArgument(String),
    UnknownArgument(String),
}

impl std::fmt::Display for CliParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliParseError::MissingFileValue => write!(f, "--file requires a value"),
            CliParseError::MissingConfigValue => write!(f, "--config requires a value"),
            CliParseError::MissingStrategyValue => write!(f, "--strategy requires a value"),
            CliParseError::InvalidStrategy(value) => write!(
                f,
                "unknown animation strategy `{value}` (expected `visibility` or `viewport`)"
            ),
            CliParseError::UnexpectedArgument(arg) => {
                write!(f, "unexpected extra argument: {arg}")
            }
            CliParseError::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliParseError {}

pub fn parse_command<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut render = RenderArgs::default();
    let mut seen_time = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--animate" => {
                render.animate = true;
            }
            "--file" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingFileValue);
                };
                render.file = Some(PathBuf::from(path));
            }
            "--config" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingConfigValue);
                };
                render.config = Some(PathBuf::from(path));
            }
            "--strategy" => {
                let Some(value) = args.next() else {
                    return Err(CliParseError::MissingStrategyValue);
                };
                let strategy = value
                    .parse::<AnimationStrategy>()
                    .map_err(CliParseError::InvalidStrategy)?;
                render.strategy = Some(strategy);
            }
            other if is_flag(other) => {
                return Err(CliParseError::UnknownArgument(other.to_owned()))
            }
            other => {
                if seen_time {
                    return Err(CliParseError::UnexpectedArgument(other.to_owned()));
                }
                seen_time = true;
                render.at = parse_time(other);
            }
        }
    }

    Ok(Command::Render(render))
}

// `-1` is a time, `-x` is a flag.
fn is_flag(arg: &str) -> bool {
    arg.starts_with("--") || (arg.starts_with('-') && arg.parse::<f64>().is_err())
}

/// Non-numeric or non-finite input means "end of recording".
fn parse_time(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn usage_text() -> String {
    "castsvg\n\nUSAGE:\n  castsvg [TIME] [--animate] [--strategy <NAME>] [--file <PATH>] [--config <PATH>]\n  cat recording.json | castsvg 2.3 > frame.svg\n  castsvg --animate < recording.json > session.svg\n\nARGUMENTS:\n  TIME                Seconds into the recording to render (defaults to its duration)\n\nOPTIONS:\n  --animate           Render the whole recording as a looping animation\n  --strategy <NAME>   Animation encoding: visibility (default) or viewport\n  --file <PATH>       Read the recording from PATH instead of stdin\n  --config <PATH>     Load render options from a TOML file\n  -V, --version       Print version\n  -h, --help          Print help\n\nENVIRONMENT:\n  CASTSVG_LOG         Log filter for diagnostics on stderr (default: warn)\n  CASTSVG_COLOR       auto | always | never\n".to_owned()
}

pub fn print_usage() {
    eprint!("{}", usage_text());
}

pub fn version_text() -> String {
    format!("castsvg {}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
