use std::io::Read;
use std::path::PathBuf;

use crate::config::{self, ConfigError, RenderOptions};
use crate::render::{self, RenderError};
use crate::session::{Session, SessionError};
use crate::RenderArgs;

#[derive(Debug)]
pub enum RunnerError {
    Input(std::io::Error),
    InputFile {
        path: PathBuf,
        error: std::io::Error,
    },
    MissingInput,
    Session(SessionError),
    Config(ConfigError),
    Render(RenderError),
}

impl RunnerError {
    /// Errors caused by what was fed in rather than by rendering it.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, RunnerError::MissingInput | RunnerError::Session(_))
    }
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::Input(error) => write!(f, "failed to read stdin: {error}"),
            RunnerError::InputFile { path, error } => {
                write!(f, "failed to read {}: {error}", path.display())
            }
            RunnerError::MissingInput => {
                write!(f, "no recording given on stdin or with --file")
            }
            RunnerError::Session(error) => write!(f, "{error}"),
            RunnerError::Config(error) => write!(f, "{error}"),
            RunnerError::Render(error) => write!(f, "render failed: {error}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::Input(error) => Some(error),
            RunnerError::InputFile { error, .. } => Some(error),
            RunnerError::MissingInput => None,
            RunnerError::Session(error) => Some(error),
            RunnerError::Config(error) => Some(error),
            RunnerError::Render(error) => Some(error),
        }
    }
}

impl From<SessionError> for RunnerError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<ConfigError> for RunnerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RenderError> for RunnerError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub document: String,
    pub warnings: Vec<String>,
}

/// Reads one recording from `--file` or `stdin` and renders it as the
/// command line asked.
pub fn run_render<R: Read>(args: &RenderArgs, stdin: R) -> Result<RenderOutput, RunnerError> {
    let raw = read_input(args, stdin)?;
    if raw.trim().is_empty() {
        return Err(RunnerError::MissingInput);
    }

    let mut warnings = Vec::new();
    let options = resolve_options(args, &mut warnings)?;
    let session = Session::from_json(&raw)?;
    tracing::debug!(
        width = session.width,
        height = session.height,
        chunks = session.chunks.len(),
        duration = session.duration,
        "loaded session"
    );

    let document = if args.animate {
        render::animate(&session, &options)?
    } else {
        render::render_at(&session, args.at.unwrap_or(session.duration), &options)?
    };

    Ok(RenderOutput {
        document: document.to_string(),
        warnings,
    })
}

fn read_input<R: Read>(args: &RenderArgs, mut stdin: R) -> Result<String, RunnerError> {
    match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|error| RunnerError::InputFile {
            path: path.clone(),
            error,
        }),
        None => {
            let mut raw = String::new();
            stdin
                .read_to_string(&mut raw)
                .map_err(RunnerError::Input)?;
            Ok(raw)
        }
    }
}

fn resolve_options(
    args: &RenderArgs,
    warnings: &mut Vec<String>,
) -> Result<RenderOptions, RunnerError> {
    let mut options = match &args.config {
        Some(path) => config::load_render_options(path)?,
        None => RenderOptions::default(),
    };
    if let Some(strategy) = args.strategy {
        if !args.animate {
            warnings.push(format!(
                "--strategy {} only applies with --animate",
                strategy.label()
            ));
        }
        options.strategy = strategy;
    }
    Ok(options)
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
