use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_FONT_FAMILY: &str =
    "Consolas, Menlo, 'Bitstream Vera Sans Mono', monospace, 'Powerline Symbols'";
pub const DEFAULT_FONT_SIZE: f64 = 15.0;

/// How an animated document encodes frame timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStrategy {
    /// One layer per frame, each with its own opacity keyframes.
    #[default]
    Visibility,
    /// All frames side by side in a strip that slides under a fixed viewport.
    Viewport,
}

impl AnimationStrategy {
    pub fn label(self) -> &'static str {
        match self {
            AnimationStrategy::Visibility => "visibility",
            AnimationStrategy::Viewport => "viewport",
        }
    }
}

impl FromStr for AnimationStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "visibility" => Ok(AnimationStrategy::Visibility),
            "viewport" => Ok(AnimationStrategy::Viewport),
            other => Err(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub strategy: AnimationStrategy,
    pub font_family: String,
    pub font_size: f64,
    pub show_title: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            strategy: AnimationStrategy::default(),
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            show_title: true,
        }
    }
}

impl RenderOptions {
    pub fn with_strategy(mut self, strategy: AnimationStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    render: Option<RenderSection>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderSection {
    #[serde(default)]
    strategy: Option<AnimationStrategy>,
    #[serde(default)]
    font_family: Option<String>,
    #[serde(default)]
    font_size: Option<f64>,
    #[serde(default)]
    show_title: Option<bool>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        error: std::io::Error,
    },
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },
    InvalidFontSize {
        path: PathBuf,
        value: f64,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, error } => {
                write!(f, "failed to read config {}: {error}", path.display())
            }
            ConfigError::Parse { path, error } => {
                write!(f, "failed to parse config {}: {error}", path.display())
            }
            ConfigError::InvalidFontSize { path, value } => write!(
                f,
                "invalid font_size {value} in {} (expected a positive number)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_render_options(path: &Path) -> Result<RenderOptions, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|error| ConfigError::Read {
        path: path.to_path_buf(),
        error,
    })?;
    parse_render_options(&raw, path)
}

pub fn parse_render_options(raw: &str, path: &Path) -> Result<RenderOptions, ConfigError> {
    let file: ConfigFile = toml::from_str(raw).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        error,
    })?;
    let mut options = RenderOptions::default();
    let Some(section) = file.render else {
        return Ok(options);
    };
    if let Some(strategy) = section.strategy {
        options.strategy = strategy;
    }
    if let Some(font_family) = section.font_family {
        options.font_family = font_family;
    }
    if let Some(font_size) = section.font_size {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(ConfigError::InvalidFontSize {
                path: path.to_path_buf(),
                value: font_size,
            });
        }
        options.font_size = font_size;
    }
    if let Some(show_title) = section.show_title {
        options.show_title = show_title;
    }
    Ok(options)
}
