use serde::Deserialize;

/// One recorded write: `delay` seconds after the previous chunk, `data` is
/// passed to the terminal untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(f64, String)")]
pub struct Chunk {
    pub delay: f64,
    pub data: String,
}

impl From<(f64, String)> for Chunk {
    fn from((delay, data): (f64, String)) -> Self {
        Self { delay, data }
    }
}

impl Chunk {
    pub fn new(delay: f64, data: impl Into<String>) -> Self {
        Self {
            delay,
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub width: usize,
    pub height: usize,
    pub duration: f64,
    pub title: Option<String>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    width: usize,
    height: usize,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    stdout: Vec<Chunk>,
}

#[derive(Debug)]
pub enum SessionError {
    EmptyInput,
    Json(serde_json::Error),
    InvalidDuration(f64),
    InvalidDelay { index: usize, delay: f64 },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::EmptyInput => write!(f, "session input is empty"),
            SessionError::Json(err) => write!(f, "failed to parse session JSON: {err}"),
            SessionError::InvalidDuration(duration) => {
                write!(f, "session duration must be a finite, non-negative number (got {duration})")
            }
            SessionError::InvalidDelay { index, delay } => write!(
                f,
                "chunk {index} has an invalid delay {delay} (expected a finite, non-negative number)"
            ),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl Session {
    pub fn new(width: usize, height: usize, duration: f64, chunks: Vec<Chunk>) -> Self {
        Self {
            width,
            height,
            duration,
            title: None,
            chunks,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Parses the recording envelope. A missing `duration` defaults to the sum
    /// of all chunk delays.
    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        if raw.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let envelope: SessionEnvelope = serde_json::from_str(raw)?;
        for (index, chunk) in envelope.stdout.iter().enumerate() {
            if !chunk.delay.is_finite() || chunk.delay < 0.0 {
                return Err(SessionError::InvalidDelay {
                    index,
                    delay: chunk.delay,
                });
            }
        }
        let duration = envelope
            .duration
            .unwrap_or_else(|| envelope.stdout.iter().map(|chunk| chunk.delay).sum());
        if !duration.is_finite() || duration < 0.0 {
            return Err(SessionError::InvalidDuration(duration));
        }
        Ok(Self {
            width: envelope.width,
            height: envelope.height,
            duration,
            title: envelope.title.filter(|title| !title.trim().is_empty()),
            chunks: envelope.stdout,
        })
    }

    pub fn total_delay(&self) -> f64 {
        self.chunks.iter().map(|chunk| chunk.delay).sum()
    }
}
