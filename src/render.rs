use crate::config::RenderOptions;
use crate::frame::{self, Run};
use crate::markup::Element;
use crate::scene::{self, Geometry};
use crate::session::Session;
use crate::styles::StyleRegistry;
use crate::terminal::{Terminal, TerminalError, VtTerminal};
use crate::timeline::{self, FrameTiming, Timeline};

#[derive(Debug)]
pub enum RenderError {
    Terminal(TerminalError),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Terminal(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Terminal(err) => Some(err),
        }
    }
}

impl From<TerminalError> for RenderError {
    fn from(value: TerminalError) -> Self {
        Self::Terminal(value)
    }
}

/// A terminal plus everything needed to draw it as a standalone document.
pub struct Renderer {
    terminal: VtTerminal,
    geometry: Geometry,
    title: Option<String>,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(session: &Session, options: RenderOptions) -> Self {
        Self {
            terminal: VtTerminal::new(session.width, session.height),
            geometry: Geometry::new(session.width, session.height),
            title: session.title.clone(),
            options,
        }
    }

    pub fn write(&mut self, chunk: &str) -> Result<(), RenderError> {
        self.terminal.write(chunk)?;
        Ok(())
    }

    pub fn text(&self) -> String {
        self.terminal.text()
    }

    pub fn runs(&self) -> Vec<Vec<Run>> {
        frame::group(&frame::extract(&self.terminal))
    }

    /// Static document of the current screen. Each call starts a fresh
    /// style registry.
    pub fn render(&self) -> Element {
        let mut registry = StyleRegistry::new();
        let content = scene::text_runs(&self.runs(), &mut registry);
        scene::document(
            self.geometry,
            self.title.as_deref(),
            &self.options,
            &registry,
            content,
        )
    }

    /// One animation layer for the current screen, visible only during
    /// `timing`. Declarations go into the caller's `registry` so several
    /// layers can share one stylesheet. `None` when the screen is blank.
    pub fn render_frame(
        &self,
        timing: &FrameTiming,
        duration: f64,
        registry: &mut StyleRegistry,
    ) -> Option<Element> {
        timeline::visibility_layer(timing, &self.runs(), self.geometry, duration, registry)
    }
}

/// Screen after every chunk whose cumulative delay is at most `time`.
/// A non-finite `time` renders the end of the recording.
pub fn render_at(
    session: &Session,
    time: f64,
    options: &RenderOptions,
) -> Result<Element, RenderError> {
    let time = if time.is_finite() {
        time
    } else {
        session.duration
    };
    let mut renderer = Renderer::new(session, options.clone());
    let mut elapsed = 0.0;
    let mut applied = 0usize;
    for chunk in &session.chunks {
        elapsed += chunk.delay;
        if elapsed > time {
            break;
        }
        renderer.write(&chunk.data)?;
        applied += 1;
    }
    tracing::info!(
        time,
        applied,
        total = session.chunks.len(),
        "rendered static frame"
    );
    Ok(renderer.render())
}

pub fn animate(session: &Session, options: &RenderOptions) -> Result<Element, RenderError> {
    let total_delay = session.total_delay();
    if total_delay > session.duration {
        tracing::warn!(
            total_delay,
            duration = session.duration,
            "chunk delays exceed the declared duration, late frames will be clamped"
        );
    }
    let geometry = Geometry::new(session.width, session.height);
    let mut terminal = VtTerminal::new(session.width, session.height);
    let frames = Timeline::new(&mut terminal, &session.chunks, session.duration).capture_all()?;

    let mut registry = StyleRegistry::new();
    let content = timeline::animation_content(
        options.strategy,
        &frames,
        geometry,
        session.duration,
        &mut registry,
    );
    tracing::info!(
        frames = frames.len(),
        blank = frames.iter().filter(|frame| frame.is_empty()).count(),
        styles = registry.len(),
        strategy = options.strategy.label(),
        "rendered animation"
    );
    Ok(scene::document(
        geometry,
        session.title.as_deref(),
        options,
        &registry,
        content,
    ))
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
