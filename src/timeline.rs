//! Replays a recording chunk by chunk and turns the captured frames into a
//! looping, script-free CSS animation.

use crate::config::AnimationStrategy;
use crate::frame::{self, Run};
use crate::markup::Element;
use crate::palette::DEFAULT_BG;
use crate::scene::{self, Geometry};
use crate::session::Chunk;
use crate::styles::StyleRegistry;
use crate::terminal::{Terminal, TerminalError};

/// When a frame is on screen, in seconds from the start of the recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl FrameTiming {
    pub fn start_percent(&self, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        percent_of(self.start, duration)
    }

    pub fn end_percent(&self, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 100.0;
        }
        percent_of(self.end, duration)
    }
}

pub fn percent_of(time: f64, duration: f64) -> f64 {
    let percent = time / (duration / 100.0);
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Frame `i` covers the time between the cumulative delay before chunk `i`
/// and the cumulative delay including it. The last frame runs to `duration`.
pub fn frame_timings(chunks: &[Chunk], duration: f64) -> Vec<FrameTiming> {
    let mut elapsed = 0.0;
    let mut timings = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let start = elapsed;
        elapsed += chunk.delay;
        let end = if index + 1 == chunks.len() {
            duration
        } else {
            elapsed
        };
        timings.push(FrameTiming { index, start, end });
    }
    timings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Initial,
    Replaying,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub timing: FrameTiming,
    pub runs: Vec<Vec<Run>>,
}

impl CapturedFrame {
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Vec::is_empty)
    }
}

pub struct Timeline<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
    chunks: &'a [Chunk],
    timings: Vec<FrameTiming>,
    next: usize,
    state: TimelineState,
}

impl<'a, T: Terminal + ?Sized> Timeline<'a, T> {
    pub fn new(terminal: &'a mut T, chunks: &'a [Chunk], duration: f64) -> Self {
        Self {
            terminal,
            chunks,
            timings: frame_timings(chunks, duration),
            next: 0,
            state: TimelineState::Initial,
        }
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Applies the next chunk and captures the screen it leaves behind.
    /// Returns `None` once every chunk has been replayed.
    pub fn step(&mut self) -> Result<Option<CapturedFrame>, TerminalError> {
        let Some(chunk) = self.chunks.get(self.next) else {
            self.state = TimelineState::Done;
            return Ok(None);
        };
        self.state = TimelineState::Replaying;
        self.terminal.write(&chunk.data)?;
        // The buffer is mutated in place by the next write, so grab it now.
        let runs = frame::group(&frame::extract(&*self.terminal));
        let timing = self.timings[self.next];
        self.next += 1;
        if self.next == self.chunks.len() {
            self.state = TimelineState::Done;
        }
        tracing::debug!(
            frame = timing.index,
            start = timing.start,
            end = timing.end,
            runs = runs.iter().map(Vec::len).sum::<usize>(),
            "captured frame"
        );
        Ok(Some(CapturedFrame { timing, runs }))
    }

    pub fn capture_all(mut self) -> Result<Vec<CapturedFrame>, TerminalError> {
        let mut frames = Vec::with_capacity(self.chunks.len());
        while let Some(frame) = self.step()? {
            frames.push(frame);
        }
        Ok(frames)
    }
}

pub fn animation_content(
    strategy: AnimationStrategy,
    frames: &[CapturedFrame],
    geometry: Geometry,
    duration: f64,
    registry: &mut StyleRegistry,
) -> Vec<Element> {
    if duration <= 0.0 {
        // A zero-length animation never applies its keyframes, so show the
        // final screen as a still instead.
        return frames
            .last()
            .map(|frame| scene::text_runs(&frame.runs, registry))
            .unwrap_or_default();
    }
    match strategy {
        AnimationStrategy::Visibility => visibility_layers(frames, geometry, duration, registry),
        AnimationStrategy::Viewport => viewport_strip(frames, geometry, duration, registry),
    }
}

pub fn frame_name(index: usize) -> String {
    format!("frame-{index}")
}

fn visibility_css(name: &str, timing: &FrameTiming, duration: f64) -> String {
    let start = timing.start_percent(duration);
    let end = timing.end_percent(duration);
    format!(
        ".{name} {{\
         opacity: 0;\
         animation-name: {name};\
         animation-duration: {duration}s;\
         animation-timing-function: steps(1, end);\
         animation-iteration-count: infinite;\
         }}\n\
         @keyframes {name} {{\
         from {{opacity: 0;}}\
         {start}% {{opacity: 1;}}\
         {end}% {{opacity: 0;}}\
         to {{opacity: 0;}}\
         }}"
    )
}

/// Layer shown only during `timing`, or `None` when `runs` draw nothing.
pub fn visibility_layer(
    timing: &FrameTiming,
    runs: &[Vec<Run>],
    geometry: Geometry,
    duration: f64,
    registry: &mut StyleRegistry,
) -> Option<Element> {
    if runs.iter().all(Vec::is_empty) {
        return None;
    }
    let name = frame_name(timing.index);
    let layer = Element::new("g")
        .attr("class", format!("{name} frame"))
        .child(
            Element::new("style")
                .attr("type", "text/css")
                .text(visibility_css(&name, timing, duration)),
        )
        .child(
            Element::new("rect")
                .attr("width", geometry.content_width())
                .attr("height", geometry.frame_height())
                .attr("fill", DEFAULT_BG),
        )
        .children(scene::text_runs(runs, registry));
    Some(layer)
}

/// One stacked layer per non-empty frame, each fading in for its own slot.
pub fn visibility_layers(
    frames: &[CapturedFrame],
    geometry: Geometry,
    duration: f64,
    registry: &mut StyleRegistry,
) -> Vec<Element> {
    frames
        .iter()
        .filter_map(|frame| {
            visibility_layer(&frame.timing, &frame.runs, geometry, duration, registry)
        })
        .collect()
}

fn strip_offset(slot: usize, frame_width: f64) -> f64 {
    if slot == 0 {
        return 0.0;
    }
    -(slot as f64 * frame_width)
}

fn viewport_css(frames: &[CapturedFrame], frame_width: f64, duration: f64) -> String {
    let keyframes = frames
        .iter()
        .enumerate()
        .map(|(slot, frame)| {
            format!(
                "{}% {{transform: translateX({}px);}}",
                frame.timing.start_percent(duration),
                strip_offset(slot, frame_width)
            )
        })
        .chain(frames.len().checked_sub(1).map(|last| {
            format!(
                "100% {{transform: translateX({}px);}}",
                strip_offset(last, frame_width)
            )
        }))
        .collect::<String>();
    format!(
        ".strip {{\
         animation-name: strip;\
         animation-duration: {duration}s;\
         animation-timing-function: steps(1, end);\
         animation-iteration-count: infinite;\
         }}\n\
         @keyframes strip {{{keyframes}}}"
    )
}

/// Every frame side by side in one strip, shifted one frame width at each
/// frame's start. Empty frames keep their slot so offsets stay aligned.
pub fn viewport_strip(
    frames: &[CapturedFrame],
    geometry: Geometry,
    duration: f64,
    registry: &mut StyleRegistry,
) -> Vec<Element> {
    let frame_width = geometry.content_width();
    let slots = frames
        .iter()
        .enumerate()
        .map(|(slot, frame)| {
            Element::new("g")
                .attr("class", frame_name(frame.timing.index))
                .attr("transform", format!("translate({})", slot as f64 * frame_width))
                .children(scene::text_runs(&frame.runs, registry))
        })
        .collect::<Vec<Element>>();
    if slots.is_empty() {
        return Vec::new();
    }
    let viewport = Element::new("svg")
        .attr("width", frame_width)
        .attr("height", geometry.frame_height())
        .child(
            Element::new("style")
                .attr("type", "text/css")
                .text(viewport_css(frames, frame_width, duration)),
        )
        .child(Element::new("g").attr("class", "strip").children(slots));
    vec![viewport]
}
