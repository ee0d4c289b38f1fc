//! Fixed-pitch layout and window chrome.
//!
//! Glyph positions come from `project_x`/`project_y`; the window frame is
//! sized from `Geometry`. All numbers here are part of the visual contract:
//! changing one shifts every rendered document.

use crate::config::RenderOptions;
use crate::frame::Run;
use crate::markup::Element;
use crate::palette::{DEFAULT_BG, DEFAULT_FG};
use crate::styles::{StyleRegistry, TextStyle};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

pub const PROJECTION_SCALE: f64 = 20.0;
pub const COLUMN_FACTOR: f64 = 0.5;
pub const BASELINE_OFFSET: f64 = 0.8;

pub const COLUMN_WIDTH: f64 = 10.0;
pub const ROW_HEIGHT: f64 = 19.5;
pub const FRAME_ROW_HEIGHT: f64 = 19.0;
pub const FRAME_PADDING: f64 = 30.0;

pub const OUTER_MARGIN_X: f64 = 32.0;
pub const OUTER_MARGIN_Y: f64 = 127.0;
pub const WINDOW_INSET_X: f64 = 31.0;
pub const WINDOW_INSET_Y: f64 = 76.0;
pub const WINDOW_TOP: f64 = 50.0;
pub const WINDOW_RADIUS: f64 = 5.0;
pub const WINDOW_STROKE: &str = "#303030";

pub const DOT_RADIUS: f64 = 7.5;
pub const DOT_CENTER_Y: f64 = 70.0;
pub const DOTS: [(f64, &str); 3] = [(20.0, "#ff5f58"), (45.0, "#ffbd2e"), (70.0, "#18c132")];

pub const TITLE_BASELINE_Y: f64 = 75.0;
pub const TITLE_FILL: &str = "#8a8a8a";

pub const CONTENT_X: f64 = 15.0;
pub const CONTENT_Y: f64 = 100.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn project_x(col: f64) -> f64 {
    round2(col * COLUMN_FACTOR * PROJECTION_SCALE)
}

pub fn project_y(row: f64) -> f64 {
    round2(row * PROJECTION_SCALE)
}

/// Terminal size in cells and the pixel sizes derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub cols: usize,
    pub rows: usize,
}

impl Geometry {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub fn content_width(&self) -> f64 {
        self.cols as f64 * COLUMN_WIDTH
    }

    pub fn content_height(&self) -> f64 {
        self.rows as f64 * ROW_HEIGHT
    }

    /// Height of the backdrop painted behind one animation frame.
    pub fn frame_height(&self) -> f64 {
        self.rows as f64 * FRAME_ROW_HEIGHT + FRAME_PADDING
    }

    pub fn outer_width(&self) -> f64 {
        self.content_width() + OUTER_MARGIN_X
    }

    pub fn outer_height(&self) -> f64 {
        self.content_height() + OUTER_MARGIN_Y
    }

    fn window_width(&self) -> f64 {
        self.content_width() + WINDOW_INSET_X
    }

    fn window_height(&self) -> f64 {
        self.content_height() + WINDOW_INSET_Y
    }
}

pub fn text_run(run: &Run, registry: &mut StyleRegistry) -> Element {
    let class = registry.declare_once(TextStyle::from(run.style));
    Element::new("text")
        .attr_opt("class", class)
        .attr("x", project_x(run.start_col as f64))
        .attr("y", project_y(run.row as f64 + BASELINE_OFFSET))
        .text(run.text.clone())
}

pub fn text_runs(rows: &[Vec<Run>], registry: &mut StyleRegistry) -> Vec<Element> {
    rows.iter()
        .flatten()
        .map(|run| text_run(run, registry))
        .collect()
}

/// Wraps `content` in the window chrome and emits the class declarations
/// collected in `registry`.
pub fn document(
    geometry: Geometry,
    title: Option<&str>,
    options: &RenderOptions,
    registry: &StyleRegistry,
    content: Vec<Element>,
) -> Element {
    let mut root = Element::new("svg")
        .attr("xmlns", SVG_NAMESPACE)
        .attr("xml:space", "preserve")
        .attr("width", geometry.outer_width())
        .attr("height", geometry.outer_height())
        .attr(
            "style",
            format!(
                "font-family: {};font-size: {}px;fill: {DEFAULT_FG}",
                options.font_family, options.font_size
            ),
        );
    if !registry.is_empty() {
        root = root.child(Element::new("style").text(registry.stylesheet()));
    }

    let mut window = Element::new("g").child(
        Element::new("rect")
            .attr("rx", WINDOW_RADIUS)
            .attr("ry", WINDOW_RADIUS)
            .attr("y", WINDOW_TOP)
            .attr("width", geometry.window_width())
            .attr("height", geometry.window_height())
            .attr("fill", DEFAULT_BG)
            .attr("style", format!("stroke: {WINDOW_STROKE};stroke-width: 1")),
    );
    for (cx, fill) in DOTS {
        window = window.child(
            Element::new("circle")
                .attr("cx", cx)
                .attr("cy", DOT_CENTER_Y)
                .attr("r", DOT_RADIUS)
                .attr("fill", fill),
        );
    }
    if let Some(title) = title.filter(|_| options.show_title) {
        window = window.child(
            Element::new("text")
                .attr("x", geometry.window_width() / 2.0)
                .attr("y", TITLE_BASELINE_Y)
                .attr("text-anchor", "middle")
                .attr("fill", TITLE_FILL)
                .text(title),
        );
    }
    window = window.child(
        Element::new("svg")
            .attr("x", CONTENT_X)
            .attr("y", CONTENT_Y)
            .children(content),
    );
    root.child(window)
}
