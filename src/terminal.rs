use vt100::Parser as VtParser;

use crate::attributes::{self, CellAttributes};
use crate::palette::{self, DEFAULT_BG_INDEX, DEFAULT_FG_INDEX};

/// Read side of a terminal engine: a grid of packed attribute words and glyphs.
pub trait TerminalBuffer {
    fn rows(&self) -> usize;
    fn cols(&self, row: usize) -> usize;
    /// `None` outside the grid. An empty glyph means nothing is drawn there.
    fn cell_at(&self, row: usize, col: usize) -> Option<(u32, String)>;
    /// `(x, y)` of the cursor.
    fn cursor(&self) -> (usize, usize);
}

pub trait Terminal: TerminalBuffer {
    fn write(&mut self, chunk: &str) -> Result<(), TerminalError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalError {
    pub message: String,
}

impl std::fmt::Display for TerminalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "terminal write failed: {}", self.message)
    }
}

impl std::error::Error for TerminalError {}

pub struct VtTerminal {
    parser: VtParser,
    rows: usize,
    cols: usize,
}

impl VtTerminal {
    pub fn new(width: usize, height: usize) -> Self {
        let engine_rows = clamp_dimension(height);
        let engine_cols = clamp_dimension(width);
        let degenerate = width == 0 || height == 0;
        Self {
            parser: VtParser::new(engine_rows, engine_cols, 0),
            rows: if degenerate { 0 } else { usize::from(engine_rows) },
            cols: if degenerate { 0 } else { usize::from(engine_cols) },
        }
    }

    /// Plain text of the visible screen.
    pub fn text(&self) -> String {
        if self.rows == 0 {
            return String::new();
        }
        self.parser.screen().contents()
    }
}

fn clamp_dimension(value: usize) -> u16 {
    u16::try_from(value.max(1)).unwrap_or(u16::MAX)
}

fn color_index(color: vt100::Color, default_index: u16) -> u16 {
    match color {
        vt100::Color::Default => default_index,
        vt100::Color::Idx(index) => u16::from(index),
        vt100::Color::Rgb(r, g, b) => palette::nearest_cube_index(r, g, b),
    }
}

impl TerminalBuffer for VtTerminal {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self, row: usize) -> usize {
        if row < self.rows {
            self.cols
        } else {
            0
        }
    }

    fn cell_at(&self, row: usize, col: usize) -> Option<(u32, String)> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let cell = self
            .parser
            .screen()
            .cell(u16::try_from(row).ok()?, u16::try_from(col).ok()?)?;
        if cell.is_wide_continuation() {
            return Some((0, String::new()));
        }
        let word = attributes::encode(CellAttributes {
            fg_index: color_index(cell.fgcolor(), DEFAULT_FG_INDEX),
            bg_index: color_index(cell.bgcolor(), DEFAULT_BG_INDEX),
            bold: cell.bold(),
            underline: cell.underline(),
            inverse: cell.inverse(),
        });
        Some((word, cell.contents()))
    }

    fn cursor(&self) -> (usize, usize) {
        let (row, col) = self.parser.screen().cursor_position();
        (usize::from(col), usize::from(row))
    }
}

impl Terminal for VtTerminal {
    fn write(&mut self, chunk: &str) -> Result<(), TerminalError> {
        self.parser.process(chunk.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::decode;

    #[test]
    fn exposes_written_glyphs_and_dimensions() {
        let mut term = VtTerminal::new(10, 3);
        term.write("hi").expect("write");
        assert_eq!(term.rows(), 3);
        assert_eq!(term.cols(0), 10);
        assert_eq!(term.cols(3), 0);
        let (_, glyph) = term.cell_at(0, 1).expect("cell");
        assert_eq!(glyph, "i");
        let (_, untouched) = term.cell_at(0, 5).expect("cell");
        assert_eq!(untouched, "");
        assert_eq!(term.cursor(), (2, 0));
        assert!(term.cell_at(3, 0).is_none());
    }

    #[test]
    fn packs_sgr_state_into_attribute_words() {
        let mut term = VtTerminal::new(10, 1);
        term.write("\u{1b}[1;4;7;31;42mx\u{1b}[0my").expect("write");
        let (word, _) = term.cell_at(0, 0).expect("cell");
        let attrs = decode(word);
        assert_eq!(attrs.fg_index, 1);
        assert_eq!(attrs.bg_index, 2);
        assert!(attrs.bold && attrs.underline && attrs.inverse);

        let (word, _) = term.cell_at(0, 1).expect("cell");
        let attrs = decode(word);
        assert_eq!(attrs.fg_index, DEFAULT_FG_INDEX);
        assert_eq!(attrs.bg_index, DEFAULT_BG_INDEX);
        assert!(!attrs.bold && !attrs.underline && !attrs.inverse);
    }

    #[test]
    fn truecolor_maps_onto_the_cube() {
        let mut term = VtTerminal::new(4, 1);
        term.write("\u{1b}[38;2;255;0;0mr").expect("write");
        let (word, _) = term.cell_at(0, 0).expect("cell");
        assert_eq!(decode(word).fg_index, 196);
    }

    #[test]
    fn degenerate_geometry_has_no_rows() {
        let mut term = VtTerminal::new(0, 0);
        term.write("ignored").expect("write");
        assert_eq!(term.rows(), 0);
        assert!(term.cell_at(0, 0).is_none());
        assert_eq!(term.text(), "");
    }

    #[test]
    fn text_returns_screen_contents() {
        let mut term = VtTerminal::new(8, 2);
        term.write("one\r\ntwo").expect("write");
        let text = term.text();
        assert!(text.starts_with("one\ntwo"), "{text:?}");
    }
}
