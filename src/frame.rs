//! Cell extraction and run grouping.
//!
//! `extract` snapshots the terminal grid into resolved cells, `group` folds
//! horizontally adjacent cells of identical style into runs. Each run becomes
//! a single `<text>` element, so this is where most of the output size is won.

use crate::attributes;
use crate::palette::{self, DEFAULT_BG, DEFAULT_FG};
use crate::terminal::TerminalBuffer;

/// Visual attributes of a cell after inverse resolution. `None` colours are
/// the terminal defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: Option<&'static str>,
    pub bg: Option<&'static str>,
    pub bold: bool,
    pub underline: bool,
    pub inverse: bool,
}

impl CellStyle {
    pub fn from_word(word: u32) -> Self {
        let attrs = attributes::decode(word);
        let fg = palette::resolve_fg(attrs.fg_index);
        let bg = palette::resolve_bg(attrs.bg_index);
        let (fg, bg) = if attrs.inverse {
            (Some(bg.unwrap_or(DEFAULT_BG)), Some(fg.unwrap_or(DEFAULT_FG)))
        } else {
            (fg, bg)
        };
        Self {
            fg,
            bg,
            bold: attrs.bold,
            underline: attrs.underline,
            inverse: attrs.inverse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub glyph: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub row: usize,
    pub start_col: usize,
    pub style: CellStyle,
    pub text: String,
}

pub fn extract<B: TerminalBuffer + ?Sized>(buffer: &B) -> Vec<Vec<Cell>> {
    (0..buffer.rows())
        .map(|row| extract_row(buffer, row))
        .collect()
}

fn extract_row<B: TerminalBuffer + ?Sized>(buffer: &B, row: usize) -> Vec<Cell> {
    let mut cells = Vec::new();
    for col in 0..buffer.cols(row) {
        let Some((word, glyph)) = buffer.cell_at(row, col) else {
            continue;
        };
        if glyph.is_empty() {
            continue;
        }
        if glyph == " " && !space_is_kept(buffer, row, col) {
            continue;
        }
        cells.push(Cell {
            row,
            col,
            glyph,
            style: CellStyle::from_word(word),
        });
    }
    cells
}

// A space survives only when both neighbours hold printable content. Cells
// past the grid edge do not count against it; undrawn cells and other spaces
// do.
fn space_is_kept<B: TerminalBuffer + ?Sized>(buffer: &B, row: usize, col: usize) -> bool {
    let blocks = |col: Option<usize>| {
        col.and_then(|col| buffer.cell_at(row, col))
            .is_some_and(|(_, glyph)| glyph.is_empty() || glyph == " ")
    };
    !blocks(col.checked_sub(1)) && !blocks(col.checked_add(1))
}

pub fn group(rows: &[Vec<Cell>]) -> Vec<Vec<Run>> {
    rows.iter().map(|cells| group_row(cells)).collect()
}

pub fn group_row(cells: &[Cell]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut next_col = 0usize;
    for cell in cells {
        match runs.last_mut() {
            Some(run) if run.style == cell.style && cell.col == next_col => {
                run.text.push_str(&cell.glyph);
            }
            _ => runs.push(Run {
                row: cell.row,
                start_col: cell.col,
                style: cell.style,
                text: cell.glyph.clone(),
            }),
        }
        next_col = cell.col + 1;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{encode, CellAttributes};
    use crate::palette::{DEFAULT_BG_INDEX, DEFAULT_FG_INDEX};

    struct Grid {
        rows: Vec<Vec<(u32, &'static str)>>,
    }

    impl TerminalBuffer for Grid {
        fn rows(&self) -> usize {
            self.rows.len()
        }

        fn cols(&self, row: usize) -> usize {
            self.rows.get(row).map_or(0, Vec::len)
        }

        fn cell_at(&self, row: usize, col: usize) -> Option<(u32, String)> {
            self.rows
                .get(row)?
                .get(col)
                .map(|(word, glyph)| (*word, (*glyph).to_owned()))
        }

        fn cursor(&self) -> (usize, usize) {
            (0, 0)
        }
    }

    fn plain() -> u32 {
        encode(CellAttributes {
            fg_index: DEFAULT_FG_INDEX,
            bg_index: DEFAULT_BG_INDEX,
            ..CellAttributes::default()
        })
    }

    fn colored(fg_index: u16) -> u32 {
        encode(CellAttributes {
            fg_index,
            bg_index: DEFAULT_BG_INDEX,
            ..CellAttributes::default()
        })
    }

    fn row_of(text: &'static str) -> Grid {
        let cells = text
            .char_indices()
            .map(|(i, _)| (plain(), &text[i..i + 1]))
            .collect();
        Grid { rows: vec![cells] }
    }

    fn glyphs(rows: &[Vec<Cell>]) -> Vec<String> {
        rows.iter()
            .map(|cells| cells.iter().map(|cell| cell.glyph.as_str()).collect())
            .collect()
    }

    #[test]
    fn spaces_flanked_by_content_or_edges_are_kept() {
        let rows = extract(&row_of(" a "));
        assert_eq!(glyphs(&rows), vec![" a ".to_owned()]);
        assert_eq!(
            rows[0].iter().map(|cell| cell.col).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn runs_of_spaces_are_dropped() {
        assert_eq!(glyphs(&extract(&row_of("  "))), vec![String::new()]);
        assert_eq!(glyphs(&extract(&row_of("a  b c"))), vec!["ab c".to_owned()]);
    }

    #[test]
    fn spaces_next_to_undrawn_cells_are_dropped() {
        let grid = Grid {
            rows: vec![vec![
                (plain(), "a"),
                (plain(), ""),
                (plain(), " "),
                (plain(), ""),
                (plain(), "b"),
            ]],
        };
        let rows = extract(&grid);
        assert_eq!(glyphs(&rows), vec!["ab".to_owned()]);
        assert_eq!(
            rows[0].iter().map(|cell| cell.col).collect::<Vec<_>>(),
            vec![0, 4]
        );
    }

    #[test]
    fn trailing_prompt_space_is_dropped_on_a_live_terminal() {
        use crate::terminal::{Terminal, VtTerminal};

        let mut term = VtTerminal::new(8, 1);
        term.write("$ ").expect("write");
        assert_eq!(glyphs(&extract(&term)), vec!["$".to_owned()]);

        let mut term = VtTerminal::new(8, 1);
        term.write("a\u{1b}[2C \u{1b}[2Cb").expect("write");
        let rows = extract(&term);
        assert_eq!(glyphs(&rows), vec!["ab".to_owned()]);
        assert_eq!(
            rows[0].iter().map(|cell| cell.col).collect::<Vec<_>>(),
            vec![0, 6]
        );

        let mut term = VtTerminal::new(8, 1);
        term.write("$ ls").expect("write");
        assert_eq!(glyphs(&extract(&term)), vec!["$ ls".to_owned()]);
    }

    #[test]
    fn empty_glyphs_are_skipped() {
        let grid = Grid {
            rows: vec![vec![(plain(), "x"), (plain(), ""), (plain(), "y")]],
        };
        let rows = extract(&grid);
        assert_eq!(glyphs(&rows), vec!["xy".to_owned()]);
    }

    #[test]
    fn inverse_swaps_resolved_colours() {
        let word = encode(CellAttributes {
            fg_index: 1,
            bg_index: DEFAULT_BG_INDEX,
            inverse: true,
            ..CellAttributes::default()
        });
        let style = CellStyle::from_word(word);
        assert_eq!(style.fg, Some(DEFAULT_BG));
        assert_eq!(style.bg, Some("#cf3c40"));
        assert!(style.inverse);

        let style = CellStyle::from_word(plain());
        assert_eq!(style.fg, None);
        assert_eq!(style.bg, None);
    }

    #[test]
    fn grouping_merges_identical_neighbours() {
        let a = colored(1);
        let b = colored(2);
        let grid = Grid {
            rows: vec![vec![
                (a, "1"),
                (a, "2"),
                (b, "3"),
                (b, "4"),
                (b, "5"),
                (a, "6"),
            ]],
        };
        let runs = group(&extract(&grid));
        let lengths = runs[0]
            .iter()
            .map(|run| run.text.chars().count())
            .collect::<Vec<_>>();
        assert_eq!(lengths, vec![2, 3, 1]);
        assert_eq!(runs[0][1].start_col, 2);
        assert_eq!(runs[0][1].text, "345");
        assert_eq!(runs[0][2].start_col, 5);
    }

    #[test]
    fn grouping_splits_at_column_gaps() {
        let runs = group(&extract(&row_of("ab  cd")));
        let texts = runs[0]
            .iter()
            .map(|run| (run.start_col, run.text.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(texts, vec![(0, "ab"), (4, "cd")]);
    }

    #[test]
    fn grouping_already_grouped_rows_keeps_boundaries() {
        let a = colored(1);
        let b = colored(2);
        let grid = Grid {
            rows: vec![vec![(a, "x"), (a, "x"), (b, "y"), (a, "z")]],
        };
        let runs = group(&extract(&grid));
        let collapsed = runs[0]
            .iter()
            .map(|run| Cell {
                row: run.row,
                col: run.start_col,
                glyph: run.text.clone(),
                style: run.style,
            })
            .collect::<Vec<_>>();
        let regrouped = group_row(&collapsed);
        let boundaries = |runs: &[Run]| runs.iter().map(|run| run.start_col).collect::<Vec<_>>();
        assert_eq!(boundaries(&regrouped), boundaries(&runs[0]));
    }

    #[test]
    fn empty_rows_yield_no_runs() {
        let runs = group(&extract(&row_of("   ")));
        assert_eq!(runs.len(), 1);
        assert!(runs[0].is_empty());
    }
}
