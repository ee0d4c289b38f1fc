//! Packed cell attribute words.
//!
//! Bit layout, low to high:
//!
//! | bits   | field     |
//! |--------|-----------|
//! | 0      | inverse   |
//! | 1      | underline |
//! | 2      | bold      |
//! | 3-11   | fg index  |
//! | 12-20  | bg index  |

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub offset: u32,
    pub width: u32,
}

impl BitField {
    const fn new(name: &'static str, offset: u32, width: u32) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    pub const fn mask(self) -> u32 {
        ((1u32 << self.width) - 1) << self.offset
    }

    pub const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.offset
    }

    pub const fn insert(self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.offset) & self.mask())
    }
}

pub const INVERSE: BitField = BitField::new("inverse", 0, 1);
pub const UNDERLINE: BitField = BitField::new("underline", 1, 1);
pub const BOLD: BitField = BitField::new("bold", 2, 1);
pub const FG: BitField = BitField::new("fg", 3, 9);
pub const BG: BitField = BitField::new("bg", 12, 9);

pub const LAYOUT: [BitField; 5] = [INVERSE, UNDERLINE, BOLD, FG, BG];

/// Number of meaningful bits in a packed word.
pub const WORD_BITS: u32 = BG.offset + BG.width;

const fn layout_is_contiguous() -> bool {
    let mut expected = 0;
    let mut i = 0;
    while i < LAYOUT.len() {
        if LAYOUT[i].offset != expected || LAYOUT[i].width == 0 {
            return false;
        }
        expected += LAYOUT[i].width;
        i += 1;
    }
    expected == WORD_BITS && WORD_BITS <= 32
}

const _: () = assert!(layout_is_contiguous());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellAttributes {
    pub fg_index: u16,
    pub bg_index: u16,
    pub bold: bool,
    pub underline: bool,
    pub inverse: bool,
}

/// Total over every `u32`: bits above the layout are ignored.
pub fn decode(word: u32) -> CellAttributes {
    CellAttributes {
        fg_index: FG.extract(word) as u16,
        bg_index: BG.extract(word) as u16,
        bold: BOLD.extract(word) != 0,
        underline: UNDERLINE.extract(word) != 0,
        inverse: INVERSE.extract(word) != 0,
    }
}

pub fn encode(attrs: CellAttributes) -> u32 {
    let mut word = 0;
    word = INVERSE.insert(word, u32::from(attrs.inverse));
    word = UNDERLINE.insert(word, u32::from(attrs.underline));
    word = BOLD.insert(word, u32::from(attrs.bold));
    word = FG.insert(word, u32::from(attrs.fg_index));
    BG.insert(word, u32::from(attrs.bg_index))
}
