//! Fixed-size character grid drawn over the scene for diagnostics.
//!
//! Cells are 8x16 pixels, so a 1024x768 backbuffer gives a 128x48 grid. Each
//! cell holds an ASCII byte and an attribute byte: low nibble foreground, high
//! nibble background, both indices into the 16-color [`PALETTE`]. Background
//! index 0 is drawn transparent.
//!
//! [`DebugText::print`] understands a small ANSI subset for inline color
//! changes: `ESC[fg;bgm`. An empty component keeps the current value and a lone
//! `0` restores the attribute the call started with.

use crate::view::Extent;

pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

/// VGA text-mode colors as `0xRRGGBB`.
pub const PALETTE: [u32; 16] = [
    0x000000, 0x0000aa, 0x00aa00, 0x00aaaa, 0xaa0000, 0xaa00aa, 0xaa5500, 0xaaaaaa, 0x555555,
    0x5555ff, 0x55ff55, 0x55ffff, 0xff5555, 0xff55ff, 0xffff55, 0xffffff,
];

pub fn palette_rgb(index: u8) -> [u8; 3] {
    let [_, r, g, b] = PALETTE[usize::from(index & 0x0f)].to_be_bytes();
    [r, g, b]
}

pub const fn attr(fg: u8, bg: u8) -> u8 {
    ((bg & 0x0f) << 4) | (fg & 0x0f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: u8,
    pub attr: u8,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: b' ', attr: 0 };

    pub fn fg(self) -> u8 {
        self.attr & 0x0f
    }

    pub fn bg(self) -> u8 {
        self.attr >> 4
    }

    /// True when drawing the cell would put nothing on screen.
    pub fn is_blank(self) -> bool {
        self.bg() == 0 && (self.ch == b' ' || self.ch == 0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DebugText {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sgr {
    Reset,
    Set { fg: Option<u8>, bg: Option<u8> },
}

const MAX_ESCAPE_LEN: usize = 16;

impl DebugText {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    /// Grid dimensions that fit a backbuffer of `extent` pixels.
    pub fn grid_size(extent: Extent) -> (u16, u16) {
        let cols = (extent.width / CELL_WIDTH).min(u32::from(u16::MAX)) as u16;
        let rows = (extent.height / CELL_HEIGHT).min(u32::from(u16::MAX)) as u16;
        (cols, rows)
    }

    pub fn for_backbuffer(extent: Extent) -> Self {
        let (cols, rows) = Self::grid_size(extent);
        Self::new(cols, rows)
    }

    /// Resize to fit `extent`. Contents are discarded when the grid changes.
    pub fn fit(&mut self, extent: Extent) {
        let (cols, rows) = Self::grid_size(extent);
        if (cols, rows) != (self.width, self.height) {
            *self = Self::new(cols, rows);
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_blank())
    }

    /// Row `y` as a string, for logging and tests.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|c| char::from(c.ch))
            .collect()
    }

    /// Print `text` starting at column `x`, row `y`. `\n` continues at column
    /// `x` on the next row; anything past the grid edge is dropped.
    pub fn print(&mut self, x: u16, y: u16, base_attr: u8, text: &str) {
        let mut current = base_attr;
        let mut col = u32::from(x);
        let mut row = u32::from(y);
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            match b {
                0x1b => {
                    if let Some((len, sgr)) = parse_escape(&bytes[i + 1..]) {
                        current = match sgr {
                            Sgr::Reset => base_attr,
                            Sgr::Set { fg, bg } => attr(
                                fg.unwrap_or(current & 0x0f),
                                bg.unwrap_or(current >> 4),
                            ),
                        };
                        i += 1 + len;
                    } else {
                        i += 1;
                    }
                    continue;
                }
                b'\n' => {
                    col = u32::from(x);
                    row += 1;
                }
                0x20..=0x7e => {
                    self.put(col, row, b, current);
                    col += 1;
                }
                0x80..=0xff => {
                    // Multi-byte UTF-8: one cell, drawn as '?'.
                    let len = text[i..].chars().next().map_or(1, char::len_utf8);
                    self.put(col, row, b'?', current);
                    col += 1;
                    i += len;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Blit a `w`x`h` block of `(char, attr)` byte pairs. `pitch` is the byte
    /// distance between rows of `data`.
    pub fn image(&mut self, x: u16, y: u16, w: u16, h: u16, data: &[u8], pitch: usize) {
        for row in 0..usize::from(h) {
            for col in 0..usize::from(w) {
                let at = row * pitch + col * 2;
                let Some(pair) = data.get(at..at + 2) else {
                    break;
                };
                self.put(
                    u32::from(x) + col as u32,
                    u32::from(y) + row as u32,
                    pair[0],
                    pair[1],
                );
            }
        }
    }

    fn put(&mut self, x: u32, y: u32, ch: u8, attr: u8) {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return;
        }
        let i = y as usize * usize::from(self.width) + x as usize;
        self.cells[i] = Cell { ch, attr };
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }
}

/// Parse `[fg;bgm` following an ESC byte. Returns the byte count consumed.
fn parse_escape(rest: &[u8]) -> Option<(usize, Sgr)> {
    if rest.first() != Some(&b'[') {
        return None;
    }
    let end = rest
        .iter()
        .take(MAX_ESCAPE_LEN)
        .position(|&b| b == b'm')?;
    let body = std::str::from_utf8(&rest[1..end]).ok()?;

    if body.trim() == "0" {
        return Some((end + 1, Sgr::Reset));
    }

    let (fg, bg) = match body.split_once(';') {
        Some((fg, bg)) => (fg, Some(bg)),
        None => (body, None),
    };
    let fg = parse_color(fg)?;
    let bg = match bg {
        Some(bg) => parse_color(bg)?,
        None => None,
    };
    Some((end + 1, Sgr::Set { fg, bg }))
}

/// `Some(None)` for an empty component, `None` for garbage.
fn parse_color(s: &str) -> Option<Option<u8>> {
    let s = s.trim();
    if s.is_empty() {
        return Some(None);
    }
    s.parse::<u8>().ok().map(|n| Some(n & 0x0f))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u8 = attr(15, 0);

    #[test]
    fn grid_fits_backbuffer_in_8x16_cells() {
        let text = DebugText::for_backbuffer(Extent::new(1024, 768));
        assert_eq!((text.width(), text.height()), (128, 48));
        assert_eq!(DebugText::grid_size(Extent::new(7, 15)), (0, 0));
    }

    #[test]
    fn print_writes_plain_text_with_attr() {
        let mut text = DebugText::new(20, 4);
        text.print(2, 1, WHITE, "hello");
        assert_eq!(text.row_text(1), "  hello             ");
        assert_eq!(text.cell(2, 1), Some(Cell { ch: b'h', attr: WHITE }));
    }

    #[test]
    fn ansi_changes_foreground_and_resets() {
        let mut text = DebugText::new(20, 1);
        text.print(0, 0, WHITE, "a\x1b[9;mb\x1b[0mc");
        assert_eq!(text.row_text(0).trim_end(), "abc");
        assert_eq!(text.cell(0, 0).unwrap().attr, WHITE);
        assert_eq!(text.cell(1, 0).unwrap().fg(), 9);
        assert_eq!(text.cell(1, 0).unwrap().bg(), 0);
        assert_eq!(text.cell(2, 0).unwrap().attr, WHITE);
    }

    #[test]
    fn ansi_background_only_keeps_foreground() {
        let mut text = DebugText::new(10, 1);
        text.print(0, 0, WHITE, "\x1b[; 2m  ");
        let cell = text.cell(0, 0).unwrap();
        assert_eq!(cell.fg(), 15);
        assert_eq!(cell.bg(), 2);
        assert!(!cell.is_blank());
    }

    #[test]
    fn malformed_escape_is_skipped() {
        let mut text = DebugText::new(10, 1);
        text.print(0, 0, WHITE, "x\x1b[zz;mY");
        assert_eq!(text.row_text(0).trim_end(), "x[zz;mY");
        assert!(text.cell(1, 0).is_some_and(|c| c.attr == WHITE));
    }

    #[test]
    fn print_clips_at_right_and_bottom_edges() {
        let mut text = DebugText::new(4, 2);
        text.print(2, 0, WHITE, "abcdef");
        text.print(0, 5, WHITE, "zzz");
        assert_eq!(text.row_text(0), "  ab");
        assert_eq!(text.row_text(1), "    ");
    }

    #[test]
    fn newline_returns_to_start_column() {
        let mut text = DebugText::new(6, 3);
        text.print(1, 0, WHITE, "ab\ncd");
        assert_eq!(text.row_text(0), " ab   ");
        assert_eq!(text.row_text(1), " cd   ");
    }

    #[test]
    fn non_ascii_becomes_one_placeholder_cell() {
        let mut text = DebugText::new(6, 1);
        text.print(0, 0, WHITE, "a\u{23f8}b");
        assert_eq!(text.row_text(0), "a?b   ");
    }

    #[test]
    fn image_blits_pairs_and_clips() {
        let mut text = DebugText::new(3, 2);
        // 2x2 image, pitch 4 bytes.
        let data = [b'A', 0x1f, b'B', 0x2f, b'C', 0x3f, b'D', 0x4f];
        text.image(2, 0, 2, 2, &data, 4);
        assert_eq!(text.cell(2, 0), Some(Cell { ch: b'A', attr: 0x1f }));
        assert_eq!(text.cell(2, 1), Some(Cell { ch: b'C', attr: 0x3f }));
        assert_eq!(text.row_text(0), "  A");
    }

    #[test]
    fn image_stops_at_end_of_data() {
        let mut text = DebugText::new(4, 4);
        text.image(0, 0, 4, 4, &[b'X', 0x0f], 8);
        assert_eq!(text.row_text(0), "X   ");
        assert!(text.rows().skip(1).all(|row| row.iter().all(|c| c.is_blank())));
    }

    #[test]
    fn clear_and_fit() {
        let mut text = DebugText::new(4, 1);
        text.print(0, 0, WHITE, "abcd");
        text.clear();
        assert!(text.is_blank());

        text.print(0, 0, WHITE, "abcd");
        text.fit(Extent::new(32, 16));
        assert_eq!(text.row_text(0), "abcd");
        text.fit(Extent::new(64, 32));
        assert_eq!((text.width(), text.height()), (8, 2));
        assert!(text.is_blank());
    }

    #[test]
    fn palette_lookup_masks_index() {
        assert_eq!(palette_rgb(15), [0xff, 0xff, 0xff]);
        assert_eq!(palette_rgb(0x1c), palette_rgb(12));
    }
}
