//! Placeholder logo blitted into the debug text grid.

use hg_core::debug_text::attr;

pub const LOGO_WIDTH: u16 = 40;
pub const LOGO_HEIGHT: u16 = 12;
/// Bytes per logo row: one `(char, attr)` pair per cell.
pub const LOGO_PITCH: usize = LOGO_WIDTH as usize * 2;

const LOGO_ROWS: [&str; LOGO_HEIGHT as usize] = [
    "########################################",
    "#                                      #",
    "#   #  #  ####  #     #      ###       #",
    "#   #  #  #     #     #     #   #      #",
    "#   ####  ###   #     #     #   #      #",
    "#   #  #  #     #     #     #   #      #",
    "#   #  #  ####  ####  ####   ###       #",
    "#                                      #",
    "#     g p u  :  winit + wgpu + egui    #",
    "#                                      #",
    "#                                      #",
    "########################################",
];

const BORDER: u8 = attr(9, 0);
const LETTERS: u8 = attr(14, 0);
const CAPTION: u8 = attr(11, 0);

/// `(char, attr)` pairs, `LOGO_PITCH` bytes per row.
pub fn build_logo() -> Vec<u8> {
    let mut data = Vec::with_capacity(LOGO_PITCH * usize::from(LOGO_HEIGHT));
    for (y, row) in LOGO_ROWS.iter().enumerate() {
        let bytes = row.as_bytes();
        for x in 0..usize::from(LOGO_WIDTH) {
            let ch = bytes.get(x).copied().unwrap_or(b' ');
            let edge = y == 0
                || y + 1 == usize::from(LOGO_HEIGHT)
                || x == 0
                || x + 1 == usize::from(LOGO_WIDTH);
            let cell_attr = match ch {
                b'#' if edge => BORDER,
                b'#' => LETTERS,
                _ => CAPTION,
            };
            data.push(ch);
            data.push(cell_attr);
        }
    }
    data
}
