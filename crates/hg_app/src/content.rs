//! What the app draws each frame: a logo, a color sample, the palette and
//! backbuffer statistics, all in the debug text grid.

use hg_core::debug_text::{attr, DebugText};
use hg_core::view::{Extent, FrameStats};
use hg_core::FrameClock;

use crate::logo::{build_logo, LOGO_HEIGHT, LOGO_PITCH, LOGO_WIDTH};

const TEXT_ATTR: u8 = attr(15, 0);

const COLOR_SAMPLE: &str = "Color can be changed with ANSI \
    \x1b[9;me\x1b[10;ms\x1b[11;mc\x1b[12;ma\x1b[13;mp\x1b[14;me\x1b[0m code too.";

const PALETTE_LOW: &str = "\x1b[;0m    \x1b[;1m    \x1b[; 2m    \x1b[; 3m    \
    \x1b[; 4m    \x1b[; 5m    \x1b[; 6m    \x1b[; 7m    \x1b[0m";

const PALETTE_HIGH: &str = "\x1b[;8m    \x1b[;9m    \x1b[;10m    \x1b[;11m    \
    \x1b[;12m    \x1b[;13m    \x1b[;14m    \x1b[;15m    \x1b[0m";

pub struct DemoContent {
    logo: Vec<u8>,
    pub clock: FrameClock,
}

impl DemoContent {
    pub fn new() -> Self {
        Self {
            logo: build_logo(),
            clock: FrameClock::new(),
        }
    }

    pub fn write_debug_text(&self, text: &mut DebugText, stats: &FrameStats) {
        text.clear();

        let (x, y) = logo_origin(Extent::new(stats.width, stats.height));
        text.image(x, y, LOGO_WIDTH, LOGO_HEIGHT, &self.logo, LOGO_PITCH);

        text.print(0, 1, TEXT_ATTR, COLOR_SAMPLE);
        text.print(80, 1, TEXT_ATTR, PALETTE_LOW);
        text.print(80, 2, TEXT_ATTR, PALETTE_HIGH);
        text.print(
            0,
            2,
            TEXT_ATTR,
            &format!(
                "Backbuffer {}W x {}H in pixels, debug text {}W x {}H in characters.",
                stats.width, stats.height, stats.text_width, stats.text_height
            ),
        );
    }
}

impl Default for DemoContent {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-left cell that centers the logo, pinned to the grid origin on small
/// windows.
pub fn logo_origin(size: Extent) -> (u16, u16) {
    let half_cols = (size.width / 2 / 8).min(u32::from(u16::MAX)) as u16;
    let half_rows = (size.height / 2 / 16).min(u32::from(u16::MAX)) as u16;
    (half_cols.max(20) - 20, half_rows.max(6) - 6)
}
