//! Named 16-bit 565 colors.
//!
//! The panel itself runs in 18-bit mode; these are convenience values for
//! callers that think in 565 and are expanded to 8-bit channels before they
//! reach the frame buffer.

use image::Rgb;

/// A packed RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color565(pub u16);

impl Color565 {
    pub const BLACK: Color565 = Color565(0x0000);
    pub const BLUE: Color565 = Color565(0x001F);
    pub const RED: Color565 = Color565(0xF800);
    pub const GREEN: Color565 = Color565(0x07E0);
    pub const CYAN: Color565 = Color565(0x07FF);
    pub const MAGENTA: Color565 = Color565(0xF81F);
    pub const YELLOW: Color565 = Color565(0xFFE0);
    pub const WHITE: Color565 = Color565(0xFFFF);

    /// Stripe order used by the test pattern
    pub const PALETTE: [Color565; 8] = [
        Color565::BLACK,
        Color565::WHITE,
        Color565::RED,
        Color565::GREEN,
        Color565::BLUE,
        Color565::CYAN,
        Color565::MAGENTA,
        Color565::YELLOW,
    ];

    /// Pack 8-bit channels, keeping the top 5/6/5 bits
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color565(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Expand back to 8-bit channels, replicating the high bits into the low ones
    pub const fn to_rgb(self) -> Rgb<u8> {
        let r5 = ((self.0 >> 11) & 0x1F) as u8;
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        let b5 = (self.0 & 0x1F) as u8;
        Rgb([
            (r5 << 3) | (r5 >> 2),
            (g6 << 2) | (g6 >> 4),
            (b5 << 3) | (b5 >> 2),
        ])
    }
}

impl From<Color565> for Rgb<u8> {
    fn from(color: Color565) -> Self {
        color.to_rgb()
    }
}

impl From<Color565> for u16 {
    fn from(color: Color565) -> Self {
        color.0
    }
}
