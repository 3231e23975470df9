//! Colour palette of the CV design.

/// An sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Builds a colour from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        )
    }
}

/// Dark slate of the sidebar and banners.
pub const SIDEBAR: Rgb = Rgb::hex(0x1e293b);
/// Off-white used for sidebar text.
pub const SIDEBAR_TEXT: Rgb = Rgb::hex(0xf8fafc);
/// Muted label colour inside the sidebar.
pub const SIDEBAR_LABEL: Rgb = Rgb::hex(0x94a3b8);
/// Light cyan accent for rings, underlines and bullets.
pub const ACCENT: Rgb = Rgb::hex(0x38bdf8);
/// Section titles and caption headings.
pub const TITLE: Rgb = Rgb::hex(0x0f172a);
/// Body text.
pub const TEXT: Rgb = Rgb::hex(0x475569);
/// Thin dividers and timeline connectors.
pub const LINE: Rgb = Rgb::hex(0xe2e8f0);
/// Gallery card background.
pub const CARD_FILL: Rgb = Rgb::hex(0xf1f5f9);
/// Gallery card border.
pub const CARD_BORDER: Rgb = Rgb::hex(0xcbd5e1);
pub const WHITE: Rgb = Rgb(255, 255, 255);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        assert_eq!(ACCENT, Rgb(0x38, 0xbd, 0xf8));
        assert_eq!(WHITE.unit(), (1.0, 1.0, 1.0));
    }
}
