//! Color representation for decoded points

use std::fmt;

/// Normalized RGB color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl PointColor {
    /// Create a color from normalized channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        PointColor { r, g, b }
    }

    /// Create a color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        PointColor::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a color from 16-bit channels, as stored in point records
    pub fn from_rgb16(r: u16, g: u16, b: u16) -> Self {
        PointColor::new(
            r as f32 / u16::MAX as f32,
            g as f32 / u16::MAX as f32,
            b as f32 / u16::MAX as f32,
        )
    }

    /// Gray level with all three channels equal
    pub const fn gray(level: f32) -> Self {
        PointColor::new(level, level, level)
    }

    pub const BLACK: PointColor = PointColor::gray(0.0);
    pub const WHITE: PointColor = PointColor::gray(1.0);

    /// Convert back to 8-bit channels (rounded)
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

impl fmt::Display for PointColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb8();
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb16() {
        let c = PointColor::from_rgb16(u16::MAX, 0, u16::MAX);
        assert_eq!(c, PointColor::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_rgb8_round_trip() {
        let c = PointColor::from_rgb8(255, 128, 0);
        assert_eq!(c.to_rgb8(), (255, 128, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(PointColor::WHITE.to_string(), "#FFFFFF");
        assert_eq!(PointColor::BLACK.to_string(), "#000000");
    }
}
