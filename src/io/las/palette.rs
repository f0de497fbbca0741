//! Fixed class palette used when a point carries no RGB.

use crate::types::PointColor;

/// Palette color for an ASPRS class code, if the class has one.
pub fn class_color(class: u8) -> Option<PointColor> {
    let (r, g, b) = match class {
        // ground
        2 => (161, 122, 80),
        // low, medium and high vegetation
        3 => (150, 200, 110),
        4 => (80, 165, 60),
        5 => (30, 110, 40),
        // building
        6 => (220, 90, 70),
        // low point (noise)
        7 => (255, 0, 255),
        // water
        9 => (60, 120, 220),
        // rail
        10 => (120, 100, 90),
        // road surface
        11 => (90, 90, 90),
        // wire guard, wire conductor
        13 => (250, 230, 90),
        14 => (255, 200, 0),
        // transmission tower
        15 => (200, 130, 40),
        // wire connector
        16 => (240, 160, 120),
        // bridge deck
        17 => (170, 170, 200),
        // high noise
        18 => (255, 60, 160),
        _ => return None,
    };
    Some(PointColor::from_rgb8(r, g, b))
}
