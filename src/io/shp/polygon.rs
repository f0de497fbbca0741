//! Polygon ring classification and hole assignment.
//!
//! Shapefile polygons store a flat list of rings. Clockwise rings are
//! exteriors and counter-clockwise rings are holes. Each hole is attached
//! to the first exterior (in file order) that contains any of its points;
//! a hole that no exterior contains is kept as a standalone polygon.

use crate::types::Vector2;

/// Ring orientation derived from the signed area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// One exterior ring and the holes cut out of it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonWithHoles {
    pub exterior: Vec<Vector2>,
    pub holes: Vec<Vec<Vector2>>,
}

/// Shoelace signed area; negative for clockwise rings.
pub fn signed_area(ring: &[Vector2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        sum += a.cross(&b);
    }
    sum / 2.0
}

/// Orientation of a ring. Degenerate rings count as counter-clockwise.
pub fn winding(ring: &[Vector2]) -> Winding {
    if signed_area(ring) < 0.0 {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

/// Even-odd ray cast. Points exactly on an edge may land either way.
pub fn ring_contains(ring: &[Vector2], point: Vector2) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Group rings into polygons with holes.
///
/// Output order: every exterior in file order, then unmatched holes in
/// file order.
pub fn assemble_polygons(rings: Vec<Vec<Vector2>>) -> Vec<PolygonWithHoles> {
    let (exteriors, holes): (Vec<_>, Vec<_>) = rings
        .into_iter()
        .partition(|ring| winding(ring) == Winding::Clockwise);

    let mut polygons: Vec<PolygonWithHoles> = exteriors
        .into_iter()
        .map(|exterior| PolygonWithHoles {
            exterior,
            holes: Vec::new(),
        })
        .collect();
    let exterior_count = polygons.len();

    let mut orphans = Vec::new();
    for hole in holes {
        let owner = polygons[..exterior_count].iter().position(|polygon| {
            hole.iter()
                .any(|&point| ring_contains(&polygon.exterior, point))
        });
        match owner {
            Some(index) => polygons[index].holes.push(hole),
            None => orphans.push(PolygonWithHoles {
                exterior: hole,
                holes: Vec::new(),
            }),
        }
    }

    polygons.extend(orphans);
    polygons
}
