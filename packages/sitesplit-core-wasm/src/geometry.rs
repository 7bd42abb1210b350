use geo::{Area, BooleanOps};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};

use crate::models::{Point, Ring};

// Axis-aligned bounds of a ring, used to skip boolean ops on disjoint shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of_ring(ring: &[Point]) -> Self {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for point in ring {
            min_x = min_x.min(point[0]);
            min_y = min_y.min(point[1]);
            max_x = max_x.max(point[0]);
            max_y = max_y.max(point[1]);
        }

        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Touching boxes count as intersecting.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.max_x < self.min_x
            || other.min_x > self.max_x
            || other.max_y < self.min_y
            || other.min_y > self.max_y)
    }
}

/// A ring prepared for boolean operations.
#[derive(Debug, Clone)]
pub struct Shape {
    pub region: MultiPolygon<f64>,
    pub bounds: Bounds,
}

impl Shape {
    pub fn from_ring(ring: &[Point]) -> Self {
        Shape {
            region: MultiPolygon(vec![ring_to_polygon(ring)]),
            bounds: Bounds::of_ring(ring),
        }
    }

    pub fn area(&self) -> f64 {
        self.region.unsigned_area()
    }

    /// Intersection with another shape; empty when the bounds are disjoint.
    pub fn intersection(&self, other: &Shape) -> MultiPolygon<f64> {
        if !self.bounds.intersects(&other.bounds) {
            return MultiPolygon(vec![]);
        }
        self.region.intersection(&other.region)
    }

    pub fn intersection_area(&self, other: &Shape) -> f64 {
        self.intersection(other).unsigned_area()
    }
}

// geo closes the ring itself if the last point doesn't repeat the first
pub fn ring_to_polygon(ring: &[Point]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|p| Coord { x: p[0], y: p[1] }).collect();
    Polygon::new(LineString::new(coords), vec![])
}

pub fn linestring_to_ring(ls: &LineString<f64>) -> Ring {
    ls.coords().map(|c| [c.x, c.y]).collect()
}

/// One closed ring per part with non-zero area. Interiors are not emitted:
/// intersecting two hole-free polygons never produces holes.
pub fn multipolygon_to_rings(multi: &MultiPolygon<f64>) -> Vec<Ring> {
    multi
        .0
        .iter()
        .filter(|polygon| polygon.unsigned_area() > 0.0)
        .map(|polygon| linestring_to_ring(polygon.exterior()))
        .collect()
}

/// Union of all shapes as one region.
pub fn union_all<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> MultiPolygon<f64> {
    shapes
        .into_iter()
        .fold(MultiPolygon(vec![]), |acc, shape| acc.union(&shape.region))
}

/// Total area of `rings`, each taken as a separate hole-free polygon.
pub fn rings_area(rings: &[Ring]) -> f64 {
    rings
        .iter()
        .map(|ring| ring_to_polygon(ring).unsigned_area())
        .sum()
}

/// Round `value` to `digits` decimal places. Values are returned unchanged
/// once `10^digits` is no longer representable.
pub fn round_to_tolerance(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(i32::MAX as u32) as i32);
    if !factor.is_finite() {
        return value;
    }
    (value * factor).round() / factor
}

/// True when `area` is still positive after rounding to `digits` places.
pub fn has_area(area: f64, digits: u32) -> bool {
    round_to_tolerance(area, digits) > 0.0
}
