//! Vector math helpers for particle kinematics.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A point (or vector) on the drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Sample a point uniformly within `[0, width) x [0, height)`.
    pub fn random_within<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: random_in(rng, 0.0, width),
            y: random_in(rng, 0.0, height),
        }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A circle described by its center and radius.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Arc {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Uniform random value in `[min, max)`. Returns `min` for an empty range.
pub fn random_in<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.random::<f64>() * (max - min) + min
}

/// Uniform random integer in `[min, max]`.
pub fn random_int_in<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    (rng.random::<f64>() * (max - min + 1) as f64).trunc() as i64 + min
}

/// Normalize `val` between `min` and `max`.
///
/// `norm(75.0, 0.0, 100.0) == 0.75`
pub fn norm(val: f64, min: f64, max: f64) -> f64 {
    (val - min) / (max - min)
}

/// Map a normalized value onto the range between `min` and `max`.
///
/// `lerp(0.5, 0.0, 100.0) == 50.0`
pub fn lerp(norm: f64, min: f64, max: f64) -> f64 {
    min + (max - min) * norm
}

/// Limit `val` to the range spanned by `min` and `max`, in either order.
///
/// `clamp(5000.0, 0.0, 100.0) == 100.0`
pub fn clamp(val: f64, min: f64, max: f64) -> f64 {
    val.max(min.min(max)).min(min.max(max))
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// Speed of a velocity, taken as the mean of the absolute components.
pub fn speed(vel: Point) -> f64 {
    (vel.x.abs() + vel.y.abs()) / 2.0
}

pub fn to_deg(a: f64) -> f64 {
    a.to_degrees()
}

pub fn to_rad(a: f64) -> f64 {
    a.to_radians()
}

/// Angle from `p2` to `p1`, in radians.
pub fn angle(p1: Point, p2: Point) -> f64 {
    (p1.y - p2.y).atan2(p1.x - p2.x)
}

/// Inclusive range check.
pub fn within_range(val: f64, min: f64, max: f64) -> bool {
    val >= min && val <= max
}

pub fn within_rect(p: Point, rect: Rect) -> bool {
    within_range(p.x, rect.x, rect.x + rect.width)
        && within_range(p.y, rect.y, rect.y + rect.height)
}

pub fn within_arc(p: Point, arc: Arc) -> bool {
    distance(p, Point::new(arc.x, arc.y)) <= arc.radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_norm_and_lerp() {
        assert!((norm(75.0, 0.0, 100.0) - 0.75).abs() < EPS);
        assert!((lerp(0.5, 0.0, 100.0) - 50.0).abs() < EPS);
        assert!((lerp(norm(30.0, 10.0, 50.0), 10.0, 50.0) - 30.0).abs() < EPS);
    }

    #[test]
    fn test_clamp_accepts_reversed_bounds() {
        assert_eq!(clamp(5000.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(5000.0, 100.0, 0.0), 100.0);
        assert_eq!(clamp(42.0, 100.0, 0.0), 42.0);
    }

    #[test]
    fn test_angle_points_from_second_to_first() {
        let a = angle(Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        assert!((to_deg(a) - 45.0).abs() < EPS);
        let b = angle(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((to_deg(b) - 180.0).abs() < EPS);
        assert!((to_rad(180.0) - std::f64::consts::PI).abs() < EPS);
    }

    #[test]
    fn test_distance_and_speed() {
        assert!((distance(Point::new(3.0, 4.0), Point::default()) - 5.0).abs() < EPS);
        assert!((speed(Point::new(-0.4, 0.2)) - 0.3).abs() < EPS);
    }

    #[test]
    fn test_within_helpers() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 5.0,
        };
        assert!(within_rect(Point::new(10.0, 15.0), rect));
        assert!(!within_rect(Point::new(31.0, 12.0), rect));

        let arc = Arc {
            x: 0.0,
            y: 0.0,
            radius: 5.0,
        };
        assert!(within_arc(Point::new(3.0, 4.0), arc));
        assert!(!within_arc(Point::new(4.0, 4.0), arc));
    }

    #[test]
    fn test_random_in_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_in(&mut rng, -0.4, 0.4);
            assert!((-0.4..0.4).contains(&v));
            let i = random_int_in(&mut rng, 1, 6);
            assert!((1..=6).contains(&i));
        }
        assert_eq!(random_in(&mut rng, 0.0, 0.0), 0.0);
    }
}
