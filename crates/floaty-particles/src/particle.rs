//! A single wandering particle.

use floaty_core::{
    Point, Tuning,
    math::{angle, distance, random_in, speed},
};
use rand::Rng;

use crate::color::Rgba;
use crate::surface::{CompositeOp, Surface};

/// A point that steers toward a random destination and picks a new one on arrival.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Current position.
    pub pos: Point,
    /// Current velocity, in pixels per nominal frame.
    pub vel: Point,
    /// Point the particle is steering toward.
    pub dest: Point,
    width: f64,
    height: f64,
    size: f64,
}

impl Particle {
    /// Create a particle with a random position, destination and velocity within the bounds.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64, tuning: &Tuning) -> Self {
        let v = tuning.initial_velocity;
        Self {
            pos: Point::random_within(rng, width, height),
            dest: Point::random_within(rng, width, height),
            vel: Point::new(random_in(rng, -v, v), random_in(rng, -v, v)),
            width,
            height,
            size: tuning.particle_size,
        }
    }

    /// Create a particle at a known state, mostly useful for tests.
    pub fn with_state(
        pos: Point,
        vel: Point,
        dest: Point,
        width: f64,
        height: f64,
        size: f64,
    ) -> Self {
        Self {
            pos,
            vel,
            dest,
            width,
            height,
            size,
        }
    }

    /// Bounds the particle samples destinations from.
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Advance one simulation step and return the new position.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R, tuning: &Tuning) -> Point {
        let heading = angle(self.dest, self.pos);
        let dist = distance(self.dest, self.pos);
        let current_speed = speed(self.vel);

        if dist < tuning.proximity {
            self.dest = Point::random_within(rng, self.width, self.height);
        }

        self.vel.x += heading.cos() * tuning.acceleration;
        self.vel.y += heading.sin() * tuning.acceleration;

        if current_speed > tuning.max_speed {
            self.vel.x *= tuning.deceleration;
            self.vel.y *= tuning.deceleration;
            let damped = speed(self.vel);
            if damped > tuning.max_speed {
                let scale = tuning.max_speed / damped;
                self.vel.x *= scale;
                self.vel.y *= scale;
            }
        }

        self.pos.x += self.vel.x * dt;
        self.pos.y += self.vel.y * dt;
        self.pos
    }

    /// Draw the particle as an additive square.
    pub fn render(&self, surface: &mut Surface, color: Rgba) {
        surface.fill_rect(
            self.pos.x,
            self.pos.y,
            self.size,
            self.size,
            color,
            CompositeOp::Lighter,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_new_particle_within_bounds() {
        let mut rng = rng();
        let tuning = Tuning::default();
        for _ in 0..200 {
            let p = Particle::new(&mut rng, 160.0, 90.0, &tuning);
            assert!((0.0..160.0).contains(&p.pos.x) && (0.0..90.0).contains(&p.pos.y));
            assert!((0.0..160.0).contains(&p.dest.x) && (0.0..90.0).contains(&p.dest.y));
            assert!((-0.4..0.4).contains(&p.vel.x) && (-0.4..0.4).contains(&p.vel.y));
            assert_eq!(p.bounds(), (160.0, 90.0));
        }
    }

    #[test]
    fn test_advance_integrates_updated_velocity() {
        let mut rng = rng();
        let tuning = Tuning::default();
        for dt in [0.001, 0.5, 0.96, 1.0, 10.0] {
            let mut p = Particle::new(&mut rng, 160.0, 90.0, &tuning);
            let before = p.pos;
            let after = p.advance(dt, &mut rng, &tuning);
            assert_eq!(after, p.pos);
            assert_eq!(after.x, before.x + p.vel.x * dt);
            assert_eq!(after.y, before.y + p.vel.y * dt);
        }
    }

    #[test]
    fn test_steers_toward_destination() {
        let mut rng = rng();
        let tuning = Tuning::default();
        let mut p = Particle::with_state(
            Point::new(10.0, 10.0),
            Point::default(),
            Point::new(110.0, 10.0),
            160.0,
            90.0,
            3.0,
        );
        p.advance(1.0, &mut rng, &tuning);
        assert!((p.vel.x - 0.1).abs() < 1e-12);
        assert!(p.vel.y.abs() < 1e-12);
        assert_eq!(p.dest, Point::new(110.0, 10.0));
    }

    #[test]
    fn test_close_destination_is_resampled_in_bounds() {
        let mut rng = rng();
        let tuning = Tuning::default();
        for _ in 0..500 {
            let pos = Point::new(50.0, 40.0);
            let mut p = Particle::with_state(
                pos,
                Point::default(),
                Point::new(60.0, 45.0),
                160.0,
                90.0,
                3.0,
            );
            p.advance(1.0, &mut rng, &tuning);
            assert!((0.0..160.0).contains(&p.dest.x));
            assert!((0.0..90.0).contains(&p.dest.y));
        }
    }

    #[test]
    fn test_damping_bounds_speed() {
        let mut rng = rng();
        let tuning = Tuning::default();
        for magnitude in [1.01, 1.5, 3.0, 50.0, 1e6] {
            for (sx, sy) in [(1.0, 1.0), (-1.0, 0.2), (0.0, -1.0)] {
                let mut p = Particle::with_state(
                    Point::new(80.0, 45.0),
                    Point::new(sx * magnitude, sy * magnitude),
                    Point::new(0.0, 0.0),
                    160.0,
                    90.0,
                    3.0,
                );
                if speed(p.vel) <= tuning.max_speed {
                    continue;
                }
                p.advance(1.0, &mut rng, &tuning);
                assert!(speed(p.vel) <= tuning.max_speed + 1e-9, "speed {}", speed(p.vel));
            }
        }
    }

    #[test]
    fn test_slow_particle_is_not_damped() {
        let mut rng = rng();
        let tuning = Tuning::default();
        let mut p = Particle::with_state(
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(100.0, 0.0),
            160.0,
            90.0,
            3.0,
        );
        p.advance(1.0, &mut rng, &tuning);
        assert!((p.vel.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_render_draws_square() {
        let mut surface = Surface::new(10, 10);
        let p = Particle::with_state(
            Point::new(2.0, 2.0),
            Point::default(),
            Point::default(),
            10.0,
            10.0,
            3.0,
        );
        p.render(&mut surface, Rgba::WHITE);
        assert_eq!(surface.pixel(2, 2), Some([1.0; 4]));
        assert_eq!(surface.pixel(4, 4), Some([1.0; 4]));
        assert_eq!(surface.pixel(5, 4), Some([0.0; 4]));
    }
}
