use crate::{
    core::{Point, Rgba8, Viewport},
    error::{WeaveError, WeaveResult},
    stage::Surface,
};

/// One drifting particle. `x`, `radius`, and `speed` are fixed at
/// construction; only `y` changes.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
}

/// Fixed-size pool of upward-drifting particles.
///
/// Bounds are read once; the field ignores resize and runs every frame for
/// the page lifetime, independent of scroll and pointer state.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Viewport,
    color: Rgba8,
}

impl ParticleField {
    pub fn new(count: usize, bounds: Viewport, color: Rgba8, seed: u64) -> WeaveResult<Self> {
        if count == 0 {
            return Err(WeaveError::validation("particle count must be > 0"));
        }
        let mut rng = SplitMix64::new(seed);
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.next_f64() * bounds.width,
                y: rng.next_f64() * bounds.height,
                radius: rng.next_f64() * 2.0,
                speed: rng.next_f64() * 0.5 + 0.1,
            })
            .collect();
        Ok(Self {
            particles,
            bounds,
            color,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Step every particle one frame: drift up, wrap at the top edge back to
    /// the bottom edge. Wrap, not bounce: the drift reads as continuous.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.y -= p.speed;
            if p.y < 0.0 {
                p.y = self.bounds.height;
            }
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        for p in &self.particles {
            surface.fill_circle(Point::new(p.x, p.y), p.radius, self.color);
        }
    }
}

/// SplitMix64 stream; deterministic across runs for a given seed.
#[derive(Clone, Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Viewport {
        Viewport::new(200.0, 100.0).unwrap()
    }

    fn gold() -> Rgba8 {
        Rgba8::opaque(0xD4, 0xAF, 0x37)
    }

    #[test]
    fn advance_moves_up_and_wraps() {
        let mut field = ParticleField::new(3, bounds(), gold(), 7).unwrap();
        // Force a particle close to the top edge.
        field.particles[0].y = 5.0;
        field.particles[0].speed = 10.0;
        let before: Vec<_> = field.particles().to_vec();

        field.advance();

        assert_eq!(field.particles()[0].y, 100.0); // wrapped to the bottom edge
        for (a, b) in before.iter().zip(field.particles()) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.speed, b.speed);
            if a.y - a.speed >= 0.0 {
                assert_eq!(b.y, a.y - a.speed);
            }
        }
    }

    #[test]
    fn init_is_within_bounds_and_deterministic() {
        let a = ParticleField::new(50, bounds(), gold(), 42).unwrap();
        let b = ParticleField::new(50, bounds(), gold(), 42).unwrap();
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, pb.y);
        }
        for p in a.particles() {
            assert!(p.x >= 0.0 && p.x < 200.0);
            assert!(p.y >= 0.0 && p.y < 100.0);
            assert!(p.radius < 2.0);
            assert!(p.speed >= 0.1 && p.speed < 0.6);
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(ParticleField::new(0, bounds(), gold(), 0).is_err());
    }

    #[test]
    fn render_draws_one_circle_per_particle() {
        struct Recorder {
            cleared: usize,
            circles: Vec<(Point, f64, Rgba8)>,
        }
        impl Surface for Recorder {
            fn clear(&mut self) {
                self.cleared += 1;
            }
            fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
                self.circles.push((center, radius, color));
            }
        }

        let field = ParticleField::new(5, bounds(), gold(), 1).unwrap();
        let mut rec = Recorder {
            cleared: 0,
            circles: Vec::new(),
        };
        field.render(&mut rec);
        assert_eq!(rec.cleared, 1);
        assert_eq!(rec.circles.len(), 5);
        assert!(rec.circles.iter().all(|(_, _, c)| *c == gold()));
    }
}
