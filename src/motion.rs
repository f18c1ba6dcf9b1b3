use std::f64::consts::TAU;

use rand::Rng;

use crate::emotion::{
    CustomRhythm, EmotionDescriptor, MotionPath, RhythmPattern, Shape, ShapeKind, MIN_SIDES,
};
use crate::particles::Particle;

/// Base clock advance per tick, before motion/rhythm scaling
pub const BASE_STEP: f64 = 0.015;

const ORBIT_RADIUS: f64 = 30.0;
const WAVE_AMP_X: f64 = 15.0;
const WAVE_AMP_Y: f64 = 10.0;
const SHARD_JITTER: f64 = 2.0;
const SPIRAL_MAX_RADIUS: f64 = 60.0;
const BURST_MAX_DIST: f64 = 50.0;
const CUSTOM_BASE_RADIUS: f64 = 30.0;
const CUSTOM_RADIUS_SWING: f64 = 10.0;
const ZIGZAG_AMP: f64 = 30.0;
const ORBIT_PATH_BASE: f64 = 40.0;
const ORBIT_PATH_STEP: f64 = 15.0;
const BOUNCE_GRAVITY: f64 = 0.2;
const BOUNCE_DAMPING: f64 = 0.8;
const WALK_SCALE: f64 = 0.5;

/// Render surface dimensions, supplied by whoever owns the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const PREVIEW: Bounds = Bounds {
        width: 342.0,
        height: 140.0,
    };
    pub const MESSAGE: Bounds = Bounds {
        width: 200.0,
        height: 200.0,
    };

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Kinematics for one particle system, resolved once per tick.
///
/// A custom motion path wins over the shape unconditionally; a custom shape
/// applies only while the override is enabled, otherwise particles hold
/// their base position (`Hold` is that exact fallback, not a default shape).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionKind {
    Circle,
    Wave,
    Shard { motion: f64 },
    Spiral,
    Burst,
    Polygon { sides: u32 },
    Star { sides: u32 },
    Flower { sides: u32 },
    Chaos { sides: u32 },
    Hold,
    Bounce,
    Zigzag { motion: f64 },
    Orbit,
    RandomWalk { motion: f64 },
}

impl MotionKind {
    pub fn resolve(emotion: &EmotionDescriptor) -> MotionKind {
        if emotion.custom_motion.enabled {
            return match emotion.custom_motion.path {
                MotionPath::Bounce => MotionKind::Bounce,
                MotionPath::Zigzag => MotionKind::Zigzag {
                    motion: emotion.motion,
                },
                MotionPath::Orbit => MotionKind::Orbit,
                MotionPath::Random => MotionKind::RandomWalk {
                    motion: emotion.motion,
                },
            };
        }

        match emotion.shape {
            Shape::Circle => MotionKind::Circle,
            Shape::Wave => MotionKind::Wave,
            Shape::Shard => MotionKind::Shard {
                motion: emotion.motion,
            },
            Shape::Spiral => MotionKind::Spiral,
            Shape::Burst => MotionKind::Burst,
            Shape::Custom => {
                if emotion.custom_shape.enabled {
                    let sides = emotion.custom_shape.sides.max(MIN_SIDES);
                    match emotion.custom_shape.kind {
                        ShapeKind::Polygon => MotionKind::Polygon { sides },
                        ShapeKind::Star => MotionKind::Star { sides },
                        ShapeKind::Flower => MotionKind::Flower { sides },
                        ShapeKind::Chaos => MotionKind::Chaos { sides },
                    }
                } else {
                    MotionKind::Hold
                }
            }
        }
    }

    /// Draw position for one particle at the given clock time.
    ///
    /// Bounce, RandomWalk and Shard are integrator steps: they update the
    /// particle's stored velocity/position as a side effect. Everything else
    /// is pure in the particle state.
    pub fn position<R: Rng>(
        &self,
        time: f64,
        index: usize,
        particle: &mut Particle,
        bounds: Bounds,
        rng: &mut R,
    ) -> (f64, f64) {
        let (cx, cy) = bounds.center();
        let off = particle.offset;

        match *self {
            MotionKind::Circle => (
                cx + (time + off).cos() * ORBIT_RADIUS,
                cy + (time + off).sin() * ORBIT_RADIUS,
            ),
            MotionKind::Wave => (
                particle.x + (time + off).sin() * WAVE_AMP_X,
                particle.y + (time * 0.5 + off).cos() * WAVE_AMP_Y,
            ),
            MotionKind::Shard { motion } => {
                // Jitter accumulates into the stored position: unbounded
                // drift, no recentering
                particle.x += rng.gen_range(-SHARD_JITTER..SHARD_JITTER) * motion;
                particle.y += rng.gen_range(-SHARD_JITTER..SHARD_JITTER) * motion;
                (particle.x, particle.y)
            }
            MotionKind::Spiral => {
                let radius = (time + off * 10.0) % SPIRAL_MAX_RADIUS;
                (
                    cx + (time * 2.0 + off).cos() * radius,
                    cy + (time * 2.0 + off).sin() * radius,
                )
            }
            MotionKind::Burst => {
                // Angle fixed per particle: radial streaks
                let dist = (time * 2.0 + off * 5.0) % BURST_MAX_DIST;
                (
                    cx + (off * 10.0).cos() * dist,
                    cy + (off * 10.0).sin() * dist,
                )
            }
            MotionKind::Polygon { sides } => {
                let (angle, radius) = vertex(sides, index, time, off);
                (
                    cx + (angle + time).cos() * radius,
                    cy + (angle + time).sin() * radius,
                )
            }
            MotionKind::Star { sides } => {
                let (angle, radius) = vertex(sides, index, time, off);
                let radius = if index % 2 == 0 { radius } else { radius * 0.5 };
                (
                    cx + (angle + time).cos() * radius,
                    cy + (angle + time).sin() * radius,
                )
            }
            MotionKind::Flower { sides } => {
                let (angle, radius) = vertex(sides, index, time, off);
                let petal = radius * (1.0 + (angle * sides as f64 + time * 2.0).sin());
                (
                    cx + (angle + time * 0.5).cos() * petal,
                    cy + (angle + time * 0.5).sin() * petal,
                )
            }
            MotionKind::Chaos { sides } => {
                let (angle, radius) = vertex(sides, index, time, off);
                (
                    cx + (angle * time.sin() + time).cos() * radius * rng.gen_range(0.5..1.5),
                    cy + (angle * time.cos() + time).sin() * radius * rng.gen_range(0.5..1.5),
                )
            }
            MotionKind::Hold => (particle.x, particle.y),
            MotionKind::Bounce => {
                particle.vy += BOUNCE_GRAVITY;
                let y = particle.y + particle.vy;
                if y > bounds.height || y < 0.0 {
                    particle.vy *= -BOUNCE_DAMPING;
                }
                (particle.x, y)
            }
            MotionKind::Zigzag { motion } => (
                particle.x + (time + off).sin() * ZIGZAG_AMP,
                (time * motion + off * 20.0) % bounds.height,
            ),
            MotionKind::Orbit => {
                let radius = ORBIT_PATH_BASE + (index % 3) as f64 * ORBIT_PATH_STEP;
                let dir = if index % 2 == 1 { 1.0 } else { -1.0 };
                (
                    cx + (time * dir + off).cos() * radius,
                    cy + (time * dir + off).sin() * radius,
                )
            }
            MotionKind::RandomWalk { motion } => {
                particle.x += particle.vx * motion * WALK_SCALE;
                particle.y += particle.vy * motion * WALK_SCALE;
                if particle.x < 0.0 || particle.x > bounds.width {
                    particle.vx = -particle.vx;
                }
                if particle.y < 0.0 || particle.y > bounds.height {
                    particle.vy = -particle.vy;
                }
                (particle.x, particle.y)
            }
        }
    }
}

// Base angle and breathing radius shared by the custom shapes
fn vertex(sides: u32, index: usize, time: f64, offset: f64) -> (f64, f64) {
    let angle = (TAU / sides as f64) * (index % sides as usize) as f64;
    let radius = CUSTOM_BASE_RADIUS + (time + offset).sin() * CUSTOM_RADIUS_SWING;
    (angle, radius)
}

/// Time-advance multiplier for the current tick: 1 unless a custom rhythm
/// pattern is enabled, plus up to +/-(variation/100)/2 of random jitter.
pub fn rhythm_multiplier<R: Rng>(custom: &CustomRhythm, time: f64, rng: &mut R) -> f64 {
    if !custom.enabled {
        return 1.0;
    }

    let mut multiplier = match custom.pattern {
        RhythmPattern::Accelerate => 1.0 + time * 0.01,
        RhythmPattern::Decelerate => (2.0 - time * 0.01).max(0.5),
        RhythmPattern::Heartbeat => {
            if (time * 2.0).sin().abs() > 0.5 {
                2.0
            } else {
                0.5
            }
        }
        RhythmPattern::Morse => {
            if ((time * 2.0).floor() as i64) % 2 == 0 {
                2.0
            } else {
                0.5
            }
        }
    };

    if custom.variation > 0 {
        multiplier += (rng.gen::<f64>() - 0.5) * (custom.variation as f64 / 100.0);
    }

    multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle(offset: f64) -> Particle {
        Particle {
            x: 10.0,
            y: 20.0,
            offset,
            vx: 0.5,
            vy: -0.5,
        }
    }

    #[test]
    fn test_resolve_custom_motion_wins_over_shape() {
        let mut e = EmotionDescriptor::simple(0.0, Shape::Spiral, 4.0, 1.0);
        e.custom_motion.enabled = true;
        e.custom_motion.path = MotionPath::Orbit;
        assert_eq!(MotionKind::resolve(&e), MotionKind::Orbit);
    }

    #[test]
    fn test_resolve_custom_shape_disabled_holds() {
        let e = EmotionDescriptor::simple(0.0, Shape::Custom, 4.0, 1.0);
        assert!(!e.custom_shape.enabled);
        assert_eq!(MotionKind::resolve(&e), MotionKind::Hold);

        let mut rng = StdRng::seed_from_u64(7);
        let mut p = particle(1.0);
        let pos = MotionKind::Hold.position(3.0, 0, &mut p, Bounds::PREVIEW, &mut rng);
        assert_eq!(pos, (10.0, 20.0));
    }

    #[test]
    fn test_circle_is_frozen_at_fixed_time() {
        // With motion = 0 the clock never advances, so the orbit must
        // return the identical point every tick
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = particle(0.7);
        let a = MotionKind::Circle.position(1.5, 0, &mut p, Bounds::PREVIEW, &mut rng);
        let b = MotionKind::Circle.position(1.5, 0, &mut p, Bounds::PREVIEW, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn test_star_uses_exactly_three_base_angles() {
        let mut rng = StdRng::seed_from_u64(2);
        let kind = MotionKind::Star { sides: 3 };

        // Same phase, same parity, same index residue: identical point,
        // however many particles the surface carries
        let mut p1 = particle(0.0);
        let mut p2 = particle(0.0);
        let a = kind.position(0.0, 0, &mut p1, Bounds::PREVIEW, &mut rng);
        let b = kind.position(0.0, 6, &mut p2, Bounds::PREVIEW, &mut rng);
        assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);

        // Distinct base angles across indices collapse to exactly 3
        let mut angles = std::collections::HashSet::new();
        for i in 0..30usize {
            angles.insert(i % 3);
        }
        assert_eq!(angles.len(), 3);

        // And those angles are 120 degrees apart
        let (a0, _) = vertex(3, 0, 0.0, 0.0);
        let (a1, _) = vertex(3, 1, 0.0, 0.0);
        let (a2, _) = vertex(3, 2, 0.0, 0.0);
        assert!((a1 - a0 - TAU / 3.0).abs() < 1e-9);
        assert!((a2 - a1 - TAU / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_star_alternates_radius_by_parity() {
        let mut rng = StdRng::seed_from_u64(3);
        let kind = MotionKind::Star { sides: 4 };
        let (cx, _) = Bounds::PREVIEW.center();

        let mut even = particle(0.0);
        let mut odd = particle(0.0);
        let a = kind.position(0.0, 0, &mut even, Bounds::PREVIEW, &mut rng);
        let b = kind.position(0.0, 1, &mut odd, Bounds::PREVIEW, &mut rng);

        // index 0 and 1 share the radius seed but index 1 sits at half of it
        let full = (a.0 - cx).abs();
        assert!(full > 0.0);
        // index 1 is one step around the square, so compare distances from
        // center instead of raw coordinates
        let (cy_a, cy_b) = (a.1 - 70.0, b.1 - 70.0);
        let dist_a = ((a.0 - cx).powi(2) + cy_a.powi(2)).sqrt();
        let dist_b = ((b.0 - cx).powi(2) + cy_b.powi(2)).sqrt();
        assert!((dist_a - 2.0 * dist_b).abs() < 1e-9);
    }

    #[test]
    fn test_burst_angle_fixed_per_particle() {
        let mut rng = StdRng::seed_from_u64(4);
        let (cx, cy) = Bounds::PREVIEW.center();
        let mut p = particle(0.9);

        let a = MotionKind::Burst.position(1.0, 0, &mut p, Bounds::PREVIEW, &mut rng);
        let b = MotionKind::Burst.position(2.0, 0, &mut p, Bounds::PREVIEW, &mut rng);

        let angle_a = (a.1 - cy).atan2(a.0 - cx);
        let angle_b = (b.1 - cy).atan2(b.0 - cx);
        assert!((angle_a - angle_b).abs() < 1e-9);
    }

    #[test]
    fn test_bounce_mutates_velocity_only() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = particle(0.0);
        let base_y = p.y;

        let (_, y) = MotionKind::Bounce.position(0.0, 0, &mut p, Bounds::PREVIEW, &mut rng);
        assert_eq!(p.y, base_y);
        assert!((p.vy - (-0.3)).abs() < 1e-9);
        assert!((y - (base_y + p.vy)).abs() < 1e-9);
    }

    #[test]
    fn test_random_walk_reflects_at_walls() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut p = Particle {
            x: 341.9,
            y: 70.0,
            offset: 0.0,
            vx: 1.0,
            vy: 0.0,
        };
        MotionKind::RandomWalk { motion: 10.0 }.position(
            0.0,
            0,
            &mut p,
            Bounds::PREVIEW,
            &mut rng,
        );
        assert!(p.vx < 0.0);
    }

    #[test]
    fn test_rhythm_multiplier_disabled_is_one() {
        let mut rng = StdRng::seed_from_u64(8);
        let custom = CustomRhythm::default();
        assert_eq!(rhythm_multiplier(&custom, 12.0, &mut rng), 1.0);
    }

    #[test]
    fn test_rhythm_morse_alternates_on_half_units() {
        let mut rng = StdRng::seed_from_u64(9);
        let custom = CustomRhythm {
            enabled: true,
            pattern: RhythmPattern::Morse,
            variation: 0,
        };
        assert_eq!(rhythm_multiplier(&custom, 0.0, &mut rng), 2.0);
        assert_eq!(rhythm_multiplier(&custom, 0.4, &mut rng), 2.0);
        assert_eq!(rhythm_multiplier(&custom, 0.6, &mut rng), 0.5);
        assert_eq!(rhythm_multiplier(&custom, 1.1, &mut rng), 2.0);
        assert_eq!(rhythm_multiplier(&custom, 1.6, &mut rng), 0.5);
    }

    #[test]
    fn test_rhythm_decelerate_floors_at_half() {
        let mut rng = StdRng::seed_from_u64(10);
        let custom = CustomRhythm {
            enabled: true,
            pattern: RhythmPattern::Decelerate,
            variation: 0,
        };
        assert_eq!(rhythm_multiplier(&custom, 0.0, &mut rng), 2.0);
        assert_eq!(rhythm_multiplier(&custom, 500.0, &mut rng), 0.5);
    }

    #[test]
    fn test_rhythm_variation_jitter_is_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let custom = CustomRhythm {
            enabled: true,
            pattern: RhythmPattern::Heartbeat,
            variation: 100,
        };
        // Heartbeat at t=0 sits at 0.5; jitter may add at most +/-0.5
        for _ in 0..200 {
            let m = rhythm_multiplier(&custom, 0.0, &mut rng);
            assert!((0.0..=1.0).contains(&m));
        }
    }
}
