//! Visual particle effects
//!
//! Particles carry no gameplay weight. Effect particles fall under gravity
//! and expire; ambient snow never expires and wraps back to the top.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Field;
use crate::consts::*;

pub const DRIFT_COLOR: u32 = 0x60a5fa;
pub const GIFT_COLOR: u32 = 0xfbbf24;
pub const CRASH_RED: u32 = 0xdc2626;
pub const CRASH_AMBER: u32 = 0xf59e0b;
pub const SNOW_COLOR: u32 = 0xffffff;

/// What spawned a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Drift,
    Nitro,
    Gift,
    Crash,
    Snow,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    fn effect(kind: ParticleKind, pos: Vec2, vel: Vec2, life: f32, color: u32, size: f32) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: life,
            color,
            size,
            kind,
        }
    }

    #[inline]
    pub fn is_ambient(&self) -> bool {
        self.kind == ParticleKind::Snow
    }
}

/// All live particles plus the effect budget
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Maximum live effect particles; snow does not count
    effect_cap: usize,
    effects: usize,
}

impl ParticleSystem {
    pub fn new(effect_cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            effect_cap,
            effects: 0,
        }
    }

    /// Scatter `count` snowflakes over the whole field
    pub fn seed_snow(&mut self, count: usize, field: &Field, rng: &mut impl Rng) {
        for _ in 0..count {
            self.particles.push(Particle {
                pos: Vec2::new(rng.random::<f32>() * field.width, rng.random::<f32>() * field.height),
                vel: Vec2::new(0.0, 2.0 + rng.random::<f32>() * 3.0),
                life: 1.0,
                max_life: 1.0,
                color: SNOW_COLOR,
                size: 2.0 + rng.random::<f32>() * 3.0,
                kind: ParticleKind::Snow,
            });
        }
    }

    /// Add one particle. Effect particles beyond the cap are dropped.
    pub fn emit(&mut self, particle: Particle) -> bool {
        if !particle.is_ambient() {
            if self.effects >= self.effect_cap {
                return false;
            }
            self.effects += 1;
        }
        self.particles.push(particle);
        true
    }

    /// Integrate one tick: move, age, wrap snow, drop dead effects, then
    /// apply gravity to the survivors.
    pub fn advance(&mut self, dt: f32, field: &Field, rng: &mut impl Rng) {
        let mut removed = 0;
        self.particles.retain_mut(|p| {
            p.pos += p.vel;

            if p.is_ambient() {
                if p.pos.y > field.height {
                    p.pos.y = SNOW_WRAP_Y;
                    p.pos.x = rng.random::<f32>() * field.width;
                }
                return true;
            }

            p.life -= dt;
            if p.life <= 0.0 {
                removed += 1;
                return false;
            }
            p.vel.y += PARTICLE_GRAVITY;
            true
        });
        self.effects -= removed;
    }

    /// Spray behind a lane change. `away` is -1.0 or 1.0: the side of the
    /// car the spray starts on and the direction it travels.
    pub fn drift_burst(&mut self, car: Vec2, away: f32, rng: &mut impl Rng) {
        let origin = Vec2::new(car.x + away * 40.0, car.y + 60.0);
        for _ in 0..10 {
            let vel = Vec2::new(away * (2.0 + rng.random::<f32>() * 3.0), rng.random::<f32>() * 2.0);
            let size = 4.0 + rng.random::<f32>() * 4.0;
            self.emit(Particle::effect(ParticleKind::Drift, origin, vel, 0.5, DRIFT_COLOR, size));
        }
    }

    /// Single tyre-trail puff under the car
    pub fn trail(&mut self, car: Vec2, rng: &mut impl Rng) {
        let origin = Vec2::new(car.x, car.y + 120.0);
        let vel = Vec2::new((rng.random::<f32>() - 0.5) * 2.0, 1.0 + rng.random::<f32>());
        self.emit(Particle::effect(ParticleKind::Drift, origin, vel, 0.3, DRIFT_COLOR, 3.0));
    }

    /// Exhaust flames while nitro is active
    pub fn nitro_flames(&mut self, car: Vec2, rng: &mut impl Rng) {
        for i in 0..3 {
            let origin = Vec2::new(car.x + (rng.random::<f32>() - 0.5) * 40.0, car.y + 120.0);
            let vel = Vec2::new((rng.random::<f32>() - 0.5) * 3.0, 3.0 + rng.random::<f32>() * 5.0);
            let color = if i % 2 == 0 { CRASH_AMBER } else { CRASH_RED };
            let size = 6.0 + rng.random::<f32>() * 6.0;
            self.emit(Particle::effect(ParticleKind::Nitro, origin, vel, 0.4, color, size));
        }
    }

    /// Even radial ring where a gift was taken
    pub fn pickup_burst(&mut self, at: Vec2) {
        const COUNT: usize = 20;
        for i in 0..COUNT {
            let angle = std::f32::consts::TAU * i as f32 / COUNT as f32;
            let vel = Vec2::from_angle(angle) * 3.0;
            self.emit(Particle::effect(ParticleKind::Gift, at, vel, 0.8, GIFT_COLOR, 6.0));
        }
    }

    /// Explosion at the car plus a ring of stars at the impact point
    pub fn crash_burst(&mut self, car: Vec2, impact: Vec2, rng: &mut impl Rng) {
        let center = Vec2::new(car.x, car.y + 60.0);
        for _ in 0..50 {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 2.0 + rng.random::<f32>() * 8.0;
            let vel = Vec2::from_angle(angle) * speed - Vec2::new(0.0, 2.0);
            let color = if rng.random::<f32>() > 0.5 { CRASH_RED } else { CRASH_AMBER };
            let size = 4.0 + rng.random::<f32>() * 8.0;
            self.emit(Particle::effect(ParticleKind::Crash, center, vel, 1.5, color, size));
        }

        const STARS: usize = 8;
        for i in 0..STARS {
            let angle = std::f32::consts::TAU * i as f32 / STARS as f32;
            let vel = Vec2::from_angle(angle) * 5.0 - Vec2::new(0.0, 3.0);
            let color = if i % 2 == 0 { GIFT_COLOR } else { SNOW_COLOR };
            let size = 8.0 + rng.random::<f32>() * 4.0;
            self.emit(Particle::effect(ParticleKind::Crash, impact, vel, 1.2, color, size));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn effect_count(&self) -> usize {
        self.effects
    }

    pub fn snow_count(&self) -> usize {
        self.particles.len() - self.effects
    }

    pub fn count_of(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }
}
