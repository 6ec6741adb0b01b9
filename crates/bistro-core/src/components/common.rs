//! Common components used by every actor on the floor.

use serde::{Deserialize, Serialize};

use bistro_logic::constants::TICKS_PER_ANIMATION_FRAME;

/// 2D position on the logical canvas
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Which way a sprite is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Position, target and walk animation of an actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub pos: Vec2,
    pub target: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub facing: Facing,
    /// Walk cycle frame, 0 or 1
    pub frame: u8,
    frame_timer: u32,
}

impl Motion {
    /// Standing still at `pos`.
    pub fn at(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            target: pos,
            speed,
            facing: Facing::Right,
            frame: 0,
            frame_timer: 0,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Advance one tick toward the target. Returns true once arrived.
    ///
    /// Arrival snaps exactly onto the target when less than one tick of travel
    /// remains. Facing and the walk frame only change while moving.
    pub fn step_toward(&mut self) -> bool {
        let delta = self.target - self.pos;
        let dist = (delta.x * delta.x + delta.y * delta.y).sqrt();
        if dist < self.speed {
            self.pos = self.target;
            return true;
        }
        if self.speed <= 0.0 {
            return false;
        }

        self.pos.x += delta.x / dist * self.speed;
        self.pos.y += delta.y / dist * self.speed;
        if delta.x < 0.0 {
            self.facing = Facing::Left;
        } else if delta.x > 0.0 {
            self.facing = Facing::Right;
        }

        self.frame_timer += 1;
        if self.frame_timer >= TICKS_PER_ANIMATION_FRAME {
            self.frame_timer = 0;
            self.frame = 1 - self.frame;
        }
        false
    }
}

/// What a particle looks like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParticleKind {
    Coin,
    Heart,
    Angry,
    Steam,
    Text(String),
}

/// Short-lived visual effect. Never affects the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, velocity: Vec2, life: u32) -> Self {
        Self {
            pos,
            velocity,
            life,
            max_life: life,
            kind,
        }
    }

    /// Rising coin plus a "+N" label next to it.
    pub fn coin_burst(at: Vec2, amount: u64) -> [Particle; 2] {
        [
            Particle::new(ParticleKind::Coin, at.offset(8.0, -4.0), Vec2::new(0.0, -1.2), 40),
            Particle::new(
                ParticleKind::Text(format!("+{amount}")),
                at.offset(14.0, -4.0),
                Vec2::new(0.0, -0.8),
                50,
            ),
        ]
    }

    /// Remaining life as a fraction, for fading.
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}
