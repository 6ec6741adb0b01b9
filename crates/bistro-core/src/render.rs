//! Render surface - what the host draws each frame.
//!
//! The engine never touches pixels. [`SimulationEngine::render`](crate::engine::SimulationEngine::render)
//! hands a [`RenderSurface`] the static scene first, then actors sorted by y
//! for the 3/4 look, then particles, then the time-of-day tint.

use serde::{Deserialize, Serialize};

use bistro_logic::day_night::{Rgba, TimeOfDay, Weather};
use bistro_logic::economy::SpecialGuest;

use crate::components::*;
use crate::generation::SceneLayout;

/// Frame-wide context for drawing the room
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub layout: &'a SceneLayout,
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpriteKind {
    Chef,
    Waiter,
    Customer {
        variant: u8,
        special: Option<SpecialGuest>,
    },
    Mascot {
        state: MascotState,
        purring: bool,
    },
    Boss,
}

/// One actor, ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub facing: Facing,
    pub frame: u8,
    /// Plate color being carried or eaten from
    pub plate: Option<u32>,
}

impl Sprite {
    /// Sprite for an actor, `None` if it should not be drawn.
    pub fn from_actor(motion: &Motion, actor: &Actor) -> Option<Self> {
        let (kind, plate) = match actor {
            Actor::Chef(chef) => (SpriteKind::Chef, chef.dish_ready.then_some(0xffffff)),
            Actor::Waiter(waiter) => (SpriteKind::Waiter, waiter.carrying.then_some(waiter.food_color)),
            Actor::Customer(customer) => (
                SpriteKind::Customer {
                    variant: customer.variant,
                    special: customer.special,
                },
                customer.has_food.then_some(customer.food_color),
            ),
            Actor::Mascot(mascot) => (
                SpriteKind::Mascot {
                    state: mascot.state,
                    purring: mascot.purring,
                },
                None,
            ),
            Actor::Boss(boss) if boss.visible => (SpriteKind::Boss, None),
            Actor::Boss(_) => return None,
        };
        Some(Self {
            kind,
            pos: motion.pos,
            facing: motion.facing,
            frame: motion.frame,
            plate,
        })
    }
}

pub trait RenderSurface {
    fn begin_frame(&mut self, _width: f32, _height: f32) {}
    fn draw_scene(&mut self, scene: &SceneView<'_>);
    fn draw_sprite(&mut self, sprite: &Sprite);
    fn draw_particle(&mut self, particle: &Particle);
    fn draw_tint(&mut self, tint: Rgba);
    fn end_frame(&mut self) {}
}

/// Recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Scene { weather: Weather, time_of_day: TimeOfDay, level: u32 },
    Sprite(Sprite),
    Particle(Particle),
    Tint(Rgba),
}

/// Surface that just records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite(sprite) => Some(sprite),
            _ => None,
        })
    }
}

impl RenderSurface for DrawList {
    fn begin_frame(&mut self, _width: f32, _height: f32) {
        self.commands.clear();
    }

    fn draw_scene(&mut self, scene: &SceneView<'_>) {
        self.commands.push(DrawCommand::Scene {
            weather: scene.weather,
            time_of_day: scene.time_of_day,
            level: scene.level,
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.commands.push(DrawCommand::Sprite(sprite.clone()));
    }

    fn draw_particle(&mut self, particle: &Particle) {
        self.commands.push(DrawCommand::Particle(particle.clone()));
    }

    fn draw_tint(&mut self, tint: Rgba) {
        self.commands.push(DrawCommand::Tint(tint));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_boss_is_not_drawn() {
        let motion = Motion::at(Vec2::new(250.0, 200.0), 0.0);
        assert!(Sprite::from_actor(&motion, &Actor::Boss(Boss::default())).is_none());
        let shown = Actor::Boss(Boss { visible: true, timer: 10 });
        assert_eq!(Sprite::from_actor(&motion, &shown).unwrap().kind, SpriteKind::Boss);
    }

    #[test]
    fn test_carrying_waiter_shows_plate() {
        let mut waiter = Waiter::new(0, Vec2::ZERO, Vec2::ZERO);
        waiter.carrying = true;
        waiter.food_color = 0x4caf50;
        let sprite = Sprite::from_actor(&Motion::at(Vec2::ZERO, 2.0), &Actor::Waiter(waiter)).unwrap();
        assert_eq!(sprite.plate, Some(0x4caf50));
    }
}
