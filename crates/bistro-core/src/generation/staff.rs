//! Staff generation - chefs, waiters, the mascot and the boss.

use hecs::{Entity, World};
use rand::Rng;

use bistro_logic::constants::{speeds, timing};

use super::SceneLayout;
use crate::components::*;

/// Spawn one chef standing at its idle spot.
pub fn spawn_chef(world: &mut World, layout: &SceneLayout, slot: usize) -> Entity {
    let idle = layout.chef_idle(slot);
    world.spawn((
        Motion::at(idle, speeds::CHEF),
        Actor::Chef(Chef::new(slot, layout.stove(slot), idle)),
    ))
}

/// Spawn one waiter standing behind the counter.
pub fn spawn_waiter(world: &mut World, layout: &SceneLayout, slot: usize) -> Entity {
    let idle = layout.waiter_idle(slot);
    world.spawn((
        Motion::at(idle, speeds::WAITER),
        Actor::Waiter(Waiter::new(slot, idle, layout.pickup)),
    ))
}

/// Top up a staff roster to `wanted`, keeping the people already on shift.
pub fn fill_roster(
    world: &mut World,
    layout: &SceneLayout,
    roster: &mut Vec<Entity>,
    wanted: usize,
    spawn: fn(&mut World, &SceneLayout, usize) -> Entity,
) -> usize {
    let mut added = 0;
    while roster.len() < wanted {
        let slot = roster.len();
        roster.push(spawn(world, layout, slot));
        added += 1;
    }
    added
}

pub fn spawn_mascot(world: &mut World, layout: &SceneLayout, rng: &mut impl Rng) -> Entity {
    let start = Vec2::new(200.0, layout.cat_bounds.top + 60.0);
    world.spawn((
        Motion::at(start, speeds::MASCOT),
        Actor::Mascot(Mascot {
            state: MascotState::Sitting,
            timer: 0,
            duration: rng.gen_range(80..200),
            purring: false,
            bounds: layout.cat_bounds,
        }),
    ))
}

pub fn spawn_boss(world: &mut World, layout: &SceneLayout) -> Entity {
    world.spawn((
        Motion::at(layout.boss_spot, speeds::BOSS),
        Actor::Boss(Boss::default()),
    ))
}

/// Make the boss visible for a while.
pub fn show_boss(world: &mut World, boss: Entity) {
    if let Ok(mut actor) = world.get::<&mut Actor>(boss) {
        if let Actor::Boss(boss) = &mut *actor {
            boss.visible = true;
            boss.timer = timing::BOSS_VISIBLE;
        }
    }
}
