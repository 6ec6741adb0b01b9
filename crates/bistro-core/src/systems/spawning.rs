//! Guest arrivals - demand curve, order choice and spawning at the door.

use hecs::{Entity, World};
use rand::Rng;

use bistro_logic::constants::economy::FALLBACK_DISH;
use bistro_logic::constants::{speeds, timing};
use bistro_logic::economy::SpecialGuest;
use bistro_logic::menu::Menu;

use crate::components::*;
use crate::generation::SceneLayout;

/// Plate color when the menu is empty.
pub const FALLBACK_COLOR: u32 = 0xffcc02;

/// Number of guest palettes.
const GUEST_VARIANTS: u8 = 4;

/// What a new guest will eat and who they are
#[derive(Debug, Clone, PartialEq)]
pub struct GuestOrder {
    pub dish: String,
    pub food_color: u32,
    pub special: Option<SpecialGuest>,
    pub variant: u8,
}

impl GuestOrder {
    pub fn plain(dish: impl Into<String>, food_color: u32) -> Self {
        Self {
            dish: dish.into(),
            food_color,
            special: None,
            variant: 0,
        }
    }
}

/// Ticks until the next arrival, before jitter.
///
/// `max(min, base / (satisfaction × reputation × modifiers))`; a non-positive
/// demand product keeps the base interval.
pub fn spawn_interval(base: f32, min: f32, satisfaction_mult: f32, reputation_mult: f32, traffic_mult: f32) -> f32 {
    let demand = satisfaction_mult * reputation_mult * traffic_mult;
    if !(demand.is_finite() && demand > 0.0) {
        return base.max(min);
    }
    (base / demand).max(min)
}

/// Roll the order for a new guest.
pub fn choose_order(menu: &Menu, special_chance: f32, rng: &mut impl Rng) -> GuestOrder {
    let special = if rng.gen::<f32>() < special_chance {
        Some(SpecialGuest::pick(rng.gen()))
    } else {
        None
    };
    let (dish, food_color) = match menu.pick(rng.gen()) {
        Some(item) => (item.name.clone(), item.category.color()),
        None => (FALLBACK_DISH.to_string(), FALLBACK_COLOR),
    };
    GuestOrder {
        dish,
        food_color,
        special,
        variant: rng.gen_range(0..GUEST_VARIANTS),
    }
}

fn eat_duration(special: Option<SpecialGuest>) -> u32 {
    match special {
        Some(SpecialGuest::Royal) => timing::EAT_ROYAL,
        Some(SpecialGuest::Influencer) => timing::EAT_INFLUENCER,
        _ => timing::EAT_DEFAULT,
    }
}

/// Spawn a guest just outside the door, headed for line position `queue_position`.
pub fn spawn_customer(
    world: &mut World,
    layout: &SceneLayout,
    id: u32,
    queue_position: usize,
    order: GuestOrder,
    queue_spacing: f32,
) -> Entity {
    let mut motion = Motion::at(layout.door.offset(-10.0, 20.0), speeds::CUSTOMER);
    motion.set_target(layout.door);
    world.spawn((
        motion,
        Actor::Customer(Customer {
            id,
            state: CustomerState::Entering,
            variant: order.variant,
            door: layout.door,
            queue_spot: layout.queue_spot(queue_position, queue_spacing),
            exit_x: layout.exit_x,
            table: None,
            dish: order.dish,
            food_color: order.food_color,
            wait_ticks: 0,
            annoyed_shown: false,
            has_food: false,
            eat_timer: 0,
            eat_duration: eat_duration(order.special),
            satisfaction: None,
            special: order.special,
        }),
    ))
}

/// Guests still on their way into the line.
pub fn queue_length(world: &World, customers: &[Entity]) -> usize {
    customers
        .iter()
        .filter(|&&e| {
            world
                .get::<&Actor>(e)
                .map(|a| a.as_customer().map(Customer::is_waiting_in_line).unwrap_or(false))
                .unwrap_or(false)
        })
        .count()
}
