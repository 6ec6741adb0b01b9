//! Actor components: staff, guests, the mascot and the boss.
//!
//! Every actor entity carries a [`Motion`](super::Motion) plus exactly one
//! [`Actor`]. The variant owns the role-specific state machine data; the
//! transitions themselves live in `systems::actors`.

use serde::{Deserialize, Serialize};

use bistro_logic::economy::SpecialGuest;
use bistro_logic::satisfaction::SatisfactionLevel;

use super::Vec2;

/// Chef work cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChefState {
    Idle,
    WalkingToStove,
    Cooking,
    Returning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chef {
    pub slot: usize,
    pub stove: Vec2,
    pub idle_spot: Vec2,
    pub state: ChefState,
    pub cook_timer: u32,
    pub cook_duration: u32,
    /// A finished dish waiting for a waiter. Never thrown away.
    pub dish_ready: bool,
}

impl Chef {
    pub fn new(slot: usize, stove: Vec2, idle_spot: Vec2) -> Self {
        Self {
            slot,
            stove,
            idle_spot,
            state: ChefState::Idle,
            cook_timer: 0,
            cook_duration: 0,
            dish_ready: false,
        }
    }

    /// Idle with empty hands.
    pub fn can_take_order(&self) -> bool {
        self.state == ChefState::Idle && !self.dish_ready
    }
}

/// Waiter work cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaiterState {
    Idle,
    WalkingToKitchen,
    PickingUp,
    Delivering,
    Returning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waiter {
    pub slot: usize,
    pub idle_spot: Vec2,
    pub pickup: Vec2,
    pub state: WaiterState,
    pub destination: Vec2,
    /// 0xRRGGBB of the plate being carried
    pub food_color: u32,
    pub carrying: bool,
    pub pickup_timer: u32,
}

impl Waiter {
    pub fn new(slot: usize, idle_spot: Vec2, pickup: Vec2) -> Self {
        Self {
            slot,
            idle_spot,
            pickup,
            state: WaiterState::Idle,
            destination: idle_spot,
            food_color: 0,
            carrying: false,
            pickup_timer: 0,
        }
    }
}

/// Guest life cycle, door to exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerState {
    Entering,
    WalkingToQueue,
    Queuing,
    WalkingToTable,
    WaitingForFood,
    Eating,
    Paying,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub state: CustomerState,
    /// Sprite palette index
    pub variant: u8,
    pub door: Vec2,
    pub queue_spot: Vec2,
    pub exit_x: f32,
    /// Index into the layout's tables while seated
    pub table: Option<usize>,
    pub dish: String,
    pub food_color: u32,
    pub wait_ticks: u32,
    pub annoyed_shown: bool,
    pub has_food: bool,
    pub eat_timer: u32,
    pub eat_duration: u32,
    pub satisfaction: Option<SatisfactionLevel>,
    pub special: Option<SpecialGuest>,
}

impl Customer {
    pub fn is_waiting_in_line(&self) -> bool {
        matches!(
            self.state,
            CustomerState::Entering | CustomerState::WalkingToQueue | CustomerState::Queuing
        )
    }

    /// Served and on the way out; payment can be collected.
    pub fn has_paid(&self) -> bool {
        matches!(self.state, CustomerState::Paying | CustomerState::Leaving)
    }
}

/// Mascot idle behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MascotState {
    Sitting,
    Sleeping,
    Washing,
    Wandering,
}

/// Rectangle the mascot may roam in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mascot {
    pub state: MascotState,
    pub timer: u32,
    pub duration: u32,
    pub purring: bool,
    pub bounds: Bounds,
}

/// The boss only shows up to comment on rare events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub visible: bool,
    pub timer: u32,
}

/// The role of an actor entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Actor {
    Chef(Chef),
    Waiter(Waiter),
    Customer(Customer),
    Mascot(Mascot),
    Boss(Boss),
}

impl Actor {
    pub fn as_chef_mut(&mut self) -> Option<&mut Chef> {
        match self {
            Actor::Chef(chef) => Some(chef),
            _ => None,
        }
    }

    pub fn as_waiter_mut(&mut self) -> Option<&mut Waiter> {
        match self {
            Actor::Waiter(waiter) => Some(waiter),
            _ => None,
        }
    }

    pub fn as_customer(&self) -> Option<&Customer> {
        match self {
            Actor::Customer(customer) => Some(customer),
            _ => None,
        }
    }

    pub fn as_customer_mut(&mut self) -> Option<&mut Customer> {
        match self {
            Actor::Customer(customer) => Some(customer),
            _ => None,
        }
    }
}
