//! Actor system - advances every actor's state machine by one tick.

use hecs::World;
use rand::Rng;

use bistro_logic::constants::timing;

use crate::components::*;

/// Step every actor, then every particle.
pub fn actor_system(world: &mut World, particles: &mut Vec<Particle>, rng: &mut impl Rng) {
    for (_entity, (motion, actor)) in world.query_mut::<(&mut Motion, &mut Actor)>() {
        match actor {
            Actor::Chef(chef) => step_chef(chef, motion, particles),
            Actor::Waiter(waiter) => step_waiter(waiter, motion),
            Actor::Customer(customer) => step_customer(customer, motion, particles),
            Actor::Mascot(mascot) => step_mascot(mascot, motion, rng),
            Actor::Boss(boss) => step_boss(boss),
        }
    }
    particle_system(particles);
}

/// Move particles and drop the expired ones.
pub fn particle_system(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos = particle.pos + particle.velocity;
        particle.life = particle.life.saturating_sub(1);
    }
    particles.retain(Particle::is_alive);
}

/// Send an idle chef to the stove for an order of `duration` ticks.
///
/// Returns false if the chef is busy or still holding a dish.
pub fn start_cooking(chef: &mut Chef, motion: &mut Motion, duration: u32) -> bool {
    if !chef.can_take_order() {
        return false;
    }
    chef.state = ChefState::WalkingToStove;
    chef.cook_duration = duration.max(1);
    chef.cook_timer = 0;
    motion.set_target(chef.stove);
    true
}

pub fn step_chef(chef: &mut Chef, motion: &mut Motion, particles: &mut Vec<Particle>) {
    match chef.state {
        ChefState::Idle => motion.frame = 0,
        ChefState::WalkingToStove => {
            if motion.step_toward() {
                chef.state = ChefState::Cooking;
                chef.cook_timer = 0;
            }
        }
        ChefState::Cooking => {
            chef.cook_timer += 1;
            motion.frame = 1;
            if chef.cook_timer % timing::STEAM_INTERVAL == 0 {
                particles.push(Particle::new(
                    ParticleKind::Steam,
                    chef.stove.offset(12.0, -10.0),
                    Vec2::new(0.0, -0.5),
                    20,
                ));
            }
            if chef.cook_timer >= chef.cook_duration {
                chef.state = ChefState::Returning;
                chef.dish_ready = true;
                motion.set_target(chef.idle_spot);
            }
        }
        ChefState::Returning => {
            if motion.step_toward() {
                chef.state = ChefState::Idle;
            }
        }
    }
}

/// Hand a plate to an idle waiter. The waiter walks to the pass first.
pub fn start_delivery(waiter: &mut Waiter, motion: &mut Motion, destination: Vec2, food_color: u32) -> bool {
    if waiter.state != WaiterState::Idle {
        return false;
    }
    waiter.state = WaiterState::WalkingToKitchen;
    waiter.destination = destination;
    waiter.food_color = food_color;
    motion.set_target(waiter.pickup);
    true
}

pub fn step_waiter(waiter: &mut Waiter, motion: &mut Motion) {
    match waiter.state {
        WaiterState::Idle => motion.frame = 0,
        WaiterState::WalkingToKitchen => {
            if motion.step_toward() {
                waiter.state = WaiterState::PickingUp;
                waiter.pickup_timer = 0;
            }
        }
        WaiterState::PickingUp => {
            waiter.pickup_timer += 1;
            if waiter.pickup_timer >= timing::PICKUP_DWELL {
                waiter.state = WaiterState::Delivering;
                waiter.carrying = true;
                motion.set_target(waiter.destination);
            }
        }
        WaiterState::Delivering => {
            if motion.step_toward() {
                waiter.state = WaiterState::Returning;
                waiter.carrying = false;
                motion.set_target(waiter.idle_spot);
            }
        }
        WaiterState::Returning => {
            if motion.step_toward() {
                waiter.state = WaiterState::Idle;
            }
        }
    }
}

/// Send a queued guest to a table.
pub fn assign_table(customer: &mut Customer, motion: &mut Motion, table: usize, seat: Vec2) {
    customer.table = Some(table);
    customer.state = CustomerState::WalkingToTable;
    motion.set_target(seat);
}

/// Plate arrives: start eating.
pub fn receive_food(customer: &mut Customer) {
    customer.has_food = true;
    customer.state = CustomerState::Eating;
    customer.eat_timer = customer.eat_duration;
}

pub fn step_customer(customer: &mut Customer, motion: &mut Motion, particles: &mut Vec<Particle>) {
    match customer.state {
        CustomerState::Entering => {
            if motion.step_toward() {
                customer.state = CustomerState::WalkingToQueue;
                motion.set_target(customer.queue_spot);
            }
        }
        CustomerState::WalkingToQueue => {
            if motion.step_toward() {
                customer.state = CustomerState::Queuing;
            }
        }
        CustomerState::Queuing => motion.frame = 0,
        CustomerState::WalkingToTable => {
            if motion.step_toward() {
                customer.state = CustomerState::WaitingForFood;
                customer.wait_ticks = 0;
            }
        }
        CustomerState::WaitingForFood => {
            customer.wait_ticks += 1;
            if customer.wait_ticks == timing::ANNOYED_AFTER && !customer.annoyed_shown {
                customer.annoyed_shown = true;
                particles.push(Particle::new(
                    ParticleKind::Angry,
                    motion.pos.offset(12.0, -12.0),
                    Vec2::new(0.0, -0.5),
                    30,
                ));
            }
        }
        CustomerState::Eating => {
            customer.eat_timer = customer.eat_timer.saturating_sub(1);
            if customer.eat_timer == 0 {
                customer.state = CustomerState::Paying;
            }
        }
        CustomerState::Paying => {
            customer.state = CustomerState::Leaving;
            customer.has_food = false;
            motion.set_target(Vec2::new(customer.exit_x, customer.door.y));
        }
        CustomerState::Leaving => {
            motion.step_toward();
        }
    }
}

/// Leaving and converged on the exit.
pub fn has_left(customer: &Customer, motion: &Motion) -> bool {
    customer.state == CustomerState::Leaving
        && (motion.pos.x - customer.exit_x).abs() < timing::EXIT_TOLERANCE
}

pub fn step_mascot(mascot: &mut Mascot, motion: &mut Motion, rng: &mut impl Rng) {
    mascot.timer += 1;
    if mascot.state == MascotState::Wandering && motion.step_toward() {
        motion.frame = 0;
    }
    if mascot.timer >= mascot.duration {
        pick_mascot_state(mascot, motion, rng);
    }
}

fn pick_mascot_state(mascot: &mut Mascot, motion: &mut Motion, rng: &mut impl Rng) {
    mascot.timer = 0;
    mascot.purring = false;
    let roll: f32 = rng.gen();
    if roll < 0.3 {
        mascot.state = MascotState::Sitting;
        mascot.duration = rng.gen_range(80..200);
        mascot.purring = rng.gen::<f32>() < 0.3;
    } else if roll < 0.5 {
        mascot.state = MascotState::Sleeping;
        mascot.duration = rng.gen_range(120..320);
    } else if roll < 0.7 {
        mascot.state = MascotState::Washing;
        mascot.duration = rng.gen_range(40..100);
    } else {
        mascot.state = MascotState::Wandering;
        mascot.duration = rng.gen_range(60..160);
        let b = mascot.bounds;
        motion.set_target(Vec2::new(
            rng.gen_range(b.left..b.right),
            rng.gen_range(b.top..b.bottom),
        ));
    }
}

pub fn step_boss(boss: &mut Boss) {
    if boss.visible {
        boss.timer = boss.timer.saturating_sub(1);
        if boss.timer == 0 {
            boss.visible = false;
        }
    }
}
