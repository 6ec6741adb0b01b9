//! Service pipeline - seating, the order backlog, cooking, plating and payment.
//!
//! Each seated guest puts exactly one ticket on the backlog. Idle chefs with
//! empty hands take tickets in order, a finished dish is paired with the first
//! unmatched waiting guest and an idle waiter, and the delivery is tracked
//! until the guest pays.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use bistro_logic::constants::satisfaction::JITTER;
use bistro_logic::economy::{payout, PayoutInputs, SpecialGuest};
use bistro_logic::menu::Menu;
use bistro_logic::satisfaction::{score, SatisfactionInputs, SatisfactionLevel};

use super::actors::{assign_table, has_left, receive_food, start_cooking, start_delivery};
use crate::components::*;
use crate::generation::SceneLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryPhase {
    /// Plate is on its way.
    WaitingDelivery,
    /// Guest is eating; payout is known but not yet collected.
    WaitingPayment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelivery {
    pub waiter: Entity,
    pub customer: Entity,
    pub phase: DeliveryPhase,
    pub payout: u64,
    pub level: Option<SatisfactionLevel>,
    pub special: Option<SpecialGuest>,
    /// Last known guest position, used for particles if the guest is gone.
    pub at: Vec2,
}

/// Order backlog and in-flight deliveries
#[derive(Debug, Clone, Default)]
pub struct Kitchen {
    pub orders: VecDeque<Entity>,
    pub deliveries: Vec<PendingDelivery>,
}

impl Kitchen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_matched(&self, customer: Entity) -> bool {
        self.deliveries.iter().any(|d| d.customer == customer)
    }

    pub fn clear(&mut self) {
        self.orders.clear();
        self.deliveries.clear();
    }
}

/// Inputs for scoring a plate at the moment it lands
#[derive(Debug, Clone, Copy)]
pub struct ServeContext<'a> {
    pub menu: &'a Menu,
    pub upgrade_bonus: f32,
    pub modifier_bonus: f32,
    pub profit_mult: f32,
}

/// Something the engine needs to book after the pipeline ran
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    Served {
        customer: Entity,
        at: Vec2,
        score: f32,
        level: SatisfactionLevel,
        special: Option<SpecialGuest>,
        payout: u64,
    },
    Paid {
        at: Vec2,
        payout: u64,
        level: Option<SatisfactionLevel>,
        special: Option<SpecialGuest>,
    },
}

/// Seat queued guests at free tables, in roster order. One ticket per seating.
pub fn seating_system(
    world: &mut World,
    layout: &mut SceneLayout,
    customers: &[Entity],
    kitchen: &mut Kitchen,
) -> usize {
    let mut seated = 0;
    for &entity in customers {
        let Some(table) = layout.free_table() else {
            break;
        };
        let Ok((motion, actor)) = world.query_one_mut::<(&mut Motion, &mut Actor)>(entity) else {
            continue;
        };
        let Some(customer) = actor.as_customer_mut() else {
            continue;
        };
        if customer.state != CustomerState::Queuing {
            continue;
        }
        let seat = layout.tables[table].seat;
        assign_table(customer, motion, table, seat);
        layout.tables[table].occupied = true;
        kitchen.orders.push_back(entity);
        seated += 1;
    }
    seated
}

/// Hand backlog tickets to idle chefs with empty hands.
pub fn cooking_system(world: &mut World, chefs: &[Entity], kitchen: &mut Kitchen, duration: u32) -> usize {
    let mut started = 0;
    for &entity in chefs {
        if kitchen.orders.is_empty() {
            break;
        }
        let Ok((motion, actor)) = world.query_one_mut::<(&mut Motion, &mut Actor)>(entity) else {
            continue;
        };
        let Some(chef) = actor.as_chef_mut() else {
            continue;
        };
        if start_cooking(chef, motion, duration) {
            kitchen.orders.pop_front();
            started += 1;
        }
    }
    started
}

/// Pair each ready dish with the first unmatched waiting guest and an idle waiter.
pub fn matching_system(world: &mut World, chefs: &[Entity], waiters: &[Entity], customers: &[Entity], kitchen: &mut Kitchen) -> usize {
    let mut waiting: VecDeque<(Entity, Vec2, u32)> = customers
        .iter()
        .filter(|&&e| !kitchen.is_matched(e))
        .filter_map(|&e| {
            let mut query = world.query_one::<(&Motion, &Actor)>(e).ok()?;
            let (motion, actor) = query.get()?;
            let customer = actor.as_customer()?;
            if customer.state != CustomerState::WaitingForFood {
                return None;
            }
            let plate = (e, motion.pos.offset(16.0, 8.0), customer.food_color);
            Some(plate)
        })
        .collect();

    let mut matched = 0;
    for &chef_entity in chefs {
        if waiting.is_empty() {
            break;
        }
        let holding = world
            .get::<&Actor>(chef_entity)
            .map(|a| matches!(&*a, Actor::Chef(c) if c.dish_ready))
            .unwrap_or(false);
        if !holding {
            continue;
        }

        let Some(&waiter_entity) = waiters.iter().find(|&&w| {
            world
                .get::<&Actor>(w)
                .map(|a| matches!(&*a, Actor::Waiter(waiter) if waiter.state == WaiterState::Idle))
                .unwrap_or(false)
        }) else {
            break;
        };
        let Some((customer, destination, color)) = waiting.pop_front() else {
            break;
        };

        if let Ok((motion, actor)) = world.query_one_mut::<(&mut Motion, &mut Actor)>(waiter_entity) {
            if let Some(waiter) = actor.as_waiter_mut() {
                start_delivery(waiter, motion, destination, color);
            }
        }
        if let Ok(mut actor) = world.get::<&mut Actor>(chef_entity) {
            if let Some(chef) = actor.as_chef_mut() {
                chef.dish_ready = false;
            }
        }

        kitchen.deliveries.push(PendingDelivery {
            waiter: waiter_entity,
            customer,
            phase: DeliveryPhase::WaitingDelivery,
            payout: 0,
            level: None,
            special: None,
            at: destination,
        });
        matched += 1;
    }
    matched
}

/// Land plates whose waiter turned back, then collect payment from guests on their way out.
pub fn delivery_system(
    world: &mut World,
    kitchen: &mut Kitchen,
    ctx: &ServeContext<'_>,
    rng: &mut impl Rng,
) -> Vec<ServiceEvent> {
    let mut events = Vec::new();

    kitchen.deliveries.retain_mut(|delivery| {
        match delivery.phase {
            DeliveryPhase::WaitingDelivery => {
                let dropped_off = world
                    .get::<&Actor>(delivery.waiter)
                    .map(|a| {
                        matches!(&*a, Actor::Waiter(w)
                            if matches!(w.state, WaiterState::Returning | WaiterState::Idle))
                    })
                    .unwrap_or(true);
                if !dropped_off {
                    return true;
                }

                let Ok((motion, actor)) = world.query_one_mut::<(&Motion, &mut Actor)>(delivery.customer) else {
                    return false;
                };
                let Some(customer) = actor.as_customer_mut() else {
                    return false;
                };

                receive_food(customer);
                let s = score(&SatisfactionInputs {
                    wait_ticks: customer.wait_ticks,
                    upgrade_bonus: ctx.upgrade_bonus,
                    menu_size: ctx.menu.len(),
                    modifier_bonus: ctx.modifier_bonus,
                    jitter: rng.gen_range(-JITTER..=JITTER),
                });
                let level = SatisfactionLevel::from_score(s);
                customer.satisfaction = Some(level);
                let gold = payout(&PayoutInputs {
                    dish_profit: ctx.menu.find(&customer.dish).map(|m| m.base_profit()),
                    special: customer.special,
                    level,
                    profit_mult: ctx.profit_mult,
                });
                log::debug!(
                    "served guest #{} {} after {} ticks: score {:.0}, {:?}, {} gold",
                    customer.id,
                    customer.dish,
                    customer.wait_ticks,
                    s,
                    level,
                    gold
                );

                delivery.phase = DeliveryPhase::WaitingPayment;
                delivery.payout = gold;
                delivery.level = Some(level);
                delivery.special = customer.special;
                delivery.at = motion.pos;
                events.push(ServiceEvent::Served {
                    customer: delivery.customer,
                    at: motion.pos,
                    score: s,
                    level,
                    special: customer.special,
                    payout: gold,
                });
                true
            }
            DeliveryPhase::WaitingPayment => {
                let on_the_way_out = match world.query_one_mut::<(&Motion, &Actor)>(delivery.customer) {
                    Ok((motion, actor)) => match actor.as_customer() {
                        Some(customer) if customer.has_paid() => {
                            delivery.at = motion.pos;
                            true
                        }
                        Some(_) => false,
                        None => true,
                    },
                    Err(_) => true,
                };
                if !on_the_way_out {
                    return true;
                }
                events.push(ServiceEvent::Paid {
                    at: delivery.at,
                    payout: delivery.payout,
                    level: delivery.level,
                    special: delivery.special,
                });
                false
            }
        }
    });

    events
}

/// Remove guests who reached the exit and free their tables.
///
/// Returns how many left. Table occupancy is rebuilt from the guests still
/// seated, so a table is occupied exactly when a live guest holds it.
pub fn departure_system(world: &mut World, layout: &mut SceneLayout, customers: &mut Vec<Entity>) -> usize {
    let gone: Vec<Entity> = customers
        .iter()
        .copied()
        .filter(|&e| {
            world
                .query_one_mut::<(&Motion, &Actor)>(e)
                .map(|(motion, actor)| actor.as_customer().map(|c| has_left(c, motion)).unwrap_or(true))
                .unwrap_or(true)
        })
        .collect();
    if gone.is_empty() {
        return 0;
    }

    for &entity in &gone {
        let _ = world.despawn(entity);
    }
    customers.retain(|e| !gone.contains(e));
    resync_tables(world, layout, customers);
    gone.len()
}

/// Rebuild table occupancy from the guests that hold a table.
///
/// Leaving guests keep theirs until they are despawned.
pub fn resync_tables(world: &World, layout: &mut SceneLayout, customers: &[Entity]) {
    let seated: Vec<usize> = customers
        .iter()
        .filter_map(|&e| {
            let actor = world.get::<&Actor>(e).ok()?;
            let table = actor.as_customer()?.table;
            table
        })
        .collect();
    layout.resync_occupancy(seated);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{spawn_chef, spawn_waiter};
    use crate::systems::{spawn_customer, GuestOrder};
    use bistro_logic::menu::{FoodCategory, FoodItem};
    use bistro_logic::upgrades::UpgradeState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn queued_guest(world: &mut World, layout: &SceneLayout, id: u32) -> Entity {
        let e = spawn_customer(world, layout, id, 0, GuestOrder::plain("Oatmeal", 0xffffff), 22.0);
        let (motion, actor) = world.query_one_mut::<(&mut Motion, &mut Actor)>(e).unwrap();
        if let Some(c) = actor.as_customer_mut() {
            c.state = CustomerState::Queuing;
            motion.pos = c.queue_spot;
            motion.target = c.queue_spot;
        }
        e
    }

    fn state_of(world: &World, e: Entity) -> CustomerState {
        world.get::<&Actor>(e).unwrap().as_customer().unwrap().state
    }

    #[test]
    fn test_seating_fills_free_tables_and_queues_orders() {
        let mut world = World::new();
        let mut layout = SceneLayout::new(&UpgradeState::new());
        let mut kitchen = Kitchen::new();
        let guests: Vec<_> = (0..3).map(|i| queued_guest(&mut world, &layout, i)).collect();

        assert_eq!(seating_system(&mut world, &mut layout, &guests, &mut kitchen), 2);
        assert_eq!(kitchen.orders.len(), 2);
        assert_eq!(layout.occupied_count(), 2);
        assert_eq!(state_of(&world, guests[0]), CustomerState::WalkingToTable);
        assert_eq!(state_of(&world, guests[2]), CustomerState::Queuing);
    }

    #[test]
    fn test_busy_chef_leaves_ticket_on_backlog() {
        let mut world = World::new();
        let layout = SceneLayout::new(&UpgradeState::new());
        let chef = spawn_chef(&mut world, &layout, 0);
        let mut kitchen = Kitchen::new();
        kitchen.orders.push_back(chef);
        kitchen.orders.push_back(chef);

        assert_eq!(cooking_system(&mut world, &[chef], &mut kitchen, 40), 1);
        assert_eq!(kitchen.orders.len(), 1);
        assert_eq!(cooking_system(&mut world, &[chef], &mut kitchen, 40), 0);
        assert_eq!(kitchen.orders.len(), 1);
    }

    #[test]
    fn test_dish_goes_to_one_guest_only() {
        let mut world = World::new();
        let mut layout = SceneLayout::new(&UpgradeState::new());
        let chefs = vec![spawn_chef(&mut world, &layout, 0), spawn_chef(&mut world, &layout, 1)];
        let waiters = vec![spawn_waiter(&mut world, &layout, 0), spawn_waiter(&mut world, &layout, 1)];
        let guest = queued_guest(&mut world, &layout, 1);
        let mut kitchen = Kitchen::new();

        seating_system(&mut world, &mut layout, &[guest], &mut kitchen);
        world.get::<&mut Actor>(guest).unwrap().as_customer_mut().unwrap().state = CustomerState::WaitingForFood;
        for &c in &chefs {
            world.get::<&mut Actor>(c).unwrap().as_chef_mut().unwrap().dish_ready = true;
        }

        assert_eq!(matching_system(&mut world, &chefs, &waiters, &[guest], &mut kitchen), 1);
        assert_eq!(kitchen.deliveries.len(), 1);
        // The second dish stays with its chef.
        let still_holding = world.get::<&Actor>(chefs[1]).map(|a| matches!(&*a, Actor::Chef(c) if c.dish_ready)).unwrap();
        assert!(still_holding);
        assert_eq!(matching_system(&mut world, &chefs, &waiters, &[guest], &mut kitchen), 0);
    }

    #[test]
    fn test_delivery_scores_then_collects_payment() {
        let mut world = World::new();
        let mut layout = SceneLayout::new(&UpgradeState::new());
        let waiter = spawn_waiter(&mut world, &layout, 0);
        let guest = queued_guest(&mut world, &layout, 1);
        let mut kitchen = Kitchen::new();
        seating_system(&mut world, &mut layout, &[guest], &mut kitchen);
        kitchen.deliveries.push(PendingDelivery {
            waiter,
            customer: guest,
            phase: DeliveryPhase::WaitingDelivery,
            payout: 0,
            level: None,
            special: None,
            at: Vec2::ZERO,
        });

        let menu = Menu::build(&[FoodItem::new("Oatmeal", 150, FoodCategory::Rice)]);
        let ctx = ServeContext {
            menu: &menu,
            upgrade_bonus: 0.0,
            modifier_bonus: 0.0,
            profit_mult: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(5);

        // Idle waiter means the plate already landed.
        let events = delivery_system(&mut world, &mut kitchen, &ctx, &mut rng);
        assert_eq!(events.len(), 1);
        let ServiceEvent::Served { level, payout, .. } = events[0].clone() else {
            panic!("expected a served event");
        };
        // Zero wait: 50 + 30 + 2 ± 5 is always happy.
        assert_eq!(level, SatisfactionLevel::Happy);
        assert_eq!(payout, 2);
        assert_eq!(state_of(&world, guest), CustomerState::Eating);

        // Still eating: nothing to collect.
        assert!(delivery_system(&mut world, &mut kitchen, &ctx, &mut rng).is_empty());

        world.get::<&mut Actor>(guest).unwrap().as_customer_mut().unwrap().state = CustomerState::Leaving;
        let events = delivery_system(&mut world, &mut kitchen, &ctx, &mut rng);
        assert!(matches!(events[0], ServiceEvent::Paid { payout: 2, .. }));
        assert!(kitchen.deliveries.is_empty());
    }

    #[test]
    fn test_departure_frees_table() {
        let mut world = World::new();
        let mut layout = SceneLayout::new(&UpgradeState::new());
        let guest = queued_guest(&mut world, &layout, 1);
        let mut kitchen = Kitchen::new();
        seating_system(&mut world, &mut layout, &[guest], &mut kitchen);
        assert_eq!(layout.occupied_count(), 1);

        {
            let (motion, actor) = world.query_one_mut::<(&mut Motion, &mut Actor)>(guest).unwrap();
            let c = actor.as_customer_mut().unwrap();
            c.state = CustomerState::Leaving;
            motion.pos = Vec2::new(c.exit_x, c.door.y);
        }
        let mut customers = vec![guest];
        assert_eq!(departure_system(&mut world, &mut layout, &mut customers), 1);
        assert!(customers.is_empty());
        assert_eq!(layout.occupied_count(), 0);
        assert!(!world.contains(guest));
    }

    #[test]
    fn test_leaving_guest_holds_table_until_gone() {
        let mut world = World::new();
        let mut layout = SceneLayout::new(&UpgradeState::new());
        let mut kitchen = Kitchen::new();
        let leaver = queued_guest(&mut world, &layout, 1);
        let other = queued_guest(&mut world, &layout, 2);
        seating_system(&mut world, &mut layout, &[leaver, other], &mut kitchen);
        assert_eq!(layout.occupied_count(), 2);

        // One guest walks out, the other finishes at the door on the same tick.
        world.get::<&mut Actor>(leaver).unwrap().as_customer_mut().unwrap().state = CustomerState::Leaving;
        {
            let (motion, actor) = world.query_one_mut::<(&mut Motion, &mut Actor)>(other).unwrap();
            let c = actor.as_customer_mut().unwrap();
            c.state = CustomerState::Leaving;
            motion.pos = Vec2::new(c.exit_x, c.door.y);
        }
        let mut customers = vec![leaver, other];
        assert_eq!(departure_system(&mut world, &mut layout, &mut customers), 1);

        let held = world.get::<&Actor>(leaver).unwrap().as_customer().unwrap().table.unwrap();
        assert!(layout.tables[held].occupied);
        assert_eq!(layout.occupied_count(), 1);

        // A newcomer must not be seated at the held table.
        let newcomer = queued_guest(&mut world, &layout, 3);
        seating_system(&mut world, &mut layout, &[newcomer], &mut kitchen);
        let seat = world.get::<&Actor>(newcomer).unwrap().as_customer().unwrap().table;
        assert_ne!(seat, Some(held));
    }
}
