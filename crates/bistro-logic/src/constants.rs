//! Simulation constants - tick rate, wait thresholds, entity speeds, canvas size.
//!
//! Every duration below is expressed in logical ticks. The engine runs at a
//! single fixed rate of [`TICK_RATE_HZ`]; hosts that render faster simply call
//! the tick function on an accumulator.

/// Logical simulation ticks per real second.
pub const TICK_RATE_HZ: u32 = 8;

/// Logical canvas size in pixels.
pub const CANVAS_W: f32 = 560.0;
pub const CANVAS_H: f32 = 400.0;

/// Moving entities flip their walk frame every this many ticks.
pub const TICKS_PER_ANIMATION_FRAME: u32 = 8;

pub mod speeds {
    //! Movement speeds in pixels per tick.
    pub const CHEF: f32 = 1.5;
    pub const WAITER: f32 = 2.0;
    pub const CUSTOMER: f32 = 1.8;
    pub const MASCOT: f32 = 0.6;
    pub const BOSS: f32 = 0.0;
}

pub mod timing {
    //! Entity-level durations in ticks.

    /// Chef emits a steam puff this often while cooking.
    pub const STEAM_INTERVAL: u32 = 8;
    /// Waiter dwell at the pickup window.
    pub const PICKUP_DWELL: u32 = 12;
    /// A waiting customer shows an annoyed puff once after this long.
    pub const ANNOYED_AFTER: u32 = 120;
    /// Eating durations by guest kind.
    pub const EAT_DEFAULT: u32 = 60;
    pub const EAT_ROYAL: u32 = 80;
    pub const EAT_INFLUENCER: u32 = 45;
    /// How long the boss stays visible once triggered.
    pub const BOSS_VISIBLE: u32 = 200;
    /// Distance (px) from the exit at which a leaving customer is removed.
    pub const EXIT_TOLERANCE: f32 = 2.0;
}

pub mod satisfaction {
    //! Satisfaction scoring inputs.

    /// Waits at or under this many ticks earn the full bonus.
    pub const WAIT_HAPPY: u32 = 40;
    /// Waits at or under this many ticks earn the small bonus.
    pub const WAIT_NEUTRAL: u32 = 120;
    pub const BASE_SCORE: f32 = 50.0;
    pub const FAST_BONUS: f32 = 30.0;
    pub const OK_BONUS: f32 = 10.0;
    pub const SLOW_PENALTY: f32 = -20.0;
    pub const MENU_BONUS_CAP: f32 = 15.0;
    /// Jitter is drawn uniformly from `[-JITTER, JITTER]`.
    pub const JITTER: f32 = 5.0;
    pub const HAPPY_AT: f32 = 70.0;
    pub const NEUTRAL_AT: f32 = 40.0;
    /// Number of recent scores kept by the tracker.
    pub const TRACKER_CAPACITY: usize = 20;
}

pub mod economy {
    //! Gold and progression constants.

    /// Gold a brand new restaurant starts with.
    pub const STARTING_GOLD: u64 = 10;
    /// Cumulative gold needed per restaurant level.
    pub const GOLD_PER_LEVEL: u64 = 50;
    /// Upgrade prices grow by this factor per level.
    pub const UPGRADE_COST_GROWTH: f64 = 1.5;
    /// Base cooking time before stove upgrades and modifiers.
    pub const BASE_COOK_TICKS: u32 = 40;
    /// Extra guests allowed beyond the table count (the queue).
    pub const QUEUE_ALLOWANCE: usize = 3;
    /// Queue spacing in pixels per waiting guest.
    pub const QUEUE_SPACING: f32 = 22.0;
    /// Payouts at or above this size count toward the big-payout stat.
    pub const BIG_PAYOUT: u64 = 5;
    /// Menu name used when the player has logged no food yet.
    pub const FALLBACK_DISH: &str = "House Kibble";
}

pub mod reputation {
    //! Reputation bounds.
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;
    pub const INITIAL: f32 = 15.0;
    pub const HISTORY_LEN: usize = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_thresholds_ordered() {
        assert!(satisfaction::WAIT_HAPPY < satisfaction::WAIT_NEUTRAL);
        assert!(satisfaction::NEUTRAL_AT < satisfaction::HAPPY_AT);
    }

    #[test]
    fn test_waiter_outpaces_chef() {
        assert!(speeds::WAITER > speeds::CHEF);
        assert!(speeds::MASCOT < speeds::CUSTOMER);
    }
}
