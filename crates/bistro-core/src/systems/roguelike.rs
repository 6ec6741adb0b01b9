//! Daily modifiers - the roll at the start of each calendar day, the stored
//! day ledger and the optional timed challenge.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use bistro_logic::constants::TICK_RATE_HZ;
use bistro_logic::modifiers::{self, aggregate, keep_chance, polarity_for_roll, Modifier, ModifierEffects, Polarity, TimedChallenge, MODIFIERS};
use bistro_logic::reputation::{ReputationState, Tier};

use crate::clock::calendar_day;

/// Persistent day ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoguelikeState {
    pub day_count: u32,
    /// Ids of today's modifiers
    pub active_modifiers: Vec<String>,
    /// Every distinct modifier id ever rolled, first-seen order
    pub modifier_history: Vec<String>,
    /// Epoch milliseconds of the last day start
    pub last_day_timestamp: Option<i64>,
    pub total_modifiers_encountered: u32,
}

impl RoguelikeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no day was ever started, or the last one was on another calendar day.
    pub fn is_new_day(&self, now_ms: i64, utc_offset_minutes: i32) -> bool {
        match self.last_day_timestamp {
            None => true,
            Some(last) => calendar_day(last, utc_offset_minutes) != calendar_day(now_ms, utc_offset_minutes),
        }
    }

    pub fn start_day(&mut self, rolled: &[&'static Modifier], now_ms: i64) {
        self.active_modifiers = rolled.iter().map(|m| m.id.to_string()).collect();
        self.day_count += 1;
        self.last_day_timestamp = Some(now_ms);
        self.total_modifiers_encountered += rolled.len() as u32;
        for modifier in rolled {
            if !self.modifier_history.iter().any(|id| id == modifier.id) {
                self.modifier_history.push(modifier.id.to_string());
            }
        }
    }

    /// Today's modifiers. Ids missing from the catalog are skipped.
    pub fn active(&self) -> Vec<&'static Modifier> {
        self.active_modifiers
            .iter()
            .filter_map(|id| modifiers::find(id))
            .collect()
    }

    pub fn effects(&self) -> ModifierEffects {
        aggregate(self.active())
    }
}

/// Roll today's modifiers for the current reputation.
///
/// One or two slots (three at the legendary tier). Rare and legendary entries
/// survive a pre-filter only sometimes; each slot then draws a polarity bucket
/// from the tier's positive weight. Never returns duplicates or an empty day.
pub fn roll_daily_modifiers(reputation: &ReputationState, rng: &mut impl Rng) -> Vec<&'static Modifier> {
    let positive_weight = reputation.info().positive_weight;
    let mut count = rng.gen_range(1..=2);
    if reputation.tier == Tier::Legendary {
        count = (count + 1).min(3);
    }

    let pool: Vec<&'static Modifier> = MODIFIERS
        .iter()
        .filter(|m| rng.gen::<f32>() < keep_chance(m.rarity))
        .collect();

    let mut chosen: Vec<&'static Modifier> = Vec::with_capacity(count);
    for _ in 0..count {
        let polarity = polarity_for_roll(rng.gen(), positive_weight);
        let mut candidates: Vec<&'static Modifier> = pool.iter().copied().filter(|m| m.polarity == polarity).collect();
        if candidates.is_empty() {
            candidates = pool.clone();
        }
        candidates.retain(|m| !chosen.iter().any(|c| c.id == m.id));
        if let Some(&pick) = candidates.choose(rng) {
            chosen.push(pick);
        }
    }

    if chosen.is_empty() {
        let positives: Vec<&'static Modifier> = MODIFIERS.iter().filter(|m| m.polarity == Polarity::Positive).collect();
        if let Some(&pick) = positives.choose(rng) {
            chosen.push(pick);
        }
    }
    chosen
}

/// A running timed challenge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub target: u32,
    pub reward: u64,
    pub served: u32,
    /// Frame by which the target must be met
    pub deadline: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Completed { reward: u64 },
    Expired { served: u32, target: u32 },
}

impl ChallengeProgress {
    pub fn start(challenge: &TimedChallenge, frame: u64) -> Self {
        Self {
            target: challenge.target,
            reward: challenge.reward,
            served: 0,
            deadline: frame + challenge.seconds as u64 * TICK_RATE_HZ as u64,
        }
    }

    pub fn record_served(&mut self) {
        self.served += 1;
    }
}

/// Decide a challenge once it is met or out of time.
pub fn challenge_system(progress: &ChallengeProgress, frame: u64) -> Option<ChallengeOutcome> {
    if progress.served >= progress.target {
        Some(ChallengeOutcome::Completed { reward: progress.reward })
    } else if frame >= progress.deadline {
        Some(ChallengeOutcome::Expired {
            served: progress.served,
            target: progress.target,
        })
    } else {
        None
    }
}
