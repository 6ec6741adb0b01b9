//! Event log - ambient flavor text, system notices and the bounded feed.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use bistro_logic::achievements::Achievement;
use bistro_logic::day_night::{TimeOfDay, Weather};
use bistro_logic::upgrades::UpgradeId;

/// Feed categories, used by hosts for icons and colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Gossip,
    Chef,
    Waiter,
    Cat,
    Weather,
    Time,
    Rare,
    Achievement,
    Upgrade,
    System,
}

impl EventCategory {
    /// Suggested accent color, `0xRRGGBB`.
    pub fn color(&self) -> u32 {
        match self {
            EventCategory::Gossip => 0x8b8b9e,
            EventCategory::Chef => 0xffcc02,
            EventCategory::Waiter => 0xef4444,
            EventCategory::Cat => 0xf5a623,
            EventCategory::Weather => 0x87ceeb,
            EventCategory::Time => 0xa78bfa,
            EventCategory::Rare => 0xff69b4,
            EventCategory::Achievement => 0x4ade80,
            EventCategory::Upgrade => 0x60a5fa,
            EventCategory::System => 0xe0d8c0,
        }
    }
}

/// One line in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: u64,
    pub text: String,
    pub category: EventCategory,
    pub gold_reward: Option<u64>,
    pub is_rare: bool,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Newest-first feed with a fixed capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<LogEvent>,
    capacity: usize,
    next_id: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(50)
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Build an event with the next id. Not yet in the feed.
    pub fn make(&mut self, text: impl Into<String>, category: EventCategory, now_ms: i64) -> LogEvent {
        let id = self.next_id;
        self.next_id += 1;
        LogEvent {
            id,
            text: text.into(),
            category,
            gold_reward: None,
            is_rare: false,
            timestamp: now_ms,
        }
    }

    /// Add to the front, dropping the oldest past capacity.
    pub fn push(&mut self, event: LogEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&LogEvent> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ── Text pools ─────────────────────────────────────────────────────────

const GOSSIP: &[&str] = &[
    "Table two is arguing about whether soup counts as a drink",
    "A regular swears the broth tastes better on Tuesdays",
    "Someone left a five-star doodle on a napkin",
    "Two students are splitting one dessert very carefully",
    "A guest asked for the recipe and got a wink instead",
    "The neighbors say the smell reaches the bus stop",
    "A first date is going surprisingly well",
    "Somebody is photographing every dish before eating",
];

const CHEF: &[&str] = &[
    "The chef is humming while stirring the pot",
    "A pan flipped perfectly, nobody saw it",
    "The chef tasted the sauce and nodded seriously",
    "Fresh herbs just arrived at the back door",
    "The chef is sharpening knives with great focus",
    "A new plating idea is being tested",
];

const WAITER: &[&str] = &[
    "The waiter balanced four plates without a wobble",
    "A guest tipped the waiter with a compliment",
    "The waiter remembered a regular's usual order",
    "Napkins folded into tiny cats, again",
    "The waiter is polishing glasses at the counter",
    "A spilled drink was cleaned up in record time",
];

const CAT: &[&str] = &[
    "The cat is napping on the warmest chair",
    "The cat stared at a guest until they shared a shrimp",
    "A child is petting the cat very gently",
    "The cat knocked a spoon off the counter, on purpose",
    "The cat is purring loud enough to hear from the door",
    "A guest came in just to see the cat",
];

const WEATHER_SUNNY: &[&str] = &[
    "Sunshine is pouring in through the windows",
    "Perfect weather for a walk to lunch",
    "Guests are asking for something cold",
];

const WEATHER_CLOUDY: &[&str] = &[
    "Grey skies, warm soup weather",
    "Clouds are rolling in, the room feels cozy",
    "A quiet overcast afternoon",
];

const WEATHER_RAINY: &[&str] = &[
    "Rain is drumming on the roof",
    "Guests are shaking off umbrellas by the door",
    "Someone ran in to escape the rain and stayed for dinner",
];

const WEATHER_SNOWY: &[&str] = &[
    "Snow is falling outside the window",
    "Hot drinks are flying out of the kitchen",
    "Guests stamp snow off their boots at the door",
];

const TIME_DAWN: &[&str] = &[
    "Early risers are drifting in for breakfast",
    "The first coffee of the day is brewing",
];

const TIME_DAY: &[&str] = &[
    "The lunch rush is in full swing",
    "Office workers are grabbing a quick bite",
];

const TIME_DUSK: &[&str] = &[
    "The sunset paints the dining room orange",
    "Dinner guests are starting to arrive",
];

const TIME_NIGHT: &[&str] = &[
    "Night owls are ordering late snacks",
    "The street outside has gone quiet",
];

const RARE: &[(&str, u64)] = &[
    ("A famous food critic dropped by and loved it!", 10),
    ("A celebrity dined here quietly until fans noticed!", 8),
    ("A couple booked a tasting for their wedding banquet!", 15),
    ("A travel magazine came to take photos!", 12),
    ("The shop next door brought its whole staff for dinner!", 20),
    ("A retired chef tasted the food and was impressed!", 8),
    ("Someone recommended the bistro on a live stream!", 10),
    ("A mysterious old guest left behind an ancient recipe", 5),
    ("The hundredth guest ate free and wrote a glowing review!", 8),
    ("A charity asked to partner with the bistro!", 6),
];

fn weather_pool(weather: Weather) -> &'static [&'static str] {
    match weather {
        Weather::Sunny => WEATHER_SUNNY,
        Weather::Cloudy => WEATHER_CLOUDY,
        Weather::Rainy => WEATHER_RAINY,
        Weather::Snowy => WEATHER_SNOWY,
    }
}

fn time_pool(time: TimeOfDay) -> &'static [&'static str] {
    match time {
        TimeOfDay::Dawn => TIME_DAWN,
        TimeOfDay::Day => TIME_DAY,
        TimeOfDay::Dusk => TIME_DUSK,
        TimeOfDay::Night => TIME_NIGHT,
    }
}

fn pick_text(pool: &[&str], rng: &mut impl Rng) -> String {
    pool.choose(rng).copied().unwrap_or("A quiet moment in the bistro").to_string()
}

/// Roll one ambient event for the current conditions.
///
/// 2% rare (with gold), then cat chatter if a mascot lives here, weather,
/// time of day, kitchen, floor staff and gossip.
pub fn generate_ambient_event(
    log: &mut EventLog,
    weather: Weather,
    time: TimeOfDay,
    has_mascot: bool,
    rng: &mut impl Rng,
    now_ms: i64,
) -> LogEvent {
    let roll: f32 = rng.gen();

    if roll < 0.02 {
        let (text, gold) = RARE.choose(rng).copied().unwrap_or(RARE[0]);
        let mut event = log.make(text, EventCategory::Rare, now_ms);
        event.gold_reward = Some(gold);
        event.is_rare = true;
        return event;
    }

    let (pool, category) = if roll < 0.12 && has_mascot {
        (CAT, EventCategory::Cat)
    } else if roll < 0.25 {
        (weather_pool(weather), EventCategory::Weather)
    } else if roll < 0.38 {
        (time_pool(time), EventCategory::Time)
    } else if roll < 0.55 {
        (CHEF, EventCategory::Chef)
    } else if roll < 0.70 {
        (WAITER, EventCategory::Waiter)
    } else {
        (GOSSIP, EventCategory::Gossip)
    };

    let text = pick_text(pool, rng);
    let mut event = log.make(text, category, now_ms);
    if category == EventCategory::Cat && rng.gen::<f32>() < 0.2 {
        event.gold_reward = Some(2);
    }
    event
}

pub fn achievement_event(log: &mut EventLog, achievement: &Achievement, now_ms: i64) -> LogEvent {
    log.make(
        format!("Achievement unlocked: {}! {}", achievement.name, achievement.description),
        EventCategory::Achievement,
        now_ms,
    )
}

pub fn upgrade_event(log: &mut EventLog, id: UpgradeId, now_ms: i64) -> LogEvent {
    let text = match id {
        UpgradeId::StoveLevel => "The stove got an upgrade, cooking is faster",
        UpgradeId::ChefCount => "A new chef joined the kitchen",
        UpgradeId::TableCount => "New tables moved in, more guests fit now",
        UpgradeId::TableLevel => "Comfier tables and chairs for everyone",
        UpgradeId::WaiterCount => "A new waiter is on the floor",
        UpgradeId::WallDecor => "Fresh decorations went up on the walls",
        UpgradeId::FloorLevel => "The floor has been redone, good as new",
        UpgradeId::CatMascot => "A cat has joined the bistro family! Meow~",
        UpgradeId::TakeoutWindow => "The takeout window is open for business",
    };
    log.make(text, EventCategory::Upgrade, now_ms)
}

pub fn system_event(log: &mut EventLog, text: impl Into<String>, gold: Option<u64>, now_ms: i64) -> LogEvent {
    let mut event = log.make(text, EventCategory::System, now_ms);
    event.gold_reward = gold;
    event
}
