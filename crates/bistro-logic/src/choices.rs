//! Branching choice events - catalog, outcome resolution, encounter ledger.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use crate::modifiers::Rarity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceOutcome {
    pub description: &'static str,
    pub probability: f32,
    pub gold_delta: i64,
    pub satisfaction_delta: f32,
    pub reputation_delta: f32,
    /// Named reward unlocked by this outcome, e.g. `"royal_seal"`.
    pub special: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub description: &'static str,
    pub outcomes: &'static [ChoiceOutcome],
    pub requires_mascot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub options: &'static [ChoiceOption],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    NoOpenChoice,
    OptionOutOfRange { index: usize, options: usize },
    RequiresMascot,
}

impl std::fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOpenChoice => write!(f, "No choice event is open"),
            Self::OptionOutOfRange { index, options } => {
                write!(f, "Option {} out of range ({} options)", index, options)
            }
            Self::RequiresMascot => write!(f, "Option requires the mascot cat"),
        }
    }
}

impl std::error::Error for ChoiceError {}

impl ChoiceEvent {
    /// Validate an option pick against the event and the player's mascot.
    pub fn option(&self, index: usize, has_mascot: bool) -> Result<&'static ChoiceOption, ChoiceError> {
        let options: &'static [ChoiceOption] = self.options;
        let option = options.get(index).ok_or(ChoiceError::OptionOutOfRange {
            index,
            options: options.len(),
        })?;
        if option.requires_mascot && !has_mascot {
            return Err(ChoiceError::RequiresMascot);
        }
        Ok(option)
    }
}

impl ChoiceOption {
    /// Walk cumulative probabilities with a single `roll` in `[0, 1)`.
    /// Falls back to the last outcome when rounding leaves a gap.
    pub fn resolve(&self, roll: f32) -> &'static ChoiceOutcome {
        let outcomes: &'static [ChoiceOutcome] = self.outcomes;
        let mut cumulative = 0.0;
        for outcome in outcomes {
            cumulative += outcome.probability;
            if roll <= cumulative {
                return outcome;
            }
        }
        // Every catalog option has at least one outcome.
        &outcomes[outcomes.len() - 1]
    }
}

/// Chance that a rarity survives the candidate filter.
pub fn keep_chance(rarity: Rarity) -> f32 {
    match rarity {
        Rarity::Common => 1.0,
        Rarity::Rare => 0.35,
        Rarity::Legendary => 0.1,
    }
}

/// Chance that a due scheduler tick presents an event at all.
pub fn trigger_chance(reputation: f32) -> f32 {
    0.15 + reputation * 0.002
}

pub fn find(id: &str) -> Option<&'static ChoiceEvent> {
    CHOICE_EVENTS.iter().find(|e| e.id == id)
}

/// What the player has been through so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceEventState {
    pub encountered: BTreeSet<String>,
    pub total_choices_made: u32,
    pub legendary_count: u32,
    pub special_rewards: BTreeSet<String>,
}

impl ChoiceEventState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book a resolved choice.
    pub fn record(&mut self, event: &ChoiceEvent, outcome: &ChoiceOutcome) {
        self.encountered.insert(event.id.to_string());
        self.total_choices_made += 1;
        if event.rarity == Rarity::Legendary {
            self.legendary_count += 1;
        }
        if let Some(special) = outcome.special {
            self.special_rewards.insert(special.to_string());
        }
    }
}

macro_rules! o {
    ($description:expr, $probability:expr, $gold:expr, $satisfaction:expr, $reputation:expr) => {
        ChoiceOutcome {
            description: $description,
            probability: $probability,
            gold_delta: $gold,
            satisfaction_delta: $satisfaction,
            reputation_delta: $reputation,
            special: None,
        }
    };
}

macro_rules! opt {
    ($label:expr, $description:expr, $outcomes:expr) => {
        ChoiceOption {
            label: $label,
            description: $description,
            outcomes: $outcomes,
            requires_mascot: false,
        }
    };
}

pub const CHOICE_EVENTS: &[ChoiceEvent] = &[
    ChoiceEvent {
        id: "mystery_cat",
        title: "The Mysterious Black Cat",
        description: "A black cat in a tiny cape waits at the door, eyes full of secrets...",
        rarity: Rarity::Rare,
        options: &[
            opt!("Invite it in for dinner", "Could be a VIP", &[
                o!("A food critic in disguise! Glowing review.", 0.6, 8, 10.0, 5.0),
                o!("Just a freeloader. Free meal, no thanks.", 0.3, -3, -5.0, -2.0),
                ChoiceOutcome {
                    description: "A legendary chef! It teaches you a secret recipe.",
                    probability: 0.1,
                    gold_delta: 15,
                    satisfaction_delta: 20.0,
                    reputation_delta: 10.0,
                    special: Some("secret_recipe"),
                },
            ]),
            opt!("Politely say you're full", "Safety first", &[
                o!("The cat nods and walks away.", 1.0, 0, 0.0, 0.0),
            ]),
            ChoiceOption {
                label: "Send the mascot to greet it",
                description: "Cats have their own language",
                outcomes: &[
                    o!("Instant friends! The black cat becomes a regular.", 0.8, 10, 15.0, 8.0),
                    o!("A long staring contest... then a shared nap.", 0.2, 2, 5.0, 1.0),
                ],
                requires_mascot: true,
            },
        ],
    },
    ChoiceEvent {
        id: "food_truck",
        title: "Food Truck",
        description: "A fancy food truck parks outside and offers a partnership...",
        rarity: Rarity::Common,
        options: &[
            opt!("Partner up and share guests", "Grow the pie together", &[
                o!("Great teamwork, both sides got busier.", 0.7, 5, 5.0, 3.0),
                o!("Their food was better and stole your guests...", 0.3, -4, -5.0, -2.0),
            ]),
            opt!("Decline", "This is my turf", &[
                o!("The truck leaves. Business as usual.", 0.8, 0, 0.0, 0.0),
                o!("It reopened next door and split your crowd.", 0.2, -2, 0.0, -1.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "stray_kitten",
        title: "Stray Kitten",
        description: "A skinny kitten mews at the door, clearly hungry...",
        rarity: Rarity::Common,
        options: &[
            opt!("Prepare a bowl of food", "Costs 2 gold", &[
                o!("Full and happy, it rubs your leg. Guests are touched.", 0.7, -2, 15.0, 5.0),
                o!("It brought all its stray friends... chaos.", 0.2, -2, -5.0, 2.0),
                o!("It was a rich family's lost pet! Big reward!", 0.1, 20, 10.0, 10.0),
            ]),
            opt!("Gently shoo it away", "Not a place for strays", &[
                o!("It leaves... some guests look disapproving.", 0.6, 0, -5.0, -2.0),
                o!("It found someone else to look after it.", 0.4, 0, 0.0, 0.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "tv_show",
        title: "Cooking Show Invitation",
        description: "A TV station wants to film a food segment at your bistro!",
        rarity: Rarity::Rare,
        options: &[
            opt!("Accept!", "Free advertising", &[
                o!("The episode is a hit! Famous overnight!", 0.5, 15, 10.0, 15.0),
                o!("Filming went fine, results were modest.", 0.3, 5, 0.0, 5.0),
                o!("The chef panicked on camera...", 0.2, -5, -10.0, -8.0),
            ]),
            opt!("Decline and stay low-key", "Good food speaks for itself", &[
                o!("Regulars appreciate the focus.", 1.0, 2, 5.0, 1.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "ingredient_deal",
        title: "Mysterious Merchant",
        description: "A cloaked merchant cat: \"Rare ingredients, interested?\"",
        rarity: Rarity::Common,
        options: &[
            opt!("Buy them (-5 gold)", "Might be good stuff", &[
                o!("Prime truffles! A superb dish and a fat profit!", 0.4, 10, 20.0, 5.0),
                o!("Decent quality, today's dishes improved.", 0.4, 0, 10.0, 2.0),
                o!("All nearly expired... a loss.", 0.2, -5, -10.0, -3.0),
            ]),
            opt!("No, thanks", "Never trust a stranger's goods", &[
                o!("The merchant shrugs and leaves.", 1.0, 0, 0.0, 0.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "wedding_party",
        title: "Wedding Booking",
        description: "A pair of cat newlyweds want their reception at your bistro!",
        rarity: Rarity::Rare,
        options: &[
            opt!("Go all out (-3 gold)", "It has to be perfect", &[
                o!("A perfect reception! A generous thank-you tip.", 0.7, 15, 25.0, 10.0),
                o!("A few hiccups, but overall fine.", 0.25, 5, 5.0, 3.0),
                o!("The cake collapsed... they laughed it off.", 0.05, 0, -5.0, -1.0),
            ]),
            opt!("Suggest a bigger venue", "We're not ready", &[
                o!("They understood and still stopped by for a meal.", 1.0, 2, 0.0, 0.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "food_critic_v2",
        title: "Anonymous Critic",
        description: "Word is an anonymous food critic will dine here today...",
        rarity: Rarity::Rare,
        options: &[
            opt!("Everyone on top form!", "Every dish must be perfect", &[
                o!("Flawless service! A perfect score!", 0.5, 12, 20.0, 12.0),
                o!("Solid showing, an 80 out of 100.", 0.35, 5, 5.0, 3.0),
                o!("Nerves caused mistakes, the critic frowned...", 0.15, -3, -10.0, -5.0),
            ]),
            opt!("Business as usual", "True gold fears no fire", &[
                o!("The critic liked your calm. Good review.", 0.6, 5, 10.0, 5.0),
                o!("An unremarkable day.", 0.4, 0, 0.0, 0.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "charity_event",
        title: "Charity Dinner",
        description: "The neighborhood asks you to feed fifty cats for free at a charity dinner",
        rarity: Rarity::Common,
        options: &[
            opt!("Of course! (-8 gold)", "Give back", &[
                o!("A huge success, the news covered it!", 0.8, -8, 10.0, 15.0),
                o!("Expensive, but it feels right.", 0.2, -8, 5.0, 8.0),
            ]),
            opt!("Donate gold instead", "Money, not time (-3 gold)", &[
                o!("The neighborhood thanks you.", 1.0, -3, 0.0, 3.0),
            ]),
            opt!("Sorry, can't right now", "Business is tight", &[
                o!("Everyone understands.", 0.7, 0, 0.0, -1.0),
                o!("Some call you stingy behind your back...", 0.3, 0, -5.0, -3.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "renovation_offer",
        title: "Renovation Offer",
        description: "A contractor offers a half-price makeover if you close for a bit...",
        rarity: Rarity::Common,
        options: &[
            opt!("Great deal, renovate (-5 gold)", "A fresh look on the cheap", &[
                o!("Stunning! Guests rave about it.", 0.6, -5, 20.0, 8.0),
                o!("So-so, but better than before.", 0.3, -5, 5.0, 2.0),
                o!("Shoddy work... worse than before.", 0.1, -5, -10.0, -3.0),
            ]),
            opt!("No, thanks", "I'll upgrade my own way", &[
                o!("Slow and steady.", 1.0, 0, 0.0, 0.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "cat_competition",
        title: "Cat Cooking Contest",
        description: "The citywide cat cooking contest is open for entries!",
        rarity: Rarity::Legendary,
        options: &[
            opt!("Enter and show off!", "Big prize for the winner", &[
                o!("Champion! Prize money and fame!", 0.3, 30, 30.0, 20.0),
                o!("Third place, not bad at all!", 0.4, 10, 10.0, 8.0),
                o!("Out in round one... lessons learned.", 0.3, 0, -5.0, 2.0),
            ]),
            opt!("Just watch this time", "Maybe next year", &[
                o!("Picked up plenty of tricks.", 1.0, 0, 5.0, 1.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "royal_visit",
        title: "Royal Visit",
        description: "Rumor says the royal cat will dine incognito somewhere today...",
        rarity: Rarity::Legendary,
        options: &[
            opt!("Prepare a royal welcome", "No mistakes allowed (-5 gold)", &[
                ChoiceOutcome {
                    description: "The royal cat loved it! Royal seal of approval!",
                    probability: 0.4,
                    gold_delta: 25,
                    satisfaction_delta: 30.0,
                    reputation_delta: 20.0,
                    special: Some("royal_seal"),
                },
                o!("No royal visit, but other guests enjoyed the feast.", 0.4, 0, 15.0, 5.0),
                o!("The royal cat came and had a quibble, mostly pleased.", 0.2, 10, 0.0, 5.0),
            ]),
            opt!("Just do the usual", "Keep calm", &[
                o!("An ordinary day.", 0.7, 0, 0.0, 0.0),
                o!("The royal cat came and loved the honesty!", 0.3, 15, 20.0, 12.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "delivery_app",
        title: "Delivery App",
        description: "A delivery app wants a 30% cut in exchange for steady orders",
        rarity: Rarity::Common,
        options: &[
            opt!("Sign up, reach more guests", "High cut, high volume", &[
                o!("Orders keep coming! Thin margins, good money.", 0.7, 8, 0.0, 3.0),
                o!("Packaging complaints hurt the reviews...", 0.3, 3, -5.0, -2.0),
            ]),
            opt!("Decline, focus on dine-in", "Quality first", &[
                o!("Dine-in got even better.", 1.0, 0, 5.0, 2.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "cooking_class",
        title: "Cooking Class",
        description: "Someone suggests teaching cat cooking classes on the side",
        rarity: Rarity::Common,
        options: &[
            opt!("Start teaching (-3 gold)", "Teaching is learning", &[
                o!("A hit! Students became regulars!", 0.6, 7, 10.0, 5.0),
                o!("Few sign-ups, still good experience.", 0.3, -1, 0.0, 2.0),
                o!("A student out-cooked you... awkward.", 0.1, -3, -5.0, 1.0),
            ]),
            opt!("Not now", "Focus on the bistro", &[
                o!("Focus makes you stronger.", 1.0, 0, 0.0, 0.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "ghost_story",
        title: "Ghost Rumor",
        description: "Guests claim they saw a ghost cat in the dining room last night...",
        rarity: Rarity::Rare,
        options: &[
            opt!("Host a spooky theme night", "Turn it into an opportunity", &[
                o!("A hit with the young crowd! Lines out the door!", 0.6, 12, 15.0, 8.0),
                o!("Scared off a few timid guests...", 0.3, -2, -10.0, -3.0),
                o!("A real alley cat fell from the ceiling! Thrilling!", 0.1, 5, 5.0, 5.0),
            ]),
            opt!("Deny the rumor", "Issue a statement", &[
                o!("The rumor died down quickly.", 0.8, 0, 0.0, 0.0),
                o!("Denials drew more attention... and guests.", 0.2, 3, 0.0, -1.0),
            ]),
        ],
    },
    ChoiceEvent {
        id: "spice_merchant",
        title: "Spice Trader",
        description: "A far-traveled merchant brings spices you've never seen...",
        rarity: Rarity::Common,
        options: &[
            opt!("Buy the exotic spices (-4 gold)", "Try new flavors", &[
                o!("A smash hit, a new signature flavor!", 0.5, 6, 15.0, 5.0),
                o!("Some loved it, some didn't.", 0.4, 0, 0.0, 1.0),
                o!("Too spicy! A guest was brought to tears...", 0.1, -4, -15.0, -3.0),
            ]),
            opt!("Buy a little to try (-1 gold)", "Play it safe", &[
                o!("Worked well, buy more next time.", 0.8, 1, 5.0, 1.0),
                o!("Nothing special.", 0.2, -1, 0.0, 0.0),
            ]),
        ],
    },
];
