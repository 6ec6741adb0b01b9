//! Choice events - when a branching event is offered and which one.

use rand::seq::SliceRandom;
use rand::Rng;

use bistro_logic::choices::{keep_chance, trigger_chance, ChoiceEvent, CHOICE_EVENTS};

/// Roll for a choice event at the given reputation.
///
/// Fails most of the time; on success the catalog is thinned by rarity and one
/// survivor is picked uniformly.
pub fn roll_choice_event(reputation: f32, rng: &mut impl Rng) -> Option<&'static ChoiceEvent> {
    if rng.gen::<f32>() >= trigger_chance(reputation) {
        return None;
    }
    let candidates: Vec<&'static ChoiceEvent> = CHOICE_EVENTS
        .iter()
        .filter(|event| rng.gen::<f32>() < keep_chance(event.rarity))
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_logic::choices::Rarity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_trigger_rate_tracks_reputation() {
        let mut rng = StdRng::seed_from_u64(21);
        let trials = 20_000;
        let hits = (0..trials)
            .filter(|_| roll_choice_event(50.0, &mut rng).is_some())
            .count();
        // 0.15 + 50 × 0.002 = 0.25, less the rare empty candidate list.
        let rate = hits as f32 / trials as f32;
        assert!((rate - 0.25).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn test_legendary_events_are_uncommon() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut legendary = 0;
        let mut total = 0;
        for _ in 0..20_000 {
            if let Some(event) = roll_choice_event(100.0, &mut rng) {
                total += 1;
                if event.rarity == Rarity::Legendary {
                    legendary += 1;
                }
            }
        }
        assert!(total > 0);
        let legendary_share = legendary as f32 / total as f32;
        let legendary_in_catalog = CHOICE_EVENTS.iter().filter(|e| e.rarity == Rarity::Legendary).count() as f32
            / CHOICE_EVENTS.len() as f32;
        assert!(legendary_share < legendary_in_catalog);
    }
}
