//! Day/night cycle - wall-clock time of day and rolling weather.

use rand::Rng;
use serde::{Deserialize, Serialize};

use bistro_logic::day_night::{TimeOfDay, Weather, WEATHER_MAX_TICKS, WEATHER_MIN_TICKS};

use crate::clock::Clock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayNightState {
    pub hour: u32,
    pub minute: u32,
    pub time_of_day: TimeOfDay,
    pub weather: Weather,
    /// Frame at which the weather is re-rolled
    pub weather_until: u64,
}

impl DayNightState {
    pub fn new(clock: &dyn Clock, frame: u64, rng: &mut impl Rng) -> Self {
        let mut state = Self {
            hour: 0,
            minute: 0,
            time_of_day: TimeOfDay::Night,
            weather: Weather::Sunny,
            weather_until: 0,
        };
        state.refresh(clock, frame, rng);
        state
    }

    pub fn is_night(&self) -> bool {
        self.time_of_day == TimeOfDay::Night
    }
}

/// Re-read the local time; roll new weather once the current spell ran out.
pub fn day_night_system(state: &mut DayNightState, clock: &dyn Clock, frame: u64, rng: &mut impl Rng) {
    state.refresh(clock, frame, rng);
}

impl DayNightState {
    fn refresh(&mut self, clock: &dyn Clock, frame: u64, rng: &mut impl Rng) {
        let (hour, minute) = clock.local_hour_minute();
        self.hour = hour;
        self.minute = minute;
        self.time_of_day = TimeOfDay::from_hour(hour);

        if frame >= self.weather_until {
            let next = Weather::pick(rng.gen());
            if next != self.weather {
                log::debug!("weather turned {:?}", next);
            }
            self.weather = next;
            self.weather_until = frame + rng.gen_range(WEATHER_MIN_TICKS..=WEATHER_MAX_TICKS);
        }
    }
}
