//! Time-of-day bands, weather weights and overlay tints.

use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE_HZ;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    /// Band for a local wall-clock hour (0–23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=7 => Self::Dawn,
            8..=16 => Self::Day,
            17..=19 => Self::Dusk,
            _ => Self::Night,
        }
    }

    /// Overlay drawn on top of the frame, `None` in full daylight.
    pub fn tint(self) -> Option<Rgba> {
        match self {
            Self::Dawn => Some(Rgba::new(255, 200, 120, 0.12)),
            Self::Day => None,
            Self::Dusk => Some(Rgba::new(255, 130, 60, 0.15)),
            Self::Night => Some(Rgba::new(30, 30, 80, 0.25)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

const WEATHER_WEIGHTS: [(Weather, f32); 4] = [
    (Weather::Sunny, 5.0),
    (Weather::Cloudy, 3.0),
    (Weather::Rainy, 1.5),
    (Weather::Snowy, 0.5),
];

/// Weather lasts between five and fifteen minutes of real time.
pub const WEATHER_MIN_TICKS: u64 = 5 * 60 * TICK_RATE_HZ as u64;
pub const WEATHER_MAX_TICKS: u64 = 15 * 60 * TICK_RATE_HZ as u64;

impl Weather {
    /// Weighted pick with `roll` in `[0, 1)`.
    pub fn pick(roll: f32) -> Self {
        let total: f32 = WEATHER_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut remaining = roll * total;
        for (weather, weight) in WEATHER_WEIGHTS {
            remaining -= weight;
            if remaining <= 0.0 {
                return weather;
            }
        }
        Self::Sunny
    }
}

/// Straight-alpha color for overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}
