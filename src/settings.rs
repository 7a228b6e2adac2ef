//! Game rules and tuning
//!
//! Persisted as JSON: LocalStorage on the web, a read-only file named by
//! `SCRAMBLE_SETTINGS` natively.

use serde::{Deserialize, Serialize};

/// How elapsed frame time turns a speed into a per-tick displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DtScaling {
    /// `speed / dt` - the arcade's original formula. Movement shrinks as
    /// frames get longer, so slow machines scroll slower.
    #[default]
    Divide,
    /// `speed * dt / 1000` - speeds are units per second
    Multiply,
}

impl DtScaling {
    pub fn as_str(&self) -> &'static str {
        match self {
            DtScaling::Divide => "divide",
            DtScaling::Multiply => "multiply",
        }
    }

    /// Displacement for `speed` over a tick of `dt_ms` milliseconds
    pub fn apply(&self, speed: f32, dt_ms: f32) -> f32 {
        match self {
            DtScaling::Divide => speed / dt_ms,
            DtScaling::Multiply => speed * dt_ms / 1000.0,
        }
    }
}

/// Per-tick displacements derived from [`Settings`] and the frame time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Displacement {
    pub scroll: f32,
    pub player: f32,
    pub rocket: f32,
    pub spaceship: f32,
    pub bullet: f32,
    pub bomb: f32,
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (None = pick from the clock at startup)
    pub seed: Option<u64>,

    // === Lives ===
    /// Ships granted on every reset
    pub initial_ships: u8,
    /// Delay before respawning after a lost life (0 = immediate)
    pub life_lost_delay_ms: f64,
    /// Delay before returning to the title screen after game over
    pub game_over_delay_ms: f64,

    // === Speeds ===
    pub scroll_speed: f32,
    pub player_speed: f32,
    pub rocket_speed: f32,
    pub spaceship_speed: f32,
    pub bullet_speed: f32,
    pub bomb_speed: f32,
    /// Frame-time scaling for all speeds above
    pub dt_scaling: DtScaling,

    // === Enemy density ===
    /// Chance a flat floor edge launches a spaceship instead of rockets
    pub spaceship_chance: f64,
    /// Chance each rocket slot on a flat floor edge is occupied
    pub rocket_density: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            initial_ships: 3,
            life_lost_delay_ms: 1000.0,
            game_over_delay_ms: 3000.0,

            scroll_speed: 50.0,
            player_speed: 100.0,
            rocket_speed: 50.0,
            spaceship_speed: 50.0,
            bullet_speed: 400.0,
            bomb_speed: 100.0,
            dt_scaling: DtScaling::Divide,

            spaceship_chance: 0.2,
            rocket_density: 0.6,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Per-tick displacements for a tick of `dt_ms` milliseconds
    pub fn displacement(&self, dt_ms: f32) -> Displacement {
        let scale = |speed| self.dt_scaling.apply(speed, dt_ms);
        Displacement {
            scroll: scale(self.scroll_speed),
            player: scale(self.player_speed),
            rocket: scale(self.rocket_speed),
            spaceship: scale(self.spaceship_speed),
            bullet: scale(self.bullet_speed),
            bomb: scale(self.bomb_speed),
        }
    }

    /// Spaceship probability clamped to a valid range
    pub fn spaceship_probability(&self) -> f64 {
        clamp_probability(self.spaceship_chance)
    }

    /// Rocket slot probability clamped to a valid range
    pub fn rocket_probability(&self) -> f64 {
        clamp_probability(self.rocket_density)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "scramble_settings";

    /// Environment variable naming a native settings file
    #[cfg(not(target_arch = "wasm32"))]
    const SETTINGS_ENV: &'static str = "SCRAMBLE_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    ///
    /// Writes every field, so the stored entry doubles as an editable template.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `SCRAMBLE_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::SETTINGS_ENV) else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings file {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
