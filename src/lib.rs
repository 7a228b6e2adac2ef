//! Scramble - A side-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, entities, collisions, game state)
//! - `input`: Keyboard state with edge-triggered fire buttons
//! - `render`: Canvas drawing boundary
//! - `settings`: Data-driven game rules

pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use input::{InputState, Key};
pub use settings::{DtScaling, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player spawn point
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    /// Horizontal clamp for the player ship
    pub const PLAYER_MIN_X: f32 = 100.0;
    pub const PLAYER_MAX_X: f32 = 700.0;
    /// Player ship half extents (nose points right)
    pub const PLAYER_HALF_LENGTH: f32 = 20.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 10.0;

    /// Terrain column width
    pub const COLUMN_WIDTH: f32 = 100.0;
    /// Number of flat columns placed before generation starts
    pub const BOOTSTRAP_COLUMNS: u32 = 8;
    /// A new column is generated once the rightmost piece scrolls left of this
    pub const TERRAIN_REFILL_X: f32 = 710.0;
    /// Overlap added on the left of every terrain piece so columns have no seams
    pub const TERRAIN_SEAM: f32 = 1.0;

    /// Rocket half extents
    pub const ROCKET_HALF_WIDTH: f32 = 5.0;
    pub const ROCKET_HALF_HEIGHT: f32 = 10.0;
    /// Liftoff thresholds are sampled from this x range
    pub const ROCKET_LIFTOFF_MIN_X: f32 = 300.0;
    pub const ROCKET_LIFTOFF_MAX_X: f32 = 650.0;
    /// Rocket slots on a flat floor edge, as offsets from the edge start
    pub const ROCKET_SLOTS: [f32; 5] = [10.0, 30.0, 50.0, 70.0, 90.0];

    /// Spaceship half extents
    pub const SPACESHIP_HALF_WIDTH: f32 = 15.0;
    pub const SPACESHIP_HALF_HEIGHT: f32 = 6.0;
    /// Cruise altitudes are sampled from this y range
    pub const SPACESHIP_CRUISE_MIN_Y: f32 = 120.0;
    pub const SPACESHIP_CRUISE_MAX_Y: f32 = 300.0;
    /// Orbit radii are sampled from this range
    pub const SPACESHIP_ORBIT_MIN_RADIUS: f32 = 20.0;
    pub const SPACESHIP_ORBIT_MAX_RADIUS: f32 = 50.0;
    /// Orbit angular step per tick (radians)
    pub const SPACESHIP_ORBIT_STEP: f32 = 0.05;

    /// Bullet dash length
    pub const BULLET_LENGTH: f32 = 8.0;
    /// Bomb diamond half size
    pub const BOMB_SIZE: f32 = 4.0;
    /// Vertical/horizontal ratio gained by a bomb each tick (capped at 1.0)
    pub const BOMB_DROP_RATE: f32 = 0.1;

    /// Score for destroying an enemy
    pub const ENEMY_POINTS: u64 = 10;

    /// Off-screen escape limits
    pub const BULLET_MAX_X: f32 = 810.0;
    pub const SPACESHIP_MIN_X: f32 = -10.0;
    pub const ROCKET_MIN_X: f32 = -10.0;
    pub const ROCKET_MIN_Y: f32 = -20.0;
    pub const BOMB_MAX_X: f32 = 810.0;
    pub const BOMB_MAX_Y: f32 = 610.0;
}
