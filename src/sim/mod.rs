//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{BoundingBox, Segment, boxes_overlap, entities_collide, segments_intersect};
pub use entity::{Entity, EntityKind, SpaceshipMotion, bounding_box, fill_polygon, segments};
pub use state::{GamePhase, GameState, ScheduledTransition, Timers};
pub use terrain::{Band, Boundary, Column, TerrainGenerator};
pub use tick::{TickInput, tick};
