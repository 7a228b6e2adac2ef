//! Procedural terrain generation
//!
//! One generator per boundary (ceiling and floor). Each remembers only the
//! band it last ended on; every call to [`TerrainGenerator::advance`] emits
//! one 100-unit column that starts where the previous one stopped.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::consts::SCREEN_HEIGHT;

/// Which side of the tunnel a generator builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    Ceiling,
    Floor,
}

/// Discrete terrain height, named from the screen edge inward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    /// Flush with the screen edge (ceiling 0, floor 600)
    Open,
    /// One step in (ceiling 100, floor 500)
    Middle,
    /// Deepest intrusion (ceiling 200, floor 400)
    Inner,
}

impl Boundary {
    /// Screen y of a band on this boundary
    pub fn band_y(self, band: Band) -> f32 {
        match (self, band) {
            (Boundary::Ceiling, Band::Open) => 0.0,
            (Boundary::Ceiling, Band::Middle) => 100.0,
            (Boundary::Ceiling, Band::Inner) => 200.0,
            (Boundary::Floor, Band::Open) => 600.0,
            (Boundary::Floor, Band::Middle) => 500.0,
            (Boundary::Floor, Band::Inner) => 400.0,
        }
    }

    /// Screen edge the solid region is anchored to
    pub fn screen_edge(self) -> f32 {
        match self {
            Boundary::Ceiling => 0.0,
            Boundary::Floor => SCREEN_HEIGHT,
        }
    }

    /// Top y of the filler block between the middle band and the screen edge
    pub fn filler_top(self) -> f32 {
        match self {
            Boundary::Ceiling => 0.0,
            Boundary::Floor => 500.0,
        }
    }

    /// The y of `a` or `b` closest to the screen edge
    pub fn outermost(self, a: f32, b: f32) -> f32 {
        match self {
            Boundary::Ceiling => a.min(b),
            Boundary::Floor => a.max(b),
        }
    }
}

impl Band {
    /// Sample the next band
    ///
    /// From the open band: stay or step in, evenly. From the middle band:
    /// back out half the time, otherwise step in or stay evenly. The inner
    /// band always steps back to the middle.
    pub fn next<R: Rng + ?Sized>(self, rng: &mut R) -> Band {
        match self {
            Band::Open => {
                if rng.random_bool(0.5) {
                    Band::Open
                } else {
                    Band::Middle
                }
            }
            Band::Middle => {
                if rng.random_bool(0.5) {
                    Band::Open
                } else if rng.random_bool(0.5) {
                    Band::Inner
                } else {
                    Band::Middle
                }
            }
            Band::Inner => Band::Middle,
        }
    }

    /// Bands a transition from `self` may land on
    pub fn successors(self) -> &'static [Band] {
        match self {
            Band::Open => &[Band::Open, Band::Middle],
            Band::Middle => &[Band::Open, Band::Middle, Band::Inner],
            Band::Inner => &[Band::Middle],
        }
    }
}

/// Check if a transition needs a filler block behind its edge piece
///
/// The edge wedge only fills between the two levels; whenever the level
/// closest to the screen edge is the middle band, the remaining gap to the
/// screen edge is closed with a block.
pub fn needs_filler(from: Band, to: Band) -> bool {
    from == Band::Inner || to == Band::Inner || (from == Band::Middle && to == Band::Middle)
}

/// Pieces emitted for one column
#[derive(Debug, Clone)]
pub struct Column {
    /// Edge piece first, then the optional filler block
    pub pieces: Vec<Entity>,
    /// Where enemies may enter (flat floor edges only)
    pub spawn_site: Option<Vec2>,
}

/// Stateful producer of terrain columns for one boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGenerator {
    boundary: Boundary,
    band: Band,
}

impl TerrainGenerator {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            band: Band::Open,
        }
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn band(&self) -> Band {
        self.band
    }

    /// Current terrain height
    pub fn y(&self) -> f32 {
        self.boundary.band_y(self.band)
    }

    /// Flat piece at the current height, without advancing (bootstrap)
    pub fn flat(&self, x: f32) -> Entity {
        let y = self.y();
        Entity::edge(self.boundary, x, y, y)
    }

    /// Emit the column starting at `x` and move to the next band
    pub fn advance<R: Rng + ?Sized>(&mut self, x: f32, rng: &mut R) -> Column {
        let next = self.band.next(rng);
        let column = self.column(x, next);
        self.band = next;
        column
    }

    /// Build the pieces for a transition from the current band to `next`
    fn column(&self, x: f32, next: Band) -> Column {
        let y = self.y();
        let new_y = self.boundary.band_y(next);

        let mut pieces = Vec::with_capacity(2);
        pieces.push(Entity::edge(self.boundary, x, y, new_y));
        if needs_filler(self.band, next) {
            pieces.push(Entity::block(x, self.boundary.filler_top()));
        }

        let spawn_site = (self.boundary == Boundary::Floor && y == new_y).then(|| Vec2::new(x, y));

        log::trace!(
            "{:?} column at x={:.1}: {} -> {} ({} pieces)",
            self.boundary,
            x,
            y,
            new_y,
            pieces.len()
        );

        Column { pieces, spawn_site }
    }
}
