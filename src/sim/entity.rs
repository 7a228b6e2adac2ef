//! Entity model
//!
//! Player, enemies, projectiles and terrain all share one shape contract:
//! a position, a list of segments for fine collision and a bounding box for
//! coarse rejection. Shapes are derived from the variant tag on demand.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{BoundingBox, Segment};
use super::terrain::Boundary;
use crate::consts::*;
use crate::settings::Displacement;

/// Spaceship flight plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpaceshipMotion {
    /// Rising straight up until reaching `cruise_y`
    Climbing { cruise_y: f32 },
    /// Circling around a center that scrolls with the terrain
    Orbiting { center: Vec2, angle: f32 },
}

/// Variant tag with per-variant motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    /// Ground rocket; lifts off once scrolled left of `liftoff_x`
    Rocket { liftoff_x: f32 },
    Spaceship {
        motion: SpaceshipMotion,
        orbit_radius: f32,
    },
    /// `prev` is the position before the current tick's move
    Bullet { prev: Vec2 },
    /// `drop` is the vertical/horizontal travel ratio, grows to 1.0
    Bomb { prev: Vec2, drop: f32 },
    /// Terrain line from (x, y) to (x + 100, to_y) with a fill wedge behind it
    TerrainEdge { boundary: Boundary, to_y: f32 },
    /// Solid 100x100 filler; position is its top-left corner
    TerrainBlock,
}

/// A game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub kind: EntityKind,
    /// Set during a tick, pruned at tick end
    pub collided: bool,
}

impl Entity {
    fn new(x: f32, y: f32, kind: EntityKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
            collided: false,
        }
    }

    pub fn player(x: f32, y: f32) -> Self {
        Self::new(x, y, EntityKind::Player)
    }

    pub fn rocket(x: f32, y: f32, liftoff_x: f32) -> Self {
        Self::new(x, y, EntityKind::Rocket { liftoff_x })
    }

    pub fn spaceship(x: f32, y: f32, cruise_y: f32, orbit_radius: f32) -> Self {
        Self::new(
            x,
            y,
            EntityKind::Spaceship {
                motion: SpaceshipMotion::Climbing { cruise_y },
                orbit_radius,
            },
        )
    }

    pub fn bullet(x: f32, y: f32) -> Self {
        let pos = Vec2::new(x, y);
        Self::new(x, y, EntityKind::Bullet { prev: pos })
    }

    pub fn bomb(x: f32, y: f32) -> Self {
        let pos = Vec2::new(x, y);
        Self::new(x, y, EntityKind::Bomb { prev: pos, drop: 0.0 })
    }

    pub fn edge(boundary: Boundary, x: f32, y: f32, to_y: f32) -> Self {
        Self::new(x, y, EntityKind::TerrainEdge { boundary, to_y })
    }

    pub fn block(x: f32, top: f32) -> Self {
        Self::new(x, top, EntityKind::TerrainBlock)
    }

    /// Check if this is a rocket or spaceship
    pub fn is_enemy(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Rocket { .. } | EntityKind::Spaceship { .. }
        )
    }

    /// Shift left with the terrain
    pub fn scroll(&mut self, dx: f32) {
        self.pos.x -= dx;
        if let EntityKind::Spaceship {
            motion: SpaceshipMotion::Orbiting { ref mut center, .. },
            ..
        } = self.kind
        {
            center.x -= dx;
        }
    }

    /// Advance one tick of variant-specific motion
    ///
    /// Terrain and the player are moved elsewhere (scroll pass and input).
    pub fn step(&mut self, d: &Displacement) {
        match self.kind {
            EntityKind::Rocket { liftoff_x } => {
                self.pos.x -= d.scroll;
                if self.pos.x < liftoff_x {
                    self.pos.y -= d.rocket;
                }
            }
            EntityKind::Spaceship {
                ref mut motion,
                orbit_radius,
            } => match *motion {
                SpaceshipMotion::Climbing { cruise_y } => {
                    self.pos.x -= d.scroll;
                    self.pos.y -= d.spaceship;
                    if self.pos.y <= cruise_y {
                        // Enter the orbit at angle 0 so the position is continuous
                        *motion = SpaceshipMotion::Orbiting {
                            center: self.pos - Vec2::new(orbit_radius, 0.0),
                            angle: 0.0,
                        };
                    }
                }
                SpaceshipMotion::Orbiting { center, angle } => {
                    let center = center - Vec2::new(d.scroll, 0.0);
                    let angle = angle + SPACESHIP_ORBIT_STEP;
                    self.pos = center + Vec2::new(angle.cos(), angle.sin()) * orbit_radius;
                    *motion = SpaceshipMotion::Orbiting { center, angle };
                }
            },
            EntityKind::Bullet { ref mut prev } => {
                *prev = self.pos;
                self.pos.x += d.bullet;
            }
            EntityKind::Bomb {
                ref mut prev,
                ref mut drop,
            } => {
                *prev = self.pos;
                *drop = (*drop + BOMB_DROP_RATE).min(1.0);
                self.pos += Vec2::new(1.0, *drop) * d.bomb;
            }
            EntityKind::Player
            | EntityKind::TerrainEdge { .. }
            | EntityKind::TerrainBlock => {}
        }
    }
}

/// Line segments making up an entity, for fine collision
pub fn segments(e: &Entity) -> Vec<Segment> {
    let Vec2 { x, y } = e.pos;
    let p = Vec2::new;
    let closed = |pts: &[Vec2]| -> Vec<Segment> {
        pts.iter()
            .zip(pts.iter().cycle().skip(1))
            .map(|(&a, &b)| Segment::new(a, b))
            .collect()
    };

    match e.kind {
        EntityKind::Player => closed(&[
            p(x - PLAYER_HALF_LENGTH, y - PLAYER_HALF_HEIGHT),
            p(x + PLAYER_HALF_LENGTH, y),
            p(x - PLAYER_HALF_LENGTH, y + PLAYER_HALF_HEIGHT),
        ]),
        EntityKind::Rocket { .. } => closed(&[
            p(x - ROCKET_HALF_WIDTH, y + ROCKET_HALF_HEIGHT),
            p(x, y - ROCKET_HALF_HEIGHT),
            p(x + ROCKET_HALF_WIDTH, y + ROCKET_HALF_HEIGHT),
        ]),
        EntityKind::Spaceship { .. } => {
            let (w, h) = (SPACESHIP_HALF_WIDTH, SPACESHIP_HALF_HEIGHT);
            let inset = w / 3.0;
            closed(&[
                p(x - w, y),
                p(x - inset, y - h),
                p(x + inset, y - h),
                p(x + w, y),
                p(x + inset, y + h),
                p(x - inset, y + h),
            ])
        }
        EntityKind::Bullet { prev } => {
            vec![Segment::new(p(prev.x - BULLET_LENGTH, prev.y), e.pos)]
        }
        EntityKind::Bomb { prev, .. } => {
            let mut lines = closed(&[
                p(x - BOMB_SIZE, y),
                p(x, y - BOMB_SIZE),
                p(x + BOMB_SIZE, y),
                p(x, y + BOMB_SIZE),
            ]);
            if prev != e.pos {
                lines.push(Segment::new(prev, e.pos));
            }
            lines
        }
        EntityKind::TerrainEdge { to_y, .. } => {
            vec![Segment::new(
                p(x - TERRAIN_SEAM, y),
                p(x + COLUMN_WIDTH, to_y),
            )]
        }
        EntityKind::TerrainBlock => Vec::new(),
    }
}

/// Axis-aligned box bounding every segment of the entity
pub fn bounding_box(e: &Entity) -> BoundingBox {
    match e.kind {
        EntityKind::TerrainBlock => BoundingBox::new(
            e.pos.x - TERRAIN_SEAM,
            e.pos.y,
            e.pos.x + COLUMN_WIDTH,
            e.pos.y + COLUMN_WIDTH,
        ),
        _ => BoundingBox::enclosing(&segments(e)),
    }
}

/// Closed polygon filled behind a terrain piece, if it has one
///
/// Edges fill the wedge between the line and the corner on the screen-edge
/// side; flat edges have no area. Blocks fill their whole square.
pub fn fill_polygon(e: &Entity) -> Option<Vec<Vec2>> {
    let Vec2 { x, y } = e.pos;
    let left = x - TERRAIN_SEAM;
    let right = x + COLUMN_WIDTH;

    match e.kind {
        EntityKind::TerrainEdge { boundary, to_y } if to_y != y => {
            let outer = boundary.outermost(y, to_y);
            let corner = if to_y == outer {
                Vec2::new(left, to_y)
            } else {
                Vec2::new(right, y)
            };
            Some(vec![Vec2::new(left, y), Vec2::new(right, to_y), corner])
        }
        EntityKind::TerrainBlock => Some(vec![
            Vec2::new(left, y),
            Vec2::new(right, y),
            Vec2::new(right, y + COLUMN_WIDTH),
            Vec2::new(left, y + COLUMN_WIDTH),
        ]),
        _ => None,
    }
}
