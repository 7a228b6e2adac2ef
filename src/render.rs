//! Vector drawing
//!
//! The simulation never draws. Hosts implement [`Canvas`] over whatever
//! surface they have (a 2D canvas context in the browser, a recorder in
//! tests) and call [`draw_game`] and [`draw_info`] once per frame.

use glam::Vec2;

use crate::sim::{Entity, EntityKind, GamePhase, GameState, fill_polygon, segments};

/// CSS color string
pub type Color = &'static str;

pub const LINE_COLOR: Color = "#FFFFFF";
pub const TERRAIN_FILL: Color = "#7090E7";
pub const ROCKET_COLOR: Color = "#3ED6C4";
pub const SPACESHIP_COLOR: Color = "#E7D870";
pub const BULLET_COLOR: Color = "#FFFFFF";
pub const BOMB_COLOR: Color = "#E77070";

pub const LINE_WIDTH: f32 = 2.0;
pub const OVERLAY_TEXT_PX: f32 = 24.0;
pub const INFO_TEXT_PX: f32 = 18.0;

/// Drawing surface
pub trait Canvas {
    /// Blank the whole surface
    fn clear(&mut self);

    /// Stroke an open polyline through `points`
    fn stroke_path(&mut self, points: &[Vec2], width: f32, color: Color);

    /// Fill the closed polygon through `points`
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Draw `text` with its baseline starting at `at`
    fn fill_text(&mut self, text: &str, at: Vec2, size_px: f32, color: Color);
}

/// Close a polygon outline so it can be stroked as one path
fn outline(points: &[Vec2]) -> Vec<Vec2> {
    let mut path = points.to_vec();
    if let Some(&first) = points.first() {
        path.push(first);
    }
    path
}

/// Draw a single entity
pub fn draw_entity(canvas: &mut dyn Canvas, e: &Entity) {
    match e.kind {
        EntityKind::TerrainEdge { .. } => {
            if let Some(wedge) = fill_polygon(e) {
                canvas.fill_polygon(&wedge, TERRAIN_FILL);
            }
            for s in segments(e) {
                canvas.stroke_path(&[s.a, s.b], LINE_WIDTH, LINE_COLOR);
            }
        }
        EntityKind::TerrainBlock => {
            if let Some(square) = fill_polygon(e) {
                canvas.fill_polygon(&square, TERRAIN_FILL);
            }
        }
        EntityKind::Bullet { .. } => {
            for s in segments(e) {
                canvas.stroke_path(&[s.a, s.b], LINE_WIDTH, BULLET_COLOR);
            }
        }
        EntityKind::Bomb { .. } => {
            // Diamond only; the swept trail is for collision
            let corners: Vec<Vec2> = segments(e).iter().take(4).map(|s| s.a).collect();
            canvas.fill_polygon(&corners, BOMB_COLOR);
        }
        EntityKind::Player => {
            let corners: Vec<Vec2> = segments(e).iter().map(|s| s.a).collect();
            canvas.stroke_path(&outline(&corners), LINE_WIDTH, LINE_COLOR);
        }
        EntityKind::Rocket { .. } => {
            let corners: Vec<Vec2> = segments(e).iter().map(|s| s.a).collect();
            canvas.fill_polygon(&corners, ROCKET_COLOR);
            canvas.stroke_path(&outline(&corners), LINE_WIDTH, LINE_COLOR);
        }
        EntityKind::Spaceship { .. } => {
            let corners: Vec<Vec2> = segments(e).iter().map(|s| s.a).collect();
            canvas.fill_polygon(&corners, SPACESHIP_COLOR);
            canvas.stroke_path(&outline(&corners), LINE_WIDTH, LINE_COLOR);
        }
    }
}

/// Draw one frame of the play field
pub fn draw_game(canvas: &mut dyn Canvas, state: &GameState) {
    canvas.clear();

    for piece in &state.obstacles {
        draw_entity(canvas, piece);
    }

    match state.phase {
        GamePhase::Idle => {
            canvas.fill_text(
                "SCRAMBLE",
                Vec2::new(325.0, 225.0),
                OVERLAY_TEXT_PX,
                LINE_COLOR,
            );
            canvas.fill_text(
                "click to play",
                Vec2::new(330.0, 350.0),
                OVERLAY_TEXT_PX,
                LINE_COLOR,
            );
        }
        GamePhase::Playing => {
            draw_entity(canvas, &state.player);
            let dynamic = state
                .rockets
                .iter()
                .chain(&state.spaceships)
                .chain(&state.bullets)
                .chain(&state.bombs);
            for e in dynamic {
                draw_entity(canvas, e);
            }
        }
        GamePhase::LifeLost => {}
        GamePhase::GameOver => {
            canvas.fill_text(
                "GAME OVER",
                Vec2::new(325.0, 300.0),
                OVERLAY_TEXT_PX,
                LINE_COLOR,
            );
        }
    }
}

/// Score line shown on the info strip
pub fn score_text(score: u64) -> String {
    format!("{:05}", score)
}

/// Draw the score and ship count
pub fn draw_info(canvas: &mut dyn Canvas, state: &GameState) {
    canvas.clear();
    canvas.fill_text("SCORE:", Vec2::new(10.0, 25.0), INFO_TEXT_PX, LINE_COLOR);
    canvas.fill_text(
        &score_text(state.score),
        Vec2::new(90.0, 25.0),
        INFO_TEXT_PX,
        LINE_COLOR,
    );
    canvas.fill_text("SHIPS:", Vec2::new(600.0, 25.0), INFO_TEXT_PX, LINE_COLOR);
    canvas.fill_text(
        &state.ships.to_string(),
        Vec2::new(680.0, 25.0),
        INFO_TEXT_PX,
        LINE_COLOR,
    );
}
