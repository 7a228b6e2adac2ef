//! Per-frame simulation tick
//!
//! Advances the game clock, fires due phase transitions and, while playing,
//! runs one step of the simulation. The step order is part of the rules:
//! input, weapons, terrain, motion, collisions, pruning, death check.

use glam::Vec2;

use super::collision::entities_collide;
use super::entity::Entity;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire a bullet (already edge-filtered)
    pub fire_bullet: bool,
    /// Drop a bomb (already edge-filtered)
    pub fire_bomb: bool,
}

/// Advance the game by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if !(dt_ms > 0.0 && dt_ms.is_finite()) {
        log::trace!("Ignoring tick with dt={}", dt_ms);
        return;
    }

    state.clock_ms += dt_ms as f64;
    state.fire_due_transitions();

    if state.phase != GamePhase::Playing {
        return;
    }

    let d = state.settings.displacement(dt_ms);

    // Move the player; x is clamped, y is not
    let player = &mut state.player.pos;
    if input.left {
        player.x -= d.player;
    }
    if input.up {
        player.y -= d.player;
    }
    if input.right {
        player.x += d.player;
    }
    if input.down {
        player.y += d.player;
    }
    player.x = player.x.clamp(PLAYER_MIN_X, PLAYER_MAX_X);

    // Weapons leave from the nose (bullets) and the belly (bombs)
    if input.fire_bullet {
        let at = muzzle(&state.player);
        state.bullets.push(Entity::bullet(at.x, at.y));
    }
    if input.fire_bomb {
        let at = bomb_bay(&state.player);
        state.bombs.push(Entity::bomb(at.x, at.y));
    }

    scroll_terrain(state, d.scroll);

    for entity in state
        .rockets
        .iter_mut()
        .chain(state.spaceships.iter_mut())
        .chain(state.bullets.iter_mut())
        .chain(state.bombs.iter_mut())
    {
        entity.step(&d);
    }

    resolve_collisions(state);
    prune(state);

    if state.player.collided {
        state.set_phase(GamePhase::LifeLost);
    }
}

/// Shift the terrain left; refill and prune once the right end comes into view
fn scroll_terrain(state: &mut GameState, dx: f32) {
    let mut rightmost: Option<f32> = None;
    for piece in &mut state.obstacles {
        piece.scroll(dx);
        rightmost = Some(rightmost.map_or(piece.pos.x, |r| r.max(piece.pos.x)));
    }

    if let Some(rightmost) = rightmost.filter(|&x| x < TERRAIN_REFILL_X) {
        state.add_column(rightmost + COLUMN_WIDTH);
        state.obstacles.retain(|o| o.pos.x > -COLUMN_WIDTH);
    }
}

/// Mark collisions, in rule order
///
/// A projectile scores at most once and an enemy can only be destroyed once,
/// so a bomb that hits an enemy and the ground in the same tick scores 10.
/// Projectiles pass through enemies already flagged earlier in the tick.
fn resolve_collisions(state: &mut GameState) {
    // Terrain vs player
    if state
        .obstacles
        .iter()
        .any(|o| entities_collide(o, &state.player))
    {
        state.player.collided = true;
    }

    // Enemies vs player and terrain
    for enemy in state.rockets.iter_mut().chain(state.spaceships.iter_mut()) {
        if entities_collide(enemy, &state.player) {
            state.player.collided = true;
            enemy.collided = true;
        }
        if state.obstacles.iter().any(|o| entities_collide(o, enemy)) {
            enemy.collided = true;
        }
    }

    // Bullets vs enemies
    for bullet in &mut state.bullets {
        for enemy in state.rockets.iter_mut().chain(state.spaceships.iter_mut()) {
            if !enemy.collided && entities_collide(bullet, enemy) {
                bullet.collided = true;
                enemy.collided = true;
                state.score += ENEMY_POINTS;
                break;
            }
        }
    }

    // Bombs vs enemies, then terrain
    for bomb in &mut state.bombs {
        for enemy in state.rockets.iter_mut().chain(state.spaceships.iter_mut()) {
            if !enemy.collided && entities_collide(bomb, enemy) {
                bomb.collided = true;
                enemy.collided = true;
                state.score += ENEMY_POINTS;
                break;
            }
        }
        if state.obstacles.iter().any(|o| entities_collide(bomb, o)) {
            bomb.collided = true;
        }
    }
}

/// Drop everything destroyed this tick or gone off-screen
fn prune(state: &mut GameState) {
    state
        .rockets
        .retain(|r| !r.collided && r.pos.x >= ROCKET_MIN_X && r.pos.y >= ROCKET_MIN_Y);
    state
        .spaceships
        .retain(|s| !s.collided && s.pos.x >= SPACESHIP_MIN_X);
    state
        .bullets
        .retain(|b| !b.collided && b.pos.x <= BULLET_MAX_X);
    state
        .bombs
        .retain(|b| !b.collided && b.pos.x <= BOMB_MAX_X && b.pos.y <= BOMB_MAX_Y);
}

/// Where bullets leave the ship (its nose)
pub fn muzzle(player: &Entity) -> Vec2 {
    player.pos + Vec2::new(PLAYER_HALF_LENGTH, 0.0)
}

/// Where bombs leave the ship (its belly)
pub fn bomb_bay(player: &Entity) -> Vec2 {
    player.pos + Vec2::new(0.0, PLAYER_HALF_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::EntityKind;
    use crate::sim::terrain::Boundary;

    /// Fixed synthetic frame time: 100 ms makes the default speeds
    /// scroll 0.5 and move the player 1.0 per tick
    const DT: f32 = 100.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        state.start_game();
        state
    }

    /// Playing state with enemy spawning switched off
    fn quiet(seed: u64) -> GameState {
        let mut state = GameState::new(
            seed,
            Settings {
                spaceship_chance: 0.0,
                rocket_density: 0.0,
                ..Default::default()
            },
        );
        state.start_game();
        state
    }

    #[test]
    fn test_idle_does_not_simulate() {
        let mut state = GameState::new(1, Settings::default());
        let before = state.obstacles.clone();
        tick(
            &mut state,
            &TickInput {
                right: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.obstacles, before);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
    }

    #[test]
    fn test_left_at_boundary_is_clamped() {
        let mut state = quiet(1);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.pos, Vec2::new(100.0, 300.0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_speed_uses_divided_dt() {
        let mut state = quiet(1);
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        // 100 / 100 ms
        assert_eq!(state.player.pos, Vec2::new(101.0, 301.0));

        tick(&mut state, &input, 50.0);
        // 100 / 50 ms
        assert_eq!(state.player.pos, Vec2::new(103.0, 303.0));
    }

    #[test]
    fn test_right_clamp() {
        let mut state = quiet(1);
        state.player.pos.x = 699.5;
        tick(
            &mut state,
            &TickInput {
                right: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.player.pos.x, PLAYER_MAX_X);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut state = quiet(1);
        let clock = state.clock_ms;
        let obstacles = state.obstacles.clone();
        for dt in [0.0, -16.0, f32::NAN, f32::INFINITY] {
            tick(&mut state, &TickInput::default(), dt);
        }
        assert_eq!(state.clock_ms, clock);
        assert_eq!(state.obstacles, obstacles);
    }

    #[test]
    fn test_fire_spawns_one_bullet_and_one_bomb() {
        let mut state = quiet(1);
        let input = TickInput {
            fire_bullet: true,
            fire_bomb: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bombs.len(), 1);

        // Bullet left from the nose and has already moved this tick
        match state.bullets[0].kind {
            EntityKind::Bullet { prev } => {
                assert_eq!(prev, muzzle(&state.player));
                assert_eq!(state.bullets[0].pos.x, prev.x + 4.0);
            }
            ref other => panic!("expected bullet, got {:?}", other),
        }

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bombs.len(), 1);
    }

    #[test]
    fn test_terrain_scrolls_and_refills() {
        let mut state = quiet(11);
        let rightmost = |s: &GameState| {
            s.obstacles
                .iter()
                .map(|o| o.pos.x)
                .fold(f32::NEG_INFINITY, f32::max)
        };
        assert_eq!(rightmost(&state), 800.0);

        // 0.5 per tick: 181 ticks bring the 800 column to 709.5
        for _ in 0..181 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(rightmost(&state), 809.5);
        assert!(state.obstacles.iter().all(|o| o.pos.x > -COLUMN_WIDTH));

        // Both boundaries always have a piece in the refill column
        let newest: Vec<_> = state
            .obstacles
            .iter()
            .filter(|o| o.pos.x == 809.5)
            .filter_map(|o| match o.kind {
                EntityKind::TerrainEdge { boundary, .. } => Some(boundary),
                _ => None,
            })
            .collect();
        assert!(newest.contains(&Boundary::Ceiling));
        assert!(newest.contains(&Boundary::Floor));
    }

    #[test]
    fn test_long_run_prunes_offscreen_terrain() {
        let rightmost = |state: &GameState| {
            state
                .obstacles
                .iter()
                .map(|o| o.pos.x)
                .fold(f32::MIN, f32::max)
        };

        let mut state = quiet(4);
        let mut refills = 0;
        for _ in 0..5000 {
            let before = rightmost(&state);
            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.phase, GamePhase::Playing);

            // Pruning only happens on refill, so pieces drift up to one
            // column past the cut-off in between
            assert!(state.obstacles.iter().all(|o| o.pos.x > -2.0 * COLUMN_WIDTH));
            assert!(state.obstacles.len() < 60);

            if rightmost(&state) > before {
                refills += 1;
                assert!(state.obstacles.iter().all(|o| o.pos.x > -COLUMN_WIDTH));
            }
        }
        assert!(refills > 20);
    }

    #[test]
    fn test_terrain_collision_costs_a_life() {
        let mut state = quiet(2);
        // Drop a wall right across the player
        state
            .obstacles
            .push(Entity::edge(Boundary::Floor, 50.0, 350.0, 250.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::LifeLost);
        assert_eq!(state.ships, 2);
    }

    #[test]
    fn test_last_life_collision_ends_game() {
        let mut state = quiet(2);
        state.ships = 1;
        state
            .obstacles
            .push(Entity::edge(Boundary::Floor, 50.0, 350.0, 250.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.ships, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        // 3000 ms later the title screen is back with a fresh game
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.ships, 3);
    }

    #[test]
    fn test_life_lost_respawns_after_delay() {
        let mut state = quiet(2);
        state.score = 30;
        state
            .obstacles
            .push(Entity::edge(Boundary::Floor, 50.0, 350.0, 250.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::LifeLost);

        // Remove the wall so the respawned ship survives
        state.obstacles.retain(|o| o.pos.x != 49.5);
        for _ in 0..9 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::LifeLost);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 30);
        assert!(!state.player.collided);
    }

    #[test]
    fn test_rocket_ramming_player_destroys_both() {
        let mut state = quiet(3);
        state.rockets.push(Entity::rocket(115.0, 300.0, 0.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.rockets.is_empty());
        assert_eq!(state.phase, GamePhase::LifeLost);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_rocket_hitting_ceiling_is_removed() {
        let mut state = quiet(3);
        // Just below the ceiling line at y=0, already past liftoff
        state.rockets.push(Entity::rocket(400.0, 9.8, 900.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.rockets.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_bullet_destroys_rocket_and_scores() {
        let mut state = quiet(3);
        state.rockets.push(Entity::rocket(400.0, 300.0, 0.0));
        state.bullets.push(Entity::bullet(395.0, 301.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.rockets.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, ENEMY_POINTS);
    }

    #[test]
    fn test_bullet_scores_only_once() {
        let mut state = quiet(3);
        state.rockets.push(Entity::rocket(400.0, 300.0, 0.0));
        state.rockets.push(Entity::rocket(401.0, 300.0, 0.0));
        state.bullets.push(Entity::bullet(395.0, 301.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, ENEMY_POINTS);
        assert_eq!(state.rockets.len(), 1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bomb_hitting_enemy_and_ground_scores_once() {
        let mut state = quiet(3);
        // Ground line under the bomb with a rocket standing on it
        state
            .obstacles
            .push(Entity::edge(Boundary::Floor, 300.0, 350.0, 350.0));
        state.rockets.push(Entity::rocket(352.0, 340.0, 0.0));
        state.bombs.push(Entity::bomb(350.0, 349.0));

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.bombs.is_empty());
        assert!(state.rockets.is_empty());
        assert_eq!(state.score, ENEMY_POINTS);
    }

    #[test]
    fn test_bomb_into_ground_scores_nothing() {
        let mut state = quiet(3);
        state
            .obstacles
            .push(Entity::edge(Boundary::Floor, 300.0, 350.0, 350.0));
        state.bombs.push(Entity::bomb(350.0, 349.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.bombs.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_offscreen_projectiles_and_ships_are_pruned() {
        let mut state = quiet(3);
        state.bullets.push(Entity::bullet(809.0, 300.0));
        state.spaceships.push(Entity::spaceship(-9.8, 300.0, 0.0, 20.0));
        // Past the right edge, and below the bottom edge
        state.bombs.push(Entity::bomb(809.5, 300.0));
        state.bombs.push(Entity::bomb(400.0, 609.95));
        // Climbed off the top, and scrolled off the left
        state.rockets.push(Entity::rocket(400.0, -19.8, 900.0));
        state.rockets.push(Entity::rocket(-9.8, 300.0, 0.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.bullets.is_empty());
        assert!(state.spaceships.is_empty());
        assert!(state.bombs.is_empty());
        assert!(state.rockets.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_projectile_passes_enemy_already_destroyed_by_terrain() {
        let mut state = quiet(3);
        // The rocket crosses the ceiling this tick; the bullet sweeps
        // through its flank afterwards
        state.rockets.push(Entity::rocket(400.0, 9.8, 900.0));
        state.bullets.push(Entity::bullet(395.0, 5.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.rockets.is_empty());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let script = |i: usize| TickInput {
            up: i % 40 < 10,
            down: (20..30).contains(&(i % 40)),
            right: i % 100 < 50,
            fire_bullet: i % 7 == 0,
            fire_bomb: i % 23 == 0,
            ..Default::default()
        };

        let run = || {
            let mut state = playing(2024);
            for i in 0..600 {
                tick(&mut state, &script(i), 16.0);
            }
            (
                state.phase,
                state.score,
                state.ships,
                state.player.pos,
                state.obstacles.len(),
                state.rockets.len(),
                state.spaceships.len(),
            )
        };

        assert_eq!(run(), run());
    }
}
