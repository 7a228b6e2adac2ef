//! Game state and phase machine
//!
//! `GameState` owns everything the simulation touches. It is only mutated by
//! [`super::tick`] and by the phase transitions below.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::terrain::{Boundary, TerrainGenerator};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start trigger
    Idle,
    /// Active gameplay
    Playing,
    /// Player just crashed; waiting to respawn
    LifeLost,
    /// Out of ships; waiting to return to the title screen
    GameOver,
}

/// A phase change waiting on the game clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTransition {
    pub target: GamePhase,
    pub fire_at_ms: f64,
}

/// Pending delayed transitions
///
/// At most one entry per target phase: scheduling a target again replaces the
/// earlier entry, so re-entering a phase never stacks duplicate timers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<ScheduledTransition>,
}

impl Timers {
    pub fn schedule(&mut self, target: GamePhase, fire_at_ms: f64) {
        self.pending.retain(|t| t.target != target);
        self.pending.push(ScheduledTransition { target, fire_at_ms });
    }

    /// Remove and return the earliest transition due at `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<GamePhase> {
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.fire_at_ms.total_cmp(&b.fire_at_ms))?;
        Some(self.pending.remove(idx).target)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTransition> {
        self.pending.iter()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Rules in effect
    pub settings: Settings,
    /// Seeded RNG for terrain and enemies
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Ships remaining
    pub ships: u8,
    /// Score
    pub score: u64,
    /// Game clock (sum of tick dt)
    pub clock_ms: f64,
    /// Delayed phase transitions
    pub timers: Timers,
    /// Player ship
    pub player: Entity,
    /// Ground rockets
    pub rockets: Vec<Entity>,
    /// Flying saucers
    pub spaceships: Vec<Entity>,
    /// Player bullets
    pub bullets: Vec<Entity>,
    /// Player bombs
    pub bombs: Vec<Entity>,
    /// Terrain pieces, oldest (leftmost) first
    pub obstacles: Vec<Entity>,
    /// Ceiling generator
    pub ceiling: TerrainGenerator,
    /// Floor generator; its flat edges spawn enemies
    pub floor: TerrainGenerator,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut state = Self {
            ships: settings.initial_ships,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            clock_ms: 0.0,
            timers: Timers::default(),
            player: Entity::player(PLAYER_START_X, PLAYER_START_Y),
            rockets: Vec::new(),
            spaceships: Vec::new(),
            bullets: Vec::new(),
            bombs: Vec::new(),
            obstacles: Vec::new(),
            ceiling: TerrainGenerator::new(Boundary::Ceiling),
            floor: TerrainGenerator::new(Boundary::Floor),
        };
        log::info!("New game with seed {}", seed);
        state.set_phase(GamePhase::Idle);
        state
    }

    /// Full reset: ships, score, enemies, projectiles and terrain
    fn reset(&mut self) {
        self.ships = self.settings.initial_ships;
        self.score = 0;
        self.rockets.clear();
        self.spaceships.clear();
        self.bullets.clear();
        self.bombs.clear();
        self.timers.clear();
        self.seed_terrain();
        self.respawn_player();
    }

    /// Put the player back at the start point
    pub fn respawn_player(&mut self) {
        self.player = Entity::player(PLAYER_START_X, PLAYER_START_Y);
    }

    /// Rebuild the terrain: a flat screen's worth, then one generated column
    fn seed_terrain(&mut self) {
        self.obstacles.clear();
        self.ceiling = TerrainGenerator::new(Boundary::Ceiling);
        self.floor = TerrainGenerator::new(Boundary::Floor);

        for i in 0..BOOTSTRAP_COLUMNS {
            let x = i as f32 * COLUMN_WIDTH;
            self.obstacles.push(self.ceiling.flat(x));
            self.obstacles.push(self.floor.flat(x));
        }
        self.add_column(BOOTSTRAP_COLUMNS as f32 * COLUMN_WIDTH);
    }

    /// Generate one column on both boundaries starting at `x`
    pub fn add_column(&mut self, x: f32) {
        let ceiling = self.ceiling.advance(x, &mut self.rng);
        self.obstacles.extend(ceiling.pieces);

        let floor = self.floor.advance(x, &mut self.rng);
        self.obstacles.extend(floor.pieces);
        if let Some(site) = floor.spawn_site {
            self.spawn_enemies(site);
        }
    }

    /// Spawn hook for flat floor edges
    ///
    /// Either one spaceship resting at the middle of the edge, or a row of
    /// rockets with randomly empty slots. Ignored unless playing.
    pub fn spawn_enemies(&mut self, site: Vec2) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if self.rng.random_bool(self.settings.spaceship_probability()) {
            let cruise_y = self
                .rng
                .random_range(SPACESHIP_CRUISE_MIN_Y..SPACESHIP_CRUISE_MAX_Y);
            let radius = self
                .rng
                .random_range(SPACESHIP_ORBIT_MIN_RADIUS..SPACESHIP_ORBIT_MAX_RADIUS);
            self.spaceships.push(Entity::spaceship(
                site.x + COLUMN_WIDTH / 2.0,
                site.y - SPACESHIP_HALF_HEIGHT,
                cruise_y,
                radius,
            ));
            log::debug!("Spaceship spawned at x={:.1}", site.x);
            return;
        }

        let density = self.settings.rocket_probability();
        let mut count = 0;
        for offset in ROCKET_SLOTS {
            if !self.rng.random_bool(density) {
                continue;
            }
            let liftoff_x = self
                .rng
                .random_range(ROCKET_LIFTOFF_MIN_X..ROCKET_LIFTOFF_MAX_X);
            self.rockets.push(Entity::rocket(
                site.x + offset,
                site.y - ROCKET_HALF_HEIGHT,
                liftoff_x,
            ));
            count += 1;
        }
        log::debug!("{} rockets spawned at x={:.1}", count, site.x);
    }

    /// Enter a phase and run its entry actions
    ///
    /// - Idle: full reset
    /// - Playing: respawn the player (score and terrain are kept)
    /// - LifeLost: lose a ship; game over at zero, otherwise respawn after
    ///   `life_lost_delay_ms` (immediately when the delay is zero)
    /// - GameOver: back to Idle after `game_over_delay_ms`
    pub fn set_phase(&mut self, phase: GamePhase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;

        match phase {
            GamePhase::Idle => self.reset(),
            GamePhase::Playing => self.respawn_player(),
            GamePhase::LifeLost => {
                self.ships = self.ships.saturating_sub(1);
                if self.ships == 0 {
                    self.set_phase(GamePhase::GameOver);
                } else if self.settings.life_lost_delay_ms <= 0.0 {
                    self.set_phase(GamePhase::Playing);
                } else {
                    let at = self.clock_ms + self.settings.life_lost_delay_ms;
                    self.timers.schedule(GamePhase::Playing, at);
                }
            }
            GamePhase::GameOver => {
                log::info!("Game over, final score {}", self.score);
                let at = self.clock_ms + self.settings.game_over_delay_ms;
                self.timers.schedule(GamePhase::Idle, at);
            }
        }
    }

    /// External start trigger; only honoured on the title screen
    pub fn start_game(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            log::debug!("Start ignored in {:?}", self.phase);
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Fire every delayed transition that has come due
    pub fn fire_due_transitions(&mut self) {
        while let Some(target) = self.timers.pop_due(self.clock_ms) {
            self.set_phase(target);
        }
    }

    /// Every enemy, rockets first
    pub fn enemies(&self) -> impl Iterator<Item = &Entity> {
        self.rockets.iter().chain(self.spaceships.iter())
    }
}
