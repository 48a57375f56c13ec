//! Game state and core simulation types
//!
//! Everything the simulation mutates lives here and is serializable, so a
//! whole run can be snapshotted as JSON.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::patterns::MiniBossPattern;
use crate::consts::*;

/// Top-level control phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen, state preserved
    Paused,
    /// Run ended; waiting for restart input
    GameOver,
}

/// Which opposition is currently on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Regular descending monsters
    Swarm,
    /// The boss is on screen (swarm keeps trickling in)
    Boss,
    /// Three mini-bosses with distinct patterns
    MiniBosses,
}

/// One-shot happenings for the frontend (sound cues, HUD flashes).
/// Drained by the caller every frame; never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerShot,
    MonsterDown,
    BossArrived,
    BossDown,
    MiniBossDown,
    PowerUpCollected,
    PlayerHit,
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
}

impl Player {
    pub fn spawn_pos() -> Vec2 {
        Vec2::new(
            FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
            FIELD_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    /// Slightly forgiving hitbox for incoming fire
    pub fn hitbox(&self) -> Rect {
        self.rect().shrunk(6.0)
    }
}

/// A bullet, either the player's or an enemy's
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A swarm monster descending from the top edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub pos: Vec2,
    /// Descent speed, frozen at spawn so mid-wave difficulty bumps
    /// don't teleport existing monsters
    pub speed: f32,
}

impl Monster {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::new(MONSTER_WIDTH, MONSTER_HEIGHT),
        }
    }
}

/// Boss movement stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossState {
    /// Descending from above the field toward the hold line
    Entering,
    /// Strafing at the hold line; `since_tick` anchors the closed-form sweep
    Holding { since_tick: u64, anchor_x: f32 },
}

/// The boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub hp: i32,
    pub state: BossState,
    /// Ticks until the next shot
    pub fire_timer: u32,
}

impl Boss {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0 - BOSS_WIDTH / 2.0, -BOSS_HEIGHT),
            hp: BOSS_HEALTH,
            state: BossState::Entering,
            fire_timer: BOSS_FIRE_TICKS,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
        }
    }

    /// Health fraction for the HUD bar
    pub fn health_frac(&self) -> f32 {
        (self.hp.max(0) as f32) / BOSS_HEALTH as f32
    }
}

/// A mini-boss; position is a closed-form function of time since spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiniBoss {
    pub id: u32,
    pub hp: i32,
    pub anchor: Vec2,
    pub pattern: MiniBossPattern,
    pub spawned_tick: u64,
    pub fire_timer: u32,
}

impl MiniBoss {
    /// Seconds this mini-boss has been alive
    pub fn age_secs(&self, now_ticks: u64) -> f32 {
        now_ticks.saturating_sub(self.spawned_tick) as f32 * SIM_DT
    }

    pub fn pos(&self, now_ticks: u64) -> Vec2 {
        self.pattern.position(self.anchor, self.age_secs(now_ticks))
    }

    pub fn rect(&self, now_ticks: u64) -> Rect {
        Rect {
            pos: self.pos(now_ticks),
            size: Vec2::new(MINI_BOSS_WIDTH, MINI_BOSS_HEIGHT),
        }
    }

    pub fn health_frac(&self) -> f32 {
        (self.hp.max(0) as f32) / MINI_BOSS_HEALTH as f32
    }
}

/// Power-up capsule kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Halved fire cooldown
    RapidFire,
    /// Two parallel bullets per shot
    DoubleShot,
    /// Absorbs the next hit
    Shield,
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::splat(POWERUP_SIZE),
        }
    }
}

/// Active power-up effect timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub rapid_ticks: u32,
    pub double_ticks: u32,
    pub shield_active: bool,
}

impl ActiveEffects {
    pub fn fire_cooldown(&self) -> u32 {
        if self.rapid_ticks > 0 {
            FIRE_COOLDOWN_TICKS / 2
        } else {
            FIRE_COOLDOWN_TICKS
        }
    }
}

/// A particle for explosion effects (render-only, never gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
    pub size: f32,
}

/// Maximum particles kept alive
pub const MAX_PARTICLES: usize = 256;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub battle: BattlePhase,
    pub score: u64,
    pub lives: u8,
    /// Ticks of post-hit invulnerability remaining
    pub invuln_ticks: u32,
    /// Score at which the next boss arrives
    pub boss_threshold: u64,
    /// Completed boss + mini-boss cycles (drives difficulty)
    pub cycle: u32,
    pub player: Player,
    /// Player bullets (sorted by id)
    pub bullets: Vec<Bullet>,
    /// Boss and mini-boss bullets (sorted by id)
    pub enemy_bullets: Vec<Bullet>,
    /// Swarm monsters (sorted by id)
    pub monsters: Vec<Monster>,
    pub boss: Option<Boss>,
    pub mini_bosses: Vec<MiniBoss>,
    pub powerups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    /// Visual particles
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Frame events, drained by the frontend
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Feedback shake amount, 0..1
    pub screen_shake: f32,
    /// Ticks until the next swarm spawn
    pub spawn_timer: u32,
    /// Monsters spawned so far; keys the spawn RNG stream
    pub spawn_counter: u64,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            battle: BattlePhase::Swarm,
            score: 0,
            lives: PLAYER_LIVES,
            invuln_ticks: 0,
            boss_threshold: BOSS_SCORE_THRESHOLD,
            cycle: 0,
            player: Player {
                pos: Player::spawn_pos(),
                fire_cooldown: 0,
            },
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            monsters: Vec::new(),
            boss: None,
            mini_bosses: Vec::new(),
            powerups: Vec::new(),
            effects: ActiveEffects::default(),
            particles: Vec::new(),
            events: Vec::new(),
            screen_shake: 0.0,
            spawn_timer: MONSTER_SPAWN_TICKS,
            spawn_counter: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// RNG stream for the n-th spawn decision. Keyed by seed and counter so
    /// replaying the same seed reproduces every roll regardless of timing.
    pub fn spawn_rng(&self, salt: u64) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Current swarm descent speed, scaled by completed cycles
    pub fn monster_speed(&self) -> f32 {
        MONSTER_SPEED + self.cycle as f32 * MONSTER_SPEED_PER_CYCLE
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the frame's events to the frontend
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entity vectors are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bullets.sort_by_key(|b| b.id);
        self.enemy_bullets.sort_by_key(|b| b.id);
        self.monsters.sort_by_key(|m| m.id);
        self.mini_bosses.sort_by_key(|m| m.id);
        self.powerups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.battle, BattlePhase::Swarm);
        assert_eq!(state.lives, PLAYER_LIVES);
        assert_eq!(state.score, 0);
        assert!(state.boss.is_none());
        assert_eq!(state.player.pos, Player::spawn_pos());
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_spawn_rng_reproducible() {
        use rand::Rng;
        let state = GameState::new(777);
        let x1: f32 = state.spawn_rng(5).random_range(0.0..800.0);
        let x2: f32 = state.spawn_rng(5).random_range(0.0..800.0);
        assert_eq!(x1, x2);
        // Different salts give different streams
        let x3: f32 = state.spawn_rng(6).random_range(0.0..800.0);
        assert_ne!(x1, x3);
    }

    #[test]
    fn test_monster_speed_scales_with_cycle() {
        let mut state = GameState::new(1);
        let base = state.monster_speed();
        state.cycle = 2;
        assert!(state.monster_speed() > base);
    }

    #[test]
    fn test_state_roundtrips_through_json() {
        let mut state = GameState::new(123);
        state.score = 90;
        state.boss = Some(Boss::new());
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 90);
        assert!(back.boss.is_some());
        assert_eq!(back.seed, state.seed);
    }

    #[test]
    fn test_effects_fire_cooldown() {
        let mut fx = ActiveEffects::default();
        assert_eq!(fx.fire_cooldown(), FIRE_COOLDOWN_TICKS);
        fx.rapid_ticks = 100;
        assert_eq!(fx.fire_cooldown(), FIRE_COOLDOWN_TICKS / 2);
    }
}
