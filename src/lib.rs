//! Nova Strike - a browser arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `render`: Canvas-2D draw layer (wasm only)
//! - `audio`: WebAudio sound effect blips (wasm only)
//! - `settings`: Player preferences in LocalStorage
//! - `highscores`: Single persisted best-score record

pub mod highscores;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the display tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_LIVES: u8 = 3;
    /// Ticks of invulnerability granted after losing a life (2 seconds)
    pub const INVULN_TICKS: u32 = 120;
    /// Bottom margin the ship starts above
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Player bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const BULLET_SPEED: f32 = 420.0;
    /// Fire cooldown in ticks (250 ms)
    pub const FIRE_COOLDOWN_TICKS: u32 = 15;
    pub const BULLET_DAMAGE: i32 = 10;

    /// Swarm monsters
    pub const MONSTER_WIDTH: f32 = 40.0;
    pub const MONSTER_HEIGHT: f32 = 40.0;
    pub const MONSTER_SPEED: f32 = 120.0;
    /// Spawn interval in ticks (1 second)
    pub const MONSTER_SPAWN_TICKS: u32 = 60;
    /// Extra descent speed per completed boss cycle
    pub const MONSTER_SPEED_PER_CYCLE: f32 = 20.0;

    /// Boss
    pub const BOSS_WIDTH: f32 = 100.0;
    pub const BOSS_HEIGHT: f32 = 100.0;
    pub const BOSS_HEALTH: i32 = 100;
    /// Horizontal strafe speed at the sine peak
    pub const BOSS_STRAFE_SPEED: f32 = 120.0;
    /// Vertical position the boss settles at after entering
    pub const BOSS_HOLD_Y: f32 = 50.0;
    pub const BOSS_ENTRY_SPEED: f32 = 90.0;
    /// Fire interval in ticks (1 second)
    pub const BOSS_FIRE_TICKS: u32 = 60;
    pub const BOSS_BULLET_WIDTH: f32 = 8.0;
    pub const BOSS_BULLET_HEIGHT: f32 = 20.0;
    pub const BOSS_BULLET_SPEED: f32 = 300.0;
    /// Score required before the first boss appears
    pub const BOSS_SCORE_THRESHOLD: u64 = 100;
    /// Threshold increase after each completed cycle
    pub const BOSS_THRESHOLD_STEP: u64 = 150;

    /// Mini-bosses
    pub const MINI_BOSS_WIDTH: f32 = 70.0;
    pub const MINI_BOSS_HEIGHT: f32 = 70.0;
    pub const MINI_BOSS_HEALTH: i32 = 50;
    pub const MINI_BOSS_SPEED: f32 = 180.0;
    pub const MINI_BOSS_FIRE_TICKS: u32 = 90;

    /// Scoring
    pub const MONSTER_SCORE: u64 = 10;
    pub const BOSS_SCORE: u64 = 50;
    pub const MINI_BOSS_SCORE: u64 = 30;

    /// Power-up capsules
    pub const POWERUP_SIZE: f32 = 24.0;
    pub const POWERUP_FALL_SPEED: f32 = 90.0;
    /// Drop chance on monster kill, percent
    pub const POWERUP_DROP_PERCENT: u32 = 12;
    /// Effect durations in ticks
    pub const RAPID_FIRE_TICKS: u32 = 360;
    pub const DOUBLE_SHOT_TICKS: u32 = 480;
}
