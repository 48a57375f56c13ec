//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod patterns;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use patterns::MiniBossPattern;
pub use state::{
    ActiveEffects, BattlePhase, Boss, BossState, Bullet, GameEvent, GamePhase, GameState,
    MiniBoss, Monster, Particle, Player, PowerUp, PowerUpKind, MAX_PARTICLES,
};
pub use tick::{TickInput, tick};
