//! Canvas-2D draw layer
//!
//! Thin wrapper over `CanvasRenderingContext2d`. Purely a view of the
//! simulation state; nothing here feeds back into gameplay.

use web_sys::CanvasRenderingContext2d;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{BossState, GamePhase, GameState, PowerUpKind};

/// Particle color palette indices used by the simulation
const PARTICLE_COLORS: [&str; 4] = ["#ffcc55", "#ffff66", "#ff6633", "#cc66ff"];

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Draw one frame of the current state
    pub fn draw(&self, state: &GameState, settings: &Settings) {
        let ctx = &self.ctx;

        ctx.save();

        // Feedback shake: deterministic jitter from the tick counter
        if settings.effective_screen_shake() && state.screen_shake > 0.0 {
            let hash = (state.time_ticks as u32).wrapping_mul(2654435761);
            let dx = ((hash % 100) as f64 / 50.0 - 1.0) * state.screen_shake as f64 * 6.0;
            let dy = (((hash >> 8) % 100) as f64 / 50.0 - 1.0) * state.screen_shake as f64 * 6.0;
            let _ = ctx.translate(dx, dy);
        }

        // Background
        ctx.set_fill_style_str("#000000");
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        if settings.starfield {
            self.draw_starfield(state.time_ticks);
        }

        self.draw_swarm(state);
        self.draw_boss(state);
        self.draw_mini_bosses(state);
        self.draw_bullets(state);
        self.draw_powerups(state);
        if settings.particles {
            self.draw_particles(state);
        }
        self.draw_player(state);

        ctx.restore();

        self.draw_overlays(state);
    }

    /// Slow-scrolling starfield; star positions hashed from their index so
    /// the field is stable frame to frame
    fn draw_starfield(&self, ticks: u64) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#ffffff");
        for i in 0u32..100 {
            let hash = i.wrapping_mul(2654435761).wrapping_add(i.wrapping_mul(7919));
            let x = (hash % FIELD_WIDTH as u32) as f64;
            let base_y = ((hash >> 12) % FIELD_HEIGHT as u32) as f64;
            let speed = 0.2 + ((hash >> 22) % 3) as f64 * 0.3;
            let y = (base_y + ticks as f64 * speed) % FIELD_HEIGHT as f64;
            ctx.fill_rect(x, y, 1.0, 1.0);
        }
    }

    fn draw_player(&self, state: &GameState) {
        let ctx = &self.ctx;

        // Blink while invulnerable
        if state.invuln_ticks > 0 && (state.time_ticks / 6) % 2 == 0 {
            return;
        }

        let r = state.player.rect();
        let x = r.pos.x as f64;
        let y = r.pos.y as f64;
        let w = r.size.x as f64;
        let h = r.size.y as f64;

        // Triangular ship body
        ctx.set_fill_style_str("#44ccff");
        ctx.begin_path();
        ctx.move_to(x + w / 2.0, y);
        ctx.line_to(x, y + h);
        ctx.line_to(x + w, y + h);
        ctx.close_path();
        ctx.fill();

        if state.effects.shield_active {
            ctx.set_stroke_style_str("#66ffcc");
            ctx.begin_path();
            let _ = ctx.arc(
                x + w / 2.0,
                y + h / 2.0,
                w * 0.75,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.stroke();
        }
    }

    fn draw_swarm(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#33dd66");
        for monster in &state.monsters {
            let r = monster.rect();
            ctx.fill_rect(
                r.pos.x as f64,
                r.pos.y as f64,
                r.size.x as f64,
                r.size.y as f64,
            );
        }
    }

    fn draw_boss(&self, state: &GameState) {
        let Some(boss) = &state.boss else { return };
        let ctx = &self.ctx;
        let r = boss.rect();

        ctx.set_fill_style_str("#dd3366");
        ctx.fill_rect(
            r.pos.x as f64,
            r.pos.y as f64,
            r.size.x as f64,
            r.size.y as f64,
        );

        // Health bar above the boss once it is in position
        if matches!(boss.state, BossState::Holding { .. }) {
            ctx.set_fill_style_str("#550000");
            ctx.fill_rect(r.pos.x as f64, r.pos.y as f64 - 10.0, r.size.x as f64, 5.0);
            ctx.set_fill_style_str("#ff0000");
            ctx.fill_rect(
                r.pos.x as f64,
                r.pos.y as f64 - 10.0,
                r.size.x as f64 * boss.health_frac() as f64,
                5.0,
            );
        }
    }

    fn draw_mini_bosses(&self, state: &GameState) {
        let ctx = &self.ctx;
        for mb in &state.mini_bosses {
            let r = mb.rect(state.time_ticks);
            ctx.set_fill_style_str("#ff9933");
            ctx.fill_rect(
                r.pos.x as f64,
                r.pos.y as f64,
                r.size.x as f64,
                r.size.y as f64,
            );
            ctx.set_fill_style_str("#ff0000");
            ctx.fill_rect(
                r.pos.x as f64,
                r.pos.y as f64 - 8.0,
                r.size.x as f64 * mb.health_frac() as f64,
                4.0,
            );
        }
    }

    fn draw_bullets(&self, state: &GameState) {
        let ctx = &self.ctx;

        ctx.set_fill_style_str("#ffffff");
        for b in &state.bullets {
            ctx.fill_rect(
                b.pos.x as f64,
                b.pos.y as f64,
                b.size.x as f64,
                b.size.y as f64,
            );
        }

        ctx.set_fill_style_str("#ff4444");
        for b in &state.enemy_bullets {
            ctx.fill_rect(
                b.pos.x as f64,
                b.pos.y as f64,
                b.size.x as f64,
                b.size.y as f64,
            );
        }
    }

    fn draw_powerups(&self, state: &GameState) {
        let ctx = &self.ctx;
        for p in &state.powerups {
            let color = match p.kind {
                PowerUpKind::RapidFire => "#ffee33",
                PowerUpKind::DoubleShot => "#33aaff",
                PowerUpKind::Shield => "#66ffcc",
            };
            ctx.set_fill_style_str(color);
            let r = p.rect();
            ctx.begin_path();
            let c = r.center();
            let _ = ctx.arc(
                c.x as f64,
                c.y as f64,
                (POWERUP_SIZE / 2.0) as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }

    fn draw_particles(&self, state: &GameState) {
        let ctx = &self.ctx;
        for p in &state.particles {
            let color = PARTICLE_COLORS[p.color as usize % PARTICLE_COLORS.len()];
            ctx.set_fill_style_str(color);
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.fill_rect(
                (p.pos.x - p.size / 2.0) as f64,
                (p.pos.y - p.size / 2.0) as f64,
                p.size as f64,
                p.size as f64,
            );
        }
        ctx.set_global_alpha(1.0);
    }

    /// Pause and game-over text; HUD numbers live in the DOM
    fn draw_overlays(&self, state: &GameState) {
        let ctx = &self.ctx;
        match state.phase {
            GamePhase::Paused => {
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("48px sans-serif");
                ctx.set_text_align("center");
                let _ = ctx.fill_text("PAUSED", (FIELD_WIDTH / 2.0) as f64, 280.0);
            }
            GamePhase::GameOver => {
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("48px sans-serif");
                ctx.set_text_align("center");
                let _ = ctx.fill_text("GAME OVER", (FIELD_WIDTH / 2.0) as f64, 280.0);
                ctx.set_font("24px sans-serif");
                let _ = ctx.fill_text(
                    &format!("Final score: {}", state.score),
                    (FIELD_WIDTH / 2.0) as f64,
                    320.0,
                );
                let _ = ctx.fill_text(
                    "Tap or press Enter to restart",
                    (FIELD_WIDTH / 2.0) as f64,
                    420.0,
                );
            }
            GamePhase::Playing => {}
        }
    }
}
