//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically: input,
//! spawning, movement, collisions, phase transitions, and bookkeeping.

use glam::Vec2;
use rand::Rng;

use super::patterns::{self, MiniBossPattern};
use super::state::{
    BattlePhase, Boss, BossState, Bullet, GameEvent, GamePhase, GameState, MiniBoss, Monster,
    Particle, PowerUp, PowerUpKind, MAX_PARTICLES,
};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held directional keys
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire button held (autofire, throttled by cooldown)
    pub fire: bool,
    /// Touch-drag target for the ship's horizontal center
    pub target_x: Option<f32>,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Restart after game over (one-shot)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::GameOver => {
            if input.restart {
                // Derive a fresh seed so consecutive runs differ but a
                // replayed input sequence still reproduces the same runs
                let seed = state
                    .seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(state.time_ticks | 1);
                *state = GameState::new(seed);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Decay feedback shake
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    update_player(state, input, dt);
    update_swarm(state, dt);
    update_battle(state, dt);
    update_bullets(state, dt);
    resolve_collisions(state);
    update_powerups(state, dt);
    update_timers(state);
    update_particles(state, dt);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Player movement, clamping, and firing
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let step = PLAYER_SPEED * dt;
    let pos = &mut state.player.pos;

    if let Some(target) = input.target_x {
        // Touch drag wins over held keys: chase the target center at ship speed
        let current = pos.x + PLAYER_WIDTH / 2.0;
        let delta = (target - current).clamp(-step, step);
        pos.x += delta;
    } else {
        if input.left {
            pos.x -= step;
        }
        if input.right {
            pos.x += step;
        }
    }
    if input.up {
        pos.y -= step;
    }
    if input.down {
        pos.y += step;
    }
    pos.x = pos.x.clamp(0.0, FIELD_WIDTH - PLAYER_WIDTH);
    pos.y = pos.y.clamp(0.0, FIELD_HEIGHT - PLAYER_HEIGHT);

    if state.player.fire_cooldown > 0 {
        state.player.fire_cooldown -= 1;
    }

    if input.fire && state.player.fire_cooldown == 0 {
        state.player.fire_cooldown = state.effects.fire_cooldown();
        let muzzle_y = state.player.pos.y;
        let center_x = state.player.pos.x + PLAYER_WIDTH / 2.0;
        let vel = Vec2::new(0.0, -BULLET_SPEED);
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);

        if state.effects.double_ticks > 0 {
            for offset in [-10.0, 10.0] {
                let id = state.next_entity_id();
                state.bullets.push(Bullet {
                    id,
                    pos: Vec2::new(center_x + offset - BULLET_WIDTH / 2.0, muzzle_y),
                    vel,
                    size,
                });
            }
        } else {
            let id = state.next_entity_id();
            state.bullets.push(Bullet {
                id,
                pos: Vec2::new(center_x - BULLET_WIDTH / 2.0, muzzle_y),
                vel,
                size,
            });
        }
        state.push_event(GameEvent::PlayerShot);
    }
}

/// Swarm spawning and descent. Monsters keep trickling in during boss and
/// mini-boss fights; one that reaches the bottom edge despawns silently.
fn update_swarm(state: &mut GameState, dt: f32) {
    state.spawn_timer = state.spawn_timer.saturating_sub(1);
    if state.spawn_timer == 0 {
        state.spawn_timer = MONSTER_SPAWN_TICKS;
        let mut rng = state.spawn_rng(state.spawn_counter);
        let x = rng.random_range(0.0..FIELD_WIDTH - MONSTER_WIDTH);
        state.spawn_counter += 1;
        let id = state.next_entity_id();
        let speed = state.monster_speed();
        state.monsters.push(Monster {
            id,
            pos: Vec2::new(x, -MONSTER_HEIGHT),
            speed,
        });
    }

    for monster in &mut state.monsters {
        monster.pos.y += monster.speed * dt;
    }
    state.monsters.retain(|m| m.pos.y < FIELD_HEIGHT);
}

/// Battle phase transitions, boss/mini-boss movement and firing
fn update_battle(state: &mut GameState, dt: f32) {
    let now = state.time_ticks;
    let player_center = state.player.rect().center();

    match state.battle {
        BattlePhase::Swarm => {
            // Edge-triggered by phase: reaching the threshold summons the
            // boss exactly once per cycle
            if state.score >= state.boss_threshold {
                state.battle = BattlePhase::Boss;
                state.boss = Some(Boss::new());
                state.screen_shake = (state.screen_shake + 0.3).min(1.0);
                state.push_event(GameEvent::BossArrived);
                log::info!("Boss arrived (cycle {}, score {})", state.cycle, state.score);
            }
        }

        BattlePhase::Boss => {
            let mut shots: Vec<Vec2> = Vec::new();
            if let Some(boss) = state.boss.as_mut() {
                match boss.state {
                    BossState::Entering => {
                        boss.pos.y += BOSS_ENTRY_SPEED * dt;
                        if boss.pos.y >= BOSS_HOLD_Y {
                            boss.pos.y = BOSS_HOLD_Y;
                            boss.state = BossState::Holding {
                                since_tick: now,
                                anchor_x: boss.pos.x,
                            };
                        }
                    }
                    BossState::Holding {
                        since_tick,
                        anchor_x,
                    } => {
                        let t = now.saturating_sub(since_tick) as f32 * SIM_DT;
                        let amplitude = ((FIELD_WIDTH - BOSS_WIDTH - anchor_x) / 2.0).min(120.0);
                        boss.pos.x = patterns::boss_strafe_x(anchor_x, amplitude, 0.8 * t)
                            .clamp(0.0, FIELD_WIDTH - BOSS_WIDTH);

                        // Only shoot once in position
                        boss.fire_timer = boss.fire_timer.saturating_sub(1);
                        if boss.fire_timer == 0 {
                            boss.fire_timer = BOSS_FIRE_TICKS;
                            let muzzle = Vec2::new(
                                boss.pos.x + BOSS_WIDTH / 2.0,
                                boss.pos.y + BOSS_HEIGHT,
                            );
                            shots.push(muzzle);
                        }
                    }
                }
            }
            for muzzle in shots {
                spawn_enemy_bullet(state, muzzle, player_center, BOSS_BULLET_SPEED);
            }
        }

        BattlePhase::MiniBosses => {
            // Positions are closed-form; only fire timers mutate here
            let mut volleys: Vec<(Vec2, MiniBossPattern)> = Vec::new();
            for mb in &mut state.mini_bosses {
                let age = mb.age_secs(now);
                mb.fire_timer = mb.fire_timer.saturating_sub(1);
                if mb.fire_timer == 0 {
                    mb.fire_timer =
                        (MINI_BOSS_FIRE_TICKS as f32 * mb.pattern.fire_scale(age)).max(1.0) as u32;
                    let pos = mb.pos(now);
                    let muzzle =
                        Vec2::new(pos.x + MINI_BOSS_WIDTH / 2.0, pos.y + MINI_BOSS_HEIGHT);
                    volleys.push((muzzle, mb.pattern));
                }
            }
            for (muzzle, pattern) in volleys {
                match pattern {
                    // Strafer takes a single aimed shot
                    MiniBossPattern::Strafe => {
                        spawn_enemy_bullet(state, muzzle, player_center, BOSS_BULLET_SPEED);
                    }
                    // Orbiter sprays a three-way fan
                    MiniBossPattern::Orbit => {
                        for dx in [-0.35_f32, 0.0, 0.35] {
                            let dir = Vec2::new(dx.sin(), dx.cos());
                            spawn_enemy_bullet_dir(state, muzzle, dir, BOSS_BULLET_SPEED * 0.8);
                        }
                    }
                    // Diver dumps a fast double straight down while plunging
                    MiniBossPattern::Dive => {
                        for offset in [-12.0, 12.0] {
                            let p = muzzle + Vec2::new(offset, 0.0);
                            spawn_enemy_bullet_dir(
                                state,
                                p,
                                Vec2::new(0.0, 1.0),
                                BOSS_BULLET_SPEED * 1.2,
                            );
                        }
                    }
                }
            }
        }
    }
}

fn spawn_enemy_bullet(state: &mut GameState, muzzle: Vec2, target: Vec2, speed: f32) {
    let dir = patterns::aim_direction(muzzle, target);
    spawn_enemy_bullet_dir(state, muzzle, dir, speed);
}

fn spawn_enemy_bullet_dir(state: &mut GameState, muzzle: Vec2, dir: Vec2, speed: f32) {
    let size = Vec2::new(BOSS_BULLET_WIDTH, BOSS_BULLET_HEIGHT);
    let id = state.next_entity_id();
    state.enemy_bullets.push(Bullet {
        id,
        pos: muzzle - Vec2::new(size.x / 2.0, 0.0),
        vel: dir * speed,
        size,
    });
}

/// Move all bullets and cull the ones that left the playfield
fn update_bullets(state: &mut GameState, dt: f32) {
    for bullet in state.bullets.iter_mut().chain(state.enemy_bullets.iter_mut()) {
        bullet.pos += bullet.vel * dt;
    }
    state
        .bullets
        .retain(|b| !b.rect().offscreen(FIELD_WIDTH, FIELD_HEIGHT));
    state
        .enemy_bullets
        .retain(|b| !b.rect().offscreen(FIELD_WIDTH, FIELD_HEIGHT));
}

/// All AABB collision resolution: player bullets vs enemies, enemy fire and
/// bodies vs the player, and the kill bookkeeping that follows.
fn resolve_collisions(state: &mut GameState) {
    let now = state.time_ticks;
    let mut spent_bullets: Vec<u32> = Vec::new();

    // --- Player bullets vs monsters ---
    let mut dead_monsters: Vec<u32> = Vec::new();
    for monster in &state.monsters {
        let m_rect = monster.rect();
        for bullet in &state.bullets {
            if spent_bullets.contains(&bullet.id) {
                continue;
            }
            if m_rect.overlaps(&bullet.rect()) {
                spent_bullets.push(bullet.id);
                dead_monsters.push(monster.id);
                break;
            }
        }
    }
    for id in dead_monsters {
        if let Some(idx) = state.monsters.iter().position(|m| m.id == id) {
            let center = state.monsters[idx].rect().center();
            state.monsters.remove(idx);
            state.score += MONSTER_SCORE;
            state.push_event(GameEvent::MonsterDown);
            spawn_explosion(state, center, 1, 14);
            maybe_drop_powerup(state, center, id);
        }
    }

    // --- Player bullets vs boss ---
    if let Some(boss) = state.boss.as_mut() {
        let b_rect = boss.rect();
        for bullet in &state.bullets {
            if spent_bullets.contains(&bullet.id) {
                continue;
            }
            if b_rect.overlaps(&bullet.rect()) {
                spent_bullets.push(bullet.id);
                boss.hp -= BULLET_DAMAGE;
            }
        }
    }
    if state.boss.as_ref().is_some_and(|b| b.hp <= 0) {
        let boss = state.boss.take().unwrap_or_else(Boss::new);
        let center = boss.rect().center();
        state.score += BOSS_SCORE;
        state.screen_shake = 1.0;
        state.push_event(GameEvent::BossDown);
        spawn_explosion(state, center, 2, 48);
        // The boss always leaves a shield behind
        drop_powerup(state, center, PowerUpKind::Shield);
        spawn_mini_bosses(state);
        state.battle = BattlePhase::MiniBosses;
        log::info!("Boss down at score {}, mini-boss wave begins", state.score);
    }

    // --- Player bullets vs mini-bosses ---
    let mut dead_minis: Vec<u32> = Vec::new();
    for mb in &mut state.mini_bosses {
        let r = mb.rect(now);
        for bullet in &state.bullets {
            if spent_bullets.contains(&bullet.id) {
                continue;
            }
            if r.overlaps(&bullet.rect()) {
                spent_bullets.push(bullet.id);
                mb.hp -= BULLET_DAMAGE;
                if mb.hp <= 0 {
                    dead_minis.push(mb.id);
                    break;
                }
            }
        }
    }
    for id in dead_minis {
        if let Some(idx) = state.mini_bosses.iter().position(|m| m.id == id) {
            let center = state.mini_bosses[idx].rect(now).center();
            state.mini_bosses.remove(idx);
            state.score += MINI_BOSS_SCORE;
            state.push_event(GameEvent::MiniBossDown);
            spawn_explosion(state, center, 3, 28);
            // Mini-bosses always drop something
            let mut rng = state.spawn_rng(0x4D42 ^ id as u64);
            let kind = match rng.random_range(0u32..3) {
                0 => PowerUpKind::RapidFire,
                1 => PowerUpKind::DoubleShot,
                _ => PowerUpKind::Shield,
            };
            drop_powerup(state, center, kind);
        }
    }
    if state.battle == BattlePhase::MiniBosses && state.mini_bosses.is_empty() {
        state.cycle += 1;
        state.boss_threshold = state.score + BOSS_THRESHOLD_STEP;
        state.battle = BattlePhase::Swarm;
        log::info!(
            "Cycle {} complete, next boss at score {}",
            state.cycle,
            state.boss_threshold
        );
    }

    state.bullets.retain(|b| !spent_bullets.contains(&b.id));

    // --- Enemy fire vs player ---
    let hitbox = state.player.hitbox();
    let mut hits = 0u32;
    state.enemy_bullets.retain(|b| {
        if b.rect().overlaps(&hitbox) {
            hits += 1;
            false
        } else {
            true
        }
    });

    // --- Monster bodies vs player (monster is destroyed by the ram) ---
    let mut rammed: Vec<u32> = Vec::new();
    for monster in &state.monsters {
        if monster.rect().overlaps(&hitbox) {
            rammed.push(monster.id);
        }
    }
    for id in rammed {
        if let Some(idx) = state.monsters.iter().position(|m| m.id == id) {
            let center = state.monsters[idx].rect().center();
            state.monsters.remove(idx);
            spawn_explosion(state, center, 1, 14);
            hits += 1;
        }
    }

    // --- Mini-boss bodies vs player (mini-boss survives the contact) ---
    for i in 0..state.mini_bosses.len() {
        if state.mini_bosses[i].rect(now).overlaps(&hitbox) {
            hits += 1;
        }
    }

    for _ in 0..hits {
        damage_player(state);
    }
}

/// Apply one hit to the player, honoring invulnerability and shield
fn damage_player(state: &mut GameState) {
    if state.invuln_ticks > 0 {
        return;
    }
    state.push_event(GameEvent::PlayerHit);

    if state.effects.shield_active {
        state.effects.shield_active = false;
        state.invuln_ticks = INVULN_TICKS / 2;
        state.screen_shake = (state.screen_shake + 0.3).min(1.0);
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.invuln_ticks = INVULN_TICKS;
    state.screen_shake = (state.screen_shake + 0.6).min(1.0);
    let center = state.player.rect().center();
    spawn_explosion(state, center, 0, 24);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver);
        log::info!("Game over at score {}", state.score);
    }
}

/// Spawn the three mini-bosses, one per pattern, staggered across the field
fn spawn_mini_bosses(state: &mut GameState) {
    let now = state.time_ticks;
    let anchors = [
        (Vec2::new(160.0, 110.0), MiniBossPattern::Strafe),
        (Vec2::new(365.0, 150.0), MiniBossPattern::Orbit),
        (Vec2::new(570.0, 90.0), MiniBossPattern::Dive),
    ];
    for (i, (anchor, pattern)) in anchors.into_iter().enumerate() {
        let id = state.next_entity_id();
        state.mini_bosses.push(MiniBoss {
            id,
            hp: MINI_BOSS_HEALTH,
            anchor,
            pattern,
            spawned_tick: now,
            // Stagger opening volleys so they don't arrive as one wall
            fire_timer: MINI_BOSS_FIRE_TICKS + i as u32 * 25,
        });
    }
}

/// Seeded drop roll on a monster kill
fn maybe_drop_powerup(state: &mut GameState, center: Vec2, monster_id: u32) {
    let mut rng = state.spawn_rng(0x5055 ^ monster_id as u64);
    let roll: u32 = rng.random_range(0..100);
    if roll < POWERUP_DROP_PERCENT {
        let kind = match roll % 3 {
            0 => PowerUpKind::RapidFire,
            1 => PowerUpKind::DoubleShot,
            _ => PowerUpKind::Shield,
        };
        drop_powerup(state, center, kind);
    }
}

fn drop_powerup(state: &mut GameState, center: Vec2, kind: PowerUpKind) {
    let id = state.next_entity_id();
    state.powerups.push(PowerUp {
        id,
        kind,
        pos: center - Vec2::splat(POWERUP_SIZE / 2.0),
    });
}

/// Capsule drift, collection, and despawn
fn update_powerups(state: &mut GameState, dt: f32) {
    for p in &mut state.powerups {
        p.pos.y += POWERUP_FALL_SPEED * dt;
    }

    let player_rect = state.player.rect();
    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.powerups.retain(|p| {
        if p.rect().overlaps(&player_rect) {
            collected.push(p.kind);
            false
        } else {
            p.pos.y < FIELD_HEIGHT
        }
    });

    for kind in collected {
        match kind {
            PowerUpKind::RapidFire => state.effects.rapid_ticks = RAPID_FIRE_TICKS,
            PowerUpKind::DoubleShot => state.effects.double_ticks = DOUBLE_SHOT_TICKS,
            PowerUpKind::Shield => state.effects.shield_active = true,
        }
        state.push_event(GameEvent::PowerUpCollected);
    }
}

/// Decay effect and invulnerability timers
fn update_timers(state: &mut GameState) {
    state.effects.rapid_ticks = state.effects.rapid_ticks.saturating_sub(1);
    state.effects.double_ticks = state.effects.double_ticks.saturating_sub(1);
    state.invuln_ticks = state.invuln_ticks.saturating_sub(1);
}

/// Hash-spread explosion burst, capped at MAX_PARTICLES
fn spawn_explosion(state: &mut GameState, center: Vec2, color: u32, count: u32) {
    let seed = state.time_ticks as u32;
    for i in 0..count {
        if state.particles.len() >= MAX_PARTICLES {
            state.particles.remove(0);
        }
        let hash = seed.wrapping_mul(2654435761).wrapping_add(i.wrapping_mul(7919));
        let angle = (hash % 1000) as f32 / 1000.0 * std::f32::consts::TAU;
        let speed = 60.0 + ((hash >> 10) % 140) as f32;
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        let life = 0.4 + ((hash >> 20) % 500) as f32 / 1000.0;
        let size = 2.0 + ((hash >> 14) % 100) as f32 / 25.0;
        state.particles.push(Particle {
            pos: center,
            vel,
            color,
            life,
            size,
        });
    }
}

/// Particle drag and decay
fn update_particles(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.97;
        particle.life -= dt * 1.5;
        particle.size *= 0.995;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Player;

    fn run_ticks(state: &mut GameState, input: &TickInput, n: u32) {
        for _ in 0..n {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = GameState::new(1);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        // Far more ticks than needed to reach the wall
        run_ticks(&mut state, &input, 600);
        assert_eq!(state.player.pos.x, 0.0);

        let input = TickInput {
            right: true,
            ..Default::default()
        };
        run_ticks(&mut state, &input, 600);
        assert_eq!(state.player.pos.x, FIELD_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_touch_target_chases_center() {
        let mut state = GameState::new(1);
        let input = TickInput {
            target_x: Some(100.0),
            ..Default::default()
        };
        run_ticks(&mut state, &input, 600);
        let center = state.player.pos.x + PLAYER_WIDTH / 2.0;
        assert!((center - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_fire_cooldown_throttles() {
        let mut state = GameState::new(1);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.bullets.len(), 1);
        // Held fire during the cooldown window adds nothing
        for _ in 0..(FIRE_COOLDOWN_TICKS - 1) {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.bullets.len(), 1);
        // One more tick and the next shot comes out
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_double_shot_spawns_pair() {
        let mut state = GameState::new(1);
        state.effects.double_ticks = 600;
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_swarm_spawn_interval() {
        let mut state = GameState::new(9);
        let input = TickInput::default();
        run_ticks(&mut state, &input, MONSTER_SPAWN_TICKS);
        assert_eq!(state.monsters.len(), 1);
        run_ticks(&mut state, &input, MONSTER_SPAWN_TICKS);
        assert_eq!(state.monsters.len(), 2);
        // Spawn x stays inside the playfield
        for m in &state.monsters {
            assert!(m.pos.x >= 0.0 && m.pos.x <= FIELD_WIDTH - MONSTER_WIDTH);
        }
    }

    #[test]
    fn test_monster_despawns_silently_at_bottom() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state.monsters.push(Monster {
            id,
            pos: Vec2::new(100.0, FIELD_HEIGHT - 1.0),
            speed: MONSTER_SPEED,
        });
        // Park the player far from the monster
        state.player.pos = Vec2::new(700.0, Player::spawn_pos().y);
        run_ticks(&mut state, &TickInput::default(), 5);
        assert!(state.monsters.iter().all(|m| m.id != id));
        assert_eq!(state.lives, PLAYER_LIVES);
    }

    #[test]
    fn test_bullet_kills_monster() {
        let mut state = GameState::new(1);
        let mid = state.next_entity_id();
        state.monsters.push(Monster {
            id: mid,
            pos: Vec2::new(300.0, 200.0),
            speed: 0.0,
        });
        let bid = state.next_entity_id();
        state.bullets.push(Bullet {
            id: bid,
            pos: Vec2::new(310.0, 238.0),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.monsters.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, MONSTER_SCORE);
        assert!(state.events.iter().any(|e| *e == GameEvent::MonsterDown));
    }

    #[test]
    fn test_boss_arrives_at_threshold_once() {
        let mut state = GameState::new(1);
        state.score = BOSS_SCORE_THRESHOLD;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.battle, BattlePhase::Boss);
        assert!(state.boss.is_some());

        // Score stays above the threshold but no second boss appears
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.boss.is_some());
        assert_eq!(state.battle, BattlePhase::Boss);
    }

    #[test]
    fn test_boss_enters_then_holds_and_fires() {
        let mut state = GameState::new(1);
        state.score = BOSS_SCORE_THRESHOLD;
        let input = TickInput::default();
        tick(&mut state, &input, SIM_DT);
        assert!(matches!(
            state.boss.as_ref().unwrap().state,
            BossState::Entering
        ));

        // Enough ticks to descend from -100 to the hold line and fire
        run_ticks(&mut state, &input, 60 * 4);
        let boss = state.boss.as_ref().unwrap();
        assert!(matches!(boss.state, BossState::Holding { .. }));
        assert_eq!(boss.pos.y, BOSS_HOLD_Y);
        assert!(!state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_boss_defeat_spawns_mini_bosses() {
        let mut state = GameState::new(1);
        state.battle = BattlePhase::Boss;
        let mut boss = Boss::new();
        boss.pos = Vec2::new(350.0, BOSS_HOLD_Y);
        boss.hp = BULLET_DAMAGE; // one hit left
        state.boss = Some(boss);

        let bid = state.next_entity_id();
        state.bullets.push(Bullet {
            id: bid,
            pos: Vec2::new(400.0, 130.0),
            vel: Vec2::ZERO,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        });

        let score_before = state.score;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.boss.is_none());
        assert_eq!(state.battle, BattlePhase::MiniBosses);
        assert_eq!(state.mini_bosses.len(), 3);
        assert_eq!(state.score, score_before + BOSS_SCORE);
        // One of each pattern
        let patterns: Vec<_> = state.mini_bosses.iter().map(|m| m.pattern).collect();
        assert!(patterns.contains(&MiniBossPattern::Strafe));
        assert!(patterns.contains(&MiniBossPattern::Orbit));
        assert!(patterns.contains(&MiniBossPattern::Dive));
        // Shield capsule left behind
        assert!(state
            .powerups
            .iter()
            .any(|p| p.kind == PowerUpKind::Shield));
    }

    #[test]
    fn test_mini_boss_cycle_completion() {
        let mut state = GameState::new(1);
        state.battle = BattlePhase::MiniBosses;
        let id = state.next_entity_id();
        state.mini_bosses.push(MiniBoss {
            id,
            hp: BULLET_DAMAGE,
            anchor: Vec2::new(300.0, 150.0),
            pattern: MiniBossPattern::Strafe,
            spawned_tick: 0,
            fire_timer: 1000,
        });
        let pos = state.mini_bosses[0].pos(1);
        let bid = state.next_entity_id();
        state.bullets.push(Bullet {
            id: bid,
            pos: pos + Vec2::new(30.0, 30.0),
            vel: Vec2::ZERO,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.mini_bosses.is_empty());
        assert_eq!(state.battle, BattlePhase::Swarm);
        assert_eq!(state.cycle, 1);
        assert_eq!(state.boss_threshold, state.score + BOSS_THRESHOLD_STEP);
    }

    #[test]
    fn test_enemy_bullet_costs_a_life() {
        let mut state = GameState::new(1);
        let center = state.player.hitbox().center();
        let bid = state.next_entity_id();
        state.enemy_bullets.push(Bullet {
            id: bid,
            pos: center,
            vel: Vec2::ZERO,
            size: Vec2::new(BOSS_BULLET_WIDTH, BOSS_BULLET_HEIGHT),
        });

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, PLAYER_LIVES - 1);
        assert!(state.invuln_ticks > 0);
        assert!(state.enemy_bullets.is_empty());

        // A second hit during invulnerability is ignored
        let bid = state.next_entity_id();
        state.enemy_bullets.push(Bullet {
            id: bid,
            pos: state.player.hitbox().center(),
            vel: Vec2::ZERO,
            size: Vec2::new(BOSS_BULLET_WIDTH, BOSS_BULLET_HEIGHT),
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, PLAYER_LIVES - 1);
    }

    #[test]
    fn test_shield_absorbs_one_hit() {
        let mut state = GameState::new(1);
        state.effects.shield_active = true;
        let bid = state.next_entity_id();
        state.enemy_bullets.push(Bullet {
            id: bid,
            pos: state.player.hitbox().center(),
            vel: Vec2::ZERO,
            size: Vec2::new(BOSS_BULLET_WIDTH, BOSS_BULLET_HEIGHT),
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, PLAYER_LIVES);
        assert!(!state.effects.shield_active);
    }

    #[test]
    fn test_powerup_collection_applies_effect() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            kind: PowerUpKind::RapidFire,
            pos: state.player.pos,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.powerups.is_empty());
        assert!(state.effects.rapid_ticks > 0);
        assert!(state
            .events
            .iter()
            .any(|e| *e == GameEvent::PowerUpCollected));
    }

    #[test]
    fn test_effect_timers_expire() {
        let mut state = GameState::new(1);
        state.effects.rapid_ticks = 3;
        run_ticks(&mut state, &TickInput::default(), 5);
        assert_eq!(state.effects.rapid_ticks, 0);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut state = GameState::new(1);
        state.lives = 1;
        let bid = state.next_entity_id();
        state.enemy_bullets.push(Bullet {
            id: bid,
            pos: state.player.hitbox().center(),
            vel: Vec2::ZERO,
            size: Vec2::new(BOSS_BULLET_WIDTH, BOSS_BULLET_HEIGHT),
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Non-restart input does nothing
        let frozen_score = state.score;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, frozen_score);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, PLAYER_LIVES);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::new(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                left: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.monsters.len(), state2.monsters.len());
        assert_eq!(state1.bullets.len(), state2.bullets.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        for (a, b) in state1.monsters.iter().zip(&state2.monsters) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_monster_ram_costs_a_life() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state.monsters.push(Monster {
            id,
            pos: state.player.pos,
            speed: 0.0,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        // The ram destroys the monster without scoring it
        assert!(state.monsters.is_empty());
        assert_eq!(state.lives, PLAYER_LIVES - 1);
        assert_eq!(state.score, 0);
        assert!(state.events.iter().any(|e| *e == GameEvent::PlayerHit));
    }

    #[test]
    fn test_mini_boss_contact_costs_a_life_and_survives() {
        let mut state = GameState::new(1);
        state.battle = BattlePhase::MiniBosses;
        let id = state.next_entity_id();
        state.mini_bosses.push(MiniBoss {
            id,
            hp: MINI_BOSS_HEALTH,
            anchor: state.player.pos,
            pattern: MiniBossPattern::Strafe,
            spawned_tick: 0,
            fire_timer: 1000,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, PLAYER_LIVES - 1);
        // Unlike a rammed monster, the mini-boss stays on the field
        assert_eq!(state.mini_bosses.len(), 1);
    }

    #[test]
    fn test_mini_boss_volleys_per_pattern() {
        let mut state = GameState::new(1);
        state.battle = BattlePhase::MiniBosses;
        let anchors = [
            (Vec2::new(160.0, 100.0), MiniBossPattern::Strafe),
            (Vec2::new(365.0, 100.0), MiniBossPattern::Orbit),
            (Vec2::new(570.0, 100.0), MiniBossPattern::Dive),
        ];
        for (anchor, pattern) in anchors {
            let id = state.next_entity_id();
            state.mini_bosses.push(MiniBoss {
                id,
                hp: MINI_BOSS_HEALTH,
                anchor,
                pattern,
                spawned_tick: 0,
                fire_timer: 1,
            });
        }

        tick(&mut state, &TickInput::default(), SIM_DT);

        // Strafe fires one aimed shot, Orbit a three-way fan, Dive a double
        assert_eq!(state.enemy_bullets.len(), 6);
        // The diver's pair plunges straight down faster than any aimed shot
        let dive_shots = state
            .enemy_bullets
            .iter()
            .filter(|b| b.vel.x == 0.0 && b.vel.y > BOSS_BULLET_SPEED)
            .count();
        assert_eq!(dive_shots, 2);
        // Every timer was rearmed
        assert!(state.mini_bosses.iter().all(|m| m.fire_timer > 0));
    }

    #[test]
    fn test_monster_drop_rate_near_target() {
        let mut state = GameState::new(4242);
        for id in 0..1000 {
            maybe_drop_powerup(&mut state, Vec2::new(400.0, 300.0), id);
        }
        // Seeded rolls land in a loose band around the 12% drop chance
        let drops = state.powerups.len();
        assert!(
            (60..=180).contains(&drops),
            "drop count out of band: {}",
            drops
        );
    }

    #[test]
    fn test_mini_boss_kill_always_drops() {
        let mut state = GameState::new(1);
        state.battle = BattlePhase::MiniBosses;
        let id = state.next_entity_id();
        state.mini_bosses.push(MiniBoss {
            id,
            hp: BULLET_DAMAGE,
            anchor: Vec2::new(300.0, 150.0),
            pattern: MiniBossPattern::Orbit,
            spawned_tick: 0,
            fire_timer: 1000,
        });
        let pos = state.mini_bosses[0].pos(1);
        let bid = state.next_entity_id();
        state.bullets.push(Bullet {
            id: bid,
            pos: pos + Vec2::new(30.0, 30.0),
            vel: Vec2::ZERO,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.mini_bosses.is_empty());
        assert_eq!(state.powerups.len(), 1);
    }

    #[test]
    fn test_boss_entry_scales_with_dt() {
        let mut state = GameState::new(1);
        state.score = BOSS_SCORE_THRESHOLD;
        tick(&mut state, &TickInput::default(), SIM_DT);
        let y0 = state.boss.as_ref().unwrap().pos.y;

        let dt = 2.0 * SIM_DT;
        tick(&mut state, &TickInput::default(), dt);
        let y1 = state.boss.as_ref().unwrap().pos.y;
        assert!((y1 - y0 - BOSS_ENTRY_SPEED * dt).abs() < 1e-4);
    }

    #[test]
    fn test_particles_capped_and_decay() {
        let mut state = GameState::new(1);
        for _ in 0..30 {
            spawn_explosion(&mut state, Vec2::new(400.0, 300.0), 1, 20);
        }
        assert!(state.particles.len() <= MAX_PARTICLES);

        run_ticks(&mut state, &TickInput::default(), 120);
        assert!(state.particles.is_empty());
    }
}
