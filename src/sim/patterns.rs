//! Closed-form movement patterns for the boss and mini-bosses
//!
//! Every pattern maps (anchor, elapsed seconds) to a position, so movement is
//! stateless and trivially deterministic. No pathfinding, no integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement pattern assigned to a mini-boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiniBossPattern {
    /// Horizontal sine strafe with a slight vertical bob
    Strafe,
    /// Circular orbit around the anchor point
    Orbit,
    /// Slow drift with a periodic plunge toward the player and retreat
    Dive,
}

impl MiniBossPattern {
    /// Position at `t` seconds after spawn, relative to the spawn anchor
    pub fn position(&self, anchor: Vec2, t: f32) -> Vec2 {
        match self {
            MiniBossPattern::Strafe => Vec2::new(
                anchor.x + 150.0 * (0.9 * t).sin(),
                anchor.y + 12.0 * (2.4 * t).sin(),
            ),
            MiniBossPattern::Orbit => {
                anchor + 80.0 * Vec2::new((1.2 * t).cos(), (1.2 * t).sin())
            }
            MiniBossPattern::Dive => {
                // Cubing the half-wave keeps the plunge sharp and the hover long
                let plunge = (0.35 * t).sin().max(0.0).powi(3);
                Vec2::new(anchor.x + 60.0 * (0.5 * t).sin(), anchor.y + 220.0 * plunge)
            }
        }
    }

    /// Fire interval scale - divers shoot in quicker bursts while plunging
    pub fn fire_scale(&self, t: f32) -> f32 {
        match self {
            MiniBossPattern::Strafe => 1.0,
            MiniBossPattern::Orbit => 1.3,
            MiniBossPattern::Dive => {
                if (0.35 * t).sin() > 0.5 {
                    0.5
                } else {
                    1.5
                }
            }
        }
    }
}

/// Boss horizontal strafe: the original moved the boss by `sin(now)` each
/// frame, which integrates to a cosine sweep. Expressed here in closed form.
pub fn boss_strafe_x(center_x: f32, amplitude: f32, t: f32) -> f32 {
    center_x + amplitude * (1.0 - t.cos())
}

/// Unit direction from `from` toward `to`, straight down when degenerate
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    if d.length_squared() < 1.0 {
        Vec2::new(0.0, 1.0)
    } else {
        d.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strafe_stays_near_anchor() {
        let anchor = Vec2::new(400.0, 120.0);
        for i in 0..600 {
            let t = i as f32 * 0.05;
            let p = MiniBossPattern::Strafe.position(anchor, t);
            assert!((p.x - anchor.x).abs() <= 150.0 + 0.001);
            assert!((p.y - anchor.y).abs() <= 12.0 + 0.001);
        }
    }

    #[test]
    fn test_orbit_radius_constant() {
        let anchor = Vec2::new(400.0, 150.0);
        for i in 0..100 {
            let t = i as f32 * 0.1;
            let p = MiniBossPattern::Orbit.position(anchor, t);
            let r = (p - anchor).length();
            assert!((r - 80.0).abs() < 0.01, "orbit radius drifted: {}", r);
        }
    }

    #[test]
    fn test_dive_plunges_and_retreats() {
        let anchor = Vec2::new(400.0, 100.0);
        // At t=0 the diver sits at the anchor
        let start = MiniBossPattern::Dive.position(anchor, 0.0);
        assert!((start.y - anchor.y).abs() < 0.001);

        // Mid first plunge (sin peak at 0.35t = pi/2) it is far below
        let deep = MiniBossPattern::Dive.position(anchor, std::f32::consts::FRAC_PI_2 / 0.35);
        assert!(deep.y > anchor.y + 200.0);

        // After a full period it returns to the anchor height
        let back = MiniBossPattern::Dive.position(anchor, std::f32::consts::PI / 0.35);
        assert!((back.y - anchor.y).abs() < 0.1);
    }

    #[test]
    fn test_dive_never_rises_above_anchor() {
        let anchor = Vec2::new(400.0, 100.0);
        for i in 0..1000 {
            let t = i as f32 * 0.05;
            let p = MiniBossPattern::Dive.position(anchor, t);
            assert!(p.y >= anchor.y - 0.001);
        }
    }

    #[test]
    fn test_boss_strafe_starts_at_center() {
        assert!((boss_strafe_x(350.0, 120.0, 0.0) - 350.0).abs() < 0.001);
        // Sweep is bounded by twice the amplitude
        for i in 0..500 {
            let t = i as f32 * 0.05;
            let x = boss_strafe_x(350.0, 120.0, t);
            assert!(x >= 350.0 - 0.001 && x <= 350.0 + 240.0 + 0.001);
        }
    }

    #[test]
    fn test_aim_direction_normalized() {
        let d = aim_direction(Vec2::new(0.0, 0.0), Vec2::new(300.0, 400.0));
        assert!((d.length() - 1.0).abs() < 0.001);
        assert!((d.x - 0.6).abs() < 0.001);
        assert!((d.y - 0.8).abs() < 0.001);

        // Degenerate case aims straight down
        let down = aim_direction(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(down, Vec2::new(0.0, 1.0));
    }
}
