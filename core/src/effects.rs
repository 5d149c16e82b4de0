use core::f64::consts::TAU;
use core::time::Duration;

use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// A tile that was just uncovered, for the renderer to fade in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealEffect {
    pub coords: Coord2,
    pub started_at: Duration,
}

/// Floating score gain shown where it was earned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub coords: Coord2,
    pub amount: u64,
    pub started_at: Duration,
}

/// Short-lived animations registered by the simulation and pruned once they expire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    reveals: Vec<RevealEffect>,
    popups: Vec<ScorePopup>,
}

impl Effects {
    pub fn reveals(&self) -> &[RevealEffect] {
        &self.reveals
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    pub(crate) fn reveal(&mut self, coords: Coord2, now: Duration) {
        self.reveals.push(RevealEffect {
            coords,
            started_at: now,
        });
    }

    pub(crate) fn popup(&mut self, coords: Coord2, amount: u64, now: Duration) {
        self.popups.push(ScorePopup {
            coords,
            amount,
            started_at: now,
        });
    }

    pub(crate) fn prune(&mut self, now: Duration, reveal_life: Duration, popup_life: Duration) {
        self.reveals
            .retain(|effect| now.saturating_sub(effect.started_at) < reveal_life);
        self.popups
            .retain(|popup| now.saturating_sub(popup.started_at) < popup_life);
    }
}

/// One spark of the death explosion, in tile units.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub alpha: f64,
    pub fade: f64,
}

/// The death sequence: particles fly out from the head while the game is frozen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    origin: Coord2,
    cause: DeathCause,
    particles: Vec<Particle>,
    frames_left: u32,
}

impl Explosion {
    pub(crate) fn new(
        origin: Coord2,
        cause: DeathCause,
        particle_count: usize,
        frames: u32,
        rng: &mut SmallRng,
    ) -> Self {
        let center = (f64::from(origin.0) + 0.5, f64::from(origin.1) + 0.5);
        let particles = (0..particle_count)
            .map(|_| {
                let angle = rng.random_range(0.0..TAU);
                let speed = rng.random_range(0.02..0.4);
                Particle {
                    x: center.0,
                    y: center.1,
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    alpha: 1.0,
                    fade: rng.random_range(0.004..0.02),
                }
            })
            .collect();
        Self {
            origin,
            cause,
            particles,
            frames_left: frames,
        }
    }

    pub fn origin(&self) -> Coord2 {
        self.origin
    }

    pub fn cause(&self) -> DeathCause {
        self.cause
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frames_left(&self) -> u32 {
        self.frames_left
    }

    pub fn is_finished(&self) -> bool {
        self.frames_left == 0
    }

    /// Advances the explosion by one frame.
    pub(crate) fn update(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.vx *= 0.98;
            particle.vy *= 0.98;
            particle.alpha = (particle.alpha - particle.fade).max(0.0);
        }
    }
}
