//! Actor motion: straight-line, constant-speed approach toward a target.

use serde::{Deserialize, Serialize};

use crate::geometry::{direction_towards, space_distance, yaw_towards, WorldPos};

use super::lock::InteractionLock;
use super::types::{DEFAULT_ARRIVAL_EPSILON, DEFAULT_MOVE_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Units per second.
    pub speed: f64,
    pub arrival_epsilon: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVE_SPEED,
            arrival_epsilon: DEFAULT_ARRIVAL_EPSILON,
        }
    }
}

impl MotionConfig {
    pub fn sanitized(mut self) -> Self {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            self.speed = DEFAULT_MOVE_SPEED;
        }
        if !self.arrival_epsilon.is_finite() || self.arrival_epsilon < 0.0 {
            self.arrival_epsilon = DEFAULT_ARRIVAL_EPSILON;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub position: WorldPos,
    pub movement_target: WorldPos,
    pub is_moving: bool,
    /// Radians about +y; 0 faces +z.
    pub facing_yaw: f64,
}

impl Default for Actor {
    fn default() -> Self {
        Self::at(WorldPos::ORIGIN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionOutcome {
    Idle,
    Blocked,
    Moved { from: WorldPos, to: WorldPos },
    Arrived { at: WorldPos },
}

impl Actor {
    pub fn at(position: WorldPos) -> Self {
        Self {
            position,
            movement_target: position,
            is_moving: false,
            facing_yaw: 0.0,
        }
    }

    pub fn set_target(&mut self, target: WorldPos) {
        self.movement_target = target;
        self.is_moving = true;
    }

    pub fn stop(&mut self) {
        self.is_moving = false;
    }

    pub fn distance_to_target(&self) -> f64 {
        space_distance(self.position, self.movement_target)
    }

    /// Advance one tick of `dt_s` seconds.
    ///
    /// Nothing moves while `lock` is held. The step is clamped to the
    /// remaining distance, and the moving flag clears as soon as the actor
    /// is within `arrival_epsilon` of the target.
    pub fn advance(
        &mut self,
        dt_s: f64,
        config: &MotionConfig,
        lock: &InteractionLock,
    ) -> MotionOutcome {
        if !self.is_moving {
            return MotionOutcome::Idle;
        }
        if lock.is_blocked() {
            return MotionOutcome::Blocked;
        }

        let remaining = self.distance_to_target();
        if remaining <= config.arrival_epsilon {
            self.is_moving = false;
            return MotionOutcome::Arrived { at: self.position };
        }
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return MotionOutcome::Idle;
        }

        let Some((dx, dy, dz)) = direction_towards(self.position, self.movement_target) else {
            self.is_moving = false;
            return MotionOutcome::Arrived { at: self.position };
        };
        let from = self.position;
        let step = (config.speed * dt_s).min(remaining);
        self.position = from.offset(dx * step, dy * step, dz * step);
        if let Some(yaw) = yaw_towards(from, self.movement_target) {
            self.facing_yaw = yaw;
        }

        if self.distance_to_target() <= config.arrival_epsilon {
            self.is_moving = false;
            return MotionOutcome::Arrived { at: self.position };
        }
        MotionOutcome::Moved {
            from,
            to: self.position,
        }
    }
}
