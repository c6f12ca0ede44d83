use serde::{Deserialize, Serialize};

use crate::geometry::WorldPos;

use super::types::{ChestId, ChestPhase, LID_LERP_RATE, LID_OPEN_ANGLE, LID_SETTLE_EPSILON};

const CHEST_REST_HEIGHT: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub id: ChestId,
    position: WorldPos,
    phase: ChestPhase,
    /// Sampled once when the chest leaves `Closed`.
    reward_amount: Option<u64>,
    lid_angle: f64,
}

impl Chest {
    pub fn new(id: impl Into<String>, position: WorldPos) -> Self {
        Self {
            id: id.into(),
            position,
            phase: ChestPhase::Closed,
            reward_amount: None,
            lid_angle: 0.0,
        }
    }

    pub fn position(&self) -> WorldPos {
        self.position
    }

    pub fn phase(&self) -> ChestPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn reward_amount(&self) -> Option<u64> {
        self.reward_amount
    }

    pub fn lid_angle(&self) -> f64 {
        self.lid_angle
    }

    /// Closed -> Opening. Returns false, and changes nothing, if the chest
    /// already left `Closed`.
    pub(crate) fn begin_opening(&mut self, reward_amount: u64) -> bool {
        if self.phase != ChestPhase::Closed {
            return false;
        }
        self.phase = ChestPhase::Opening;
        self.reward_amount = Some(reward_amount);
        true
    }

    /// Swing the lid toward its target. Returns true on the tick the lid
    /// settles and the chest becomes `Open`.
    pub(crate) fn animate_lid(&mut self, dt_s: f64) -> bool {
        let target = if self.phase.is_open() {
            LID_OPEN_ANGLE
        } else {
            0.0
        };
        if dt_s.is_finite() && dt_s > 0.0 {
            let t = (dt_s * LID_LERP_RATE).min(1.0);
            self.lid_angle += (target - self.lid_angle) * t;
        }
        if self.phase == ChestPhase::Opening && (target - self.lid_angle).abs() <= LID_SETTLE_EPSILON
        {
            self.lid_angle = target;
            self.phase = ChestPhase::Open;
            return true;
        }
        false
    }

    /// Idle float height for a closed chest at `elapsed_s`. Open chests stop
    /// floating and sit at the rest height.
    pub fn bob_height(&self, elapsed_s: f64) -> f64 {
        if self.phase.is_open() {
            return CHEST_REST_HEIGHT;
        }
        (elapsed_s * 2.0).sin() * 0.1 + CHEST_REST_HEIGHT
    }
}
