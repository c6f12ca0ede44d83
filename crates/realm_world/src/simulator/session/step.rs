use crate::geometry::WorldPos;

use super::super::motion::MotionOutcome;
use super::{RealmEvent, RealmEventKind, RealmSession};

impl RealmSession {
    /// Point the actor at `target`. Ignored, returning false, while any
    /// blocking surface holds the interaction lock or the point is not
    /// finite.
    pub fn set_move_target(&mut self, target: WorldPos) -> bool {
        if self.lock.is_blocked() || !target.is_finite() {
            return false;
        }
        self.actor.set_target(target);
        true
    }

    /// Advance one frame of `dt_s` seconds: actor motion, then lid
    /// animation. Returns the events this frame produced.
    pub fn step(&mut self, dt_s: f64) -> Vec<RealmEvent> {
        self.tick = self.tick.saturating_add(1);
        if dt_s.is_finite() && dt_s > 0.0 {
            self.elapsed_s += dt_s;
        }
        let mut events = Vec::new();

        if let MotionOutcome::Arrived { at } =
            self.actor.advance(dt_s, &self.config.motion, &self.lock)
        {
            tracing::debug!(x = at.x, y = at.y, z = at.z, "actor arrived");
            events.push(self.record_event(RealmEventKind::ActorArrived { position: at }));
        }

        let settled: Vec<String> = self
            .chests
            .values_mut()
            .filter_map(|chest| chest.animate_lid(dt_s).then(|| chest.id.clone()))
            .collect();
        for chest_id in settled {
            events.push(self.record_event(RealmEventKind::ChestFullyOpened { chest_id }));
        }

        events
    }

    /// Bob height of a closed chest at the current session time.
    pub fn chest_bob_height(&self, chest_id: &str) -> Option<f64> {
        self.chests
            .get(chest_id)
            .map(|chest| chest.bob_height(self.elapsed_s))
    }
}
