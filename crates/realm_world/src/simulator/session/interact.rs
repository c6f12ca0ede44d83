use crate::geometry::{space_distance, within_range};

use super::super::claim::ClaimAttempt;
use super::super::reward::sample_reward_in;
use super::{InteractOutcome, RealmError, RealmEventKind, RealmSession};

impl RealmSession {
    /// Try to open `chest_id` from where the actor stands right now.
    ///
    /// An already opened chest is a no-op: no new reward is drawn and no
    /// event is recorded. While another chest's claim dialog is up the
    /// attempt is refused with `NotReady` and nothing is sampled.
    pub fn interact(&mut self, chest_id: &str) -> Result<InteractOutcome, RealmError> {
        let actor_pos = self.actor.position;
        let radius = self.config.proximity_radius;
        let Some(chest) = self.chests.get(chest_id) else {
            return Err(RealmError::UnknownChest {
                chest_id: chest_id.to_string(),
            });
        };
        if chest.is_open() {
            return Ok(InteractOutcome::AlreadyOpen);
        }
        self.ensure_dialog_free(chest_id)?;

        if !within_range(actor_pos, chest.position(), radius) {
            let distance = space_distance(actor_pos, chest.position());
            tracing::debug!(chest_id, distance, radius, "interaction denied: too far");
            let err = RealmError::TooFar {
                chest_id: chest_id.to_string(),
                distance,
                radius,
            };
            self.log(err.user_message());
            self.record_event(RealmEventKind::ProximityDenied {
                chest_id: chest_id.to_string(),
                distance,
                radius,
            });
            return Err(err);
        }

        let reward_amount = sample_reward_in(self.rng.as_mut(), self.config.reward);
        let opened = self
            .chests
            .get_mut(chest_id)
            .is_some_and(|chest| chest.begin_opening(reward_amount));
        if !opened {
            return Ok(InteractOutcome::AlreadyOpen);
        }

        self.claims.insert(
            chest_id.to_string(),
            ClaimAttempt::new(chest_id, reward_amount),
        );
        self.open_dialog(chest_id);
        self.log(format!("You found {reward_amount} tokens!"));
        self.record_event(RealmEventKind::ChestOpened {
            chest_id: chest_id.to_string(),
            reward_amount,
        });
        tracing::info!(chest_id, reward_amount, "chest opened");
        Ok(InteractOutcome::Opened { reward_amount })
    }
}
