use super::super::claim::{
    ClaimAttempt, ClaimFailure, ClaimPort, ClaimPortError, ClaimTicket, Settlement,
};
use super::super::types::ClaimPhase;
use super::super::wallet::{is_valid_address, short_address};
use super::{ClaimView, NotReadyReason, RealmError, RealmEventKind, RealmSession};

fn view_of(attempt: &ClaimAttempt) -> ClaimView {
    ClaimView {
        chest_id: attempt.chest_id.clone(),
        reward_amount: attempt.reward_amount,
        phase: attempt.phase,
        settlement_id: attempt.settlement_id.clone(),
        failure_reason: attempt.failure_reason().map(str::to_string),
    }
}

impl RealmSession {
    /// Move the chest's attempt from Idle or Failed to Pending and hand back
    /// the ticket the caller submits to a [`ClaimPort`].
    pub fn request_claim(&mut self, chest_id: &str) -> Result<ClaimTicket, RealmError> {
        let Some(address) = self.wallet.address().map(str::to_string) else {
            return Err(RealmError::not_ready(NotReadyReason::WalletNotConnected));
        };
        if !is_valid_address(&address) {
            return Err(RealmError::InvalidAddress { address });
        }
        if !self.wallet.is_onboarded() {
            return Err(RealmError::not_ready(NotReadyReason::NotOnboarded));
        }

        let epoch = self.epoch;
        let Some(attempt) = self.claims.get_mut(chest_id) else {
            return Err(RealmError::not_ready(NotReadyReason::NoClaimAttempt {
                chest_id: chest_id.to_string(),
            }));
        };
        match attempt.phase {
            ClaimPhase::Idle | ClaimPhase::Failed => {}
            ClaimPhase::Pending => {
                return Err(RealmError::not_ready(NotReadyReason::ClaimAlreadyPending {
                    chest_id: chest_id.to_string(),
                }));
            }
            ClaimPhase::Settled => {
                return Err(RealmError::not_ready(NotReadyReason::ClaimAlreadySettled {
                    chest_id: chest_id.to_string(),
                }));
            }
        }

        attempt.phase = ClaimPhase::Pending;
        attempt.failure = None;
        attempt.attempt_seq = attempt.attempt_seq.saturating_add(1);
        let ticket = ClaimTicket {
            chest_id: chest_id.to_string(),
            address,
            amount: attempt.reward_amount,
            attempt_seq: attempt.attempt_seq,
            epoch,
        };

        self.log(format!(
            "Token: Minting {} tokens to {}...",
            ticket.amount,
            short_address(&ticket.address)
        ));
        self.record_event(RealmEventKind::ClaimPending {
            chest_id: ticket.chest_id.clone(),
            amount: ticket.amount,
            attempt_seq: ticket.attempt_seq,
        });
        tracing::debug!(
            chest_id,
            amount = ticket.amount,
            attempt_seq = ticket.attempt_seq,
            "claim pending"
        );
        Ok(ticket)
    }

    /// Apply the port's answer for `ticket`.
    ///
    /// Only the newest ticket of the current epoch, for an attempt that is
    /// still Pending, is accepted. Anything else is `StaleClaim` and leaves
    /// the balance alone. A port failure is a normal outcome here: the
    /// attempt moves to Failed and `Ok(ClaimPhase::Failed)` is returned.
    pub fn resolve_claim(
        &mut self,
        ticket: &ClaimTicket,
        outcome: Result<Settlement, ClaimPortError>,
    ) -> Result<ClaimPhase, RealmError> {
        let stale = || RealmError::StaleClaim {
            chest_id: ticket.chest_id.clone(),
        };
        if ticket.epoch != self.epoch {
            tracing::warn!(
                chest_id = %ticket.chest_id,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "claim resolved after reset"
            );
            return Err(stale());
        }
        let Some(attempt) = self.claims.get_mut(&ticket.chest_id) else {
            return Err(stale());
        };
        if attempt.attempt_seq != ticket.attempt_seq || attempt.phase != ClaimPhase::Pending {
            tracing::warn!(
                chest_id = %ticket.chest_id,
                attempt_seq = ticket.attempt_seq,
                phase = attempt.phase.label(),
                "duplicate or outdated claim resolution"
            );
            return Err(stale());
        }

        match outcome {
            Ok(settlement) => {
                let amount = attempt.reward_amount;
                attempt.phase = ClaimPhase::Settled;
                attempt.settlement_id = Some(settlement.settlement_id.clone());
                self.balance = self.balance.saturating_add(amount);
                self.log(format!("Token: Successfully minted {amount} tokens!"));
                self.record_event(RealmEventKind::ClaimSettled {
                    chest_id: ticket.chest_id.clone(),
                    amount,
                    settlement_id: settlement.settlement_id,
                    balance: self.balance,
                });
                tracing::info!(
                    chest_id = %ticket.chest_id,
                    amount,
                    balance = self.balance,
                    "claim settled"
                );
                Ok(ClaimPhase::Settled)
            }
            Err(err) => {
                let reason = err.user_message();
                attempt.phase = ClaimPhase::Failed;
                attempt.failure = Some(ClaimFailure {
                    kind: err.kind,
                    message: reason.clone(),
                });
                self.log(format!("Token Error: {reason}"));
                self.record_event(RealmEventKind::ClaimFailed {
                    chest_id: ticket.chest_id.clone(),
                    kind: err.kind,
                    message: err.message.clone(),
                });
                tracing::warn!(
                    chest_id = %ticket.chest_id,
                    kind = err.kind.label(),
                    error = %err.message,
                    "claim failed"
                );
                Ok(ClaimPhase::Failed)
            }
        }
    }

    /// Request, submit and resolve in one go.
    ///
    /// A port failure is returned as `RealmError::Claim` after the attempt
    /// has already been marked Failed.
    pub async fn claim<P>(&mut self, chest_id: &str, port: &P) -> Result<Settlement, RealmError>
    where
        P: ClaimPort + ?Sized,
    {
        let ticket = self.request_claim(chest_id)?;
        let outcome = ticket.submit(port).await;
        self.resolve_claim(&ticket, outcome.clone())?;
        outcome.map_err(RealmError::from)
    }

    /// Failed -> Idle. Clears the failure and brings the dialog back.
    pub fn retry(&mut self, chest_id: &str) -> Result<(), RealmError> {
        let Some(phase) = self.claims.get(chest_id).map(|attempt| attempt.phase) else {
            return Err(RealmError::not_ready(NotReadyReason::NoClaimAttempt {
                chest_id: chest_id.to_string(),
            }));
        };
        if phase != ClaimPhase::Failed {
            return Err(RealmError::not_ready(NotReadyReason::ClaimNotFailed {
                chest_id: chest_id.to_string(),
                phase,
            }));
        }
        self.ensure_dialog_free(chest_id)?;
        let Some(attempt) = self.claims.get_mut(chest_id) else {
            return Err(RealmError::not_ready(NotReadyReason::NoClaimAttempt {
                chest_id: chest_id.to_string(),
            }));
        };
        attempt.phase = ClaimPhase::Idle;
        attempt.failure = None;
        self.open_dialog(chest_id);
        self.record_event(RealmEventKind::ClaimRetried {
            chest_id: chest_id.to_string(),
        });
        Ok(())
    }

    /// Close the claim dialog and release the movement lock it holds.
    ///
    /// An Idle or Failed attempt is discarded with the dialog. Pending and
    /// Settled attempts stay keyed by chest, so a late settlement still lands
    /// exactly once. Returns false when no dialog was open.
    pub fn dismiss(&mut self) -> bool {
        let Some(dialog) = self.dialog.take() else {
            return false;
        };
        let chest_id = dialog.chest_id.clone();
        drop(dialog);

        let phase = self
            .claims
            .get(&chest_id)
            .map(|attempt| attempt.phase)
            .unwrap_or_default();
        if matches!(phase, ClaimPhase::Idle | ClaimPhase::Failed) {
            self.claims.remove(&chest_id);
        }
        self.record_event(RealmEventKind::ClaimDismissed { chest_id, phase });
        true
    }

    /// Reattach the dialog to the chest's attempt and return what it shows.
    pub fn show_claim(&mut self, chest_id: &str) -> Result<ClaimView, RealmError> {
        let Some(view) = self.claims.get(chest_id).map(view_of) else {
            return Err(RealmError::not_ready(NotReadyReason::NoClaimAttempt {
                chest_id: chest_id.to_string(),
            }));
        };
        self.ensure_dialog_free(chest_id)?;
        self.open_dialog(chest_id);
        Ok(view)
    }

    /// View for the dialog currently on screen, if any.
    pub fn active_claim_view(&self) -> Option<ClaimView> {
        let dialog = self.dialog.as_ref()?;
        self.claims.get(&dialog.chest_id).map(view_of)
    }

    pub fn claim_view(&self, chest_id: &str) -> Option<ClaimView> {
        self.claims.get(chest_id).map(view_of)
    }
}
