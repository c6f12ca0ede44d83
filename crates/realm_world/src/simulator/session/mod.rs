//! RealmSession: the one owner of actor, chests, claims, wallet and balance.
//!
//! Every mutation goes through `&mut RealmSession`, which makes each
//! operation atomic with respect to the frame loop: a proximity check and
//! the transition it guards always see the same actor position.

mod claims;
mod interact;
mod step;
mod types;

use rand_core::{OsRng, RngCore};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use super::chest::Chest;
use super::claim::ClaimAttempt;
use super::config::RealmConfig;
use super::init::{build_chests, WorldInitReport};
use super::lock::{InteractionGuard, InteractionLock};
use super::log::ActivityLog;
use super::motion::Actor;
use super::types::{
    ChestId, ClaimPhase, RealmEventId, RealmTick, SessionEpoch, GUEST_WALLET_ADDRESS,
    JOURNAL_CAPACITY,
};
use super::wallet::{is_valid_address, short_address, WalletState};

pub use types::{
    ClaimView, ErrorKind, InteractOutcome, NotReadyReason, RealmError, RealmEvent,
    RealmEventKind,
};

const WELCOME_MESSAGE: &str = "Welcome to the realm. Please connect your wallet.";

/// The claim dialog currently on screen. Holding it keeps movement blocked.
struct ClaimDialog {
    chest_id: ChestId,
    _guard: InteractionGuard,
}

pub struct RealmSession {
    tick: RealmTick,
    elapsed_s: f64,
    epoch: SessionEpoch,
    config: RealmConfig,
    actor: Actor,
    chests: BTreeMap<ChestId, Chest>,
    claims: BTreeMap<ChestId, ClaimAttempt>,
    wallet: WalletState,
    balance: u64,
    lock: InteractionLock,
    dialog: Option<ClaimDialog>,
    next_event_id: RealmEventId,
    journal: VecDeque<RealmEvent>,
    observed_events: usize,
    activity: ActivityLog,
    rng: Box<dyn RngCore + Send>,
}

impl fmt::Debug for RealmSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealmSession")
            .field("tick", &self.tick)
            .field("epoch", &self.epoch)
            .field("actor", &self.actor)
            .field("chests", &self.chests.len())
            .field("claims", &self.claims.len())
            .field("wallet", &self.wallet)
            .field("balance", &self.balance)
            .field("lock", &self.lock)
            .field(
                "dialog",
                &self.dialog.as_ref().map(|dialog| dialog.chest_id.as_str()),
            )
            .field("journal_len", &self.journal.len())
            .finish()
    }
}

impl RealmSession {
    /// Session drawing rewards from the operating system generator.
    pub fn new(config: RealmConfig) -> Self {
        Self::with_rng(config, OsRng)
    }

    pub fn with_rng<R>(config: RealmConfig, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        let config = config.sanitized();
        let (chests, report) = build_chests(&config.world);
        let mut session = Self {
            tick: 0,
            elapsed_s: 0.0,
            epoch: 0,
            actor: Actor::default(),
            chests,
            claims: BTreeMap::new(),
            wallet: WalletState::default(),
            balance: 0,
            lock: InteractionLock::new(),
            dialog: None,
            next_event_id: 0,
            journal: VecDeque::new(),
            observed_events: 0,
            activity: ActivityLog::new(config.log_capacity),
            rng: Box::new(rng),
            config,
        };
        session.log(WELCOME_MESSAGE);
        tracing::info!(seed = report.seed, chests = report.chests, "realm session created");
        session
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn tick(&self) -> RealmTick {
        self.tick
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn chest(&self, chest_id: &str) -> Option<&Chest> {
        self.chests.get(chest_id)
    }

    pub fn chests(&self) -> impl Iterator<Item = &Chest> {
        self.chests.values()
    }

    pub fn claim_attempt(&self, chest_id: &str) -> Option<&ClaimAttempt> {
        self.claims.get(chest_id)
    }

    pub fn wallet(&self) -> &WalletState {
        &self.wallet
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Recent events, oldest first. Holds at most [`JOURNAL_CAPACITY`] entries.
    pub fn journal(&self) -> &VecDeque<RealmEvent> {
        &self.journal
    }

    /// Events recorded since the previous call.
    pub fn drain_events(&mut self) -> Vec<RealmEvent> {
        let fresh = self.journal.range(self.observed_events..).cloned().collect();
        self.observed_events = self.journal.len();
        fresh
    }

    /// Capability for other blocking surfaces (settings, menus) to freeze
    /// movement while they are open.
    pub fn interaction_lock(&self) -> InteractionLock {
        self.lock.clone()
    }

    pub fn is_movement_blocked(&self) -> bool {
        self.lock.is_blocked()
    }

    pub fn pending_claims(&self) -> usize {
        self.claims
            .values()
            .filter(|attempt| attempt.phase == ClaimPhase::Pending)
            .count()
    }

    // ------------------------------------------------------------------
    // Wallet
    // ------------------------------------------------------------------

    pub fn connect_wallet(&mut self, address: impl Into<String>) -> Result<(), RealmError> {
        let address = address.into();
        if !is_valid_address(&address) {
            return Err(RealmError::InvalidAddress { address });
        }
        self.wallet.connect(address.clone());
        self.log(format!("Wallet connected: {}...", short_address(&address)));
        self.record_event(RealmEventKind::WalletConnected { address });
        Ok(())
    }

    /// Development wallet that skips the provider entirely.
    pub fn connect_guest(&mut self) -> Result<(), RealmError> {
        self.connect_wallet(GUEST_WALLET_ADDRESS)
    }

    /// Record the user key handed back by the onboarding flow.
    pub fn onboard(&mut self, user_key: impl Into<String>) -> Result<(), RealmError> {
        let Some(address) = self.wallet.address().map(str::to_string) else {
            return Err(RealmError::not_ready(NotReadyReason::WalletNotConnected));
        };
        let user_key = user_key.into();
        if user_key.trim().is_empty() {
            return Err(RealmError::InvalidUserKey);
        }
        self.wallet.set_user_key(user_key);
        self.log("Onboarding: Successfully onboarded!");
        self.record_event(RealmEventKind::Onboarded { address });
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if !self.wallet.is_connected() {
            return;
        }
        self.wallet.clear();
        self.log("Wallet disconnected.");
        self.record_event(RealmEventKind::WalletDisconnected);
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Replace actor, chests, claims, balance and log with a fresh world from
    /// the same init config. The wallet binding survives.
    ///
    /// Refused while any claim is pending. Outstanding tickets become stale.
    pub fn reset(&mut self) -> Result<WorldInitReport, RealmError> {
        let pending = self.pending_claims();
        if pending > 0 {
            return Err(RealmError::not_ready(NotReadyReason::ClaimsInFlight {
                count: pending,
            }));
        }
        let (chests, report) = build_chests(&self.config.world);
        self.dialog = None;
        self.epoch = self.epoch.saturating_add(1);
        self.actor = Actor::default();
        self.chests = chests;
        self.claims.clear();
        self.balance = 0;
        self.activity.clear();
        self.log("System: Game reset successfully.");
        self.record_event(RealmEventKind::SessionReset { epoch: self.epoch });
        tracing::info!(epoch = self.epoch, chests = report.chests, "realm session reset");
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(super) fn record_event(&mut self, kind: RealmEventKind) -> RealmEvent {
        let event = RealmEvent {
            id: self.next_event_id,
            tick: self.tick,
            kind,
        };
        self.next_event_id = self.next_event_id.saturating_add(1);
        if self.journal.len() >= JOURNAL_CAPACITY {
            self.journal.pop_front();
            self.observed_events = self.observed_events.saturating_sub(1);
        }
        self.journal.push_back(event.clone());
        event
    }

    pub(super) fn log(&mut self, message: impl Into<String>) {
        self.activity.push(self.tick, message);
    }

    /// The claim dialog belongs to one chest at a time. Another chest's
    /// dialog must be dismissed by the player before this one can take over.
    fn ensure_dialog_free(&self, chest_id: &str) -> Result<(), RealmError> {
        match &self.dialog {
            Some(dialog) if dialog.chest_id != chest_id => {
                Err(RealmError::not_ready(NotReadyReason::DialogOpen {
                    chest_id: dialog.chest_id.clone(),
                }))
            }
            _ => Ok(()),
        }
    }

    /// Callers check [`Self::ensure_dialog_free`] first.
    fn open_dialog(&mut self, chest_id: &str) {
        if self.dialog.is_some() {
            return;
        }
        let guard = self.lock.acquire(format!("claim dialog {chest_id}"));
        self.dialog = Some(ClaimDialog {
            chest_id: chest_id.to_string(),
            _guard: guard,
        });
    }
}
