//! Reward claims: the per-chest ClaimAttempt record and the ClaimPort seam.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::types::{ChestId, ClaimPhase, ClaimSeq, SessionEpoch, SettlementId, WalletAddress};

// ============================================================================
// Port
// ============================================================================

/// Successful, externally confirmed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub settlement_id: SettlementId,
}

impl Settlement {
    pub fn new(settlement_id: impl Into<String>) -> Self {
        Self {
            settlement_id: settlement_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimFailureKind {
    /// The contract refused the call, e.g. the signer may not mint.
    Rejected,
    /// The user abandoned the transaction in their wallet.
    Cancelled,
    /// Not enough native balance to pay gas.
    InsufficientFunds,
    /// Network trouble or anything unrecognized.
    Infrastructure,
}

impl ClaimFailureKind {
    /// Classify a raw provider error message.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_ascii_lowercase();
        if message.contains("CALL_EXCEPTION") || lowered.contains("missing revert data") {
            ClaimFailureKind::Rejected
        } else if lowered.contains("user rejected") || lowered.contains("user denied") {
            ClaimFailureKind::Cancelled
        } else if lowered.contains("insufficient funds") {
            ClaimFailureKind::InsufficientFunds
        } else {
            ClaimFailureKind::Infrastructure
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimFailureKind::Rejected => "rejected",
            ClaimFailureKind::Cancelled => "cancelled",
            ClaimFailureKind::InsufficientFunds => "insufficient_funds",
            ClaimFailureKind::Infrastructure => "infrastructure",
        }
    }

    /// Message shown to the player.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClaimFailureKind::Rejected => {
                "Transaction rejected by contract. You may not have permission to mint tokens."
            }
            ClaimFailureKind::Cancelled => "Transaction cancelled by user",
            ClaimFailureKind::InsufficientFunds => "Insufficient funds for gas fees",
            ClaimFailureKind::Infrastructure => "An error occurred while claiming tokens.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPortError {
    pub kind: ClaimFailureKind,
    pub message: String,
}

impl ClaimPortError {
    pub fn new(kind: ClaimFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Wrap a provider error string, classifying it by content.
    pub fn from_provider_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ClaimFailureKind::classify(&message),
            message,
        }
    }

    /// Text shown to the player. Unrecognized provider errors are shown
    /// verbatim; known kinds get their fixed message.
    pub fn user_message(&self) -> String {
        match self.kind {
            ClaimFailureKind::Infrastructure if !self.message.trim().is_empty() => {
                self.message.clone()
            }
            kind => kind.user_message().to_string(),
        }
    }
}

impl fmt::Display for ClaimPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim {}: {}", self.kind.label(), self.message)
    }
}

impl Error for ClaimPortError {}

/// External capability that settles a reward for an address.
///
/// Callers submit each ticket at most once; the core never retries on its
/// own.
pub trait ClaimPort {
    fn submit<'a>(
        &'a self,
        address: &'a str,
        amount: u64,
    ) -> BoxFuture<'a, Result<Settlement, ClaimPortError>>;
}

impl<P: ClaimPort + ?Sized> ClaimPort for &P {
    fn submit<'a>(
        &'a self,
        address: &'a str,
        amount: u64,
    ) -> BoxFuture<'a, Result<Settlement, ClaimPortError>> {
        (**self).submit(address, amount)
    }
}

// ============================================================================
// Attempt
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFailure {
    pub kind: ClaimFailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAttempt {
    pub chest_id: ChestId,
    pub reward_amount: u64,
    pub phase: ClaimPhase,
    pub settlement_id: Option<SettlementId>,
    pub failure: Option<ClaimFailure>,
    /// Bumped on every Idle/Failed -> Pending transition.
    pub attempt_seq: ClaimSeq,
}

impl ClaimAttempt {
    pub fn new(chest_id: impl Into<String>, reward_amount: u64) -> Self {
        Self {
            chest_id: chest_id.into(),
            reward_amount,
            phase: ClaimPhase::Idle,
            settlement_id: None,
            failure: None,
            attempt_seq: 0,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_ref().map(|failure| failure.message.as_str())
    }
}

/// Handle for one in-flight claim. Resolving it is the only way a Pending
/// attempt can settle or fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTicket {
    pub chest_id: ChestId,
    pub address: WalletAddress,
    pub amount: u64,
    pub attempt_seq: ClaimSeq,
    pub epoch: SessionEpoch,
}

impl ClaimTicket {
    pub fn submit<'a, P: ClaimPort + ?Sized>(
        &'a self,
        port: &'a P,
    ) -> BoxFuture<'a, Result<Settlement, ClaimPortError>> {
        port.submit(&self.address, self.amount)
    }
}

// ============================================================================
// In-process port
// ============================================================================

/// Settles immediately with a deterministic transaction-style id, or fails
/// with a scripted provider message. Stands in for a real wallet during
/// development and tests.
#[derive(Debug, Default)]
pub struct MockClaimPort {
    nonce: AtomicU64,
    scripted_failures: Mutex<Vec<String>>,
    submissions: Mutex<Vec<(WalletAddress, u64)>>,
}

impl MockClaimPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a provider error message for the next submission.
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut failures) = self.scripted_failures.lock() {
            failures.push(message.into());
        }
    }

    pub fn submissions(&self) -> Vec<(WalletAddress, u64)> {
        self.submissions
            .lock()
            .map(|submissions| submissions.clone())
            .unwrap_or_default()
    }

    fn settle(&self, address: &str, amount: u64) -> Result<Settlement, ClaimPortError> {
        let mut submissions = self.submissions.lock().map_err(|_| {
            ClaimPortError::new(
                ClaimFailureKind::Infrastructure,
                "mock claim port mutex poisoned",
            )
        })?;
        submissions.push((address.to_string(), amount));
        drop(submissions);

        let scripted = self
            .scripted_failures
            .lock()
            .ok()
            .and_then(|mut failures| (!failures.is_empty()).then(|| failures.remove(0)));
        if let Some(message) = scripted {
            return Err(ClaimPortError::from_provider_message(message));
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Sha256::new();
        hasher.update(address.as_bytes());
        hasher.update(amount.to_be_bytes());
        hasher.update(nonce.to_be_bytes());
        Ok(Settlement::new(format!("0x{}", hex::encode(hasher.finalize()))))
    }
}

impl ClaimPort for MockClaimPort {
    fn submit<'a>(
        &'a self,
        address: &'a str,
        amount: u64,
    ) -> BoxFuture<'a, Result<Settlement, ClaimPortError>> {
        Box::pin(async move { self.settle(address, amount) })
    }
}
