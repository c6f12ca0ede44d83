use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::geometry::WorldPos;

use super::super::claim::{ClaimFailureKind, ClaimPortError};
use super::super::types::{ChestId, ClaimPhase, RealmEventId, RealmTick, SettlementId};

// ============================================================================
// Event Types
// ============================================================================

/// Lifecycle notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmEvent {
    pub id: RealmEventId,
    pub tick: RealmTick,
    pub kind: RealmEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RealmEventKind {
    ChestOpened {
        chest_id: ChestId,
        reward_amount: u64,
    },
    ChestFullyOpened {
        chest_id: ChestId,
    },
    ProximityDenied {
        chest_id: ChestId,
        distance: f64,
        radius: f64,
    },
    ClaimPending {
        chest_id: ChestId,
        amount: u64,
        attempt_seq: u64,
    },
    ClaimSettled {
        chest_id: ChestId,
        amount: u64,
        settlement_id: SettlementId,
        balance: u64,
    },
    ClaimFailed {
        chest_id: ChestId,
        kind: ClaimFailureKind,
        message: String,
    },
    ClaimRetried {
        chest_id: ChestId,
    },
    ClaimDismissed {
        chest_id: ChestId,
        phase: ClaimPhase,
    },
    ActorArrived {
        position: WorldPos,
    },
    WalletConnected {
        address: String,
    },
    WalletDisconnected,
    Onboarded {
        address: String,
    },
    SessionReset {
        epoch: u64,
    },
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    Opened { reward_amount: u64 },
    AlreadyOpen,
}

/// What the claim dialog shows for the chest it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimView {
    pub chest_id: ChestId,
    pub reward_amount: u64,
    pub phase: ClaimPhase,
    pub settlement_id: Option<SettlementId>,
    pub failure_reason: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// The error kinds surfaced to players. Every one of them is recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TooFar,
    NotReady,
    ClaimRejected,
    ClaimCancelled,
    ClaimInfrastructure,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NotReadyReason {
    WalletNotConnected,
    NotOnboarded,
    NoClaimAttempt { chest_id: ChestId },
    ClaimAlreadyPending { chest_id: ChestId },
    ClaimAlreadySettled { chest_id: ChestId },
    ClaimNotFailed { chest_id: ChestId, phase: ClaimPhase },
    ClaimsInFlight { count: usize },
    DialogOpen { chest_id: ChestId },
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotReadyReason::WalletNotConnected => write!(f, "wallet not connected"),
            NotReadyReason::NotOnboarded => write!(f, "please complete onboarding first"),
            NotReadyReason::NoClaimAttempt { chest_id } => {
                write!(f, "no claimable reward for {chest_id}")
            }
            NotReadyReason::ClaimAlreadyPending { chest_id } => {
                write!(f, "claim for {chest_id} is already pending")
            }
            NotReadyReason::ClaimAlreadySettled { chest_id } => {
                write!(f, "reward for {chest_id} was already claimed")
            }
            NotReadyReason::ClaimNotFailed { chest_id, phase } => {
                write!(f, "claim for {chest_id} is {}, not failed", phase.label())
            }
            NotReadyReason::ClaimsInFlight { count } => {
                write!(f, "{count} claim(s) still pending")
            }
            NotReadyReason::DialogOpen { chest_id } => {
                write!(f, "close the reward dialog for {chest_id} first")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RealmError {
    UnknownChest {
        chest_id: ChestId,
    },
    TooFar {
        chest_id: ChestId,
        distance: f64,
        radius: f64,
    },
    NotReady {
        reason: NotReadyReason,
    },
    Claim(ClaimPortError),
    StaleClaim {
        chest_id: ChestId,
    },
    InvalidAddress {
        address: String,
    },
    InvalidUserKey,
}

impl RealmError {
    pub fn not_ready(reason: NotReadyReason) -> Self {
        RealmError::NotReady { reason }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RealmError::TooFar { .. } => ErrorKind::TooFar,
            RealmError::NotReady { .. } => ErrorKind::NotReady,
            RealmError::Claim(err) => match err.kind {
                ClaimFailureKind::Rejected => ErrorKind::ClaimRejected,
                ClaimFailureKind::Cancelled => ErrorKind::ClaimCancelled,
                ClaimFailureKind::InsufficientFunds | ClaimFailureKind::Infrastructure => {
                    ErrorKind::ClaimInfrastructure
                }
            },
            RealmError::UnknownChest { .. }
            | RealmError::StaleClaim { .. }
            | RealmError::InvalidAddress { .. }
            | RealmError::InvalidUserKey => ErrorKind::Other,
        }
    }

    /// Line suitable for the player-facing log.
    pub fn user_message(&self) -> String {
        match self {
            RealmError::TooFar { .. } => "Too far away to open!".to_string(),
            RealmError::Claim(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for RealmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealmError::UnknownChest { chest_id } => write!(f, "unknown chest: {chest_id}"),
            RealmError::TooFar {
                chest_id,
                distance,
                radius,
            } => write!(f, "too far from {chest_id}: {distance:.2} > {radius:.2}"),
            RealmError::NotReady { reason } => write!(f, "not ready: {reason}"),
            RealmError::Claim(err) => write!(f, "{err}"),
            RealmError::StaleClaim { chest_id } => {
                write!(f, "stale claim resolution for {chest_id}")
            }
            RealmError::InvalidAddress { address } => {
                write!(f, "invalid wallet address: {address}")
            }
            RealmError::InvalidUserKey => write!(f, "onboarding returned an empty user key"),
        }
    }
}

impl Error for RealmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RealmError::Claim(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClaimPortError> for RealmError {
    fn from(err: ClaimPortError) -> Self {
        RealmError::Claim(err)
    }
}
