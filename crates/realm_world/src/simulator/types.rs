use serde::{Deserialize, Serialize};

pub type ChestId = String;
pub type WalletAddress = String;
pub type SettlementId = String;
pub type RealmTick = u64;
pub type RealmEventId = u64;
pub type ClaimSeq = u64;
pub type SessionEpoch = u64;

pub const DEFAULT_MOVE_SPEED: f64 = 6.0;
pub const DEFAULT_ARRIVAL_EPSILON: f64 = 0.1;
pub const DEFAULT_REWARD_MIN: u64 = 10;
pub const DEFAULT_REWARD_MAX: u64 = 50;
pub const DEFAULT_LOG_CAPACITY: usize = 5;
pub const DEFAULT_CHEST_COUNT: usize = 5;
pub const DEFAULT_CHEST_SPREAD: f64 = 40.0;
pub const MAX_LOG_CAPACITY: usize = 256;
pub const MAX_CHEST_COUNT: usize = 1024;
/// Oldest journal entries are evicted past this length.
pub const JOURNAL_CAPACITY: usize = 4096;

/// Lid rotation of a fully opened chest, in radians about its hinge.
pub const LID_OPEN_ANGLE: f64 = -std::f64::consts::PI / 1.5;
pub const LID_LERP_RATE: f64 = 5.0;
pub const LID_SETTLE_EPSILON: f64 = 1e-3;

pub const GUEST_WALLET_ADDRESS: &str = "0xGuestDevWallet123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChestPhase {
    #[default]
    Closed,
    /// The lid is still swinging. Counts as open for every claim rule.
    Opening,
    Open,
}

impl ChestPhase {
    pub fn is_open(&self) -> bool {
        matches!(self, ChestPhase::Opening | ChestPhase::Open)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChestPhase::Closed => "closed",
            ChestPhase::Opening => "opening",
            ChestPhase::Open => "open",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPhase {
    #[default]
    Idle,
    Pending,
    Settled,
    Failed,
}

impl ClaimPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimPhase::Settled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimPhase::Idle => "idle",
            ClaimPhase::Pending => "pending",
            ClaimPhase::Settled => "settled",
            ClaimPhase::Failed => "failed",
        }
    }
}
