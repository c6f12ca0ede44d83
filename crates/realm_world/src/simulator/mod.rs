//! Realm simulator - actor motion, chests, reward claims and the session that owns them.
//!
//! This module is organized into submodules:
//! - `types`: IDs, constants, chest and claim phases
//! - `reward`: reward range, uniform sampling, seeded generator
//! - `lock`: InteractionLock and its scoped guard
//! - `motion`: Actor and its straight-line approach
//! - `chest`: Chest lifecycle and lid animation
//! - `claim`: ClaimAttempt, ClaimTicket, the ClaimPort seam and a mock port
//! - `wallet`: wallet binding and onboarding status
//! - `log`: bounded player-facing activity log
//! - `init`: seeded chest placement
//! - `config`: RealmConfig loaded from TOML and environment
//! - `session`: RealmSession, the coordinator that owns all of the above

mod chest;
mod claim;
mod config;
mod init;
mod lock;
mod log;
mod motion;
mod reward;
mod session;
mod types;
mod wallet;

#[cfg(test)]
mod tests;

pub use chest::Chest;
pub use claim::{
    ClaimAttempt, ClaimFailure, ClaimFailureKind, ClaimPort, ClaimPortError, ClaimTicket,
    MockClaimPort, Settlement,
};
pub use config::{
    RealmConfig, RealmConfigError, DEFAULT_CONFIG_FILE_NAME, ENV_ARRIVAL_EPSILON,
    ENV_CHEST_COUNT, ENV_CHEST_SPREAD, ENV_LOG_CAPACITY, ENV_MOVE_SPEED, ENV_PROXIMITY_RADIUS,
    ENV_REWARD_MAX, ENV_REWARD_MIN, ENV_SEED,
};
pub use init::{build_chests, WorldInitConfig, WorldInitReport};
pub use lock::{InteractionGuard, InteractionLock};
pub use log::{ActivityLine, ActivityLog};
pub use motion::{Actor, MotionConfig, MotionOutcome};
pub use reward::{sample_reward, sample_reward_in, RewardRange, SeededRng};
pub use session::{
    ClaimView, ErrorKind, InteractOutcome, NotReadyReason, RealmError, RealmEvent,
    RealmEventKind, RealmSession,
};
pub use types::{
    ChestId, ChestPhase, ClaimPhase, ClaimSeq, RealmEventId, RealmTick, SessionEpoch,
    SettlementId, WalletAddress, DEFAULT_ARRIVAL_EPSILON, DEFAULT_CHEST_COUNT,
    DEFAULT_CHEST_SPREAD, DEFAULT_LOG_CAPACITY, DEFAULT_MOVE_SPEED, DEFAULT_REWARD_MAX,
    DEFAULT_REWARD_MIN, GUEST_WALLET_ADDRESS, JOURNAL_CAPACITY, LID_LERP_RATE, LID_OPEN_ANGLE,
    LID_SETTLE_EPSILON, MAX_CHEST_COUNT, MAX_LOG_CAPACITY,
};
pub use wallet::{is_valid_address, short_address, WalletState};
