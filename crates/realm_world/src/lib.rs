pub mod geometry;
pub mod simulator;

pub use geometry::{
    direction_towards, space_distance, within_range, yaw_towards, WorldPos,
    DEFAULT_PROXIMITY_RADIUS,
};

// Session coordinator and its presentation surface
pub use simulator::{
    ClaimView, ErrorKind, InteractOutcome, NotReadyReason, RealmError, RealmEvent,
    RealmEventKind, RealmSession,
};

// Chests, claims and the settlement seam
pub use simulator::{
    Chest, ChestId, ChestPhase, ClaimAttempt, ClaimFailureKind, ClaimPhase, ClaimPort,
    ClaimPortError, ClaimTicket, MockClaimPort, Settlement,
};

// Motion, rewards and the interaction lock
pub use simulator::{
    sample_reward, sample_reward_in, Actor, InteractionGuard, InteractionLock, MotionConfig,
    MotionOutcome, RewardRange, SeededRng,
};

// Configuration and world initialization
pub use simulator::{
    build_chests, ActivityLog, RealmConfig, RealmConfigError, WalletState, WorldInitConfig,
    WorldInitReport,
};
