use super::*;
use futures::executor::block_on;

const REVERT_MESSAGE: &str = "execution reverted (CALL_EXCEPTION): missing revert data";

fn not_ready_reason(err: RealmError) -> NotReadyReason {
    match err {
        RealmError::NotReady { reason } => reason,
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn successful_claim_credits_once() {
    let mut session = ready_session(9);
    let (chest_id, reward_amount) = open_first_chest(&mut session);
    let port = MockClaimPort::new();

    let ticket = session.request_claim(&chest_id).expect("ticket");
    assert_eq!(ticket.amount, reward_amount);
    assert_eq!(ticket.address, GUEST_WALLET_ADDRESS);
    assert_eq!(
        session.claim_attempt(&chest_id).map(|attempt| attempt.phase),
        Some(ClaimPhase::Pending)
    );
    assert_eq!(session.balance(), 0);

    let outcome = block_on(ticket.submit(&port));
    let phase = session.resolve_claim(&ticket, outcome).expect("resolve");

    assert_eq!(phase, ClaimPhase::Settled);
    assert_eq!(session.balance(), reward_amount);
    let attempt = session.claim_attempt(&chest_id).expect("attempt");
    assert!(attempt
        .settlement_id
        .as_deref()
        .is_some_and(|id| id.starts_with("0x") && id.len() == 66));

    let err = session.request_claim(&chest_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);
    assert!(matches!(
        not_ready_reason(err),
        NotReadyReason::ClaimAlreadySettled { .. }
    ));
    assert_eq!(session.balance(), reward_amount);
    assert_eq!(port.submissions().len(), 1);
}

#[test]
fn claim_helper_settles_through_port() {
    let mut session = ready_session(9);
    let (chest_id, reward_amount) = open_first_chest(&mut session);
    let port = MockClaimPort::new();

    let settlement = block_on(session.claim(&chest_id, &port)).expect("settled");

    assert!(settlement.settlement_id.starts_with("0x"));
    assert_eq!(session.balance(), reward_amount);
    assert_eq!(
        session.activity().latest(),
        Some(format!("Token: Successfully minted {reward_amount} tokens!").as_str())
    );
    assert!(has_event(&session, |kind| matches!(
        kind,
        RealmEventKind::ClaimSettled { amount, .. } if *amount == reward_amount
    )));
}

#[test]
fn failed_claim_then_retry_settles_same_amount() {
    let mut session = ready_session(10);
    let (chest_id, reward_amount) = open_first_chest(&mut session);
    let port = MockClaimPort::new();
    port.fail_next(REVERT_MESSAGE);

    let err = block_on(session.claim(&chest_id, &port)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClaimRejected);
    let attempt = session.claim_attempt(&chest_id).expect("attempt");
    assert_eq!(attempt.phase, ClaimPhase::Failed);
    assert_eq!(
        attempt.failure_reason(),
        Some(ClaimFailureKind::Rejected.user_message())
    );
    assert_eq!(session.balance(), 0);
    assert!(session.is_movement_blocked());

    session.retry(&chest_id).expect("retry from failed");
    let attempt = session.claim_attempt(&chest_id).expect("attempt");
    assert_eq!(attempt.phase, ClaimPhase::Idle);
    assert!(attempt.failure.is_none());

    block_on(session.claim(&chest_id, &port)).expect("second attempt settles");
    assert_eq!(session.balance(), reward_amount);
    let amounts: Vec<u64> = port.submissions().into_iter().map(|(_, amount)| amount).collect();
    assert_eq!(amounts, vec![reward_amount, reward_amount]);
}

#[test]
fn failed_claim_can_be_requested_again_directly() {
    let mut session = ready_session(10);
    let (chest_id, _) = open_first_chest(&mut session);
    let port = MockClaimPort::new();
    port.fail_next("User denied transaction signature");

    let err = block_on(session.claim(&chest_id, &port)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClaimCancelled);

    let ticket = session.request_claim(&chest_id).expect("failed -> pending");
    assert_eq!(ticket.attempt_seq, 2);
}

#[test]
fn claim_preconditions_are_not_ready() {
    let mut session = seeded_session(12);
    let (chest_id, _) = open_first_chest(&mut session);

    let reason = not_ready_reason(session.request_claim(&chest_id).unwrap_err());
    assert_eq!(reason, NotReadyReason::WalletNotConnected);

    session.connect_guest().expect("guest");
    let reason = not_ready_reason(session.request_claim(&chest_id).unwrap_err());
    assert_eq!(reason, NotReadyReason::NotOnboarded);

    session.onboard(TEST_USER_KEY).expect("onboard");
    let reason = not_ready_reason(session.request_claim("chest-404").unwrap_err());
    assert!(matches!(reason, NotReadyReason::NoClaimAttempt { .. }));

    let _ticket = session.request_claim(&chest_id).expect("ticket");
    let reason = not_ready_reason(session.request_claim(&chest_id).unwrap_err());
    assert!(matches!(reason, NotReadyReason::ClaimAlreadyPending { .. }));
}

#[test]
fn dismissed_pending_claim_still_credits_once() {
    let mut session = ready_session(14);
    let (chest_id, reward_amount) = open_first_chest(&mut session);
    let port = MockClaimPort::new();

    let ticket = session.request_claim(&chest_id).expect("ticket");
    assert!(session.dismiss());
    assert!(!session.is_movement_blocked());
    assert!(session.active_claim_view().is_none());
    assert_eq!(
        session.claim_attempt(&chest_id).map(|attempt| attempt.phase),
        Some(ClaimPhase::Pending)
    );

    let outcome = block_on(ticket.submit(&port));
    session
        .resolve_claim(&ticket, outcome.clone())
        .expect("late settlement");
    assert_eq!(session.balance(), reward_amount);

    let duplicate = session.resolve_claim(&ticket, outcome).unwrap_err();
    assert!(matches!(duplicate, RealmError::StaleClaim { .. }));
    assert_eq!(session.balance(), reward_amount);

    let view = session.show_claim(&chest_id).expect("reopen view");
    assert_eq!(view.phase, ClaimPhase::Settled);
    assert_eq!(view.reward_amount, reward_amount);
    assert!(view.settlement_id.is_some());
    assert_eq!(session.active_claim_view(), Some(view));
    assert_eq!(session.balance(), reward_amount);
}

#[test]
fn dismissing_idle_claim_forfeits_reward() {
    let mut session = ready_session(15);
    let (chest_id, _) = open_first_chest(&mut session);

    assert!(session.dismiss());
    assert!(!session.dismiss());
    assert!(session.claim_attempt(&chest_id).is_none());
    assert!(session.chest(&chest_id).is_some_and(Chest::is_open));
    assert_eq!(
        session.interact(&chest_id).expect("no-op"),
        InteractOutcome::AlreadyOpen
    );

    let reason = not_ready_reason(session.request_claim(&chest_id).unwrap_err());
    assert!(matches!(reason, NotReadyReason::NoClaimAttempt { .. }));
    assert!(has_event(&session, |kind| matches!(
        kind,
        RealmEventKind::ClaimDismissed {
            phase: ClaimPhase::Idle,
            ..
        }
    )));
}

#[test]
fn outdated_ticket_is_stale() {
    let mut session = ready_session(16);
    let (chest_id, reward_amount) = open_first_chest(&mut session);
    let port = MockClaimPort::new();

    let first = session.request_claim(&chest_id).expect("first ticket");
    let failure = Err(ClaimPortError::from_provider_message("network timeout"));
    assert_eq!(
        session.resolve_claim(&first, failure).expect("resolve failure"),
        ClaimPhase::Failed
    );

    let second = session.request_claim(&chest_id).expect("second ticket");
    let late = block_on(first.submit(&port));
    let err = session.resolve_claim(&first, late).unwrap_err();
    assert!(matches!(err, RealmError::StaleClaim { .. }));
    assert_eq!(session.balance(), 0);

    let outcome = block_on(second.submit(&port));
    session.resolve_claim(&second, outcome).expect("current ticket");
    assert_eq!(session.balance(), reward_amount);
}

#[test]
fn ticket_from_before_reset_is_stale() {
    let mut session = ready_session(17);
    let (chest_id, _) = open_first_chest(&mut session);
    let port = MockClaimPort::new();

    let ticket = session.request_claim(&chest_id).expect("ticket");
    let reason = not_ready_reason(session.reset().unwrap_err());
    assert_eq!(reason, NotReadyReason::ClaimsInFlight { count: 1 });

    let failure = Err(ClaimPortError::from_provider_message("insufficient funds for gas"));
    session.resolve_claim(&ticket, failure).expect("failure");
    session.reset().expect("reset once idle");

    let outcome = block_on(ticket.submit(&port));
    let err = session.resolve_claim(&ticket, outcome).unwrap_err();
    assert!(matches!(err, RealmError::StaleClaim { .. }));
    assert_eq!(session.balance(), 0);
}

#[test]
fn retry_requires_failed_attempt() {
    let mut session = ready_session(18);
    let (chest_id, _) = open_first_chest(&mut session);

    let reason = not_ready_reason(session.retry(&chest_id).unwrap_err());
    assert_eq!(
        reason,
        NotReadyReason::ClaimNotFailed {
            chest_id: chest_id.clone(),
            phase: ClaimPhase::Idle,
        }
    );
}

#[test]
fn retry_keeps_dialog_attached() {
    let mut session = ready_session(19);
    let (chest_id, _) = open_first_chest(&mut session);
    let port = MockClaimPort::new();
    port.fail_next("connection reset by peer");

    let err = block_on(session.claim(&chest_id, &port)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClaimInfrastructure);
    session.retry(&chest_id).expect("retry");

    let view = session.active_claim_view().expect("dialog attached");
    assert_eq!(view.chest_id, chest_id);
    assert_eq!(view.phase, ClaimPhase::Idle);
    assert!(view.failure_reason.is_none());
    assert_eq!(session.interaction_lock().holders(), 1);
}

#[test]
fn provider_messages_are_classified() {
    let cases = [
        (REVERT_MESSAGE, ClaimFailureKind::Rejected),
        ("missing revert data in call", ClaimFailureKind::Rejected),
        ("MetaMask: User rejected the request", ClaimFailureKind::Cancelled),
        ("User denied transaction signature", ClaimFailureKind::Cancelled),
        ("insufficient funds for intrinsic transaction cost", ClaimFailureKind::InsufficientFunds),
        ("socket hang up", ClaimFailureKind::Infrastructure),
    ];
    for (message, expected) in cases {
        assert_eq!(ClaimFailureKind::classify(message), expected, "{message}");
    }

    let funds: RealmError = ClaimPortError::from_provider_message("insufficient funds").into();
    assert_eq!(funds.kind(), ErrorKind::ClaimInfrastructure);
    assert_eq!(funds.user_message(), "Insufficient funds for gas fees");
}

#[test]
fn failure_logs_user_facing_message() {
    let mut session = ready_session(20);
    let (chest_id, _) = open_first_chest(&mut session);
    let port = MockClaimPort::new();
    port.fail_next("user rejected transaction");

    let _ = block_on(session.claim(&chest_id, &port));

    assert_eq!(
        session.activity().latest(),
        Some("Token Error: Transaction cancelled by user")
    );
    assert!(has_event(&session, |kind| matches!(
        kind,
        RealmEventKind::ClaimFailed {
            kind: ClaimFailureKind::Cancelled,
            ..
        }
    )));
}

fn stacked_chests_session(seed: u64) -> RealmSession {
    let mut config = RealmConfig::default();
    config.world.chest_count = 2;
    config.world.chest_spread = 0.0;
    let mut session = RealmSession::with_rng(config, SeededRng::new(seed));
    session.connect_guest().expect("guest wallet");
    session.onboard(TEST_USER_KEY).expect("onboard");
    session
}

#[test]
fn open_dialog_blocks_other_chests() {
    let mut session = stacked_chests_session(30);
    let reward_amount = match session.interact("chest-0").expect("open first") {
        InteractOutcome::Opened { reward_amount } => reward_amount,
        other => panic!("unexpected outcome: {other:?}"),
    };

    let reason = not_ready_reason(session.interact("chest-1").unwrap_err());
    assert_eq!(
        reason,
        NotReadyReason::DialogOpen {
            chest_id: "chest-0".to_string(),
        }
    );
    let second = session.chest("chest-1").expect("chest");
    assert_eq!(second.phase(), ChestPhase::Closed);
    assert_eq!(second.reward_amount(), None);
    assert!(session.claim_attempt("chest-1").is_none());

    let attempt = session.claim_attempt("chest-0").expect("first reward kept");
    assert_eq!(attempt.phase, ClaimPhase::Idle);
    assert_eq!(attempt.reward_amount, reward_amount);
    assert_eq!(session.interaction_lock().holders(), 1);

    let port = MockClaimPort::new();
    block_on(session.claim("chest-0", &port)).expect("first reward still claimable");
    assert_eq!(session.balance(), reward_amount);

    assert!(session.dismiss());
    assert!(matches!(
        session.interact("chest-1"),
        Ok(InteractOutcome::Opened { .. })
    ));
}

#[test]
fn show_claim_does_not_steal_another_dialog() {
    let mut session = stacked_chests_session(31);
    let port = MockClaimPort::new();
    session.interact("chest-0").expect("open first");
    block_on(session.claim("chest-0", &port)).expect("settle first");
    assert!(session.dismiss());

    session.interact("chest-1").expect("open second");
    let reason = not_ready_reason(session.show_claim("chest-0").unwrap_err());
    assert_eq!(
        reason,
        NotReadyReason::DialogOpen {
            chest_id: "chest-1".to_string(),
        }
    );
    let view = session.active_claim_view().expect("second dialog stays");
    assert_eq!(view.chest_id, "chest-1");
    assert_eq!(view.phase, ClaimPhase::Idle);
}

#[test]
fn unrecognized_failure_keeps_provider_message() {
    let mut session = ready_session(32);
    let (chest_id, _) = open_first_chest(&mut session);
    let port = MockClaimPort::new();
    port.fail_next("rpc endpoint returned 503 Service Unavailable");

    let err = block_on(session.claim(&chest_id, &port)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClaimInfrastructure);

    let view = session.active_claim_view().expect("dialog attached");
    assert_eq!(
        view.failure_reason.as_deref(),
        Some("rpc endpoint returned 503 Service Unavailable")
    );
    assert_eq!(
        session.activity().latest(),
        Some("Token Error: rpc endpoint returned 503 Service Unavailable")
    );
    assert_eq!(
        err.user_message(),
        "rpc endpoint returned 503 Service Unavailable"
    );
}
