//! Tests for the simulator module.

use super::*;
use crate::geometry::WorldPos;

const TEST_USER_KEY: &str = "user-key-0001";

fn seeded_session(seed: u64) -> RealmSession {
    RealmSession::with_rng(RealmConfig::default(), SeededRng::new(seed))
}

/// Guest wallet connected and onboarded.
fn ready_session(seed: u64) -> RealmSession {
    let mut session = seeded_session(seed);
    session.connect_guest().expect("guest wallet");
    session.onboard(TEST_USER_KEY).expect("onboard");
    session
}

fn first_chest(session: &RealmSession) -> (ChestId, WorldPos) {
    let chest = session.chests().next().expect("world has chests");
    (chest.id.clone(), chest.position())
}

/// One oversized frame: the step is clamped, so the actor lands on `target`.
fn walk_to(session: &mut RealmSession, target: WorldPos) {
    assert!(session.set_move_target(target), "movement should be allowed");
    session.step(1_000.0);
    assert!(!session.actor().is_moving);
}

fn open_first_chest(session: &mut RealmSession) -> (ChestId, u64) {
    let (chest_id, position) = first_chest(session);
    walk_to(session, position.offset(3.0, 0.0, 0.0));
    match session.interact(&chest_id).expect("chest within reach") {
        InteractOutcome::Opened { reward_amount } => (chest_id, reward_amount),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

fn has_event(session: &RealmSession, matcher: impl Fn(&RealmEventKind) -> bool) -> bool {
    session.journal().iter().any(|event| matcher(&event.kind))
}

mod claims;
