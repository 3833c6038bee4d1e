//! Engine-level tests: scenarios across dispatcher, authenticator and directory.

use std::sync::Arc;
use std::time::Duration;

use authgate_auth::{LoginPolicy, OutcomeKind, UserDirectory};
use authgate_core::config::{AccountConfig, RebindFailurePolicy};
use authgate_core::types::{Event, Stream, StreamId};
use authgate_dispatch::{AdmissionRejection, CompletionCoordinator, Engine, ShutdownTrigger};
use authgate_ingest::parse_streams;

use crate::helpers;

async fn occupant(engine: &Engine, name: &str) -> (Option<StreamId>, u32) {
    let directory = engine.directory();
    let id = directory.lookup_by_name(name).expect("account");
    let snapshot = directory.account(id).expect("account").snapshot().await;
    (snapshot.occupant, snapshot.failure_count)
}

#[tokio::test]
async fn test_scenario_d_capacity_two() {
    let engine = Engine::new(&helpers::test_config(2));

    engine
        .dispatcher()
        .admit(Stream::new("S1", vec![Event::login("guest", "T3mpPass!")]))
        .await
        .expect("S1");
    engine
        .dispatcher()
        .admit(Stream::new("S2", vec![Event::login("backup", "B@ckUp123")]))
        .await
        .expect("S2");
    let third = engine
        .dispatcher()
        .admit(Stream::new("S3", vec![Event::ListDirectory]))
        .await;
    assert_eq!(
        third,
        Err(AdmissionRejection::CapacityExceeded { capacity: 2 })
    );

    let report = engine.run_until_complete(std::future::pending()).await;

    assert_eq!(report.trigger, ShutdownTrigger::CapacityReached);
    assert_eq!(report.completed, 2);
    assert_eq!(report.outcomes.get(OutcomeKind::Bound), 2);
    assert_eq!(occupant(&engine, "guest").await.0, Some(StreamId::new("S1")));
    assert_eq!(occupant(&engine, "backup").await.0, Some(StreamId::new("S2")));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_ends_admission_and_drains() {
    let directory = Arc::new(UserDirectory::new(&[AccountConfig::new("dev_user", "d3v3l0p3r")]));
    let coordinator = Arc::new(CompletionCoordinator::with_timing(
        Duration::from_secs(30 * 60),
        Duration::from_millis(100),
    ));
    let engine = Engine::with_parts(directory, LoginPolicy::default(), 50, coordinator);

    engine
        .dispatcher()
        .admit(Stream::new("S1", vec![Event::login("dev_user", "d3v3l0p3r")]))
        .await
        .expect("admit");

    let report = engine.run_until_complete(std::future::pending()).await;

    assert_eq!(report.trigger, ShutdownTrigger::Timeout);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.completed, 1);
    assert!(
        engine
            .dispatcher()
            .admit(Stream::new("S2", vec![]))
            .await
            .is_err()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_occupancy_under_contention() {
    let engine = Engine::new(&helpers::test_config(50));

    for n in 0..50 {
        engine
            .dispatcher()
            .admit(Stream::new(
                format!("S{n}"),
                vec![Event::login("superadmin", "P@ssw0rd!"), Event::ListDirectory],
            ))
            .await
            .expect("admit");
    }

    let report = engine.run_until_complete(std::future::pending()).await;

    assert_eq!(report.completed, 50);
    assert_eq!(report.outcomes.get(OutcomeKind::Bound), 1);
    assert_eq!(report.outcomes.get(OutcomeKind::ListingGranted), 1);
    assert_eq!(report.outcomes.get(OutcomeKind::OccupantConflict), 49);
    // Losers were never bound, so their listing is ignored.
    assert_eq!(report.outcomes.get(OutcomeKind::Ignored), 49);
    assert!(occupant(&engine, "superadmin").await.0.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lockout_is_exact_across_streams() {
    let engine = Engine::new(&helpers::test_config(20));

    for n in 0..20 {
        engine
            .dispatcher()
            .admit(Stream::new(format!("S{n}"), vec![Event::login("reports", "nope")]))
            .await
            .expect("admit");
    }

    let report = engine.run_until_complete(std::future::pending()).await;

    assert_eq!(report.outcomes.get(OutcomeKind::BadCredential), 3);
    assert_eq!(report.outcomes.get(OutcomeKind::AccountLocked), 17);
    assert_eq!(occupant(&engine, "reports").await, (None, 3));
}

#[tokio::test]
async fn test_malformed_lines_do_not_affect_other_streams() {
    let parsed = parse_streams(
        "#stream-1\n\
         ssh,analyst\n\
         ssh,nobody,x\n\
         ssh,analyst,Data2023!\n\
         #stream-2\n\
         ssh,support,HelpDesk!\n\
         sudo,HelpDesk!\n",
    );
    assert_eq!(parsed.dropped.len(), 1);

    let engine = Engine::new(&helpers::test_config(2));
    for stream in parsed.streams {
        engine.dispatcher().admit(stream).await.expect("admit");
    }
    let report = engine.run_until_complete(std::future::pending()).await;

    assert_eq!(report.outcomes.get(OutcomeKind::UnknownUser), 1);
    assert_eq!(report.outcomes.get(OutcomeKind::Bound), 2);
    assert_eq!(report.outcomes.get(OutcomeKind::ElevateGranted), 1);
    assert_eq!(
        occupant(&engine, "analyst").await.0,
        Some(StreamId::new("stream-1"))
    );
    assert_eq!(
        occupant(&engine, "support").await.0,
        Some(StreamId::new("stream-2"))
    );
}

#[tokio::test]
async fn test_drop_tracking_policy_through_engine() {
    let mut config = helpers::test_config(1);
    config.auth.rebind_failure_policy = RebindFailurePolicy::DropTracking;
    let engine = Engine::new(&config);

    engine
        .dispatcher()
        .admit(Stream::new(
            "S1",
            vec![
                Event::login("support", "HelpDesk!"),
                Event::login("reports", "wrong"),
                Event::elevate("HelpDesk!"),
            ],
        ))
        .await
        .expect("admit");

    let report = engine.run_until_complete(std::future::pending()).await;

    assert_eq!(report.outcomes.get(OutcomeKind::ElevateGranted), 0);
    assert_eq!(report.outcomes.get(OutcomeKind::Ignored), 1);
    assert_eq!(occupant(&engine, "support").await.0, Some(StreamId::new("S1")));
}
