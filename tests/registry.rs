mod common;

use chrono::{TimeDelta, Utc};
use cluster_coordinator::common::cluster::ServerRecord;
use cluster_coordinator::common::error::{CoordinatorError, ErrorCode};
use cluster_coordinator::storage::cluster_registry::{ClusterRegistry, ClusterSlots};

use common::server_info;

fn record(server_id: i32, cluster_id: i32, hostname: &str) -> ServerRecord {
    ServerRecord::from_heartbeat(&server_info(server_id, cluster_id, hostname, "5000"), Utc::now())
}

#[test]
fn cluster_ids_are_one_based_and_bounds_checked() {
    let mut slots = ClusterSlots::new(3);
    assert_eq!(slots.cluster_count(), 3);

    for cluster_id in 1..=3 {
        assert!(slots.register(cluster_id, record(1, cluster_id, "h")).is_ok());
    }

    for cluster_id in [0, 4, -1, i32::MAX] {
        let err = slots.register(cluster_id, record(1, cluster_id, "h")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ClusterOutOfRange);
        assert!(matches!(
            err,
            CoordinatorError::ClusterOutOfRange { cluster_count: 3, .. }
        ));
        assert!(slots.last_of(cluster_id).is_err());
        assert!(slots.refresh_last(cluster_id, Utc::now()).is_err());
    }
}

#[test]
fn last_record_is_current_and_history_is_kept() {
    let mut slots = ClusterSlots::new(2);
    assert!(slots.last_of(1).unwrap().is_none());

    slots.register(1, record(7, 1, "h1")).unwrap();
    slots.register(1, record(9, 1, "h2")).unwrap();

    assert_eq!(slots.last_of(1).unwrap().unwrap().hostname, "h2");
    let history = slots.history(1).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].hostname, "h1");
    assert!(slots.history(2).unwrap().is_empty());
}

#[test]
fn refresh_touches_only_the_last_record() {
    let mut slots = ClusterSlots::new(1);
    assert!(!slots.refresh_last(1, Utc::now()).unwrap());

    slots.register(1, record(7, 1, "h1")).unwrap();
    slots.register(1, record(9, 1, "h2")).unwrap();
    let first_before = slots.history(1).unwrap()[0].last_heartbeat_at;

    let later = Utc::now() + TimeDelta::seconds(30);
    assert!(slots.refresh_last(1, later).unwrap());

    let history = slots.history(1).unwrap();
    assert_eq!(history[0].last_heartbeat_at, first_before);
    assert_eq!(history[1].last_heartbeat_at, later);
    assert_eq!(history[1].hostname, "h2");
}

#[test]
fn records_mut_visits_every_record() {
    let mut slots = ClusterSlots::new(3);
    slots.register(1, record(1, 1, "a")).unwrap();
    slots.register(1, record(2, 1, "b")).unwrap();
    slots.register(3, record(3, 3, "c")).unwrap();

    assert_eq!(slots.records_mut().count(), 3);
    let ids: Vec<i32> = slots.iter().map(|(cluster_id, _)| cluster_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn registry_operations_share_one_table() {
    let registry = ClusterRegistry::new(3);
    assert_eq!(registry.cluster_count(), 3);
    assert!(registry.last_of(2).await.unwrap().is_none());

    registry.register(2, record(4, 2, "h4")).await.unwrap();
    let later = Utc::now() + TimeDelta::seconds(5);
    assert!(registry.refresh_last(2, later).await.unwrap());

    let current = registry.last_of(2).await.unwrap().unwrap();
    assert_eq!(current.server_id, 4);
    assert_eq!(current.last_heartbeat_at, later);

    let snapshot = registry.snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[1].0, 2);
    assert_eq!(snapshot[1].1.len(), 1);
    assert!(snapshot[0].1.is_empty());

    assert!(registry.register(4, record(4, 4, "h")).await.is_err());
}

#[test]
fn flagged_record_is_active_only_within_recovery_window() {
    let now = Utc::now();
    let mut rec = record(1, 1, "h");
    let window = TimeDelta::seconds(10);

    rec.last_heartbeat_at = now - TimeDelta::seconds(60);
    assert!(rec.is_active(now, window));

    rec.missed_heartbeat = true;
    assert!(!rec.is_active(now, window));

    rec.last_heartbeat_at = now - TimeDelta::seconds(9);
    assert!(rec.is_active(now, window));

    rec.last_heartbeat_at = now - TimeDelta::seconds(10);
    assert!(!rec.is_active(now, window));
}
