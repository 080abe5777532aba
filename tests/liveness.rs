mod common;

use std::time::Duration;

use chrono::TimeDelta;
use cluster_coordinator::common::cluster::ServerRecord;
use cluster_coordinator::common::time::Clock;
use cluster_coordinator::handler::heartbeat::record_heartbeat;
use cluster_coordinator::server::liveness_sweeper::LivenessSweeper;
use tokio::sync::watch;

use common::{manual_context, server_info};

fn sweeper_for(ctx: &cluster_coordinator::handler::context::HandlerContext) -> LivenessSweeper {
    LivenessSweeper::new(ctx.registry.clone(), ctx.clock.clone(), ctx.liveness)
}

#[tokio::test]
async fn fresh_records_are_left_alone() {
    let (ctx, clock) = manual_context(3);
    let sweeper = sweeper_for(&ctx);
    record_heartbeat(&server_info(7, 1, "h1", "p1"), &ctx).await.unwrap();

    clock.advance_secs(10);
    assert_eq!(sweeper.sweep_once().await, 0);

    let current = ctx.registry.last_of(1).await.unwrap().unwrap();
    assert!(!current.missed_heartbeat);
}

#[tokio::test]
async fn stale_record_is_flagged_once_and_its_clock_reset() {
    let (ctx, clock) = manual_context(3);
    let sweeper = sweeper_for(&ctx);
    record_heartbeat(&server_info(7, 1, "h1", "p1"), &ctx).await.unwrap();

    clock.advance_secs(11);
    let flagged_at = clock.now();
    assert_eq!(sweeper.sweep_once().await, 1);

    let current = ctx.registry.last_of(1).await.unwrap().unwrap();
    assert!(current.missed_heartbeat);
    assert_eq!(current.last_heartbeat_at, flagged_at);

    // Nothing happens within a threshold of the flagging moment.
    clock.advance_secs(10);
    assert_eq!(sweeper.sweep_once().await, 0);

    // Past it, the record is already flagged and keeps its timestamp.
    clock.advance_secs(5);
    assert_eq!(sweeper.sweep_once().await, 0);
    let current = ctx.registry.last_of(1).await.unwrap().unwrap();
    assert_eq!(current.last_heartbeat_at, flagged_at);
}

#[tokio::test]
async fn history_records_are_swept_too() {
    let (ctx, clock) = manual_context(2);
    let sweeper = sweeper_for(&ctx);
    {
        let mut slots = ctx.registry.lock().await;
        let now = clock.now();
        slots
            .register(1, ServerRecord::from_heartbeat(&server_info(1, 1, "old", "1"), now))
            .unwrap();
        slots
            .register(1, ServerRecord::from_heartbeat(&server_info(2, 1, "new", "2"), now))
            .unwrap();
    }
    record_heartbeat(&server_info(3, 2, "other", "3"), &ctx).await.unwrap();

    clock.advance_secs(11);
    assert_eq!(sweeper.sweep_once().await, 3);

    let slots = ctx.registry.lock().await;
    assert!(slots.history(1).unwrap().iter().all(|r| r.missed_heartbeat));
    assert!(slots.last_of(2).unwrap().unwrap().missed_heartbeat);
}

#[tokio::test]
async fn heartbeat_after_flagging_does_not_clear_the_flag() {
    let (ctx, clock) = manual_context(3);
    let sweeper = sweeper_for(&ctx);
    let info = server_info(7, 1, "h1", "p1");
    record_heartbeat(&info, &ctx).await.unwrap();

    clock.advance_secs(11);
    sweeper.sweep_once().await;

    clock.advance_secs(20);
    record_heartbeat(&info, &ctx).await.unwrap();

    let current = ctx.registry.last_of(1).await.unwrap().unwrap();
    assert!(current.missed_heartbeat);
    assert_eq!(current.last_heartbeat_at, clock.now());
    assert!(current.is_active(clock.now(), ctx.liveness.recovery_window));
    assert!(!current.is_active(
        clock.now() + TimeDelta::seconds(10),
        ctx.liveness.recovery_window
    ));
}

#[tokio::test(start_paused = true)]
async fn background_loop_sweeps_until_shutdown() {
    let (ctx, clock) = manual_context(3);
    record_heartbeat(&server_info(7, 1, "h1", "p1"), &ctx).await.unwrap();

    let (tx, rx) = watch::channel(false);
    let handle = sweeper_for(&ctx).spawn(rx);

    clock.advance_secs(11);
    tokio::time::sleep(Duration::from_secs(4)).await;

    let current = ctx.registry.last_of(1).await.unwrap().unwrap();
    assert!(current.missed_heartbeat);

    tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn background_loop_stops_when_sender_is_dropped() {
    let (ctx, _clock) = manual_context(1);
    let (tx, rx) = watch::channel(false);
    let handle = sweeper_for(&ctx).spawn(rx);

    drop(tx);
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("sweeper did not stop")
        .unwrap();
}
