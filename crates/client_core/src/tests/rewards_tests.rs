use super::*;

fn at(x: f32, y: f32) -> ScreenPoint {
    ScreenPoint::new(x, y)
}

#[tokio::test(start_paused = true)]
async fn reward_expires_after_display_window() {
    let notifier = RewardNotifier::new(Handle::current());
    let id = notifier.show(10, "CORRECT!", at(40.0, 80.0));
    assert!(notifier.is_active(id));

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(notifier.is_active(id), "still visible just before expiry");

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!notifier.is_active(id), "removed once the window elapsed");

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert!(!notifier.has_active(), "never reappears");
}

#[tokio::test(start_paused = true)]
async fn each_reward_has_an_independent_timer() {
    let notifier = RewardNotifier::new(Handle::current());
    let first = notifier.show(5, "IMAGE ADDED", at(0.0, 0.0));

    tokio::time::sleep(Duration::from_millis(600)).await;
    let second = notifier.show(50, "MODULE UNLOCKED", at(10.0, 200.0));
    assert_ne!(first, second);
    assert_eq!(notifier.active().len(), 2);

    tokio::time::sleep(Duration::from_millis(401)).await;
    assert!(!notifier.is_active(first));
    assert!(notifier.is_active(second));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!notifier.has_active());
}

#[tokio::test(start_paused = true)]
async fn rapid_rewards_stack_without_cap() {
    let notifier = RewardNotifier::new(Handle::current());
    let ids: Vec<RewardId> = (0..25)
        .map(|i| notifier.show(10, "CORRECT!", at(i as f32, 0.0)))
        .collect();

    let active = notifier.active();
    assert_eq!(active.len(), 25);
    assert_eq!(
        active.iter().map(|event| event.id).collect::<Vec<_>>(),
        ids,
        "active set keeps show order"
    );

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert!(notifier.active().is_empty());
}

#[tokio::test(start_paused = true)]
async fn active_snapshot_is_stable_between_calls() {
    let notifier = RewardNotifier::new(Handle::current());
    notifier.show(10, "REMIXED!", at(12.5, 99.0));

    let first = notifier.active();
    let second = notifier.active();
    assert_eq!(first, second);
    assert_eq!(first[0].label, "REMIXED!");
    assert_eq!(first[0].position, at(12.5, 99.0));
    assert_eq!(first[0].amount, 10);
}

#[test]
fn progress_is_clamped() {
    let shown_at = Instant::now();
    let event = RewardEvent {
        id: RewardId(1),
        amount: 10,
        label: "CORRECT!".into(),
        position: ScreenPoint::default(),
        shown_at,
    };
    assert_eq!(event.progress(shown_at, REWARD_DISPLAY_DURATION), 0.0);
    assert_eq!(
        event.progress(shown_at + Duration::from_millis(500), REWARD_DISPLAY_DURATION),
        0.5
    );
    assert_eq!(
        event.progress(shown_at + Duration::from_secs(3), REWARD_DISPLAY_DURATION),
        1.0
    );
    assert_eq!(event.progress(shown_at, Duration::ZERO), 1.0);
}
