use std::{sync::Arc, time::Duration};

use signal_cooldown::{
    state::{TimerOutcome, TimerPhase},
    storage::{persisted, DurableStore, MemoryStore, PersistedTimer, TimerEntry},
    tasks::ManualScheduler,
    utils::ManualClock,
    view::RecordingView,
    Countdown, CountdownSettings, RestoreOutcome,
};

const T0: i64 = 1_700_000_000_000;

/// One "page load": a controller over a shared store at a given wall time
struct Page {
    countdown: Countdown,
    scheduler: ManualScheduler,
    view: RecordingView,
}

fn load_page(store: &MemoryStore, now_ms: i64) -> Page {
    let clock = ManualClock::at(now_ms);
    let scheduler = ManualScheduler::new(clock.clone());
    let view = RecordingView::new();
    let countdown = Countdown::new(
        store.clone(),
        view.clone(),
        Arc::new(clock),
        Arc::new(scheduler.clone()),
        CountdownSettings::default(),
    );
    Page { countdown, scheduler, view }
}

fn assert_idle(page: &Page, store: &MemoryStore) {
    let snapshot = page.countdown.snapshot().unwrap();
    assert_eq!(snapshot.phase, TimerPhase::Idle);
    assert_eq!(snapshot.remaining_seconds, None);
    assert!(page.view.trigger_enabled());
    assert_eq!(page.view.display(), None);
    assert_eq!(persisted::load_timer(store), TimerEntry::Absent);
}

#[test]
fn runs_to_idle_after_duration_plus_one() {
    for d in [1u64, 2, 5, 60] {
        let store = MemoryStore::new();
        let page = load_page(&store, T0);

        page.countdown.start(d).unwrap();
        page.scheduler.advance(Duration::from_secs(d));
        assert_eq!(page.countdown.snapshot().unwrap().phase, TimerPhase::Running);
        assert_eq!(page.view.display().as_deref(), Some("00:00"));

        page.scheduler.advance(Duration::from_secs(1));
        assert_idle(&page, &store);
        assert_eq!(
            page.countdown.snapshot().unwrap().last_outcome,
            Some(TimerOutcome::Expired)
        );
    }
}

#[test]
fn restore_at_persist_time_resumes_with_remaining() {
    for (d, e) in [(2u64, 1u64), (10, 3), (60, 59)] {
        let store = MemoryStore::new();
        let first = load_page(&store, T0);
        first.countdown.start(d).unwrap();
        first.scheduler.advance(Duration::from_secs(e));
        drop(first);

        let page = load_page(&store, T0 + (e as i64) * 1000);
        assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Resumed(d - e));
        assert_eq!(page.countdown.timer_state().unwrap().remaining_seconds(), Some(d - e));
    }
}

#[test]
fn restore_from_start_entry_subtracts_elapsed() {
    for (d, e) in [(2u64, 1u64), (10, 3), (60, 59)] {
        let mut store = MemoryStore::new();
        persisted::save_timer(&mut store, d, T0);

        // Partial seconds are truncated
        let page = load_page(&store, T0 + (e as i64) * 1000 + 999);
        assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Resumed(d - e));
    }
}

#[test]
fn expired_entry_restores_to_idle() {
    for (saved, elapsed_ms) in [(10u64, 10_000i64), (10, 10_999), (10, 3_600_000), (0, 0)] {
        let mut store = MemoryStore::new();
        persisted::save_timer(&mut store, saved, T0);

        let page = load_page(&store, T0 + elapsed_ms);
        assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Stale);
        assert_idle(&page, &store);
        assert_eq!(page.scheduler.pending(), 0);
    }
}

#[test]
fn cancel_then_fresh_start() {
    let store = MemoryStore::new();
    let page = load_page(&store, T0);

    page.countdown.start(30).unwrap();
    page.scheduler.advance(Duration::from_secs(4));
    page.countdown.cancel().unwrap();

    assert_idle(&page, &store);
    assert_eq!(page.countdown.snapshot().unwrap().last_outcome, Some(TimerOutcome::Cancelled));
    assert_eq!(page.scheduler.pending(), 0);

    assert!(page.countdown.start(30).unwrap());
    assert_eq!(page.view.display().as_deref(), Some("00:30"));
    assert_eq!(page.countdown.snapshot().unwrap().last_outcome, None);

    page.scheduler.advance(Duration::from_secs(31));
    assert_idle(&page, &store);
}

#[test]
fn cancel_from_another_controller_stops_the_watcher() {
    let store = MemoryStore::new();
    let watcher = load_page(&store, T0);
    watcher.countdown.start(60).unwrap();
    watcher.scheduler.advance(Duration::from_secs(2));

    let other = load_page(&store, T0 + 2_000);
    other.countdown.cancel().unwrap();
    assert_eq!(persisted::load_timer(&store), TimerEntry::Absent);

    watcher.scheduler.advance(Duration::from_secs(1));
    assert_idle(&watcher, &store);
    assert_eq!(
        watcher.countdown.snapshot().unwrap().last_outcome,
        Some(TimerOutcome::Cancelled)
    );
    assert_eq!(watcher.scheduler.pending(), 0);

    let reload = load_page(&store, T0 + 10_000);
    assert_eq!(reload.countdown.restore_on_init().unwrap(), RestoreOutcome::Nothing);
}

#[test]
fn reload_after_expiry_does_not_resume() {
    let store = MemoryStore::new();
    let first = load_page(&store, T0);
    first.countdown.start(60).unwrap();
    first.scheduler.advance(Duration::from_secs(5));

    assert_eq!(
        persisted::load_timer(&store),
        TimerEntry::Valid(PersistedTimer { remaining_seconds: 55, saved_at_ms: T0 + 5_000 })
    );
    drop(first);

    let page = load_page(&store, T0 + 65_000);
    assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Stale);
    assert_idle(&page, &store);
}

#[test]
fn reload_mid_countdown_resumes() {
    let mut store = MemoryStore::new();
    persisted::save_timer(&mut store, 60, T0);

    let page = load_page(&store, T0 + 30_000);
    assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Resumed(30));
    assert_eq!(page.view.display().as_deref(), Some("00:30"));
    assert!(!page.view.trigger_enabled());
    assert_eq!(page.countdown.snapshot().unwrap().phase, TimerPhase::Running);

    // The resumed countdown keeps going and re-persists as it ticks
    page.scheduler.advance(Duration::from_secs(1));
    assert_eq!(page.view.display().as_deref(), Some("00:29"));
    assert_eq!(
        persisted::load_timer(&store),
        TimerEntry::Valid(PersistedTimer { remaining_seconds: 29, saved_at_ms: T0 + 31_000 })
    );

    page.scheduler.advance(Duration::from_secs(30));
    assert_idle(&page, &store);
}

#[test]
fn long_suspension_fires_no_catch_up_ticks() {
    let mut store = MemoryStore::new();
    persisted::save_timer(&mut store, 600, T0);

    let page = load_page(&store, T0 + 590_000);
    page.countdown.restore_on_init().unwrap();

    assert_eq!(page.view.snapshot().shown, vec!["00:10"]);
}

#[test]
fn corrupt_entries_restore_to_idle_and_are_removed() {
    let cases: [&[(&str, &str)]; 4] = [
        &[(persisted::TIME_LEFT_KEY, "30")],
        &[(persisted::TIMESTAMP_KEY, "1700000000000")],
        &[(persisted::TIME_LEFT_KEY, "abc"), (persisted::TIMESTAMP_KEY, "1700000000000")],
        &[(persisted::TIME_LEFT_KEY, "-4"), (persisted::TIMESTAMP_KEY, "1700000000000")],
    ];

    for entries in cases {
        let mut store = MemoryStore::new();
        for (key, value) in entries {
            store.set_item(key, value).unwrap();
        }

        let page = load_page(&store, T0);
        assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Stale);
        assert_idle(&page, &store);
        assert!(store.is_empty());
    }
}

#[test]
fn empty_store_restores_nothing() {
    let store = MemoryStore::new();
    let page = load_page(&store, T0);

    assert_eq!(page.countdown.restore_on_init().unwrap(), RestoreOutcome::Nothing);
    assert_idle(&page, &store);
}

#[test]
fn other_keys_survive_countdown_lifecycle() {
    let mut store = MemoryStore::new();
    store.set_item(persisted::LAST_SIGNAL_KEY, "{\"kind\":\"blocks\",\"count\":3}").unwrap();

    let page = load_page(&store, T0);
    page.countdown.start(2).unwrap();
    page.scheduler.advance(Duration::from_secs(3));

    assert_idle(&page, &store);
    assert!(store.contains(persisted::LAST_SIGNAL_KEY));
}
