use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{sync::broadcast::error::TryRecvError, time::sleep};

use timer_board::{
    services::{load_timers, MemoryStorage, Storage, StorageError},
    state::{
        validator::ClockField, AppState, BoardEvent, Confirmation, CountdownStatus, TimerDraft,
        ValidationError,
    },
    BoardError,
};

const TICK: Duration = Duration::from_millis(10);

fn board_with(storage: Arc<MemoryStorage>) -> Arc<AppState> {
    let storage: Arc<dyn Storage> = storage;
    Arc::new(AppState::new(storage, TICK, false))
}

/// Storage that reads as empty and refuses every write
struct ReadOnlyStorage;

impl Storage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn draft(name: &str, minutes: u32, seconds: u32, category: &str) -> TimerDraft {
    TimerDraft {
        name: name.to_string(),
        minutes: Some(ClockField::try_from(minutes).unwrap()),
        seconds: Some(ClockField::try_from(seconds).unwrap()),
        category: category.to_string(),
        ..TimerDraft::default()
    }
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<BoardEvent>) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}

#[tokio::test(start_paused = true)]
async fn test_pushups_scenario_runs_to_history() {
    let storage = Arc::new(MemoryStorage::new());
    let state = board_with(Arc::clone(&storage));
    let mut rx = state.subscribe();

    let timer = state.create(&draft("Pushups", 1, 30, "Workout")).unwrap();
    assert_eq!(timer.duration, 90);
    assert_eq!(state.snapshot().active.len(), 1);
    assert_eq!(load_timers(storage.as_ref()).len(), 1);

    let before_start = Utc::now();
    state.start(timer.id).unwrap();

    sleep(Duration::from_millis(89_500)).await;
    let view = state.timer(timer.id).expect("still active before 90s");
    assert_eq!(view.countdown.status, CountdownStatus::Running);
    assert!(view.countdown.remaining_ms > 0);

    sleep(Duration::from_millis(1_000)).await;
    assert!(state.timer(timer.id).is_none());

    let history = state.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].timer, timer);
    assert!(history[0].completed_at >= before_start);

    assert!(load_timers(storage.as_ref()).is_empty());
    assert_eq!(state.ticker_count(), 0);

    let completions = drain(&mut rx)
        .into_iter()
        .filter(|event| matches!(event, BoardEvent::Completed { .. }))
        .count();
    assert_eq!(completions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_remaining_time_never_increases_while_running() {
    let state = board_with(Arc::new(MemoryStorage::new()));
    let timer = state.create(&draft("Sprint", 0, 2, "Workout")).unwrap();
    state.start(timer.id).unwrap();

    let mut last = u64::MAX;
    for _ in 0..15 {
        sleep(Duration::from_millis(100)).await;
        match state.timer(timer.id) {
            Some(view) => {
                assert!(view.countdown.remaining_ms <= last);
                last = view.countdown.remaining_ms;
            }
            None => break,
        }
    }
    sleep(Duration::from_millis(1_000)).await;
    assert!(state.timer(timer.id).is_none());
    assert_eq!(state.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_remaining_time() {
    let state = board_with(Arc::new(MemoryStorage::new()));
    let timer = state.create(&draft("Read", 1, 0, "Study")).unwrap();

    state.start(timer.id).unwrap();
    sleep(Duration::from_millis(2_005)).await;
    let paused = state.pause(timer.id).unwrap();
    assert_eq!(paused.countdown.status, CountdownStatus::Paused);

    sleep(Duration::from_secs(10)).await;
    let still = state.timer(timer.id).unwrap();
    assert_eq!(still.countdown.remaining_ms, paused.countdown.remaining_ms);

    // pausing again and starting twice leave the value alone
    assert_eq!(state.pause(timer.id).unwrap().countdown.remaining_ms, paused.countdown.remaining_ms);
    let resumed = state.start(timer.id).unwrap();
    assert_eq!(resumed.countdown.remaining_ms, paused.countdown.remaining_ms);
    assert_eq!(state.start(timer.id).unwrap().countdown.remaining_ms, paused.countdown.remaining_ms);
}

#[tokio::test(start_paused = true)]
async fn test_reset_while_running_keeps_ticker() {
    let state = board_with(Arc::new(MemoryStorage::new()));
    let timer = state.create(&draft("Nap", 0, 30, "Break")).unwrap();
    state.start(timer.id).unwrap();
    sleep(Duration::from_secs(5)).await;

    let view = state.reset(timer.id).unwrap();
    assert_eq!(view.countdown.remaining_ms, 30_000);
    assert_eq!(view.countdown.status, CountdownStatus::Paused);
    assert_eq!(state.ticker_count(), 1);

    state.start(timer.id).unwrap();
    sleep(Duration::from_secs(31)).await;
    assert_eq!(state.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deleting_running_timer_cancels_it() {
    let storage = Arc::new(MemoryStorage::new());
    let state = board_with(Arc::clone(&storage));
    let timer = state.create(&draft("Plank", 0, 1, "Workout")).unwrap();
    state.start(timer.id).unwrap();
    let mut rx = state.subscribe();

    sleep(Duration::from_millis(500)).await;
    state.delete(timer.id, Confirmation::Confirmed).unwrap();
    assert_eq!(state.ticker_count(), 0);

    sleep(Duration::from_secs(5)).await;
    assert!(state.history().is_empty());
    assert!(load_timers(storage.as_ref()).is_empty());

    let events = drain(&mut rx);
    assert_eq!(events, vec![BoardEvent::Deleted { id: timer.id }]);
}

#[tokio::test(start_paused = true)]
async fn test_declined_delete_changes_nothing() {
    let storage = Arc::new(MemoryStorage::new());
    let state = board_with(Arc::clone(&storage));
    let timer = state.create(&draft("Plank", 0, 45, "Workout")).unwrap();

    let err = state.delete(timer.id, Confirmation::Declined).unwrap_err();
    assert_eq!(err, BoardError::ConfirmationRequired(timer.id));
    assert!(state.timer(timer.id).is_some());
    assert_eq!(load_timers(storage.as_ref()).len(), 1);

    assert_eq!(
        state.delete(404, Confirmation::Confirmed).unwrap_err(),
        BoardError::NotFound(404)
    );
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_create_is_rejected_without_side_effects() {
    let storage = Arc::new(MemoryStorage::new());
    let state = board_with(Arc::clone(&storage));
    state.create(&draft("Run", 5, 0, "Workout")).unwrap();

    let err = state.create(&draft("Run", 5, 0, "Workout")).unwrap_err();
    assert!(matches!(err, BoardError::Validation(ValidationError::Duplicate { .. })));
    assert_eq!(state.snapshot().active.len(), 1);
    assert_eq!(load_timers(storage.as_ref()).len(), 1);
    assert_eq!(state.ticker_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_all_only_touches_category() {
    let state = board_with(Arc::new(MemoryStorage::new()));
    let a = state.create(&draft("Math", 10, 0, "Study")).unwrap();
    let b = state.create(&draft("Physics", 10, 0, "Study")).unwrap();
    let c = state.create(&draft("Squats", 10, 0, "Workout")).unwrap();

    let report = state.start_all("Study");
    assert_eq!(report.changed, vec![a.id, b.id]);

    assert_eq!(state.timer(a.id).unwrap().countdown.status, CountdownStatus::Running);
    assert_eq!(state.timer(b.id).unwrap().countdown.status, CountdownStatus::Running);
    assert_eq!(state.timer(c.id).unwrap().countdown.status, CountdownStatus::Paused);

    sleep(Duration::from_secs(3)).await;
    state.pause_all("Study");
    state.reset_all("Study");
    for id in [a.id, b.id] {
        let view = state.timer(id).unwrap();
        assert_eq!(view.countdown.status, CountdownStatus::Paused);
        assert_eq!(view.countdown.remaining_ms, 600_000);
    }
}

#[tokio::test(start_paused = true)]
async fn test_reset_all_leaves_history_alone() {
    let state = board_with(Arc::new(MemoryStorage::new()));
    let done = state.create(&draft("Quick", 0, 1, "Break")).unwrap();
    state.create(&draft("Long", 5, 0, "Break")).unwrap();
    state.start(done.id).unwrap();
    sleep(Duration::from_secs(2)).await;

    let report = state.reset_all("Break");
    assert!(!report.changed.contains(&done.id));
    assert!(!report.unchanged.contains(&done.id));
    assert_eq!(state.history().len(), 1);
    assert!(state.timer(done.id).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_reload_restores_paused_timers() {
    let storage = Arc::new(MemoryStorage::new());
    let first = board_with(Arc::clone(&storage));
    let timer = first.create(&draft("Essay", 25, 0, "Study")).unwrap();
    first.start(timer.id).unwrap();
    sleep(Duration::from_secs(60)).await;
    first.stop_tickers();

    let second = board_with(Arc::clone(&storage));
    second.start_tickers();
    let view = second.timer(timer.id).unwrap();
    assert_eq!(view.countdown.status, CountdownStatus::Paused);
    assert_eq!(view.countdown.remaining_ms, 25 * 60 * 1000);
    assert_eq!(second.ticker_count(), 1);
    assert!(second.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_theme_toggle_is_persisted() {
    let storage = Arc::new(MemoryStorage::new());
    let state = board_with(Arc::clone(&storage));
    let theme = state.toggle_theme();
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some(theme.as_str()));

    let reloaded = board_with(storage);
    assert_eq!(reloaded.theme(), theme);
}

#[tokio::test(start_paused = true)]
async fn test_write_failures_do_not_block_the_board() {
    let storage: Arc<dyn Storage> = Arc::new(ReadOnlyStorage);
    let state = Arc::new(AppState::new(storage, TICK, false));

    let quick = state.create(&draft("Quick", 0, 1, "Break")).unwrap();
    let long = state.create(&draft("Long", 5, 0, "Break")).unwrap();
    assert_eq!(state.snapshot().active.len(), 2);
    assert_eq!(state.ticker_count(), 2);

    state.start(quick.id).unwrap();
    sleep(Duration::from_secs(2)).await;
    assert!(state.timer(quick.id).is_none());
    assert_eq!(state.history().len(), 1);

    state.delete(long.id, Confirmation::Confirmed).unwrap();
    assert!(state.snapshot().active.is_empty());
    assert_eq!(state.ticker_count(), 0);

    let theme = state.toggle_theme();
    assert_eq!(state.theme(), theme);
}

#[test]
fn test_concurrent_theme_toggles_keep_storage_in_step() {
    let storage = Arc::new(MemoryStorage::new());
    let state = board_with(Arc::clone(&storage));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..25 {
                    state.toggle_theme();
                }
            });
        }
    });

    assert_eq!(
        storage.get("theme").unwrap().as_deref(),
        Some(state.theme().as_str())
    );
}
