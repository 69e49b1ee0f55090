//! Main application state: the timer collection controller
//!
//! Every mutation goes through the board mutex, so commands and ticker
//! callbacks are applied one at a time and never interleave mid-update.
//! Lock order is always board, then tickers.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use chrono::Utc;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info};

use super::{
    board::{ActiveTimer, Board, BoardSnapshot, TimerView},
    categories::{BulkCommand, BulkReport, CategoryView},
    countdown::{CountdownStatus, Tick},
    events::BoardEvent,
    timer::{CompletedTimer, Timer, TimerId},
    ui_state::Theme,
    validator::TimerDraft,
};
use crate::{
    error::BoardError,
    services::storage::{load_theme, load_timers, save_theme, save_timers, Storage},
    tasks::spawn_countdown_ticker,
    utils::lock_or_recover,
};

/// Answer to the "are you sure?" prompt before deleting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// Individual countdown commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Toggle,
    Reset,
}

/// What a ticker should do after one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced,
    /// The timer just completed and moved to history
    Completed,
    /// The timer is no longer active
    Gone,
}

/// Main application state that owns the board, its storage and its tickers
pub struct AppState {
    board: Mutex<Board>,
    storage: Arc<dyn Storage>,
    /// One ticker task per active timer
    tickers: Mutex<HashMap<TimerId, JoinHandle<()>>>,
    tick_interval: Duration,
    /// Channel for board change notifications
    pub event_tx: broadcast::Sender<BoardEvent>,
    pub start_time: Instant,
}

impl AppState {
    /// Load persisted timers and theme. Tickers are not running until
    /// [`AppState::start_tickers`] is called.
    pub fn new(storage: Arc<dyn Storage>, tick_interval: Duration, prefers_dark: bool) -> Self {
        let timers = load_timers(storage.as_ref());
        let theme = Theme::resolve(load_theme(storage.as_ref()), prefers_dark);
        let (event_tx, _) = broadcast::channel(256);

        info!("Loaded {} active timers, theme={}", timers.len(), theme);

        Self {
            board: Mutex::new(Board::new(timers, theme)),
            storage,
            tickers: Mutex::new(HashMap::new()),
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            event_tx,
            start_time: Instant::now(),
        }
    }

    fn board(&self) -> MutexGuard<'_, Board> {
        lock_or_recover(&self.board, "board")
    }

    fn tickers(&self) -> MutexGuard<'_, HashMap<TimerId, JoinHandle<()>>> {
        lock_or_recover(&self.tickers, "tickers")
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.event_tx.subscribe()
    }

    fn publish(&self, event: BoardEvent) {
        // only fails when nobody is listening
        if self.event_tx.send(event).is_err() {
            debug!("No subscribers for board event");
        }
    }

    fn persist(&self, board: &Board) {
        save_timers(self.storage.as_ref(), &board.timers());
    }

    fn tick_ms(&self) -> u64 {
        u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX)
    }

    fn spawn_ticker(self: &Arc<Self>, tickers: &mut HashMap<TimerId, JoinHandle<()>>, id: TimerId) {
        tickers
            .entry(id)
            .or_insert_with(|| spawn_countdown_ticker(Arc::downgrade(self), id, self.tick_interval));
    }

    /// Spawn a ticker for every active timer that lacks one
    pub fn start_tickers(self: &Arc<Self>) {
        let board = self.board();
        let mut tickers = self.tickers();
        for entry in board.active() {
            self.spawn_ticker(&mut tickers, entry.timer.id);
        }
        info!("Started {} countdown tickers", tickers.len());
    }

    /// Abort every ticker, e.g. on shutdown
    pub fn stop_tickers(&self) {
        let mut tickers = self.tickers();
        for (_, handle) in tickers.drain() {
            handle.abort();
        }
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers().len()
    }

    /// Validate a draft, append the timer, persist and start its ticker
    pub fn create(self: &Arc<Self>, draft: &TimerDraft) -> Result<Timer, BoardError> {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);

        let mut board = self.board();
        let timer = match board.create(draft, now_ms) {
            Ok(timer) => timer,
            Err(e) => {
                info!("Rejected new timer: {}", e);
                return Err(e.into());
            }
        };
        self.persist(&board);
        self.spawn_ticker(&mut self.tickers(), timer.id);
        drop(board);

        info!(
            "Created timer {} \"{}\" in {} ({}s)",
            timer.id, timer.name, timer.category, timer.duration
        );
        self.publish(BoardEvent::Created { timer: timer.clone() });
        Ok(timer)
    }

    /// Remove an active timer and cancel its ticker. Declining leaves everything untouched.
    pub fn delete(&self, id: TimerId, confirmation: Confirmation) -> Result<Timer, BoardError> {
        let mut board = self.board();
        if board.get(id).is_none() {
            return Err(BoardError::NotFound(id));
        }
        if confirmation == Confirmation::Declined {
            info!("Delete of timer {} declined", id);
            return Err(BoardError::ConfirmationRequired(id));
        }

        let timer = board.delete(id).ok_or(BoardError::NotFound(id))?;
        if let Some(handle) = self.tickers().remove(&id) {
            handle.abort();
        }
        self.persist(&board);
        drop(board);

        info!("Deleted timer {} \"{}\"", id, timer.name);
        self.publish(BoardEvent::Deleted { id });
        Ok(timer)
    }

    pub fn start(&self, id: TimerId) -> Result<TimerView, BoardError> {
        self.apply(id, TimerCommand::Start)
    }

    pub fn pause(&self, id: TimerId) -> Result<TimerView, BoardError> {
        self.apply(id, TimerCommand::Pause)
    }

    pub fn toggle(&self, id: TimerId) -> Result<TimerView, BoardError> {
        self.apply(id, TimerCommand::Toggle)
    }

    pub fn reset(&self, id: TimerId) -> Result<TimerView, BoardError> {
        self.apply(id, TimerCommand::Reset)
    }

    /// Run one countdown command against one timer
    pub fn apply(&self, id: TimerId, command: TimerCommand) -> Result<TimerView, BoardError> {
        let mut board = self.board();
        let changed = match command {
            TimerCommand::Start => board.start(id),
            TimerCommand::Pause => board.pause(id),
            TimerCommand::Toggle => board.toggle(id),
            TimerCommand::Reset => board.reset(id),
        }
        .ok_or(BoardError::NotFound(id))?;
        let view = board.get(id).map(ActiveTimer::view).ok_or(BoardError::NotFound(id))?;
        drop(board);

        if changed {
            let event = match (command, view.countdown.status) {
                (TimerCommand::Reset, _) => BoardEvent::Reset { id },
                (_, CountdownStatus::Running) => BoardEvent::Started { id },
                _ => BoardEvent::Paused { id },
            };
            debug!("Timer {} {:?} -> {:?}", id, command, view.countdown.status);
            self.publish(event);
        }
        Ok(view)
    }

    /// Apply a command to every active timer in `category`
    pub fn bulk(&self, category: &str, command: BulkCommand) -> BulkReport {
        let report = self.board().bulk(category, command);
        info!(
            "Bulk {:?} on {}: {} changed, {} unchanged",
            command,
            category,
            report.changed.len(),
            report.unchanged.len()
        );
        self.publish(BoardEvent::Bulk { report: report.clone() });
        report
    }

    pub fn start_all(&self, category: &str) -> BulkReport {
        self.bulk(category, BulkCommand::Start)
    }

    pub fn pause_all(&self, category: &str) -> BulkReport {
        self.bulk(category, BulkCommand::Pause)
    }

    pub fn reset_all(&self, category: &str) -> BulkReport {
        self.bulk(category, BulkCommand::Reset)
    }

    /// Advance one timer by a single tick, completing it when it hits zero
    pub fn advance(&self, id: TimerId) -> TickOutcome {
        let mut board = self.board();
        match board.advance(id, self.tick_ms()) {
            None => TickOutcome::Gone,
            Some(Tick::Idle) => TickOutcome::Idle,
            Some(Tick::Advanced(_)) => TickOutcome::Advanced,
            Some(Tick::Completed) => {
                let completed = self.complete(&mut board, id);
                drop(board);
                if let Some(timer) = completed {
                    self.publish(BoardEvent::Completed { timer });
                }
                TickOutcome::Completed
            }
        }
    }

    fn complete(&self, board: &mut Board, id: TimerId) -> Option<CompletedTimer> {
        let completed = board.complete(id, Utc::now())?;
        self.persist(board);
        // the caller is this timer's own ticker; dropping the handle detaches it
        self.tickers().remove(&id);
        info!(
            "Timer {} \"{}\" completed at {}",
            id, completed.timer.name, completed.completed_at
        );
        Some(completed)
    }

    pub fn timer(&self, id: TimerId) -> Option<TimerView> {
        self.board().get(id).map(ActiveTimer::view)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board().snapshot()
    }

    pub fn history(&self) -> Vec<CompletedTimer> {
        self.board().completed().to_vec()
    }

    pub fn category_views(&self) -> Vec<CategoryView> {
        self.board().category_views()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.board().suggestions().to_vec()
    }

    pub fn toggle_category_expansion(&self, category: &str) -> bool {
        self.board().ui.toggle_category(category)
    }

    pub fn toggle_history_expansion(&self, category: &str) -> bool {
        self.board().ui.toggle_history(category)
    }

    pub fn theme(&self) -> Theme {
        self.board().ui.theme
    }

    /// Flip the theme and store the new preference
    pub fn toggle_theme(&self) -> Theme {
        let mut board = self.board();
        let theme = board.ui.toggle_theme();
        save_theme(self.storage.as_ref(), theme);
        drop(board);

        info!("Theme switched to {}", theme);
        theme
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tick_interval", &self.tick_interval)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}
