//! Notifications published after each board mutation

use serde::{Deserialize, Serialize};

use super::{
    categories::BulkReport,
    timer::{CompletedTimer, Timer, TimerId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    Created { timer: Timer },
    Started { id: TimerId },
    Paused { id: TimerId },
    Reset { id: TimerId },
    /// Published once per run-to-zero
    Completed { timer: CompletedTimer },
    Deleted { id: TimerId },
    Bulk { report: BulkReport },
}
