//! 服務層模組
//!
//! 提供 session 狀態與意圖處理、合法動作遮罩、JSON snapshot 和批次模擬

pub mod action_mask;
pub mod intent;
pub mod simulate;
pub mod snapshot;
pub mod state;

pub use action_mask::{affordable_cards, legal_actions, LegalActions};
pub use intent::{Action, Event, Outcome, Rejection, Step, Transition};
pub use simulate::{run_greedy, simulate_runs, summarize, RunSummary, SimStats};
pub use snapshot::snapshot_json;
pub use state::{new_session, SessionState};

#[cfg(test)]
mod integration_tests;
