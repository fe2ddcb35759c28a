//! Faustian 牌局引擎
//!
//! 抽牌、棄牌換血、花血出牌換金，在九層地獄中一關一關達成金幣目標，
//! 同時控制不斷上升的腐化與靈魂債務，並在關卡之間簽署契約。
//!
//! - `game`: 純領域邏輯（牌組、牌堆、資源、修正值、契約、進度）
//! - `service`: session reducer 與衍生的唯讀視圖

pub mod game;
pub mod service;

pub use game::{ConfigError, GameConfig};
pub use service::{new_session, Action, Outcome, Rejection, SessionState, Step};
