//! 遊戲核心模組
//!
//! 包含 Faustian 牌局引擎的純領域定義：
//! - `constants`: 預設數值
//! - `config`: 可調整的平衡設定
//! - `cards`: 卡牌、罪類、牌組工廠與洗牌
//! - `piles`: 抽牌堆/手牌/出牌區/棄牌堆
//! - `resources`: 金幣、血量、腐化、靈魂債務
//! - `modifiers`: 契約累積效果
//! - `contracts`: 契約目錄與商店抽選
//! - `circles`: 層數、關卡進度與失敗條件
//!
//! 這裡的函數都不寫日誌，也不持有任何 session 狀態。

pub mod constants;
pub mod config;
pub mod cards;
pub mod piles;
pub mod resources;
pub mod modifiers;
pub mod contracts;
pub mod circles;

pub use constants::*;
pub use config::{ConfigError, GameConfig};
pub use cards::{blood_cost_for_rank, build_deck, shuffle, Card, CardId, Sin};
pub use piles::{DrawResult, Moved, PileError, Piles, SortKey};
pub use resources::{blood_cost_of, blood_for_discard, score_play, total_blood_cost, PlayScore, Resources};
pub use modifiers::{apply_contract, apply_effects, Effect, Modifiers};
pub use contracts::{eligible_keys, select_for_shop, ContractDef, ContractId, Rarity, CONTRACT_COUNT, CONTRACT_DEFS};
pub use circles::{check_defeat, circle_name, gold_target, DefeatCause, Phase, Progress, RunEnd};
