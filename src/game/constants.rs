//! 遊戲常量定義
//!
//! 所有可調整的數值都在 `GameConfig` 中，這裡只保留預設值與固定規則。

// ============================================================================
// 卡牌常量
// ============================================================================

pub const SIN_COUNT: usize = 7;            // 罪類數量（牌組類別）
pub const VALUE_RANGE: u8 = 13;            // 每種罪的點數範圍 1..=13
pub const COST_BASE: i32 = 0;              // 血量成本基礎值
pub const COST_DIVISOR: u8 = 4;            // 血量成本除數（越小越貴）
pub const CHEAP_RANK_LIMIT: u8 = 3;        // rank <= 3 固定 1 血
pub const MAX_ACTIVE_CARDS: usize = 7;     // 單次最多打出/棄掉張數
pub const AFFINITY_THRESHOLD: usize = 5;   // 同罪 5 張以上觸發金幣翻倍
pub const AFFINITY_MULTIPLIER: f64 = 2.0;

// ============================================================================
// 資源常量
// ============================================================================

pub const INITIAL_HAND_SIZE: usize = 10;   // 起始手牌上限
pub const INITIAL_BLOOD: u32 = 0;          // 起始血量
pub const MAX_BLOOD: u32 = 15;             // 血量上限
pub const BLOOD_PER_DISCARD: u32 = 2;      // 每張棄牌獲得血量
pub const PLAYS_PER_LEVEL: u32 = 3;        // 每關出牌次數
pub const DISCARDS_PER_LEVEL: u32 = 2;     // 每關棄牌次數
pub const CORRUPTION_PER_CARD: u32 = 2;    // 每張打出的牌 +2 腐化
pub const CORRUPTION_CEILING: u32 = 100;   // 腐化上限
pub const SOUL_DEBT_THRESHOLD: u32 = 100;  // 靈魂債務失敗門檻

// ============================================================================
// 進度常量
// ============================================================================

pub const LEVELS_PER_CIRCLE: u32 = 3;      // 每層地獄的關卡數
pub const CIRCLE_COUNT: u32 = 9;           // 地獄層數
pub const MAX_CONTRACTS_AVAILABLE: usize = 3;  // 契約商店提供數量
pub const GOLD_TARGET_STEP: f64 = 0.25;    // 每層金幣目標 +25%
pub const GOLD_TARGET_ROUNDING: f64 = 5.0; // 目標取整到 5 的倍數

/// 各層基礎金幣目標
pub const BASE_GOLD_TARGETS: [u64; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 1000];

/// 各層腐化失敗門檻
pub const CORRUPTION_THRESHOLDS: [u32; 9] = [30, 40, 50, 60, 70, 80, 85, 90, 95];
