//! 地獄層數與關卡進度

use super::config::GameConfig;
use super::constants::GOLD_TARGET_ROUNDING;
use super::modifiers::Modifiers;
use super::resources::Resources;

/// 遊戲階段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Gameplay,
    ContractShop,
    End(RunEnd),
}

/// 遊戲結束狀態
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    Victory,
    Defeat(DefeatCause),
}

/// 失敗原因
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefeatCause {
    Corruption,
    SoulDebt,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::End(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Gameplay => "gameplay",
            Phase::ContractShop => "contractShop",
            Phase::End(RunEnd::Victory) => "victory",
            Phase::End(RunEnd::Defeat(_)) => "defeat",
        }
    }
}

impl DefeatCause {
    pub fn name(&self) -> &'static str {
        match self {
            DefeatCause::Corruption => "corruption",
            DefeatCause::SoulDebt => "soulDebt",
        }
    }
}

/// 各層名稱（超出範圍使用最後一層）
pub static CIRCLE_NAMES: [&str; 9] = [
    "Limbo",
    "Lust",
    "Gluttony",
    "Greed",
    "Wrath",
    "Heresy",
    "Violence",
    "Fraud",
    "Treachery",
];

pub fn circle_name(circle: u32) -> &'static str {
    let idx = (circle.max(1) as usize - 1).min(CIRCLE_NAMES.len() - 1);
    CIRCLE_NAMES[idx]
}

/// 進度狀態
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub circle: u32,
    pub level: u32,
    pub phase: Phase,
    pub turn: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            circle: 1,
            level: 1,
            phase: Phase::Gameplay,
            turn: 0,
        }
    }
}

impl Progress {
    /// 前進到下一關
    ///
    /// 關卡未滿時 level + 1；否則 circle + 1, level = 1。
    /// 超過最後一層時進入勝利，circle 停在最大值。
    pub fn advanced(&self, config: &GameConfig) -> Progress {
        let mut next = *self;
        if self.level < config.levels_per_circle {
            next.level += 1;
            next.phase = Phase::Gameplay;
        } else if self.circle < config.circle_count {
            next.circle += 1;
            next.level = 1;
            next.phase = Phase::Gameplay;
        } else {
            next.phase = Phase::End(RunEnd::Victory);
        }
        next
    }
}

/// 當前關卡金幣目標
///
/// `round(base(circle) * (1 + step * (circle - 1)) * (1 - reduction) / 5) * 5`
pub fn gold_target(circle: u32, config: &GameConfig, modifiers: &Modifiers) -> u64 {
    let base = config.base_gold_target(circle) as f64;
    let scale = 1.0 + config.gold_target_multiplier_step * (circle.max(1) - 1) as f64;
    let reduction = (1.0 - modifiers.gold_target_reduction).max(0.0);
    let raw = base * scale * reduction;
    ((raw / GOLD_TARGET_ROUNDING).round() * GOLD_TARGET_ROUNDING) as u64
}

/// 檢查失敗條件（腐化優先於靈魂債務）
pub fn check_defeat(circle: u32, resources: &Resources, config: &GameConfig) -> Option<DefeatCause> {
    if resources.corruption >= config.corruption_threshold(circle) {
        Some(DefeatCause::Corruption)
    } else if resources.soul_debt >= config.soul_debt_threshold {
        Some(DefeatCause::SoulDebt)
    } else {
        None
    }
}

// ============================================================================
// 單元測試
// ============================================================================
