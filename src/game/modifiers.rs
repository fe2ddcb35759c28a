//! 修正值系統
//!
//! 已簽署契約的累積效果。每個契約對應一組宣告式 `Effect`，
//! 透過同一個 fold (`apply_effects`) 合併進 `Resources` / `Modifiers`。
//!
//! 效果只讀取傳入的兩個參數，不讀任何 session 狀態；
//! 同一契約不可重複套用由上層的已簽署集合檢查負責。

use super::constants::{BLOOD_PER_DISCARD, CORRUPTION_CEILING};
use super::contracts::ContractId;
use super::resources::Resources;

/// 累積修正值
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifiers {
    pub gold_multiplier: f64,
    pub blood_cost_reduction: u32,
    pub blood_cost_increase: u32,
    pub extra_draw: usize,           // 每回合額外抽牌
    pub same_type_bonus: u64,        // 同罪加成（每張同罪牌）
    pub discard_per_turn: usize,     // 每回合強制隨機棄牌
    pub gold_target_reduction: f64,
    pub corruption_healing_disabled: bool,
    pub blood_per_discard: u32,
    pub hand_size_bonus: usize,
    pub plays_per_level_bonus: u32,
    pub discards_per_level_bonus: u32,
    pub soul_debt_per_turn: u32,
    pub corruption_per_turn: u32,
    pub level_start_corruption: u32, // 每關開始時增加腐化
}

impl Modifiers {
    /// 中性修正值（乘數 1，加成全 0，旗標 false）
    pub fn neutral(blood_per_discard: u32) -> Self {
        Self {
            gold_multiplier: 1.0,
            blood_cost_reduction: 0,
            blood_cost_increase: 0,
            extra_draw: 0,
            same_type_bonus: 0,
            discard_per_turn: 0,
            gold_target_reduction: 0.0,
            corruption_healing_disabled: false,
            blood_per_discard,
            hand_size_bonus: 0,
            plays_per_level_bonus: 0,
            discards_per_level_bonus: 0,
            soul_debt_per_turn: 0,
            corruption_per_turn: 0,
            level_start_corruption: 0,
        }
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::neutral(BLOOD_PER_DISCARD)
    }
}

/// 單一契約效果
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    // 立即資源變化
    Gold(u64),
    Corruption(i32), // 負值為治療，受 corruption_healing_disabled 限制
    SoulDebt(u32),
    MaxBlood(i32), // 上限最低為 1，血量跟著截斷

    // 金幣乘數
    SetGoldMultiplier(f64),
    ScaleGoldMultiplier { factor: f64, floor: f64 },

    // 永久加成
    BloodCostReduction(u32),
    BloodCostIncrease(u32),
    ExtraDraw(usize),
    BloodPerDiscard(u32),
    SameTypeBonus(u64),
    DiscardPerTurn(usize),
    GoldTargetReduction(f64),
    DisableCorruptionHealing,
    HandSizeBonus(usize),
    PlaysPerLevelBonus(u32),
    DiscardsPerLevelBonus(u32),
    SoulDebtPerTurn(u32),
    CorruptionPerTurn(u32),
    LevelStartCorruption(u32),
}

impl Effect {
    pub fn apply(&self, resources: Resources, modifiers: Modifiers) -> (Resources, Modifiers) {
        let mut r = resources;
        let mut m = modifiers;
        match *self {
            Effect::Gold(amount) => r.gold += amount,
            Effect::Corruption(delta) if delta >= 0 => {
                r.corruption = (r.corruption + delta as u32).min(CORRUPTION_CEILING);
            }
            Effect::Corruption(delta) => {
                if !m.corruption_healing_disabled {
                    r.corruption = r.corruption.saturating_sub(delta.unsigned_abs());
                }
            }
            Effect::SoulDebt(amount) => r.soul_debt += amount,
            Effect::MaxBlood(delta) => {
                let max = (r.max_blood as i64 + delta as i64).max(1);
                r.max_blood = max as u32;
                r.blood = r.blood.min(r.max_blood);
            }
            Effect::SetGoldMultiplier(value) => m.gold_multiplier = value,
            Effect::ScaleGoldMultiplier { factor, floor } => {
                m.gold_multiplier = (m.gold_multiplier * factor).max(floor);
            }
            Effect::BloodCostReduction(n) => m.blood_cost_reduction += n,
            Effect::BloodCostIncrease(n) => m.blood_cost_increase += n,
            Effect::ExtraDraw(n) => m.extra_draw += n,
            Effect::BloodPerDiscard(n) => m.blood_per_discard += n,
            Effect::SameTypeBonus(n) => m.same_type_bonus += n,
            Effect::DiscardPerTurn(n) => m.discard_per_turn += n,
            Effect::GoldTargetReduction(x) => {
                m.gold_target_reduction = (m.gold_target_reduction + x).min(1.0);
            }
            Effect::DisableCorruptionHealing => m.corruption_healing_disabled = true,
            Effect::HandSizeBonus(n) => m.hand_size_bonus += n,
            Effect::PlaysPerLevelBonus(n) => m.plays_per_level_bonus += n,
            Effect::DiscardsPerLevelBonus(n) => m.discards_per_level_bonus += n,
            Effect::SoulDebtPerTurn(n) => m.soul_debt_per_turn += n,
            Effect::CorruptionPerTurn(n) => m.corruption_per_turn += n,
            Effect::LevelStartCorruption(n) => m.level_start_corruption += n,
        }
        (r, m)
    }
}

/// 依序合併一組效果
pub fn apply_effects(effects: &[Effect], resources: Resources, modifiers: Modifiers) -> (Resources, Modifiers) {
    effects
        .iter()
        .fold((resources, modifiers), |(r, m), effect| effect.apply(r, m))
}

/// 套用契約效果；未知的 key 回傳 None（不做任何修改）
pub fn apply_contract(key: &str, resources: Resources, modifiers: Modifiers) -> Option<(Resources, Modifiers)> {
    let id = ContractId::from_key(key)?;
    Some(apply_effects(id.effects(), resources, modifiers))
}

// ============================================================================
// 單元測試
// ============================================================================
