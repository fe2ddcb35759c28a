//! 資源帳本
//!
//! 金幣、血量、腐化、靈魂債務以及每關的出牌/棄牌次數。
//! 所有轉換都回傳新值，不修改輸入。

use std::collections::HashMap;

use super::cards::{Card, Sin};
use super::config::GameConfig;
use super::constants::{AFFINITY_MULTIPLIER, AFFINITY_THRESHOLD, CORRUPTION_CEILING};
use super::modifiers::Modifiers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resources {
    pub gold: u64,
    pub blood: u32,
    pub max_blood: u32,
    pub corruption: u32, // 0..=100
    pub soul_debt: u32,
    pub max_hand_size: usize, // 未含修正
    pub plays_remaining: u32,
    pub discards_remaining: u32,
}

/// 單次出牌的計分結果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayScore {
    pub gold: u64,
    /// 是否觸發同罪翻倍
    pub affinity: bool,
    /// 實際使用的金幣乘數（含翻倍）
    pub multiplier: f64,
}

/// 單張牌的實際血量成本
///
/// `max(1, cost - reduction + increase)`
pub fn blood_cost_of(card: &Card, modifiers: &Modifiers) -> u32 {
    let cost = card.blood_cost as i64 - modifiers.blood_cost_reduction as i64
        + modifiers.blood_cost_increase as i64;
    cost.max(1) as u32
}

/// 一組牌的總血量成本
pub fn total_blood_cost(cards: &[Card], modifiers: &Modifiers) -> u32 {
    cards.iter().map(|c| blood_cost_of(c, modifiers)).sum()
}

/// 計算一次出牌獲得的金幣
///
/// 任一罪類在同次出牌中達到 5 張時，整次出牌的乘數再乘 2。
/// 翻倍只作用在每張牌取整後的基礎值，同罪加成不翻倍。
pub fn score_play(cards: &[Card], modifiers: &Modifiers) -> PlayScore {
    let mut sin_counts: HashMap<Sin, usize> = HashMap::new();
    for card in cards {
        *sin_counts.entry(card.sin).or_insert(0) += 1;
    }

    let affinity = sin_counts.values().any(|&n| n >= AFFINITY_THRESHOLD);
    let multiplier = if affinity {
        modifiers.gold_multiplier * AFFINITY_MULTIPLIER
    } else {
        modifiers.gold_multiplier
    };

    let gold = cards
        .iter()
        .map(|card| {
            let base = (card.gold_value as f64 * multiplier).round().max(0.0) as u64;
            let same = sin_counts.get(&card.sin).copied().unwrap_or(1);
            base + modifiers.same_type_bonus * (same as u64 - 1)
        })
        .sum();

    PlayScore { gold, affinity, multiplier }
}

/// 棄牌獲得的血量（每張固定值）
pub fn blood_for_discard(count: usize, modifiers: &Modifiers) -> u32 {
    count as u32 * modifiers.blood_per_discard
}

impl Resources {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            gold: 0,
            blood: config.initial_blood.min(config.max_blood),
            max_blood: config.max_blood,
            corruption: 0,
            soul_debt: 0,
            max_hand_size: config.initial_hand_size,
            plays_remaining: config.plays_per_level,
            discards_remaining: config.discards_per_level,
        }
    }

    /// 含修正的手牌上限
    pub fn effective_hand_size(&self, modifiers: &Modifiers) -> usize {
        self.max_hand_size + modifiers.hand_size_bonus
    }

    /// 出牌後的資源：扣血、加金、加腐化、消耗一次出牌
    pub fn after_play(&self, blood_cost: u32, gold: u64, cards_played: usize, corruption_per_card: u32) -> Self {
        let mut next = *self;
        next.blood = self.blood.saturating_sub(blood_cost);
        next.gold = self.gold + gold;
        next.corruption = self
            .corruption
            .saturating_add(cards_played as u32 * corruption_per_card)
            .min(CORRUPTION_CEILING);
        next.plays_remaining = self.plays_remaining.saturating_sub(1);
        next
    }

    /// 棄牌後的資源：加血（截斷至上限）、消耗一次棄牌
    pub fn after_discard(&self, blood_gain: u32) -> Self {
        let mut next = *self;
        next.blood = self.blood.saturating_add(blood_gain).min(self.max_blood);
        next.discards_remaining = self.discards_remaining.saturating_sub(1);
        next
    }

    /// 回合效果中的資源變化
    pub fn after_turn(&self, modifiers: &Modifiers) -> Self {
        let mut next = *self;
        next.soul_debt = self.soul_debt.saturating_add(modifiers.soul_debt_per_turn);
        next.corruption = self
            .corruption
            .saturating_add(modifiers.corruption_per_turn)
            .min(CORRUPTION_CEILING);
        next
    }

    /// 進入新關卡：金幣與血量歸零，次數重置為基礎值加修正
    pub fn for_new_level(&self, config: &GameConfig, modifiers: &Modifiers) -> Self {
        Self {
            gold: 0,
            blood: 0,
            max_blood: self.max_blood,
            corruption: self
                .corruption
                .saturating_add(modifiers.level_start_corruption)
                .min(CORRUPTION_CEILING),
            soul_debt: self.soul_debt,
            max_hand_size: self.max_hand_size,
            plays_remaining: config.plays_per_level + modifiers.plays_per_level_bonus,
            discards_remaining: config.discards_per_level + modifiers.discards_per_level_bonus,
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================
