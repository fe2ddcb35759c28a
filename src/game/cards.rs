//! 卡牌定義與牌組工廠
//!
//! 每張牌屬於七宗罪之一，點數 1..=13。完整牌組中每個 (罪, 點數) 組合恰好一張。

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::GameConfig;
use super::constants::{CHEAP_RANK_LIMIT, COST_BASE, COST_DIVISOR, SIN_COUNT};

/// 卡牌 ID（在一副牌內唯一，從 1 開始連續分配）
pub type CardId = u32;

/// 罪類（卡牌類別）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sin {
    Pride,
    Greed,
    Lust,
    Envy,
    Gluttony,
    Wrath,
    Sloth,
}

impl Sin {
    /// 所有罪類（牌組生成順序）
    pub fn all() -> &'static [Sin] {
        &[
            Sin::Pride,
            Sin::Greed,
            Sin::Lust,
            Sin::Envy,
            Sin::Gluttony,
            Sin::Wrath,
            Sin::Sloth,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sin::Pride => "Pride",
            Sin::Greed => "Greed",
            Sin::Lust => "Lust",
            Sin::Envy => "Envy",
            Sin::Gluttony => "Gluttony",
            Sin::Wrath => "Wrath",
            Sin::Sloth => "Sloth",
        }
    }

    /// 轉換為整數 ID (用於 snapshot)
    pub fn to_int(&self) -> u8 {
        match self {
            Sin::Pride => 0,
            Sin::Greed => 1,
            Sin::Lust => 2,
            Sin::Envy => 3,
            Sin::Gluttony => 4,
            Sin::Wrath => 5,
            Sin::Sloth => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub sin: Sin,
    pub rank: u8,        // 1..=value_range
    pub blood_cost: u32, // 打出所需血量（未含修正）
    pub gold_value: u64, // 打出獲得金幣，等於 rank
}

impl Card {
    /// 以預設成本參數建立卡牌
    pub fn new(id: CardId, sin: Sin, rank: u8) -> Self {
        Self::with_cost_params(id, sin, rank, COST_BASE, COST_DIVISOR)
    }

    pub fn with_cost_params(id: CardId, sin: Sin, rank: u8, cost_base: i32, cost_divisor: u8) -> Self {
        Self {
            id,
            sin,
            rank,
            blood_cost: blood_cost_for_rank(rank, cost_base, cost_divisor),
            gold_value: rank as u64,
        }
    }
}

/// 計算點數對應的血量成本
///
/// - rank <= 3: 固定 1
/// - 其他: max(1, ceil(rank / divisor) + base)
pub fn blood_cost_for_rank(rank: u8, cost_base: i32, cost_divisor: u8) -> u32 {
    if rank <= CHEAP_RANK_LIMIT {
        return 1;
    }
    let divisor = cost_divisor.max(1) as i32;
    let rank = rank as i32;
    let ceil = (rank + divisor - 1) / divisor;
    (ceil + cost_base).max(1) as u32
}

/// 建立完整牌組（罪類優先，點數遞增，ID 從 1 連續分配）
///
/// 不含任何隨機性。
pub fn build_deck(config: &GameConfig) -> Vec<Card> {
    let mut deck = Vec::with_capacity(SIN_COUNT * config.value_range as usize);
    let mut next_id: CardId = 1;
    for &sin in Sin::all() {
        for rank in 1..=config.value_range {
            deck.push(Card::with_cost_params(
                next_id,
                sin,
                rank,
                config.cost_base,
                config.cost_divisor,
            ));
            next_id += 1;
        }
    }
    deck
}

/// 回傳洗牌後的新序列，不修改輸入
///
/// `SliceRandom::shuffle` 為 Fisher-Yates，每種排列機率相同。
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_blood_cost_formula() {
        assert_eq!(blood_cost_for_rank(1, 0, 4), 1);
        assert_eq!(blood_cost_for_rank(3, 0, 4), 1);
        assert_eq!(blood_cost_for_rank(4, 0, 4), 1);
        assert_eq!(blood_cost_for_rank(5, 0, 4), 2);
        assert_eq!(blood_cost_for_rank(8, 0, 4), 2);
        assert_eq!(blood_cost_for_rank(9, 0, 4), 3);
        assert_eq!(blood_cost_for_rank(13, 0, 4), 4);
        assert_eq!(blood_cost_for_rank(13, 2, 4), 6);
        // 負的 base 仍然至少 1
        assert_eq!(blood_cost_for_rank(13, -10, 4), 1);
    }

    #[test]
    fn test_card_gold_equals_rank() {
        let card = Card::new(7, Sin::Wrath, 9);
        assert_eq!(card.gold_value, 9);
        assert_eq!(card.blood_cost, 3);
    }

    #[test]
    fn test_build_deck_order_and_ids() {
        let config = GameConfig::default();
        let deck = build_deck(&config);
        assert_eq!(deck.len(), 7 * 13);
        assert_eq!(Sin::all().len(), SIN_COUNT);

        for (idx, card) in deck.iter().enumerate() {
            assert_eq!(card.id, idx as CardId + 1);
        }
        assert_eq!(deck[0].sin, Sin::Pride);
        assert_eq!(deck[0].rank, 1);
        assert_eq!(deck[12].rank, 13);
        assert_eq!(deck[13].sin, Sin::Greed);
        assert_eq!(deck[90].sin, Sin::Sloth);

        let pairs: HashSet<(Sin, u8)> = deck.iter().map(|c| (c.sin, c.rank)).collect();
        assert_eq!(pairs.len(), deck.len());
    }

    #[test]
    fn test_build_deck_respects_value_range() {
        let config = GameConfig {
            value_range: 5,
            ..GameConfig::default()
        };
        let deck = build_deck(&config);
        assert_eq!(deck.len(), 35);
        assert!(deck.iter().all(|c| (1..=5).contains(&c.rank)));
    }

    #[test]
    fn test_shuffle_keeps_multiset_and_input() {
        let deck = build_deck(&GameConfig::default());
        let before = deck.clone();
        let mut rng = StdRng::seed_from_u64(9);
        let shuffled = shuffle(&deck, &mut rng);

        assert_eq!(deck, before);
        assert_eq!(shuffled.len(), deck.len());
        let mut ids: Vec<CardId> = shuffled.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        let expected: Vec<CardId> = deck.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
        assert_ne!(shuffled, deck);
    }

    #[test]
    fn test_shuffle_fairness() {
        // 3 張牌共 6 種排列，每種應約佔 1/6
        let items = [1u8, 2, 3];
        let trials = 60_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(shuffle(&items, &mut rng)).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials as f64 / 6.0;
        for (perm, count) in &counts {
            let deviation = (*count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "permutation {:?} seen {} times", perm, count);
        }
    }
}
