//! 牌堆管理
//!
//! 一張牌在任何時刻只屬於以下四處之一：
//! 抽牌堆、手牌、出牌區、棄牌堆。所有操作都回傳新的 `Piles`，不修改 `self`。

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use super::cards::{shuffle, Card, CardId};

/// 牌堆操作失敗原因
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PileError {
    #[error("no cards selected")]
    EmptySelection,
    #[error("not enough blood: need {required}, have {available}")]
    InsufficientBlood { required: u32, available: u32 },
}

/// 手牌排序方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Rank,
    Category,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Piles {
    pub draw_pile: Vec<Card>,
    pub hand: Vec<Card>,
    pub active: Vec<Card>, // 已打出、尚未結算的牌
    pub discard_pile: Vec<Card>,
}

/// 抽牌結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawResult {
    pub piles: Piles,
    /// 截斷後的請求數
    pub requested: usize,
    pub drawn: usize,
    /// 是否把棄牌堆洗回抽牌堆
    pub reshuffled: bool,
}

/// 出牌/棄牌結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Moved {
    pub piles: Piles,
    /// 實際移動的牌（依手牌順序）
    pub cards: Vec<Card>,
}

impl Piles {
    /// 以洗好的牌組作為抽牌堆
    pub fn from_deck(deck: Vec<Card>) -> Self {
        Self {
            draw_pile: deck,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.hand.len() + self.active.len() + self.discard_pile.len()
    }

    /// 抽 `n` 張牌到手牌
    ///
    /// 請求數先截斷到 `max_hand - hand.len()`。抽牌堆用完時，
    /// 整個棄牌堆洗牌後成為新的抽牌堆。兩者都空時提前停止。
    pub fn draw<R: Rng + ?Sized>(&self, n: usize, max_hand: usize, rng: &mut R) -> DrawResult {
        let requested = n.min(max_hand.saturating_sub(self.hand.len()));
        let mut next = self.clone();
        let mut reshuffled = false;
        let mut drawn = 0;

        while drawn < requested {
            if next.draw_pile.is_empty() {
                if next.discard_pile.is_empty() {
                    break;
                }
                next.draw_pile = shuffle(&next.discard_pile, rng);
                next.discard_pile.clear();
                reshuffled = true;
            }
            let take = (requested - drawn).min(next.draw_pile.len());
            next.hand.extend(next.draw_pile.drain(..take));
            drawn += take;
        }

        DrawResult {
            piles: next,
            requested,
            drawn,
            reshuffled,
        }
    }

    /// 從手牌中取出選取的牌（保持手牌順序），其餘留在手牌
    fn split_selected(&self, ids: &[CardId]) -> (Vec<Card>, Vec<Card>) {
        let wanted: HashSet<CardId> = ids.iter().copied().collect();
        self.hand.iter().partition(|c| wanted.contains(&c.id))
    }

    /// 依 id 在手牌中解析出選取的牌；不在手牌中的 id 會被忽略
    pub fn resolve(&self, ids: &[CardId]) -> Vec<Card> {
        self.split_selected(ids).0
    }

    /// 出牌：選取的牌移到出牌區
    ///
    /// 選取為空或血量不足時失敗，不改變任何狀態。
    pub fn play<F>(&self, ids: &[CardId], available_blood: u32, cost_of: F) -> Result<Moved, PileError>
    where
        F: Fn(&Card) -> u32,
    {
        let (selected, remaining) = self.split_selected(ids);
        if selected.is_empty() {
            return Err(PileError::EmptySelection);
        }
        let required: u32 = selected.iter().map(&cost_of).sum();
        if required > available_blood {
            return Err(PileError::InsufficientBlood {
                required,
                available: available_blood,
            });
        }

        let mut next = self.clone();
        next.hand = remaining;
        next.active.extend(selected.iter().copied());
        Ok(Moved { piles: next, cards: selected })
    }

    /// 棄牌：選取的牌移到棄牌堆
    pub fn discard(&self, ids: &[CardId]) -> Result<Moved, PileError> {
        let (selected, remaining) = self.split_selected(ids);
        if selected.is_empty() {
            return Err(PileError::EmptySelection);
        }
        let mut next = self.clone();
        next.hand = remaining;
        next.discard_pile.extend(selected.iter().copied());
        Ok(Moved { piles: next, cards: selected })
    }

    /// 結算出牌區：全部移到棄牌堆
    pub fn clear_active(&self) -> Piles {
        let mut next = self.clone();
        next.discard_pile.append(&mut next.active);
        next
    }

    /// 隨機從手牌強制棄掉 `count` 張
    pub fn force_discard_random<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Moved {
        let mut next = self.clone();
        let mut cards = Vec::with_capacity(count.min(next.hand.len()));
        for _ in 0..count {
            if next.hand.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..next.hand.len());
            cards.push(next.hand.remove(idx));
        }
        next.discard_pile.extend(cards.iter().copied());
        Moved { piles: next, cards }
    }

    /// 手牌排序（穩定排序）
    ///
    /// - `Rank`: 點數遞增，再依罪類
    /// - `Category`: 罪類名稱字母序，再依點數
    pub fn sorted(&self, key: SortKey) -> Piles {
        let mut next = self.clone();
        match key {
            SortKey::Rank => next.hand.sort_by_key(|c| (c.rank, c.sin)),
            SortKey::Category => next.hand.sort_by_key(|c| (c.sin.name(), c.rank)),
        }
        next
    }

    /// 檢查四個牌堆的聯集是否恰好等於完整牌組（依 id，無重複、無遺漏）
    pub fn is_partition_of(&self, deck: &[Card]) -> bool {
        if self.total() != deck.len() {
            return false;
        }
        let mut seen = HashSet::with_capacity(deck.len());
        let all = self
            .draw_pile
            .iter()
            .chain(&self.hand)
            .chain(&self.active)
            .chain(&self.discard_pile);
        for card in all {
            if !seen.insert(card.id) {
                return false;
            }
        }
        deck.iter().all(|c| seen.contains(&c.id))
    }
}

// ============================================================================
// 單元測試
// ============================================================================
