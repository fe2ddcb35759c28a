//! 合法動作遮罩
//!
//! 回報目前哪些意圖會被接受，供呈現層決定按鈕是否可用。
//! 與 `SessionState::apply` 的驗證規則保持一致。

use super::state::SessionState;
use crate::game::{blood_cost_of, CardId, ContractId, Phase};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegalActions {
    pub draw: bool,
    /// 以目前選取出牌會被接受
    pub play_selected: bool,
    /// 以目前選取棄牌會被接受
    pub discard_selected: bool,
    pub toggle_select: bool,
    pub sort: bool,
    pub settle: bool,
    pub sign: Vec<ContractId>,
    pub skip_shop: bool,
}

impl LegalActions {
    pub fn any(&self) -> bool {
        self.draw
            || self.play_selected
            || self.discard_selected
            || self.toggle_select
            || self.sort
            || self.settle
            || !self.sign.is_empty()
            || self.skip_shop
    }
}

/// 從遊戲狀態構建合法動作
pub fn legal_actions(state: &SessionState) -> LegalActions {
    let phase = state.progress.phase;
    if phase.is_terminal() {
        return LegalActions::default();
    }

    let in_gameplay = phase == Phase::Gameplay;
    let in_shop = phase == Phase::ContractShop;

    let selected = state.selected_cards();
    let selection_ok = !selected.is_empty() && selected.len() <= state.config.max_active_cards;
    let blood_needed: u32 = selected
        .iter()
        .map(|c| blood_cost_of(c, &state.modifiers))
        .sum();

    LegalActions {
        draw: in_gameplay,
        play_selected: in_gameplay
            && selection_ok
            && state.resources.plays_remaining > 0
            && blood_needed <= state.resources.blood,
        discard_selected: in_gameplay && selection_ok && state.resources.discards_remaining > 0,
        toggle_select: in_gameplay,
        sort: true,
        settle: !state.piles.active.is_empty(),
        // 已簽署的契約不會出現在 offers 中
        sign: if in_shop { state.offers.clone() } else { Vec::new() },
        skip_shop: in_shop,
    }
}

/// 手牌中可單獨打出的牌（血量足夠）
pub fn affordable_cards(state: &SessionState) -> Vec<CardId> {
    state
        .piles
        .hand
        .iter()
        .filter(|c| blood_cost_of(c, &state.modifiers) <= state.resources.blood)
        .map(|c| c.id)
        .collect()
}

// ============================================================================
// 單元測試
// ============================================================================
