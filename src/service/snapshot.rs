//! Snapshot 構建
//!
//! 把公開的遊戲狀態轉成 JSON 給呈現層：
//! - 手牌與出牌區（完整卡牌資料）
//! - 牌堆數量
//! - 資源與修正值
//! - 進度、金幣目標、腐化門檻
//! - 契約商店與已簽署契約
//!
//! 抽牌堆與棄牌堆的內容不公開，只給數量。

use serde_json::{json, Value};

use super::state::SessionState;
use crate::game::{blood_cost_of, circle_name, Card, ContractId, Modifiers, Phase, RunEnd};

/// 從遊戲狀態構建 snapshot
pub fn snapshot_json(state: &SessionState) -> Value {
    let r = &state.resources;
    let p = &state.progress;

    json!({
        // ====================================================================
        // 牌堆
        // ====================================================================
        "hand": state.piles.hand.iter().map(|c| card_json(c, &state.modifiers)).collect::<Vec<_>>(),
        "active": state.piles.active.iter().map(|c| card_json(c, &state.modifiers)).collect::<Vec<_>>(),
        "drawPileCount": state.piles.draw_pile.len(),
        "discardPileCount": state.piles.discard_pile.len(),
        "selected": state.selected,

        // ====================================================================
        // 資源
        // ====================================================================
        "resources": {
            "gold": r.gold,
            "blood": r.blood,
            "maxBlood": r.max_blood,
            "corruption": r.corruption,
            "soulDebt": r.soul_debt,
            "maxHandSize": state.hand_capacity(),
            "playsRemaining": r.plays_remaining,
            "discardsRemaining": r.discards_remaining,
        },
        "modifiers": modifiers_json(&state.modifiers),

        // ====================================================================
        // 進度
        // ====================================================================
        "progress": {
            "circle": p.circle,
            "circleName": circle_name(p.circle),
            "level": p.level,
            "turn": p.turn,
            "phase": p.phase.name(),
            "defeatCause": match p.phase {
                Phase::End(RunEnd::Defeat(cause)) => Value::from(cause.name()),
                _ => Value::Null,
            },
        },
        "goldTarget": state.gold_target(),
        "corruptionThreshold": state.corruption_threshold(),

        // ====================================================================
        // 契約
        // ====================================================================
        "offers": state.offers.iter().map(|&id| contract_json(id)).collect::<Vec<_>>(),
        "signed": state.signed.iter().map(|id| id.key()).collect::<Vec<_>>(),

        "message": state.message,
    })
}

fn card_json(card: &Card, modifiers: &Modifiers) -> Value {
    json!({
        "id": card.id,
        "sin": card.sin.name(),
        "sinId": card.sin.to_int(),
        "rank": card.rank,
        "bloodCost": blood_cost_of(card, modifiers),
        "goldValue": card.gold_value,
    })
}

fn modifiers_json(m: &Modifiers) -> Value {
    json!({
        "goldMultiplier": m.gold_multiplier,
        "bloodCostReduction": m.blood_cost_reduction,
        "bloodCostIncrease": m.blood_cost_increase,
        "extraDraw": m.extra_draw,
        "sameTypeBonus": m.same_type_bonus,
        "discardPerTurn": m.discard_per_turn,
        "goldTargetReduction": m.gold_target_reduction,
        "corruptionHealingDisabled": m.corruption_healing_disabled,
        "bloodPerDiscard": m.blood_per_discard,
        "handSizeBonus": m.hand_size_bonus,
        "playsPerLevelBonus": m.plays_per_level_bonus,
        "discardsPerLevelBonus": m.discards_per_level_bonus,
        "soulDebtPerTurn": m.soul_debt_per_turn,
        "corruptionPerTurn": m.corruption_per_turn,
        "levelStartCorruption": m.level_start_corruption,
    })
}

fn contract_json(id: ContractId) -> Value {
    let def = id.def();
    json!({
        "key": def.key,
        "name": def.name,
        "benefit": def.benefit,
        "consequence": def.consequence,
        "rarity": def.rarity.name(),
        "minCircle": def.min_circle,
    })
}

// ============================================================================
// 單元測試
// ============================================================================
