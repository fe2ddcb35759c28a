//! 批次模擬
//!
//! 以簡單的貪婪策略跑多個 seed，用 rayon 平行執行。
//! 用於平衡性檢查，也作為整體不變量的壓力測試。

use rayon::prelude::*;

use super::intent::Action;
use super::state::{new_session, SessionState};
use crate::game::{blood_cost_of, CardId, ConfigError, DefeatCause, GameConfig, Phase, RunEnd};

/// 單局結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub seed: u64,
    pub phase: Phase,
    pub circle: u32,
    pub level: u32,
    pub turns: u32,
    pub steps: usize,
    pub contracts_signed: usize,
    /// 每一步之後牌堆分割都正確
    pub partition_ok: bool,
}

/// 批次統計
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimStats {
    pub runs: usize,
    pub victories: usize,
    pub corruption_defeats: usize,
    pub soul_debt_defeats: usize,
    pub unfinished: usize,
    pub deepest_circle: u32,
    pub mean_turns: f64,
}

/// 平行模擬多個 seed
pub fn simulate_runs(config: &GameConfig, seeds: &[u64], max_steps: usize) -> Result<Vec<RunSummary>, ConfigError> {
    config.validate()?;
    let summaries = seeds
        .par_iter()
        .map(|&seed| run_greedy(config.clone(), seed, max_steps))
        .collect::<Result<Vec<_>, _>>()?;

    let stats = summarize(&summaries);
    tracing::info!(
        runs = stats.runs,
        victories = stats.victories,
        unfinished = stats.unfinished,
        deepest_circle = stats.deepest_circle,
        "simulation batch finished"
    );
    Ok(summaries)
}

/// 以貪婪策略跑一局
pub fn run_greedy(config: GameConfig, seed: u64, max_steps: usize) -> Result<RunSummary, ConfigError> {
    let mut state = new_session(config, seed)?;
    let mut steps = 0;
    let mut partition_ok = true;

    while steps < max_steps && !state.is_over() {
        let Some(action) = choose_action(&state) else {
            break;
        };
        let step = state.apply(action);
        if !step.outcome.is_applied() {
            // 策略只選合法動作，被拒絕代表卡住
            tracing::debug!(seed, reason = %step.message(), "greedy policy stalled");
            break;
        }
        state = step.state;
        partition_ok &= state.piles.is_partition_of(&state.deck);
        steps += 1;
    }

    let summary = RunSummary {
        seed,
        phase: state.progress.phase,
        circle: state.progress.circle,
        level: state.progress.level,
        turns: state.progress.turn,
        steps,
        contracts_signed: state.signed.len(),
        partition_ok,
    };
    tracing::debug!(
        seed,
        phase = summary.phase.name(),
        circle = summary.circle,
        level = summary.level,
        turns = summary.turns,
        "run finished"
    );
    Ok(summary)
}

/// 貪婪策略
///
/// 商店：簽第一個提供的契約。遊戲中：手牌不滿先補牌；
/// 血量不足一半且還有棄牌次數時棄掉最小的牌；否則打出買得起的最大牌。
fn choose_action(state: &SessionState) -> Option<Action> {
    match state.progress.phase {
        Phase::End(_) => None,
        Phase::ContractShop => Some(match state.offers.first() {
            Some(id) => Action::SignContract { key: id.key().to_string() },
            None => Action::SkipContractShop,
        }),
        Phase::Gameplay => choose_gameplay_action(state),
    }
}

fn choose_gameplay_action(state: &SessionState) -> Option<Action> {
    let piles = &state.piles;
    let can_draw = !piles.draw_pile.is_empty() || !piles.discard_pile.is_empty();
    if piles.hand.len() < state.hand_capacity() && can_draw {
        return Some(Action::Draw {
            count: state.hand_capacity() - piles.hand.len(),
        });
    }

    let max_active = state.config.max_active_cards;
    let r = &state.resources;
    let low_blood = r.blood * 2 < r.max_blood;

    if r.discards_remaining > 0 && (low_blood || affordable_play(state).is_empty()) {
        let mut by_rank = piles.hand.clone();
        by_rank.sort_by_key(|c| c.rank);
        let card_ids: Vec<CardId> = by_rank.iter().take(max_active).map(|c| c.id).collect();
        if !card_ids.is_empty() {
            return Some(Action::DiscardSelected { card_ids });
        }
    }

    let card_ids = affordable_play(state);
    if !card_ids.is_empty() && r.plays_remaining > 0 {
        return Some(Action::PlaySelected { card_ids });
    }
    None
}

/// 從高點數開始挑選買得起的牌
fn affordable_play(state: &SessionState) -> Vec<CardId> {
    let mut by_value = state.piles.hand.clone();
    by_value.sort_by(|a, b| b.gold_value.cmp(&a.gold_value));

    let mut budget = state.resources.blood;
    let mut picked = Vec::new();
    for card in by_value {
        if picked.len() == state.config.max_active_cards {
            break;
        }
        let cost = blood_cost_of(&card, &state.modifiers);
        if cost <= budget {
            budget -= cost;
            picked.push(card.id);
        }
    }
    picked
}

/// 彙整批次結果
pub fn summarize(runs: &[RunSummary]) -> SimStats {
    let mut stats = SimStats {
        runs: runs.len(),
        ..SimStats::default()
    };
    let mut total_turns = 0u64;
    for run in runs {
        match run.phase {
            Phase::End(RunEnd::Victory) => stats.victories += 1,
            Phase::End(RunEnd::Defeat(DefeatCause::Corruption)) => stats.corruption_defeats += 1,
            Phase::End(RunEnd::Defeat(DefeatCause::SoulDebt)) => stats.soul_debt_defeats += 1,
            Phase::Gameplay | Phase::ContractShop => stats.unfinished += 1,
        }
        stats.deepest_circle = stats.deepest_circle.max(run.circle);
        total_turns += run.turns as u64;
    }
    if !runs.is_empty() {
        stats.mean_turns = total_turns as f64 / runs.len() as f64;
    }
    stats
}

// ============================================================================
// 單元測試
// ============================================================================
