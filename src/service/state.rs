//! 遊戲狀態管理
//!
//! `SessionState` 組合牌堆、資源、修正值與進度，`apply` 是唯一的狀態轉換入口。
//! 每個意圖先驗證，全部通過才一起提交；被拒絕時回傳原狀態的複本。

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::game::{
    apply_effects, blood_cost_of, blood_for_discard, build_deck, check_defeat, gold_target, score_play,
    select_for_shop, shuffle, total_blood_cost, Card, CardId, ConfigError, ContractId, GameConfig,
    Modifiers, Phase, Piles, Progress, Resources, RunEnd, SortKey,
};

use super::intent::{Action, Event, Outcome, Rejection, Step, Transition};

/// 遊戲 session 狀態
#[derive(Clone, Debug)]
pub struct SessionState {
    pub config: Arc<GameConfig>,
    pub rng: StdRng,

    // 牌組
    pub deck: Arc<[Card]>, // 完整牌組（原始順序），用於檢查牌堆分割
    pub piles: Piles,
    pub selected: Vec<CardId>,
    pub sort: Option<SortKey>, // 記住的排序方式，之後每次抽牌都會重新套用

    // 經濟
    pub resources: Resources,
    pub modifiers: Modifiers,

    // 遊戲進度
    pub progress: Progress,

    // 契約
    pub signed: Vec<ContractId>,
    pub offers: Vec<ContractId>,

    pub message: String,
}

/// 建立新的 session：產生牌組、洗牌、抽起始手牌
pub fn new_session(config: GameConfig, seed: u64) -> Result<SessionState, ConfigError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let deck = build_deck(&config);
    let piles = Piles::from_deck(shuffle(&deck, &mut rng));
    let resources = Resources::new(&config);
    let modifiers = Modifiers::neutral(config.blood_per_discard);

    let mut state = SessionState {
        config: Arc::new(config),
        rng,
        deck: deck.into(),
        piles,
        selected: Vec::new(),
        sort: None,
        resources,
        modifiers,
        progress: Progress::default(),
        signed: Vec::new(),
        offers: Vec::new(),
        message: String::from("Discard cards to gain blood, then play cards to earn gold."),
    };
    let hand_size = state.hand_capacity();
    state.draw_cards(hand_size);

    tracing::info!(
        seed,
        deck_size = state.deck.len(),
        hand_size = state.piles.hand.len(),
        "new session"
    );
    Ok(state)
}

impl SessionState {
    /// 處理一個意圖，回傳新狀態與結果
    pub fn apply(&self, action: Action) -> Step {
        let mut next = self.clone();
        match next.dispatch(action) {
            Ok(event) => {
                next.message = event.to_string();
                debug_assert!(
                    next.piles.is_partition_of(&next.deck),
                    "deck partition broken after {:?}",
                    event
                );
                Step {
                    state: next,
                    outcome: Outcome::Applied(event),
                }
            }
            Err(rejection) => Step {
                state: self.clone(),
                outcome: Outcome::Rejected(rejection),
            },
        }
    }

    fn dispatch(&mut self, action: Action) -> Result<Event, Rejection> {
        if self.progress.phase.is_terminal() {
            return Err(Rejection::RunOver);
        }
        match action {
            Action::Draw { count } => self.draw(count),
            Action::PlaySelected { card_ids } => self.play(&card_ids),
            Action::DiscardSelected { card_ids } => self.discard(&card_ids),
            Action::ToggleSelect { card_id } => self.toggle_select(card_id),
            Action::SortHand { by } => Ok(self.sort_hand(by)),
            Action::SignContract { key } => self.sign_contract(&key),
            Action::SkipContractShop => self.skip_contract_shop(),
            Action::SettleActive => self.settle_active(),
        }
    }

    // ========================================================================
    // 查詢
    // ========================================================================

    /// 含修正的手牌上限
    pub fn hand_capacity(&self) -> usize {
        self.resources.effective_hand_size(&self.modifiers)
    }

    /// 當前關卡金幣目標
    pub fn gold_target(&self) -> u64 {
        gold_target(self.progress.circle, &self.config, &self.modifiers)
    }

    /// 當前層的腐化失敗門檻
    pub fn corruption_threshold(&self) -> u32 {
        self.config.corruption_threshold(self.progress.circle)
    }

    pub fn is_over(&self) -> bool {
        self.progress.phase.is_terminal()
    }

    /// 選取的牌中實際在手牌裡的（手牌順序）
    pub fn selected_cards(&self) -> Vec<Card> {
        self.piles.resolve(&self.selected)
    }

    /// 選取牌的總血量成本
    pub fn selected_blood_cost(&self) -> u32 {
        total_blood_cost(&self.selected_cards(), &self.modifiers)
    }

    // ========================================================================
    // 意圖處理
    // ========================================================================

    fn require_phase(&self, phase: Phase) -> Result<(), Rejection> {
        if self.progress.phase == phase {
            Ok(())
        } else {
            Err(Rejection::WrongPhase(self.progress.phase.name()))
        }
    }

    /// 抽牌並重新套用排序；回傳 (截斷後請求數, 實際抽到, 是否重洗)
    fn draw_cards(&mut self, n: usize) -> (usize, usize, bool) {
        let capacity = self.hand_capacity();
        let result = self.piles.draw(n, capacity, &mut self.rng);
        self.piles = result.piles;
        if let Some(key) = self.sort {
            self.piles = self.piles.sorted(key);
        }
        (result.requested, result.drawn, result.reshuffled)
    }

    fn draw(&mut self, count: usize) -> Result<Event, Rejection> {
        self.require_phase(Phase::Gameplay)?;
        let (requested, drawn, reshuffled) = self.draw_cards(count);
        Ok(Event::Drew {
            requested,
            drawn,
            reshuffled,
        })
    }

    /// 驗證出牌/棄牌的選取張數
    fn check_selection(&self, card_ids: &[CardId]) -> Result<usize, Rejection> {
        let count = self.piles.resolve(card_ids).len();
        if count == 0 {
            return Err(Rejection::EmptySelection);
        }
        Ok(count)
    }

    fn check_selection_size(&self, count: usize) -> Result<(), Rejection> {
        let max = self.config.max_active_cards;
        if count > max {
            return Err(Rejection::TooManyCards { selected: count, max });
        }
        Ok(())
    }

    fn play(&mut self, card_ids: &[CardId]) -> Result<Event, Rejection> {
        self.require_phase(Phase::Gameplay)?;
        let count = self.check_selection(card_ids)?;
        if self.resources.plays_remaining == 0 {
            return Err(Rejection::NoPlaysRemaining);
        }
        self.check_selection_size(count)?;

        // 上一次出的牌先結算，再移動這次的牌
        let modifiers = self.modifiers;
        let moved = self
            .piles
            .clear_active()
            .play(card_ids, self.resources.blood, |c| blood_cost_of(c, &modifiers))?;

        let blood_spent = total_blood_cost(&moved.cards, &modifiers);
        let score = score_play(&moved.cards, &modifiers);
        let corruption_before = self.resources.corruption;
        self.piles = moved.piles;
        self.resources = self.resources.after_play(
            blood_spent,
            score.gold,
            moved.cards.len(),
            self.config.corruption_per_card,
        );
        self.selected.clear();
        let corruption = self.resources.corruption - corruption_before;

        self.progress.turn += 1;
        self.apply_turn_effects();

        Ok(Event::Played {
            cards: moved.cards.len(),
            blood_spent,
            gold: score.gold,
            corruption,
            affinity: score.affinity,
            transition: self.resolve_after_play(),
        })
    }

    /// 回合效果：靈魂債務、腐化、強制棄牌、額外抽牌
    fn apply_turn_effects(&mut self) {
        self.resources = self.resources.after_turn(&self.modifiers);
        if self.modifiers.discard_per_turn > 0 {
            let forced = self
                .piles
                .force_discard_random(self.modifiers.discard_per_turn, &mut self.rng);
            self.piles = forced.piles;
        }
        if self.modifiers.extra_draw > 0 {
            self.draw_cards(self.modifiers.extra_draw);
        }
    }

    /// 出牌後的進度判定：失敗優先於過關
    ///
    /// 出牌次數用完但未達標時停留在遊戲階段。
    fn resolve_after_play(&mut self) -> Option<Transition> {
        if let Some(transition) = self.check_defeat() {
            return Some(transition);
        }
        if self.resources.gold >= self.gold_target() {
            return Some(self.enter_contract_shop());
        }
        None
    }

    fn check_defeat(&mut self) -> Option<Transition> {
        let cause = check_defeat(self.progress.circle, &self.resources, &self.config)?;
        self.progress.phase = Phase::End(RunEnd::Defeat(cause));
        Some(Transition::Defeat(cause))
    }

    fn enter_contract_shop(&mut self) -> Transition {
        self.progress.phase = Phase::ContractShop;
        self.offers = select_for_shop(
            self.progress.circle,
            self.config.max_contracts_available,
            &self.signed,
            &mut self.rng,
        );
        Transition::EnteredShop {
            offers: self.offers.len(),
        }
    }

    fn discard(&mut self, card_ids: &[CardId]) -> Result<Event, Rejection> {
        self.require_phase(Phase::Gameplay)?;
        let count = self.check_selection(card_ids)?;
        if self.resources.discards_remaining == 0 {
            return Err(Rejection::NoDiscardsRemaining);
        }
        self.check_selection_size(count)?;

        let moved = self.piles.discard(card_ids)?;
        let blood_before = self.resources.blood;
        self.piles = moved.piles;
        self.resources = self
            .resources
            .after_discard(blood_for_discard(moved.cards.len(), &self.modifiers));
        self.selected.clear();

        // 棄掉幾張就補幾張
        let (_, drawn, _) = self.draw_cards(moved.cards.len());

        Ok(Event::Discarded {
            cards: moved.cards.len(),
            blood_gained: self.resources.blood - blood_before,
            drawn,
        })
    }

    fn toggle_select(&mut self, card_id: CardId) -> Result<Event, Rejection> {
        self.require_phase(Phase::Gameplay)?;
        let in_hand = self.piles.hand.iter().any(|c| c.id == card_id);
        if in_hand {
            if let Some(pos) = self.selected.iter().position(|&id| id == card_id) {
                self.selected.remove(pos);
            } else if self.selected.len() < self.config.max_active_cards {
                self.selected.push(card_id);
            }
        }
        Ok(Event::SelectionChanged {
            selected: self.selected.len(),
        })
    }

    fn sort_hand(&mut self, by: SortKey) -> Event {
        self.sort = Some(by);
        self.piles = self.piles.sorted(by);
        Event::Sorted(by)
    }

    fn sign_contract(&mut self, key: &str) -> Result<Event, Rejection> {
        let id = ContractId::from_key(key).ok_or_else(|| Rejection::UnknownContract(key.to_string()))?;
        if self.signed.contains(&id) {
            return Err(Rejection::AlreadySigned(id.key()));
        }
        self.require_phase(Phase::ContractShop)?;
        if !self.offers.contains(&id) {
            return Err(Rejection::NotOffered(id.key()));
        }

        let (resources, modifiers) = apply_effects(id.effects(), self.resources, self.modifiers);
        self.resources = resources;
        self.modifiers = modifiers;
        self.signed.push(id);

        let transition = match self.check_defeat() {
            Some(defeat) => defeat,
            None => self.advance_level(),
        };
        Ok(Event::Signed {
            key: id.key(),
            transition,
        })
    }

    fn skip_contract_shop(&mut self) -> Result<Event, Rejection> {
        self.require_phase(Phase::ContractShop)?;
        Ok(Event::Skipped {
            transition: self.advance_level(),
        })
    }

    /// 進入下一關（或勝利）
    ///
    /// 結算出牌區、重置每關資源、套用開局腐化、補滿手牌。
    fn advance_level(&mut self) -> Transition {
        self.offers.clear();
        self.selected.clear();
        self.piles = self.piles.clear_active();
        self.progress = self.progress.advanced(&self.config);
        if self.progress.phase == Phase::End(RunEnd::Victory) {
            return Transition::Victory;
        }

        self.resources = self.resources.for_new_level(&self.config, &self.modifiers);
        let missing = self.hand_capacity().saturating_sub(self.piles.hand.len());
        self.draw_cards(missing);

        self.check_defeat().unwrap_or(Transition::LevelAdvanced {
            circle: self.progress.circle,
            level: self.progress.level,
        })
    }

    fn settle_active(&mut self) -> Result<Event, Rejection> {
        let cards = self.piles.active.len();
        if cards == 0 {
            return Err(Rejection::NothingToSettle);
        }
        self.piles = self.piles.clear_active();
        Ok(Event::Settled { cards })
    }
}

// ============================================================================
// 單元測試
// ============================================================================
