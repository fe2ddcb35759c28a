//! Service-layer integration tests (level + contract shop flows)

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use crate::game::{
        CardId, ContractId, DefeatCause, GameConfig, Phase, Progress, RunEnd, SortKey, CORRUPTION_CEILING,
    };
    use crate::service::{
        legal_actions, new_session, snapshot_json, Action, Event, Outcome, Rejection, SessionState, Transition,
    };

    fn session(seed: u64) -> SessionState {
        new_session(GameConfig::default(), seed).expect("default config is valid")
    }

    fn hand_ids(state: &SessionState) -> Vec<CardId> {
        state.piles.hand.iter().map(|c| c.id).collect()
    }

    /// 直接把金幣調到目標前一點，打一張牌進入契約商店
    fn reach_shop(mut state: SessionState) -> SessionState {
        state.resources.blood = state.resources.max_blood;
        state.resources.gold = state.gold_target().saturating_sub(1);
        let id = state.piles.hand[0].id;
        let step = state.apply(Action::PlaySelected { card_ids: vec![id] });
        assert_eq!(step.state.progress.phase, Phase::ContractShop, "{}", step.message());
        step.state
    }

    /// 手動擺好商店階段與提供的契約
    fn shop_with(mut state: SessionState, circle: u32, offers: Vec<ContractId>) -> SessionState {
        state.progress.circle = circle;
        state.progress.phase = Phase::ContractShop;
        state.offers = offers;
        state
    }

    #[test]
    fn test_full_level_discard_play_shop_skip() {
        let state = session(7);
        let config = state.config.clone();

        // 棄牌換血
        let ids = hand_ids(&state);
        let step = state.apply(Action::DiscardSelected { card_ids: ids[..5].to_vec() });
        assert!(step.outcome.is_applied());
        let state = step.state;
        assert_eq!(state.resources.blood, 10);
        assert_eq!(state.piles.hand.len(), 10);

        // 過關
        let state = reach_shop(state);
        assert_eq!(state.offers.len(), 3);
        assert_eq!(state.resources.plays_remaining, config.plays_per_level - 1);
        assert!(!state.piles.active.is_empty());

        // 跳過契約 -> 第 2 關，資源重置
        let step = state.apply(Action::SkipContractShop);
        assert_eq!(
            step.outcome,
            Outcome::Applied(Event::Skipped {
                transition: Transition::LevelAdvanced { circle: 1, level: 2 }
            })
        );
        let next = step.state;
        assert_eq!((next.progress.circle, next.progress.level), (1, 2));
        assert_eq!(next.progress.phase, Phase::Gameplay);
        assert_eq!(next.resources.gold, 0);
        assert_eq!(next.resources.blood, 0);
        assert_eq!(next.resources.plays_remaining, config.plays_per_level);
        assert_eq!(next.resources.discards_remaining, config.discards_per_level);
        assert!(next.piles.active.is_empty());
        assert!(next.offers.is_empty());
        assert_eq!(next.piles.hand.len(), next.hand_capacity());
        assert!(next.piles.is_partition_of(&next.deck));
    }

    #[test]
    fn test_third_level_advances_circle() {
        let mut state = session(8);
        state.progress = Progress {
            circle: 1,
            level: 3,
            phase: Phase::ContractShop,
            turn: 6,
        };
        let step = state.apply(Action::SkipContractShop);
        assert_eq!((step.state.progress.circle, step.state.progress.level), (2, 1));
        assert_eq!(step.state.gold_target(), 250);
        assert_eq!(step.state.corruption_threshold(), 40);
    }

    #[test]
    fn test_sign_contract_applies_once() {
        let state = reach_shop(session(9));
        let key = state.offers[0].key().to_string();

        let step = state.apply(Action::SignContract { key: key.clone() });
        assert!(step.outcome.is_applied(), "{}", step.message());
        let signed = step.state;
        assert_eq!(signed.signed.len(), 1);
        assert_eq!(signed.progress.level, 2);

        // 第二次簽同一個契約：不論階段都先回報已簽署
        let again = signed.apply(Action::SignContract { key: key.clone() });
        assert!(matches!(again.outcome, Outcome::Rejected(Rejection::AlreadySigned(_))));
        assert_eq!(again.state.modifiers, signed.modifiers);

        // 之後的商店不再提供已簽署的契約
        let shop = reach_shop(signed);
        assert!(shop.offers.iter().all(|id| id.key() != key));
        assert_eq!(shop.offers.len(), 2);
        let again = shop.apply(Action::SignContract { key });
        assert!(matches!(again.outcome, Outcome::Rejected(Rejection::AlreadySigned(_))));
        assert_eq!(again.state.modifiers, shop.modifiers);
        assert_eq!(again.state.resources, shop.resources);
        assert_eq!(again.state.signed.len(), 1);
    }

    #[test]
    fn test_sign_rejection_order() {
        let state = session(10);

        let step = state.apply(Action::SignContract { key: "free_lunch".into() });
        assert_eq!(step.outcome, Outcome::Rejected(Rejection::UnknownContract("free_lunch".into())));

        let step = state.apply(Action::SignContract { key: "devils_bargain".into() });
        assert_eq!(step.outcome, Outcome::Rejected(Rejection::WrongPhase("gameplay")));

        let shop = shop_with(state, 1, vec![ContractId::DevilsBargain]);
        let step = shop.apply(Action::SignContract { key: "blood_pact".into() });
        assert_eq!(step.outcome, Outcome::Rejected(Rejection::NotOffered("blood_pact")));
        assert_eq!(step.state.modifiers, shop.modifiers);
        assert_eq!(step.state.resources, shop.resources);
    }

    #[test]
    fn test_blood_pact_changes_later_plays() {
        let shop = shop_with(session(11), 1, vec![ContractId::BloodPact]);
        let state = shop.apply(Action::SignContract { key: "blood_pact".into() }).state;
        assert_eq!(state.modifiers.gold_multiplier, 1.5);
        assert_eq!(state.resources.max_blood, 12);

        let ids = hand_ids(&state);
        let state = state.apply(Action::DiscardSelected { card_ids: ids[..7].to_vec() }).state;
        assert_eq!(state.resources.blood, 12);

        let card = state.piles.hand[0];
        let step = state.apply(Action::PlaySelected { card_ids: vec![card.id] });
        let expected = (card.rank as f64 * 1.5).round() as u64;
        assert_eq!(step.state.resources.gold, expected);
    }

    #[test]
    fn test_infernal_capacity_grows_hand_and_corrupts() {
        let shop = shop_with(session(12), 2, vec![ContractId::InfernalCapacity]);
        let step = shop.apply(Action::SignContract { key: "infernal_capacity".into() });
        assert!(matches!(
            step.outcome,
            Outcome::Applied(Event::Signed { transition: Transition::LevelAdvanced { circle: 2, level: 2 }, .. })
        ));
        let state = step.state;
        assert_eq!(state.hand_capacity(), 15);
        assert_eq!(state.piles.hand.len(), 15);
        assert_eq!(state.resources.corruption, 10);

        // 下一關開始又 +10
        let mut state = state;
        state.progress.phase = Phase::ContractShop;
        let state = state.apply(Action::SkipContractShop).state;
        assert_eq!(state.resources.corruption, 20);
    }

    #[test]
    fn test_turn_effects_fire_after_play() {
        let mut state = session(13);
        state.resources.blood = 15;
        state.modifiers.soul_debt_per_turn = 5;
        state.modifiers.corruption_per_turn = 2;
        state.modifiers.discard_per_turn = 2;
        state.modifiers.extra_draw = 2;

        let id = state.piles.hand[0].id;
        let step = state.apply(Action::PlaySelected { card_ids: vec![id] });
        assert!(step.outcome.is_applied());
        let s = step.state;
        assert_eq!(s.progress.turn, 1);
        assert_eq!(s.resources.soul_debt, 5);
        assert_eq!(s.resources.corruption, 4);
        // 10 - 1 打出 - 2 強制棄牌 + 2 額外抽牌
        assert_eq!(s.piles.hand.len(), 9);
        assert_eq!(s.piles.discard_pile.len(), 2);
        assert_eq!(s.piles.active.len(), 1);
    }

    #[test]
    fn test_soul_debt_defeat_on_sign() {
        let mut state = session(14);
        state.resources.soul_debt = 85;
        let shop = shop_with(state, 4, vec![ContractId::BlasphemousPact]);
        let step = shop.apply(Action::SignContract { key: "blasphemous_pact".into() });
        assert_eq!(
            step.outcome,
            Outcome::Applied(Event::Signed {
                key: "blasphemous_pact",
                transition: Transition::Defeat(DefeatCause::SoulDebt),
            })
        );
        assert_eq!(step.state.progress.phase, Phase::End(RunEnd::Defeat(DefeatCause::SoulDebt)));
        assert_eq!(step.state.progress.level, 1);
    }

    #[test]
    fn test_corruption_threshold_is_terminal() {
        let mut state = session(15);
        state.resources.blood = 15;
        state.resources.corruption = state.corruption_threshold();
        state.resources.gold = 10_000;
        let id = state.piles.hand[0].id;
        let step = state.apply(Action::PlaySelected { card_ids: vec![id] });
        assert_eq!(step.state.progress.phase, Phase::End(RunEnd::Defeat(DefeatCause::Corruption)));
        assert!(step.state.resources.corruption <= CORRUPTION_CEILING);

        let over = step.state.apply(Action::SkipContractShop);
        assert_eq!(over.outcome, Outcome::Rejected(Rejection::RunOver));
        assert!(!legal_actions(&over.state).any());
    }

    #[test]
    fn test_victory_after_last_circle() {
        let mut state = session(16);
        state.progress = Progress {
            circle: 9,
            level: 3,
            phase: Phase::ContractShop,
            turn: 50,
        };
        let step = state.apply(Action::SkipContractShop);
        assert_eq!(step.outcome, Outcome::Applied(Event::Skipped { transition: Transition::Victory }));
        assert_eq!(step.state.progress.phase, Phase::End(RunEnd::Victory));
        assert_eq!(step.state.progress.circle, 9);
        assert_eq!(snapshot_json(&step.state)["progress"]["phase"], "victory");
    }

    #[test]
    fn test_draw_after_deck_runs_dry() {
        let mut state = session(17);
        // 把抽牌堆全部移到棄牌堆，抽牌時應重洗
        let moved: Vec<_> = state.piles.draw_pile.drain(..).collect();
        state.piles.discard_pile.extend(moved);
        let ids = hand_ids(&state);
        let state = state.apply(Action::DiscardSelected { card_ids: ids[..3].to_vec() }).state;
        assert_eq!(state.piles.hand.len(), 10);
        assert!(state.piles.discard_pile.is_empty());
        assert!(state.piles.is_partition_of(&state.deck));

        let step = state.apply(Action::SortHand { by: SortKey::Category });
        assert_eq!(step.message(), "Hand sorted by sin");
    }

    // ========================================================================
    // 隨機意圖序列
    // ========================================================================

    fn action_strategy() -> impl Strategy<Value = Action> {
        let contract_keys = prop::sample::select(vec![
            "devils_bargain",
            "blood_pact",
            "soul_mortgage",
            "unholy_investiture",
            "infernal_blessing",
            "infernal_capacity",
            "free_lunch",
        ]);
        prop_oneof![
            (0usize..12).prop_map(|count| Action::Draw { count }),
            prop::collection::vec(1u32..=91, 0..9).prop_map(|card_ids| Action::PlaySelected { card_ids }),
            prop::collection::vec(1u32..=91, 0..9).prop_map(|card_ids| Action::DiscardSelected { card_ids }),
            (1u32..=91).prop_map(|card_id| Action::ToggleSelect { card_id }),
            Just(Action::SortHand { by: SortKey::Rank }),
            Just(Action::SortHand { by: SortKey::Category }),
            contract_keys.prop_map(|key| Action::SignContract { key: key.to_string() }),
            Just(Action::SkipContractShop),
            Just(Action::SettleActive),
        ]
    }

    proptest! {
        #[test]
        fn prop_partition_closed_under_any_intents(
            seed in any::<u64>(),
            actions in prop::collection::vec(action_strategy(), 1..80),
        ) {
            let config = GameConfig {
                base_gold_target_table: vec![15, 30],
                ..GameConfig::default()
            };
            let mut state = new_session(config, seed).expect("valid config");

            for action in actions {
                let step = state.apply(action);
                let next = step.state;
                prop_assert!(next.piles.is_partition_of(&next.deck));
                prop_assert!(next.resources.blood <= next.resources.max_blood);
                prop_assert!(next.resources.corruption <= CORRUPTION_CEILING);
                prop_assert!(next.piles.hand.len() <= next.hand_capacity());
                prop_assert!(next.selected.len() <= next.config.max_active_cards);

                if let Outcome::Rejected(_) = step.outcome {
                    prop_assert_eq!(&next.piles, &state.piles);
                    prop_assert_eq!(next.resources, state.resources);
                    prop_assert_eq!(next.modifiers, state.modifiers);
                    prop_assert_eq!(next.progress, state.progress);
                    prop_assert_eq!(&next.signed, &state.signed);
                }
                let unique: HashSet<ContractId> = next.signed.iter().copied().collect();
                prop_assert_eq!(unique.len(), next.signed.len());
                state = next;
            }
        }
    }
}
