//! 契約系統
//!
//! 契約是一次性、不可撤銷的交易：一個好處加一個代價。
//! 簽署後效果併入 `Modifiers`，並從之後的商店候選中移除。
//!
//! # 架構
//!
//! 使用聲明式 `CONTRACT_DEFS` 表定義所有契約的元數據與效果，
//! 效果本身由 `modifiers::Effect` 描述，套用邏輯只有一份。

use rand::Rng;

use super::cards::shuffle;
use super::modifiers::Effect;

/// 契約數量
pub const CONTRACT_COUNT: usize = 11;

/// 稀有度
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

// ============================================================================
// 契約定義系統
// ============================================================================

/// 契約定義結構
#[derive(Clone, Copy, Debug)]
pub struct ContractDef {
    pub id: ContractId,
    /// 唯一識別字串（小寫底線）
    pub key: &'static str,
    /// 顯示名稱
    pub name: &'static str,
    pub benefit: &'static str,
    pub consequence: &'static str,
    pub rarity: Rarity,
    /// 最低出現層數
    pub min_circle: u32,
    /// 簽署時依序套用的效果
    pub effects: &'static [Effect],
}

/// 契約定義表（順序與 `ContractId::to_int()` 一致）
pub static CONTRACT_DEFS: [ContractDef; CONTRACT_COUNT] = [
    // 0
    ContractDef {
        id: ContractId::DevilsBargain,
        key: "devils_bargain",
        name: "Devil's Bargain",
        benefit: "Gain +20 gold instantly",
        consequence: "Corruption +10%",
        rarity: Rarity::Common,
        min_circle: 1,
        effects: &[Effect::Gold(20), Effect::Corruption(10)],
    },
    // 1
    ContractDef {
        id: ContractId::BloodPact,
        key: "blood_pact",
        name: "Blood Pact",
        benefit: "Cards generate +50% gold",
        consequence: "Maximum blood -3",
        rarity: Rarity::Common,
        min_circle: 1,
        effects: &[Effect::SetGoldMultiplier(1.5), Effect::MaxBlood(-3)],
    },
    // 2
    ContractDef {
        id: ContractId::SoulMortgage,
        key: "soul_mortgage",
        name: "Soul Mortgage",
        benefit: "All blood costs -1",
        consequence: "Soul Debt +5 per turn",
        rarity: Rarity::Common,
        min_circle: 1,
        effects: &[Effect::BloodCostReduction(1), Effect::SoulDebtPerTurn(5)],
    },
    // 3
    ContractDef {
        id: ContractId::UnholyInvestiture,
        key: "unholy_investiture",
        name: "Unholy Investiture",
        benefit: "Draw +2 cards each turn",
        consequence: "Corruption +2% per turn",
        rarity: Rarity::Uncommon,
        min_circle: 2,
        effects: &[Effect::ExtraDraw(2), Effect::CorruptionPerTurn(2)],
    },
    // 4
    ContractDef {
        id: ContractId::InfernalBlessing,
        key: "infernal_blessing",
        name: "Infernal Blessing",
        benefit: "Gain +3 blood per discard",
        consequence: "Gold generation -25%",
        rarity: Rarity::Uncommon,
        min_circle: 2,
        effects: &[
            Effect::BloodPerDiscard(3),
            Effect::ScaleGoldMultiplier { factor: 0.75, floor: 0.5 },
        ],
    },
    // 5
    ContractDef {
        id: ContractId::VileRevelation,
        key: "vile_revelation",
        name: "Vile Revelation",
        benefit: "See 3 additional cards in hand",
        consequence: "Cards cost +1 blood",
        rarity: Rarity::Uncommon,
        min_circle: 3,
        effects: &[Effect::ExtraDraw(3), Effect::BloodCostIncrease(1)],
    },
    // 6
    ContractDef {
        id: ContractId::BlasphemousPact,
        key: "blasphemous_pact",
        name: "Blasphemous Pact",
        benefit: "Corruption reduced by 15%",
        consequence: "Soul Debt +20 immediately",
        rarity: Rarity::Rare,
        min_circle: 4,
        effects: &[Effect::Corruption(-15), Effect::SoulDebt(20)],
    },
    // 7
    ContractDef {
        id: ContractId::DiabolicInsight,
        key: "diabolic_insight",
        name: "Diabolic Insight",
        benefit: "Cards of the same sin type give +3 gold bonus",
        consequence: "Discard 2 random cards each turn",
        rarity: Rarity::Rare,
        min_circle: 5,
        effects: &[Effect::SameTypeBonus(3), Effect::DiscardPerTurn(2)],
    },
    // 8
    ContractDef {
        id: ContractId::EternalServitude,
        key: "eternal_servitude",
        name: "Eternal Servitude",
        benefit: "Gold target -25% for each level",
        consequence: "Cannot heal corruption",
        rarity: Rarity::Legendary,
        min_circle: 7,
        effects: &[Effect::GoldTargetReduction(0.25), Effect::DisableCorruptionHealing],
    },
    // 9
    ContractDef {
        id: ContractId::InfernalCapacity,
        key: "infernal_capacity",
        name: "Infernal Capacity",
        benefit: "Increase maximum hand size by 5 cards",
        consequence: "Start each level with +10% corruption",
        rarity: Rarity::Uncommon,
        min_circle: 2,
        effects: &[Effect::HandSizeBonus(5), Effect::LevelStartCorruption(10)],
    },
    // 10
    ContractDef {
        id: ContractId::StrategicAdvantage,
        key: "strategic_advantage",
        name: "Strategic Advantage",
        benefit: "Get +2 plays and +2 discards per level",
        consequence: "Decrease maximum blood by 5",
        rarity: Rarity::Rare,
        min_circle: 3,
        effects: &[
            Effect::PlaysPerLevelBonus(2),
            Effect::DiscardsPerLevelBonus(2),
            Effect::MaxBlood(-5),
        ],
    },
];

/// 契約 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractId {
    DevilsBargain,
    BloodPact,
    SoulMortgage,
    UnholyInvestiture,
    InfernalBlessing,
    VileRevelation,
    BlasphemousPact,
    DiabolicInsight,
    EternalServitude,
    InfernalCapacity,
    StrategicAdvantage,
}

impl ContractId {
    /// 所有契約（目錄順序）
    pub fn all() -> impl Iterator<Item = ContractId> {
        CONTRACT_DEFS.iter().map(|def| def.id)
    }

    pub fn to_int(&self) -> usize {
        *self as usize
    }

    pub fn def(&self) -> &'static ContractDef {
        &CONTRACT_DEFS[self.to_int()]
    }

    pub fn key(&self) -> &'static str {
        self.def().key
    }

    pub fn effects(&self) -> &'static [Effect] {
        self.def().effects
    }

    /// 從 key 查詢；未知 key 回傳 None
    pub fn from_key(key: &str) -> Option<ContractId> {
        CONTRACT_DEFS.iter().find(|def| def.key == key).map(|def| def.id)
    }
}

/// 在指定層數可出現的契約（目錄順序）
pub fn eligible_keys(circle: u32) -> Vec<ContractId> {
    CONTRACT_DEFS
        .iter()
        .filter(|def| def.min_circle <= circle)
        .map(|def| def.id)
        .collect()
}

/// 為契約商店抽選契約
///
/// 從 `eligible_keys(circle) - exclude` 中隨機排列後取前 `count` 個。
/// 數量不足時回傳較少，不視為錯誤。
pub fn select_for_shop<R: Rng + ?Sized>(
    circle: u32,
    count: usize,
    exclude: &[ContractId],
    rng: &mut R,
) -> Vec<ContractId> {
    let pool: Vec<ContractId> = eligible_keys(circle)
        .into_iter()
        .filter(|id| !exclude.contains(id))
        .collect();
    let mut offers = shuffle(&pool, rng);
    offers.truncate(count);
    offers
}

// ============================================================================
// 單元測試
// ============================================================================
