//! 玩家意圖與步驟結果
//!
//! `Action` 是呈現層送進來的意圖；`SessionState::apply` 回傳 `Step`，
//! 其中 `Outcome` 不是 `Applied(Event)` 就是 `Rejected(Rejection)`。
//! 兩者的 `Display` 即為給玩家看的狀態訊息。

use std::fmt;

use thiserror::Error;

use crate::game::{CardId, DefeatCause, PileError, SortKey};

use super::state::SessionState;

/// 玩家意圖
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Draw { count: usize },
    PlaySelected { card_ids: Vec<CardId> },
    DiscardSelected { card_ids: Vec<CardId> },
    ToggleSelect { card_id: CardId },
    SortHand { by: SortKey },
    SignContract { key: String },
    SkipContractShop,
    SettleActive,
}

/// 被拒絕的意圖（狀態完全不變）
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("The run is over")]
    RunOver,
    #[error("Not available during {0}")]
    WrongPhase(&'static str),
    #[error("Select cards first!")]
    EmptySelection,
    #[error("No plays remaining for this level")]
    NoPlaysRemaining,
    #[error("No discards remaining for this level")]
    NoDiscardsRemaining,
    #[error("Too many cards selected: {selected} (max {max})")]
    TooManyCards { selected: usize, max: usize },
    #[error("Not enough blood to play these cards: need {required}, have {available}")]
    InsufficientBlood { required: u32, available: u32 },
    #[error("Unknown contract: {0}")]
    UnknownContract(String),
    #[error("Contract already signed: {0}")]
    AlreadySigned(&'static str),
    #[error("Contract not offered: {0}")]
    NotOffered(&'static str),
    #[error("No active cards to settle")]
    NothingToSettle,
}

impl From<PileError> for Rejection {
    fn from(err: PileError) -> Self {
        match err {
            PileError::EmptySelection => Rejection::EmptySelection,
            PileError::InsufficientBlood { required, available } => {
                Rejection::InsufficientBlood { required, available }
            }
        }
    }
}

/// 階段轉換
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    EnteredShop { offers: usize },
    LevelAdvanced { circle: u32, level: u32 },
    Victory,
    Defeat(DefeatCause),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::EnteredShop { offers } => {
                write!(f, "Level complete! {} contracts await your signature", offers)
            }
            Transition::LevelAdvanced { circle, level } => {
                write!(f, "Entering circle {} level {}", circle, level)
            }
            Transition::Victory => write!(f, "You escaped the ninth circle!"),
            Transition::Defeat(cause) => write!(f, "Defeat: {}", cause.name()),
        }
    }
}

/// 已套用意圖的結果
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Drew {
        requested: usize,
        drawn: usize,
        reshuffled: bool,
    },
    Played {
        cards: usize,
        blood_spent: u32,
        gold: u64,
        corruption: u32,
        affinity: bool,
        transition: Option<Transition>,
    },
    Discarded {
        cards: usize,
        blood_gained: u32,
        drawn: usize,
    },
    SelectionChanged { selected: usize },
    Sorted(SortKey),
    Signed {
        key: &'static str,
        transition: Transition,
    },
    Skipped { transition: Transition },
    Settled { cards: usize },
}

impl Event {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            Event::Played { transition, .. } => *transition,
            Event::Signed { transition, .. } | Event::Skipped { transition } => Some(*transition),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Drew { requested, drawn, .. } if drawn < requested => {
                write!(f, "Drew {} of {} cards, the deck is exhausted", drawn, requested)
            }
            Event::Drew { drawn, .. } => write!(f, "Drew {} cards", drawn),
            Event::Played {
                cards,
                gold,
                corruption,
                affinity,
                transition,
                ..
            } => {
                write!(f, "Played {} cards. Earned {} gold. Corruption +{}%!", cards, gold, corruption)?;
                if *affinity {
                    write!(f, " Sin affinity doubled the gold.")?;
                }
                if let Some(t) = transition {
                    write!(f, " {}", t)?;
                }
                Ok(())
            }
            Event::Discarded { cards, blood_gained, .. } => {
                write!(f, "Discarded {} cards to gain {} blood", cards, blood_gained)
            }
            Event::SelectionChanged { selected } => write!(f, "{} cards selected", selected),
            Event::Sorted(SortKey::Rank) => write!(f, "Hand sorted by rank"),
            Event::Sorted(SortKey::Category) => write!(f, "Hand sorted by sin"),
            Event::Signed { key, transition } => write!(f, "Signed {}. {}", key, transition),
            Event::Skipped { transition } => write!(f, "Contracts declined. {}", transition),
            Event::Settled { cards } => write!(f, "{} cards moved to the discard pile", cards),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Applied(Event),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Applied(event) => event.to_string(),
            Outcome::Rejected(rejection) => rejection.to_string(),
        }
    }
}

/// 一次意圖處理的結果：新狀態加上結果
#[derive(Clone, Debug)]
pub struct Step {
    pub state: SessionState,
    pub outcome: Outcome,
}

impl Step {
    pub fn message(&self) -> String {
        self.outcome.message()
    }
}

// ============================================================================
// 單元測試
// ============================================================================
