//! 遊戲設定
//!
//! 所有平衡參數集中在 `GameConfig`，可由 JSON 載入（缺少的欄位使用預設值）。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    BASE_GOLD_TARGETS, BLOOD_PER_DISCARD, CIRCLE_COUNT, CORRUPTION_PER_CARD, CORRUPTION_THRESHOLDS,
    COST_BASE, COST_DIVISOR, DISCARDS_PER_LEVEL, GOLD_TARGET_STEP, INITIAL_BLOOD, INITIAL_HAND_SIZE,
    LEVELS_PER_CIRCLE, MAX_ACTIVE_CARDS, MAX_BLOOD, MAX_CONTRACTS_AVAILABLE, PLAYS_PER_LEVEL,
    SOUL_DEBT_THRESHOLD, VALUE_RANGE,
};

/// 設定錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must not be empty")]
    EmptyTable { field: &'static str },
    #[error("goldTargetMultiplierStep must be finite and non-negative, got {0}")]
    InvalidStep(f64),
    #[error("initialBlood ({initial}) exceeds maxBlood ({max})")]
    BloodAboveMax { initial: u32, max: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    // 卡牌
    pub value_range: u8,
    pub cost_base: i32,
    pub cost_divisor: u8,
    pub max_active_cards: usize,

    // 資源
    pub initial_hand_size: usize,
    pub initial_blood: u32,
    pub max_blood: u32,
    pub plays_per_level: u32,
    pub discards_per_level: u32,
    pub blood_per_discard: u32,
    pub corruption_per_card: u32,

    // 進度
    pub max_contracts_available: usize,
    pub levels_per_circle: u32,
    pub circle_count: u32,
    pub base_gold_target_table: Vec<u64>,
    pub gold_target_multiplier_step: f64,
    pub corruption_threshold_table: Vec<u32>,
    pub soul_debt_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            value_range: VALUE_RANGE,
            cost_base: COST_BASE,
            cost_divisor: COST_DIVISOR,
            max_active_cards: MAX_ACTIVE_CARDS,
            initial_hand_size: INITIAL_HAND_SIZE,
            initial_blood: INITIAL_BLOOD,
            max_blood: MAX_BLOOD,
            plays_per_level: PLAYS_PER_LEVEL,
            discards_per_level: DISCARDS_PER_LEVEL,
            blood_per_discard: BLOOD_PER_DISCARD,
            corruption_per_card: CORRUPTION_PER_CARD,
            max_contracts_available: MAX_CONTRACTS_AVAILABLE,
            levels_per_circle: LEVELS_PER_CIRCLE,
            circle_count: CIRCLE_COUNT,
            base_gold_target_table: BASE_GOLD_TARGETS.to_vec(),
            gold_target_multiplier_step: GOLD_TARGET_STEP,
            corruption_threshold_table: CORRUPTION_THRESHOLDS.to_vec(),
            soul_debt_threshold: SOUL_DEBT_THRESHOLD,
        }
    }
}

impl GameConfig {
    /// 從 JSON 載入並驗證
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "rejected game config");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, bool); 6] = [
            ("valueRange", self.value_range > 0),
            ("costDivisor", self.cost_divisor > 0),
            ("maxActiveCards", self.max_active_cards > 0),
            ("levelsPerCircle", self.levels_per_circle > 0),
            ("circleCount", self.circle_count > 0),
            ("maxBlood", self.max_blood > 0),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, ok)| !*ok) {
            return Err(ConfigError::Zero { field });
        }
        if self.base_gold_target_table.is_empty() {
            return Err(ConfigError::EmptyTable { field: "baseGoldTargetTable" });
        }
        if self.corruption_threshold_table.is_empty() {
            return Err(ConfigError::EmptyTable { field: "corruptionThresholdTable" });
        }
        let step = self.gold_target_multiplier_step;
        if !step.is_finite() || step < 0.0 {
            return Err(ConfigError::InvalidStep(step));
        }
        if self.initial_blood > self.max_blood {
            return Err(ConfigError::BloodAboveMax {
                initial: self.initial_blood,
                max: self.max_blood,
            });
        }
        Ok(())
    }

    /// 基礎金幣目標（超出表格時使用最後一項）
    pub fn base_gold_target(&self, circle: u32) -> u64 {
        lookup_clamped(&self.base_gold_target_table, circle).unwrap_or(0)
    }

    /// 腐化失敗門檻（超出表格時使用最後一項）
    pub fn corruption_threshold(&self, circle: u32) -> u32 {
        lookup_clamped(&self.corruption_threshold_table, circle).unwrap_or(u32::MAX)
    }
}

/// 以 1 起算的層數查表，超出範圍取最後一項
fn lookup_clamped<T: Copy>(table: &[T], circle: u32) -> Option<T> {
    let idx = (circle.max(1) as usize - 1).min(table.len().checked_sub(1)?);
    table.get(idx).copied()
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.value_range, 13);
        assert_eq!(config.max_active_cards, 7);
        assert_eq!(config.initial_hand_size, 10);
        assert_eq!(config.plays_per_level, 3);
        assert_eq!(config.discards_per_level, 2);
        assert_eq!(config.base_gold_target_table.len(), 9);
    }

    #[test]
    fn test_table_lookup_clamps() {
        let config = GameConfig::default();
        assert_eq!(config.base_gold_target(1), 100);
        assert_eq!(config.base_gold_target(9), 1000);
        assert_eq!(config.base_gold_target(12), 1000);
        assert_eq!(config.corruption_threshold(1), 30);
        assert_eq!(config.corruption_threshold(20), 95);
        // circle 0 視為第 1 層
        assert_eq!(config.corruption_threshold(0), 30);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = GameConfig::from_json_str(
            r#"{ "playsPerLevel": 5, "baseGoldTargetTable": [10, 20] }"#,
        )
        .expect("valid config");
        assert_eq!(config.plays_per_level, 5);
        assert_eq!(config.base_gold_target_table, vec![10, 20]);
        assert_eq!(config.discards_per_level, 2);
        assert_eq!(config.base_gold_target(5), 20);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = GameConfig::from_json_str(r#"{ "costDivisor": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Zero { field: "costDivisor" }));

        let err = GameConfig::from_json_str(r#"{ "corruptionThresholdTable": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTable { .. }));

        let err = GameConfig::from_json_str(r#"{ "goldTargetMultiplierStep": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStep(_)));

        let err = GameConfig::from_json_str(r#"{ "initialBlood": 20, "maxBlood": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BloodAboveMax { initial: 20, max: 10 }));

        let err = GameConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
