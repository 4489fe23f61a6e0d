//! 需求情境模型

use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 情境機率總和的容許誤差
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// 需求情境：以乘數縮放基準需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 情境名稱
    pub name: String,

    /// 發生機率（0..=1，一次運行的所有情境機率總和必須為 1）
    pub probability: f64,

    /// 需求乘數（≥ 0，套用到每筆基準需求）
    pub demand_multiplier: f64,
}

impl Scenario {
    /// 創建新的情境
    pub fn new(name: impl Into<String>, probability: f64, demand_multiplier: f64) -> Self {
        Self {
            name: name.into(),
            probability,
            demand_multiplier,
        }
    }

    /// 隱含的基準情境（機率 1、乘數 1）
    pub fn base() -> Self {
        Self::new("Base", 1.0, 1.0)
    }
}

/// 需求不確定性配置
///
/// 由外部設定層提供；未啟用時優化只使用隱含的基準情境。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncertaintyConfig {
    /// 是否啟用情境化需求
    pub enabled: bool,

    /// 情境清單（順序即迭代順序，僅影響重現性不影響語義）
    pub scenarios: Vec<Scenario>,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scenarios: vec![
                Scenario::new("Low", 0.2, 0.9),
                Scenario::new("Normal", 0.6, 1.0),
                Scenario::new("High", 0.2, 1.1),
            ],
        }
    }
}

impl UncertaintyConfig {
    /// 由 JSON 文字解析配置
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| PlanError::Configuration(format!("不確定性配置解析失敗: {e}")))
    }

    /// 驗證情境清單
    ///
    /// 規則：至少一個情境、名稱非空且唯一、機率非負且總和為
    /// 1 ± [`PROBABILITY_TOLERANCE`]、乘數非負。
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(PlanError::Configuration(
                "至少需要一個情境".to_string(),
            ));
        }

        let mut names: Vec<&str> = Vec::new();
        let mut total_probability = 0.0;

        for scenario in &self.scenarios {
            let name = scenario.name.trim();
            if name.is_empty() {
                return Err(PlanError::Configuration("情境名稱不可為空".to_string()));
            }
            if names.contains(&name) {
                return Err(PlanError::Configuration(format!(
                    "情境名稱重複: {name}"
                )));
            }
            names.push(name);

            if scenario.probability < 0.0 {
                return Err(PlanError::Configuration(format!(
                    "情境 {name} 的機率不可為負"
                )));
            }
            total_probability += scenario.probability;

            if scenario.demand_multiplier < 0.0 {
                return Err(PlanError::Configuration(format!(
                    "情境 {name} 的需求乘數不可為負"
                )));
            }
        }

        if (total_probability - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(PlanError::Configuration(format!(
                "情境機率總和必須為 1（目前為 {total_probability}）"
            )));
        }

        Ok(())
    }
}
