//! 情境展開
//!
//! 把不確定性配置展開為有限的加權情境集合。生產/運輸是
//! 「當下決策」（情境共享），庫存是「追索決策」（按情境），
//! 這個劃分在 [`PlanningMode`] 的變體裡定型。

use plan_core::{OptimizationMode, Result, Scenario, UncertaintyConfig};

/// 規劃模式（帶情境集合的標記變體）
///
/// 目標函數的建構對這個列舉做窮盡比對，新增模式時編譯器會
/// 強制補齊所有分支。
#[derive(Debug, Clone)]
pub enum PlanningMode {
    /// 確定性：永遠收斂為單一基準情境
    Deterministic(Scenario),
    /// 隨機：最小化期望成本
    Stochastic(Vec<Scenario>),
    /// 穩健：最小化最壞情境成本（epigraph 重構）
    Robust(Vec<Scenario>),
}

impl PlanningMode {
    /// 所有情境（依配置順序）
    pub fn scenarios(&self) -> &[Scenario] {
        match self {
            PlanningMode::Deterministic(s) => std::slice::from_ref(s),
            PlanningMode::Stochastic(list) | PlanningMode::Robust(list) => list,
        }
    }

    /// 庫存是否按情境索引（報表需要情境標籤）
    pub fn is_scenario_indexed(&self) -> bool {
        !matches!(self, PlanningMode::Deterministic(_))
    }

    /// 對應的優化模式
    pub fn mode(&self) -> OptimizationMode {
        match self {
            PlanningMode::Deterministic(_) => OptimizationMode::Deterministic,
            PlanningMode::Stochastic(_) => OptimizationMode::Stochastic,
            PlanningMode::Robust(_) => OptimizationMode::Robust,
        }
    }
}

/// 情境產生器
pub struct ScenarioGenerator;

impl ScenarioGenerator {
    /// 將不確定性配置展開為規劃模式
    ///
    /// 確定性模式無論配置為何都收斂為單一基準情境；隨機/穩健
    /// 模式在配置未啟用時同樣退回基準情境。
    pub fn expand(mode: OptimizationMode, config: &UncertaintyConfig) -> Result<PlanningMode> {
        match mode {
            OptimizationMode::Deterministic => {
                Ok(PlanningMode::Deterministic(Scenario::base()))
            }
            OptimizationMode::Stochastic => {
                Ok(PlanningMode::Stochastic(Self::active_scenarios(config)?))
            }
            OptimizationMode::Robust => {
                Ok(PlanningMode::Robust(Self::active_scenarios(config)?))
            }
        }
    }

    fn active_scenarios(config: &UncertaintyConfig) -> Result<Vec<Scenario>> {
        if !config.enabled {
            return Ok(vec![Scenario::base()]);
        }
        config.validate()?;
        Ok(config.scenarios.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::PlanError;

    fn low_high_config() -> UncertaintyConfig {
        UncertaintyConfig {
            enabled: true,
            scenarios: vec![
                Scenario::new("Low", 0.5, 0.8),
                Scenario::new("High", 0.5, 1.2),
            ],
        }
    }

    #[test]
    fn test_deterministic_always_collapses() {
        let mode =
            ScenarioGenerator::expand(OptimizationMode::Deterministic, &low_high_config())
                .unwrap();

        assert!(!mode.is_scenario_indexed());
        assert_eq!(mode.scenarios().len(), 1);
        assert_eq!(mode.scenarios()[0].name, "Base");
        assert_eq!(mode.scenarios()[0].demand_multiplier, 1.0);
    }

    #[test]
    fn test_stochastic_keeps_configured_order() {
        let mode =
            ScenarioGenerator::expand(OptimizationMode::Stochastic, &low_high_config()).unwrap();

        assert!(mode.is_scenario_indexed());
        let names: Vec<&str> = mode.scenarios().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Low", "High"]);
    }

    #[test]
    fn test_disabled_config_falls_back_to_base() {
        let config = UncertaintyConfig {
            enabled: false,
            ..low_high_config()
        };
        let mode = ScenarioGenerator::expand(OptimizationMode::Robust, &config).unwrap();

        assert_eq!(mode.scenarios().len(), 1);
        assert_eq!(mode.scenarios()[0].name, "Base");
        assert_eq!(mode.mode(), OptimizationMode::Robust);
    }

    #[test]
    fn test_invalid_probabilities_rejected() {
        let config = UncertaintyConfig {
            enabled: true,
            scenarios: vec![Scenario::new("Low", 0.4, 0.9)],
        };
        let err =
            ScenarioGenerator::expand(OptimizationMode::Stochastic, &config).unwrap_err();
        assert!(matches!(err, PlanError::Configuration(_)));
    }
}
