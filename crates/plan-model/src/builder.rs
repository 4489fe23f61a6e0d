//! 模型建構器

use good_lp::{variables, Constraint, Expression, ProblemVariables};
use plan_core::{PlanningData, RelaxationPolicy, Result};

use crate::constraints::ConstraintBuilder;
use crate::objective::ObjectiveBuilder;
use crate::{ModelVariables, PlanningMode};

/// 建構完成的數學規劃模型
///
/// 每次運行各自建構一份，沒有全域可變模型狀態；求解適配層
/// 取得所有權後提交給後端求解器。
pub struct BuiltModel {
    /// 變數容器
    pub variables: ProblemVariables,

    /// 最小化目標式
    pub objective: Expression,

    /// 全部約束（含穩健模式的 epigraph 上界）
    pub constraints: Vec<Constraint>,

    /// 語義變數註冊表（結果萃取用）
    pub vars: ModelVariables,

    /// 規劃模式
    pub mode: PlanningMode,
}

/// 模型建構器
///
/// 快照與規劃模式是唯一輸入；建構過程是純轉換，不讀取任何
/// 隱含環境配置。
pub struct ModelBuilder<'a> {
    data: &'a PlanningData,
    relaxation: RelaxationPolicy,
}

impl<'a> ModelBuilder<'a> {
    /// 創建新的模型建構器
    pub fn new(data: &'a PlanningData) -> Self {
        Self {
            data,
            relaxation: RelaxationPolicy::default(),
        }
    }

    /// 建構器模式：設置鬆弛政策
    pub fn with_relaxation(mut self, relaxation: RelaxationPolicy) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// 建構完整模型
    pub fn build(&self, mode: PlanningMode) -> Result<BuiltModel> {
        tracing::debug!(
            "建構模型：{} 工廠、{} 路線、{} 期間、{} 情境",
            self.data.plant_ids.len(),
            self.data.routes.len(),
            self.data.periods.len(),
            mode.scenarios().len()
        );

        // Step 1: 決策變數
        let mut problem = variables!();
        let vars =
            ModelVariables::register(&mut problem, self.data, &mode, self.relaxation.enabled);

        // Step 2: 約束
        let mut constraints = ConstraintBuilder::new(self.data, &mode, &vars).build();

        // Step 3: 目標函數（穩健模式附帶 epigraph 約束）
        let parts = ObjectiveBuilder::new(self.data, &vars, &self.relaxation).build(&mode)?;
        constraints.extend(parts.epigraph);

        tracing::debug!("模型建構完成：約束 {} 條", constraints.len());

        Ok(BuiltModel {
            variables: problem,
            objective: parts.objective,
            constraints,
            vars,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::{
        DemandRecord, DemandType, MasterData, OptimizationMode, Plant, PlantKind, Route,
        Scenario, UncertaintyConfig,
    };

    use crate::ScenarioGenerator;

    fn fixture_data() -> PlanningData {
        let master = MasterData {
            plants: vec![
                Plant::new("IU-01", "North Clinker", PlantKind::Clinker)
                    .with_production(100.0, 10.0)
                    .with_storage(500.0),
                Plant::new("GU-01", "East Grinding", PlantKind::Grinding).with_storage(300.0),
            ],
            routes: vec![Route::new("IU-01", "GU-01", "Road")
                .with_trip(20.0, 50.0)
                .with_sbq(10.0)],
            demands: vec![DemandRecord::new("GU-01", "2025-01", 80.0)],
            policies: vec![],
        };
        PlanningData::assemble(&["2025-01".to_string()], &master, DemandType::Fixed).unwrap()
    }

    #[test]
    fn test_build_deterministic_model() {
        let data = fixture_data();
        let mode = ScenarioGenerator::expand(
            OptimizationMode::Deterministic,
            &UncertaintyConfig::default(),
        )
        .unwrap();

        let model = ModelBuilder::new(&data).build(mode).unwrap();

        assert!(!model.constraints.is_empty());
        assert!(model.vars.worst_case_cost.is_none());
        assert!(model.vars.demand_slack.is_empty());
    }

    #[test]
    fn test_build_robust_appends_epigraph() {
        let data = fixture_data();
        let scenarios = vec![
            Scenario::new("Low", 0.5, 0.8),
            Scenario::new("High", 0.5, 1.2),
        ];
        let base = ModelBuilder::new(&data)
            .build(PlanningMode::Stochastic(scenarios.clone()))
            .unwrap();
        let robust = ModelBuilder::new(&data)
            .build(PlanningMode::Robust(scenarios))
            .unwrap();

        // 穩健模式多出每情境一條 epigraph 上界
        assert_eq!(robust.constraints.len(), base.constraints.len() + 2);
        assert!(robust.vars.worst_case_cost.is_some());
    }

    #[test]
    fn test_build_with_relaxation_registers_slack() {
        let data = fixture_data();
        let mode = ScenarioGenerator::expand(
            OptimizationMode::Deterministic,
            &UncertaintyConfig::default(),
        )
        .unwrap();

        let model = ModelBuilder::new(&data)
            .with_relaxation(RelaxationPolicy::enabled())
            .build(mode)
            .unwrap();

        // 2 工廠 × 1 期間
        assert_eq!(model.vars.demand_slack.len(), 2);
    }
}
