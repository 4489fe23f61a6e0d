//! 目標函數建構
//!
//! 成本項：生產 + 運輸（按趟次計費）+ 庫存持有（+ 鬆弛罰金）。
//! 三種模式共用前兩項（當下決策只付一次），持有成本的聚合方式
//! 隨模式改變：單一情境 / 機率加權 / epigraph 最壞情境上界。

use good_lp::{constraint, Constraint, Expression};
use plan_core::{PlanError, PlanningData, RelaxationPolicy, Result};

use crate::{ModelVariables, PlanningMode};

/// 目標建構結果
pub struct ObjectiveParts {
    /// 最小化的目標式
    pub objective: Expression,

    /// 穩健模式的 epigraph 上界約束（其他模式為空）
    pub epigraph: Vec<Constraint>,
}

/// 目標函數建構器
pub struct ObjectiveBuilder<'a> {
    data: &'a PlanningData,
    vars: &'a ModelVariables,
    relaxation: &'a RelaxationPolicy,
}

impl<'a> ObjectiveBuilder<'a> {
    /// 創建新的目標函數建構器
    pub fn new(
        data: &'a PlanningData,
        vars: &'a ModelVariables,
        relaxation: &'a RelaxationPolicy,
    ) -> Self {
        Self {
            data,
            vars,
            relaxation,
        }
    }

    /// 依規劃模式建構目標
    pub fn build(&self, mode: &PlanningMode) -> Result<ObjectiveParts> {
        let shared = self.shared_cost();
        let penalty = self.penalty_cost();

        match mode {
            PlanningMode::Deterministic(scenario) => Ok(ObjectiveParts {
                objective: shared + self.holding_cost(&scenario.name, 1.0) + penalty,
                epigraph: Vec::new(),
            }),
            PlanningMode::Stochastic(scenarios) => {
                let mut objective = shared + penalty;
                for scenario in scenarios {
                    objective += self.holding_cost(&scenario.name, scenario.probability);
                }
                Ok(ObjectiveParts {
                    objective,
                    epigraph: Vec::new(),
                })
            }
            PlanningMode::Robust(scenarios) => {
                let worst = self.vars.worst_case_cost.ok_or_else(|| {
                    PlanError::Other("穩健模式缺少最壞成本變數".to_string())
                })?;

                // min max_s f_s(x) 的 epigraph 重構：
                // min w s.t. w >= f_s(x) ∀s
                let mut epigraph = Vec::new();
                for scenario in scenarios {
                    let scenario_cost = shared.clone()
                        + self.holding_cost(&scenario.name, 1.0)
                        + penalty.clone();
                    epigraph.push(constraint!(worst >= scenario_cost));
                }

                Ok(ObjectiveParts {
                    objective: worst.into(),
                    epigraph,
                })
            }
        }
    }

    /// 情境共享的成本：生產 + 運輸
    fn shared_cost(&self) -> Expression {
        let mut cost = Expression::from(0.0);

        for plant_id in &self.data.clinker_plants {
            let unit_cost = self.data.production_cost[plant_id];
            for period in &self.data.periods {
                cost += unit_cost * self.vars.production(plant_id, &period.label);
            }
        }

        for route in &self.data.routes {
            let trip_cost = self.data.cost_per_trip[route];
            for period in &self.data.periods {
                cost += trip_cost * self.vars.trips(route, &period.label);
            }
        }

        cost
    }

    /// 某情境的持有成本，權重直接折入係數
    fn holding_cost(&self, scenario_name: &str, weight: f64) -> Expression {
        let mut cost = Expression::from(0.0);
        for plant_id in &self.data.plant_ids {
            let unit_cost = weight * self.data.holding_cost[plant_id];
            for period in &self.data.periods {
                cost += unit_cost * self.vars.inventory(plant_id, &period.label, scenario_name);
            }
        }
        cost
    }

    /// 未滿足需求罰金（未啟用鬆弛時為零式）
    fn penalty_cost(&self) -> Expression {
        let mut cost = Expression::from(0.0);
        for slack in self.vars.demand_slack.values() {
            cost += self.relaxation.penalty_per_unit * *slack;
        }
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use good_lp::variables;
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
    fn test_deterministic_objective_has_no_epigraph() {
        let data = fixture_data();
        let mode = ScenarioGenerator::expand(
            OptimizationMode::Deterministic,
            &UncertaintyConfig::default(),
        )
        .unwrap();

        let mut problem = variables!();
        let vars = ModelVariables::register(&mut problem, &data, &mode, false);
        let relaxation = RelaxationPolicy::default();
        let parts = ObjectiveBuilder::new(&data, &vars, &relaxation)
            .build(&mode)
            .unwrap();

        assert!(parts.epigraph.is_empty());
    }

    #[test]
    fn test_robust_objective_builds_one_bound_per_scenario() {
        let data = fixture_data();
        let mode = PlanningMode::Robust(vec![
            Scenario::new("Low", 0.5, 0.8),
            Scenario::new("High", 0.5, 1.2),
        ]);

        let mut problem = variables!();
        let vars = ModelVariables::register(&mut problem, &data, &mode, false);
        let relaxation = RelaxationPolicy::default();
        let parts = ObjectiveBuilder::new(&data, &vars, &relaxation)
            .build(&mode)
            .unwrap();

        assert_eq!(parts.epigraph.len(), 2);
    }

    #[test]
    fn test_robust_without_epigraph_variable_is_error() {
        let data = fixture_data();
        let deterministic = ScenarioGenerator::expand(
            OptimizationMode::Deterministic,
            &UncertaintyConfig::default(),
        )
        .unwrap();

        let mut problem = variables!();
        // 變數按確定性模式註冊，沒有最壞成本變數
        let vars = ModelVariables::register(&mut problem, &data, &deterministic, false);
        let relaxation = RelaxationPolicy::default();

        let robust = PlanningMode::Robust(vec![Scenario::base()]);
        let result = ObjectiveBuilder::new(&data, &vars, &relaxation).build(&robust);
        assert!(result.is_err());
    }
}
