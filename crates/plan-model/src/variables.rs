//! 決策變數註冊表

use std::collections::HashMap;

use good_lp::{variable, ProblemVariables, Variable};
use plan_core::{PlanningData, RouteKey};

use crate::PlanningMode;

/// 模型決策變數
///
/// 生產/發運/趟次/模式選擇為情境共享的當下決策；庫存按情境
/// 索引（確定性模式收斂為單一情境）。停用路線與非熟料廠的
/// 生產在建構約束時固定為 0。
#[derive(Debug, Clone)]
pub struct ModelVariables {
    /// Production[工廠, 期間]
    pub production: HashMap<(String, String), Variable>,

    /// Shipment[路線, 期間]
    pub shipment: HashMap<(RouteKey, String), Variable>,

    /// Trips[路線, 期間]（非負整數）
    pub trips: HashMap<(RouteKey, String), Variable>,

    /// ModeSelected[路線, 期間]（0/1）
    pub mode_selected: HashMap<(RouteKey, String), Variable>,

    /// Inventory[工廠, 期間, 情境]
    pub inventory: HashMap<(String, String, String), Variable>,

    /// 穩健模式的最壞成本上界變數
    pub worst_case_cost: Option<Variable>,

    /// 未滿足需求鬆弛變數（僅鬆弛運行）
    pub demand_slack: HashMap<(String, String), Variable>,
}

impl ModelVariables {
    /// 依快照與規劃模式建立全部決策變數
    pub fn register(
        problem: &mut ProblemVariables,
        data: &PlanningData,
        mode: &PlanningMode,
        with_slack: bool,
    ) -> Self {
        let mut production = HashMap::new();
        let mut shipment = HashMap::new();
        let mut trips = HashMap::new();
        let mut mode_selected = HashMap::new();
        let mut inventory = HashMap::new();
        let mut demand_slack = HashMap::new();

        for plant_id in &data.plant_ids {
            for period in &data.periods {
                // 非熟料廠不生產，直接以邊界固定為 0
                let definition = if data.is_clinker(plant_id) {
                    variable().min(0.0)
                } else {
                    variable().min(0.0).max(0.0)
                };
                let var = problem.add(
                    definition.name(format!("prod_{}_{}", plant_id, period.label)),
                );
                production.insert((plant_id.clone(), period.label.clone()), var);
            }
        }

        for route in &data.routes {
            let (from, to, mode_name) = route;
            for period in &data.periods {
                let ship = problem.add(
                    variable()
                        .min(0.0)
                        .name(format!("ship_{from}_{to}_{mode_name}_{}", period.label)),
                );
                let trip = problem.add(
                    variable()
                        .integer()
                        .min(0.0)
                        .name(format!("trips_{from}_{to}_{mode_name}_{}", period.label)),
                );
                let selected = problem.add(
                    variable()
                        .binary()
                        .name(format!("use_{from}_{to}_{mode_name}_{}", period.label)),
                );

                shipment.insert((route.clone(), period.label.clone()), ship);
                trips.insert((route.clone(), period.label.clone()), trip);
                mode_selected.insert((route.clone(), period.label.clone()), selected);
            }
        }

        for scenario in mode.scenarios() {
            for plant_id in &data.plant_ids {
                for period in &data.periods {
                    let var = problem.add(variable().min(0.0).name(format!(
                        "inv_{}_{}_{}",
                        plant_id, period.label, scenario.name
                    )));
                    inventory.insert(
                        (
                            plant_id.clone(),
                            period.label.clone(),
                            scenario.name.clone(),
                        ),
                        var,
                    );
                }
            }
        }

        let worst_case_cost = match mode {
            PlanningMode::Robust(_) => {
                Some(problem.add(variable().min(0.0).name("worst_case_cost")))
            }
            _ => None,
        };

        if with_slack {
            for plant_id in &data.plant_ids {
                for period in &data.periods {
                    let var = problem.add(
                        variable()
                            .min(0.0)
                            .name(format!("unmet_{}_{}", plant_id, period.label)),
                    );
                    demand_slack.insert((plant_id.clone(), period.label.clone()), var);
                }
            }
        }

        Self {
            production,
            shipment,
            trips,
            mode_selected,
            inventory,
            worst_case_cost,
            demand_slack,
        }
    }

    /// 生產變數
    pub fn production(&self, plant_id: &str, period: &str) -> Variable {
        self.production[&(plant_id.to_string(), period.to_string())]
    }

    /// 發運變數
    pub fn shipment(&self, route: &RouteKey, period: &str) -> Variable {
        self.shipment[&(route.clone(), period.to_string())]
    }

    /// 趟次變數
    pub fn trips(&self, route: &RouteKey, period: &str) -> Variable {
        self.trips[&(route.clone(), period.to_string())]
    }

    /// 模式選擇變數
    pub fn mode_selected(&self, route: &RouteKey, period: &str) -> Variable {
        self.mode_selected[&(route.clone(), period.to_string())]
    }

    /// 庫存變數
    pub fn inventory(&self, plant_id: &str, period: &str, scenario: &str) -> Variable {
        self.inventory[&(
            plant_id.to_string(),
            period.to_string(),
            scenario.to_string(),
        )]
    }

    /// 鬆弛變數（未啟用鬆弛時為 None）
    pub fn demand_slack(&self, plant_id: &str, period: &str) -> Option<Variable> {
        self.demand_slack
            .get(&(plant_id.to_string(), period.to_string()))
            .copied()
    }
}
