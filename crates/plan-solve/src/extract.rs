//! 結果萃取
//!
//! 把求解後的變數值轉成報表列與成本分解。成本從變數值覆算
//! 而不是讀求解器的目標值，確保目標值永遠可由成本分解人工
//! 重現。迭代一律走快照的有序清單，保證輸出順序可重現。

use plan_core::{
    display_value, CostBreakdown, InventoryRow, PlanningData, ProductionRow, RelaxationPolicy,
    TransportRow,
};
use plan_model::PlanningMode;

use crate::RawSolution;

/// 報表列的非零過濾門檻
const ROW_EPSILON: f64 = 1e-9;

/// 萃取完成的結果
#[derive(Debug, Clone)]
pub struct ExtractedResults {
    /// 生產表（僅非零列）
    pub production: Vec<ProductionRow>,

    /// 運輸表（僅非零列）
    pub transport: Vec<TransportRow>,

    /// 庫存表（全列；隨機/穩健模式附情境標籤）
    pub inventory: Vec<InventoryRow>,

    /// 成本分解
    pub cost_breakdown: CostBreakdown,

    /// 目標值（＝成本分解總和）
    pub objective_value: f64,
}

/// 結果萃取器
pub struct ResultExtractor<'a> {
    data: &'a PlanningData,
}

impl<'a> ResultExtractor<'a> {
    /// 創建新的結果萃取器
    pub fn new(data: &'a PlanningData) -> Self {
        Self { data }
    }

    /// 萃取報表與成本分解
    pub fn extract(
        &self,
        mode: &PlanningMode,
        raw: &RawSolution,
        relaxation: &RelaxationPolicy,
    ) -> ExtractedResults {
        let production = self.production_rows(raw);
        let transport = self.transport_rows(raw);
        let inventory = self.inventory_rows(mode, raw);

        let production_cost: f64 = production.iter().map(|row| row.cost).sum();
        let transport_cost: f64 = transport.iter().map(|row| row.cost).sum();
        let holding_cost = self.holding_cost(mode, raw);
        let penalty_cost = self.penalty_cost(raw, relaxation);

        let cost_breakdown = CostBreakdown {
            production: production_cost,
            transport: transport_cost,
            holding: holding_cost,
            penalty: penalty_cost,
        };
        let objective_value = cost_breakdown.total();

        ExtractedResults {
            production,
            transport,
            inventory,
            cost_breakdown,
            objective_value,
        }
    }

    fn production_rows(&self, raw: &RawSolution) -> Vec<ProductionRow> {
        let mut rows = Vec::new();
        for plant_id in &self.data.plant_ids {
            let unit_cost = self.data.production_cost[plant_id];
            for period in &self.data.periods {
                let key = (plant_id.clone(), period.label.clone());
                let quantity = raw.production.get(&key).copied().unwrap_or(0.0);
                if quantity.abs() < ROW_EPSILON {
                    continue;
                }
                rows.push(ProductionRow {
                    plant_id: plant_id.clone(),
                    plant_name: self.data.plant_names[plant_id].clone(),
                    period: period.label.clone(),
                    quantity,
                    quantity_display: display_value(quantity),
                    cost: quantity * unit_cost,
                });
            }
        }
        rows
    }

    fn transport_rows(&self, raw: &RawSolution) -> Vec<TransportRow> {
        let mut rows = Vec::new();
        for route in &self.data.routes {
            let trip_cost = self.data.cost_per_trip[route];
            for period in &self.data.periods {
                let key = (route.clone(), period.label.clone());
                let shipment = raw.shipment.get(&key).copied().unwrap_or(0.0);
                let trips = raw.trips.get(&key).copied().unwrap_or(0.0);
                if shipment.abs() < ROW_EPSILON && trips.abs() < ROW_EPSILON {
                    continue;
                }
                rows.push(TransportRow {
                    from_plant: route.0.clone(),
                    to_plant: route.1.clone(),
                    mode: route.2.clone(),
                    period: period.label.clone(),
                    shipment,
                    shipment_display: display_value(shipment),
                    trips: trips.round() as i64,
                    cost: trips * trip_cost,
                });
            }
        }
        rows
    }

    fn inventory_rows(&self, mode: &PlanningMode, raw: &RawSolution) -> Vec<InventoryRow> {
        let scenario_label = mode.is_scenario_indexed();
        let mut rows = Vec::new();
        for scenario in mode.scenarios() {
            for plant_id in &self.data.plant_ids {
                for period in &self.data.periods {
                    let key = (
                        plant_id.clone(),
                        period.label.clone(),
                        scenario.name.clone(),
                    );
                    let level = raw.inventory.get(&key).copied().unwrap_or(0.0);
                    rows.push(InventoryRow {
                        plant_id: plant_id.clone(),
                        plant_name: self.data.plant_names[plant_id].clone(),
                        period: period.label.clone(),
                        scenario: scenario_label.then(|| scenario.name.clone()),
                        level,
                        level_display: display_value(level),
                        safety_stock: self.data.safety_stock[plant_id],
                    });
                }
            }
        }
        rows
    }

    /// 持有成本的模式相依聚合：單一情境 / 期望值 / 最壞情境
    fn holding_cost(&self, mode: &PlanningMode, raw: &RawSolution) -> f64 {
        match mode {
            PlanningMode::Deterministic(scenario) => {
                self.scenario_holding_cost(&scenario.name, raw)
            }
            PlanningMode::Stochastic(scenarios) => scenarios
                .iter()
                .map(|s| s.probability * self.scenario_holding_cost(&s.name, raw))
                .sum(),
            PlanningMode::Robust(scenarios) => scenarios
                .iter()
                .map(|s| self.scenario_holding_cost(&s.name, raw))
                .fold(0.0, f64::max),
        }
    }

    fn scenario_holding_cost(&self, scenario_name: &str, raw: &RawSolution) -> f64 {
        let mut cost = 0.0;
        for plant_id in &self.data.plant_ids {
            let unit_cost = self.data.holding_cost[plant_id];
            for period in &self.data.periods {
                let key = (
                    plant_id.clone(),
                    period.label.clone(),
                    scenario_name.to_string(),
                );
                cost += unit_cost * raw.inventory.get(&key).copied().unwrap_or(0.0);
            }
        }
        cost
    }

    fn penalty_cost(&self, raw: &RawSolution, relaxation: &RelaxationPolicy) -> f64 {
        raw.demand_slack
            .values()
            .map(|slack| relaxation.penalty_per_unit * slack)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::{
        DemandRecord, DemandType, MasterData, Plant, PlantKind, Route, Scenario,
    };

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
            policies: vec![plan_core::InventoryPolicy::new("GU-01")
                .with_max_inventory(300.0)
                .with_holding_cost(2.0)],
        };
        PlanningData::assemble(&["2025-01".to_string()], &master, DemandType::Fixed).unwrap()
    }

    fn route_key() -> plan_core::RouteKey {
        ("IU-01".to_string(), "GU-01".to_string(), "Road".to_string())
    }

    fn deterministic_raw() -> RawSolution {
        let mut raw = RawSolution::default();
        raw.production
            .insert(("IU-01".to_string(), "2025-01".to_string()), 80.0);
        raw.production
            .insert(("GU-01".to_string(), "2025-01".to_string()), 0.0);
        raw.shipment
            .insert((route_key(), "2025-01".to_string()), 80.0);
        raw.trips.insert((route_key(), "2025-01".to_string()), 2.0);
        raw.inventory.insert(
            ("GU-01".to_string(), "2025-01".to_string(), "Base".to_string()),
            5.0,
        );
        raw.inventory.insert(
            ("IU-01".to_string(), "2025-01".to_string(), "Base".to_string()),
            0.0,
        );
        raw
    }

    #[test]
    fn test_extract_deterministic_tables() {
        let data = fixture_data();
        let mode = PlanningMode::Deterministic(Scenario::base());
        let results = ResultExtractor::new(&data).extract(
            &mode,
            &deterministic_raw(),
            &RelaxationPolicy::default(),
        );

        // 零產量的粉磨站列被過濾
        assert_eq!(results.production.len(), 1);
        assert_eq!(results.production[0].plant_id, "IU-01");
        assert_eq!(results.production[0].cost, 800.0);
        assert_eq!(results.production[0].quantity_display, display_value(80.0));

        assert_eq!(results.transport.len(), 1);
        assert_eq!(results.transport[0].trips, 2);
        assert_eq!(results.transport[0].cost, 40.0);

        // 庫存列不過濾且沒有情境標籤
        assert_eq!(results.inventory.len(), 2);
        assert!(results.inventory.iter().all(|row| row.scenario.is_none()));

        // 持有成本 2.0 × 5；目標值＝分解總和
        assert_eq!(results.cost_breakdown.holding, 10.0);
        assert_eq!(results.objective_value, 800.0 + 40.0 + 10.0);
    }

    #[test]
    fn test_extract_missing_values_substitute_zero() {
        let data = fixture_data();
        let mode = PlanningMode::Deterministic(Scenario::base());
        // presolve 可能剪除變數：完全空的解不應報錯
        let results = ResultExtractor::new(&data).extract(
            &mode,
            &RawSolution::default(),
            &RelaxationPolicy::default(),
        );

        assert!(results.production.is_empty());
        assert!(results.transport.is_empty());
        assert_eq!(results.inventory.len(), 2);
        assert_eq!(results.inventory[0].level, 0.0);
        assert_eq!(results.objective_value, 0.0);
    }

    #[test]
    fn test_extract_robust_takes_worst_scenario_holding() {
        let data = fixture_data();
        let scenarios = vec![
            Scenario::new("Low", 0.5, 0.8),
            Scenario::new("High", 0.5, 1.2),
        ];
        let mut raw = RawSolution::default();
        for (scenario, level) in [("Low", 30.0), ("High", 6.0)] {
            raw.inventory.insert(
                (
                    "GU-01".to_string(),
                    "2025-01".to_string(),
                    scenario.to_string(),
                ),
                level,
            );
        }

        let stochastic = ResultExtractor::new(&data).extract(
            &PlanningMode::Stochastic(scenarios.clone()),
            &raw,
            &RelaxationPolicy::default(),
        );
        let robust = ResultExtractor::new(&data).extract(
            &PlanningMode::Robust(scenarios),
            &raw,
            &RelaxationPolicy::default(),
        );

        // 期望值：0.5×60 + 0.5×12；最壞情境：60
        assert_eq!(stochastic.cost_breakdown.holding, 36.0);
        assert_eq!(robust.cost_breakdown.holding, 60.0);

        // 情境索引模式的庫存列帶情境標籤
        assert!(robust
            .inventory
            .iter()
            .all(|row| row.scenario.is_some()));
        assert_eq!(robust.inventory.len(), 4);
    }

    #[test]
    fn test_extract_penalty_from_slack() {
        let data = fixture_data();
        let mode = PlanningMode::Deterministic(Scenario::base());
        let mut raw = deterministic_raw();
        raw.demand_slack
            .insert(("GU-01".to_string(), "2025-01".to_string()), 20.0);

        let results = ResultExtractor::new(&data).extract(
            &mode,
            &raw,
            &RelaxationPolicy::enabled(),
        );

        assert_eq!(results.cost_breakdown.penalty, 200_000.0);
    }
}
