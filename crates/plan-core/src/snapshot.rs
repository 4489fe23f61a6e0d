//! 主資料快照組裝與驗證
//!
//! 把外部資料層提供的工廠/路線/需求/庫存政策轉成模型可直接
//! 使用的集合與參數映射，並在建模之前完成所有資料驗證，讓
//! 使用者得到明確的錯誤而不是難解的求解失敗。

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    DemandRecord, DemandType, InventoryPolicy, Period, PlanError, Plant, Result, Route, RouteKey,
};

/// 外部資料層讀出的主資料（未驗證）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterData {
    pub plants: Vec<Plant>,
    pub routes: Vec<Route>,
    pub demands: Vec<DemandRecord>,
    pub policies: Vec<InventoryPolicy>,
}

/// 驗證後的規劃輸入資料（不可變快照）
///
/// 所有映射對快照內的每個 ID 都完整；建模階段可以直接索引。
#[derive(Debug, Clone)]
pub struct PlanningData {
    /// 期間（已排序）
    pub periods: Vec<Period>,

    /// 所有工廠ID
    pub plant_ids: Vec<String>,

    /// 工廠名稱
    pub plant_names: HashMap<String, String>,

    /// 熟料廠ID（plant_ids 的子集）
    pub clinker_plants: Vec<String>,

    /// 期初庫存
    pub initial_inventory: HashMap<String, f64>,

    /// 安全庫存
    pub safety_stock: HashMap<String, f64>,

    /// 最大庫存
    pub max_inventory: HashMap<String, f64>,

    /// 每單位每期持有成本
    pub holding_cost: HashMap<String, f64>,

    /// 月產能（非熟料廠為 0）
    pub production_capacity: HashMap<String, f64>,

    /// 單位生產成本（非熟料廠為 0）
    pub production_cost: HashMap<String, f64>,

    /// 基準需求，鍵為 (工廠ID, 月份標籤)
    pub demand: HashMap<(String, String), f64>,

    /// 路線鍵清單
    pub routes: Vec<RouteKey>,

    /// 每趟運輸成本
    pub cost_per_trip: HashMap<RouteKey, f64>,

    /// 每趟運輸容量
    pub capacity_per_trip: HashMap<RouteKey, f64>,

    /// 最小發運批量
    pub sbq: HashMap<RouteKey, f64>,

    /// 路線啟用旗標
    pub route_enabled: HashMap<RouteKey, bool>,
}

impl PlanningData {
    /// 組裝並驗證規劃輸入
    ///
    /// 驗證順序對齊資料層的讀取順序：期間 → 工廠 → 庫存政策 →
    /// 需求 → 路線 → 整體一致性。任何缺漏或矛盾都在建模之前
    /// 以 [`PlanError::Schema`] 回報，絕不以 0 靜默代入缺漏欄位。
    pub fn assemble(
        selected_periods: &[String],
        master: &MasterData,
        demand_type: DemandType,
    ) -> Result<Self> {
        let periods = Period::validate_labels(selected_periods)?;

        if master.plants.is_empty() {
            return Err(PlanError::Schema(
                "找不到任何工廠，請先建立工廠主資料".to_string(),
            ));
        }

        let plant_ids: Vec<String> = master.plants.iter().map(|p| p.id.clone()).collect();
        let id_set: HashSet<&str> = plant_ids.iter().map(String::as_str).collect();
        if id_set.len() != plant_ids.len() {
            return Err(PlanError::Schema("工廠ID重複".to_string()));
        }

        let plant_names: HashMap<String, String> = master
            .plants
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();

        let clinker_plants: Vec<String> = master
            .plants
            .iter()
            .filter(|p| p.is_clinker())
            .map(|p| p.id.clone())
            .collect();

        // 產能與生產成本：熟料廠必填，缺漏即錯誤
        let mut production_capacity = HashMap::new();
        let mut production_cost = HashMap::new();
        let mut initial_inventory = HashMap::new();

        for plant in &master.plants {
            let (capacity, cost) = if plant.is_clinker() {
                let capacity = plant.production_capacity.ok_or_else(|| {
                    PlanError::Schema(format!(
                        "熟料廠 {} 缺少月產能，請先編輯工廠主資料",
                        plant.name
                    ))
                })?;
                let cost = plant.production_cost.ok_or_else(|| {
                    PlanError::Schema(format!(
                        "熟料廠 {} 缺少單位生產成本，請先編輯工廠主資料",
                        plant.name
                    ))
                })?;
                if capacity < 0.0 || cost < 0.0 {
                    return Err(PlanError::Schema(format!(
                        "熟料廠 {} 的產能/成本不可為負",
                        plant.name
                    )));
                }
                (capacity, cost)
            } else {
                (0.0, 0.0)
            };

            production_capacity.insert(plant.id.clone(), capacity);
            production_cost.insert(plant.id.clone(), cost);

            if plant.initial_inventory < 0.0 || plant.storage_capacity < 0.0 {
                return Err(PlanError::Schema(format!(
                    "工廠 {} 的庫存/儲存容量不可為負",
                    plant.name
                )));
            }
            initial_inventory.insert(plant.id.clone(), plant.initial_inventory);
        }

        // 庫存政策：未提供時由工廠欄位推導預設值
        let policy_by_plant: HashMap<&str, &InventoryPolicy> = master
            .policies
            .iter()
            .map(|p| (p.plant_id.as_str(), p))
            .collect();

        let mut safety_stock = HashMap::new();
        let mut max_inventory = HashMap::new();
        let mut holding_cost = HashMap::new();

        for plant in &master.plants {
            let policy = policy_by_plant
                .get(plant.id.as_str())
                .map(|p| (*p).clone())
                .unwrap_or_else(|| InventoryPolicy::derived_from_plant(plant));

            if policy.safety_stock < 0.0
                || policy.max_inventory < 0.0
                || policy.holding_cost_per_period < 0.0
            {
                return Err(PlanError::Schema(format!(
                    "工廠 {} 的庫存政策不可為負",
                    plant.name
                )));
            }

            safety_stock.insert(plant.id.clone(), policy.safety_stock);
            max_inventory.insert(plant.id.clone(), policy.max_inventory);
            holding_cost.insert(plant.id.clone(), policy.holding_cost_per_period);
        }

        // 需求：按 (工廠, 期間) 彙總；未指定的組合預設為 0
        let mut demand: HashMap<(String, String), f64> = HashMap::new();
        for plant_id in &plant_ids {
            for period in &periods {
                demand.insert((plant_id.clone(), period.label.clone()), 0.0);
            }
        }

        for record in &master.demands {
            if record.demand_type != demand_type {
                continue;
            }
            let key = (record.plant_id.clone(), record.period.clone());
            let Some(slot) = demand.get_mut(&key) else {
                // 不在選定期間或不認識的工廠，與資料層一致：跳過
                continue;
            };
            if record.quantity < 0.0 {
                return Err(PlanError::Schema(format!(
                    "工廠 {} 在 {} 的需求數量不可為負",
                    record.plant_id, record.period
                )));
            }
            *slot += record.quantity;
        }

        // 路線：端點必須是已知工廠，成本/容量必填，SBQ 不可超過容量
        if master.routes.is_empty() {
            return Err(PlanError::Schema(
                "找不到任何運輸路線，請先建立路線主資料".to_string(),
            ));
        }

        let mut routes = Vec::new();
        let mut cost_per_trip = HashMap::new();
        let mut capacity_per_trip = HashMap::new();
        let mut sbq = HashMap::new();
        let mut route_enabled = HashMap::new();

        for route in &master.routes {
            if !id_set.contains(route.from_plant.as_str())
                || !id_set.contains(route.to_plant.as_str())
            {
                continue;
            }

            let key = route.key();
            let label = format!(
                "{} -> {} ({})",
                route.from_plant, route.to_plant, route.mode
            );

            let cost = route.cost_per_trip.ok_or_else(|| {
                PlanError::Schema(format!("路線 {label} 缺少每趟運輸成本"))
            })?;
            let capacity = route.capacity_per_trip.ok_or_else(|| {
                PlanError::Schema(format!("路線 {label} 缺少每趟運輸容量"))
            })?;

            if cost < 0.0 || capacity < 0.0 || route.sbq < 0.0 {
                return Err(PlanError::Schema(format!(
                    "路線 {label} 的成本/容量/SBQ 不可為負"
                )));
            }
            if route.sbq > capacity {
                return Err(PlanError::Schema(format!(
                    "路線 {label} 的 SBQ 不可超過每趟容量"
                )));
            }

            routes.push(key.clone());
            cost_per_trip.insert(key.clone(), cost);
            capacity_per_trip.insert(key.clone(), capacity);
            sbq.insert(key.clone(), route.sbq);
            route_enabled.insert(key, route.enabled);
        }

        let data = Self {
            periods,
            plant_ids,
            plant_names,
            clinker_plants,
            initial_inventory,
            safety_stock,
            max_inventory,
            holding_cost,
            production_capacity,
            production_cost,
            demand,
            routes,
            cost_per_trip,
            capacity_per_trip,
            sbq,
            route_enabled,
        };

        data.check_consistency()?;

        Ok(data)
    }

    /// 整體一致性檢查（快速健全性檢查，非可行性證明）
    fn check_consistency(&self) -> Result<()> {
        let total_initial: f64 = self.initial_inventory.values().sum();
        let total_capacity: f64 = self
            .clinker_plants
            .iter()
            .map(|p| self.production_capacity[p])
            .sum();

        // 每期總需求不可超過總期初庫存加上總產能
        for period in &self.periods {
            let total_demand: f64 = self
                .plant_ids
                .iter()
                .map(|p| self.demand[&(p.clone(), period.label.clone())])
                .sum();

            if total_demand > total_initial + total_capacity {
                return Err(PlanError::Schema(format!(
                    "{} 的總需求 {} 超過總期初庫存 {} 加總產能 {}",
                    period.label, total_demand, total_initial, total_capacity
                )));
            }
        }

        // 期初庫存必須放得進最大庫存
        for plant_id in &self.plant_ids {
            if self.initial_inventory[plant_id] > self.max_inventory[plant_id] {
                return Err(PlanError::Schema(format!(
                    "工廠 {} 的期初庫存超過最大庫存",
                    self.plant_names[plant_id]
                )));
            }
        }

        // 有需求的純需求節點必須至少有一條啟用的進貨路線
        let mut has_inflow: HashMap<&str, bool> = HashMap::new();
        for key in &self.routes {
            if self.route_enabled[key] {
                has_inflow.insert(key.1.as_str(), true);
            }
        }

        for plant_id in &self.plant_ids {
            if self.clinker_plants.contains(plant_id) {
                continue;
            }
            for period in &self.periods {
                let qty = self.demand[&(plant_id.clone(), period.label.clone())];
                if qty > 0.0 && !has_inflow.get(plant_id.as_str()).copied().unwrap_or(false) {
                    return Err(PlanError::Schema(format!(
                        "工廠 {} 在 {} 有需求但沒有啟用的進貨路線，也沒有生產能力",
                        self.plant_names[plant_id], period.label
                    )));
                }
            }
        }

        Ok(())
    }

    /// 某工廠某期間的基準需求
    pub fn demand_at(&self, plant_id: &str, period: &str) -> f64 {
        self.demand
            .get(&(plant_id.to_string(), period.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// 全期間的基準總需求（big-M 推導用）
    pub fn total_base_demand(&self) -> f64 {
        self.demand.values().sum()
    }

    /// 檢查是否為熟料廠
    pub fn is_clinker(&self, plant_id: &str) -> bool {
        self.clinker_plants.iter().any(|p| p == plant_id)
    }

    /// 路線上的 (起點, 終點) 配對，已去重排序
    pub fn route_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .routes
            .iter()
            .map(|(i, j, _)| (i.clone(), j.clone()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        pairs.sort();
        pairs
    }

    /// 某 (起點, 終點) 配對上的所有運輸方式
    pub fn modes_between(&self, from: &str, to: &str) -> Vec<String> {
        self.routes
            .iter()
            .filter(|(i, j, _)| i == from && j == to)
            .map(|(_, _, k)| k.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlantKind;

    fn months(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn two_plant_master() -> MasterData {
        MasterData {
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
        }
    }

    #[test]
    fn test_assemble_two_plants() {
        let data = PlanningData::assemble(
            &months(&["2025-01"]),
            &two_plant_master(),
            DemandType::Fixed,
        )
        .unwrap();

        assert_eq!(data.plant_ids.len(), 2);
        assert_eq!(data.clinker_plants, vec!["IU-01".to_string()]);
        assert_eq!(data.demand_at("GU-01", "2025-01"), 80.0);
        assert_eq!(data.demand_at("IU-01", "2025-01"), 0.0);
        assert_eq!(data.routes.len(), 1);
        // 粉磨站不生產
        assert_eq!(data.production_capacity["GU-01"], 0.0);
        // 未提供政策時由工廠欄位推導：最大庫存 = 儲存容量
        assert_eq!(data.max_inventory["GU-01"], 300.0);
        assert_eq!(data.holding_cost["GU-01"], 0.0);
    }

    #[test]
    fn test_demand_type_filter_and_aggregation() {
        let mut master = two_plant_master();
        master.demands = vec![
            DemandRecord::new("GU-01", "2025-01", 50.0),
            DemandRecord::new("GU-01", "2025-01", 30.0),
            DemandRecord::new("GU-01", "2025-01", 999.0).with_demand_type(DemandType::Forecast),
        ];

        let data =
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).unwrap();

        // 同期間彙總，預測需求被過濾
        assert_eq!(data.demand_at("GU-01", "2025-01"), 80.0);
    }

    #[test]
    fn test_missing_clinker_capacity_is_schema_error() {
        let mut master = two_plant_master();
        master.plants[0].production_capacity = None;

        let err = PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed)
            .unwrap_err();
        assert!(matches!(err, PlanError::Schema(_)));
    }

    #[test]
    fn test_missing_route_cost_is_schema_error() {
        let mut master = two_plant_master();
        master.routes[0].cost_per_trip = None;

        let err = PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed)
            .unwrap_err();
        assert!(matches!(err, PlanError::Schema(_)));
    }

    #[test]
    fn test_sbq_above_capacity_rejected() {
        let mut master = two_plant_master();
        master.routes[0].sbq = 80.0;

        assert!(
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).is_err()
        );
    }

    #[test]
    fn test_negative_demand_rejected() {
        let mut master = two_plant_master();
        master.demands[0].quantity = -5.0;

        assert!(
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).is_err()
        );
    }

    #[test]
    fn test_demand_above_total_supply_rejected() {
        let mut master = two_plant_master();
        master.demands[0].quantity = 250.0; // 產能 100 + 期初 0

        assert!(
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).is_err()
        );
    }

    #[test]
    fn test_initial_inventory_above_max_rejected() {
        let mut master = two_plant_master();
        master.plants[1].initial_inventory = 400.0; // 儲存容量 300

        assert!(
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).is_err()
        );
    }

    #[test]
    fn test_demand_node_without_inflow_rejected() {
        let mut master = two_plant_master();
        master.routes[0].enabled = false;

        let err = PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed)
            .unwrap_err();
        assert!(matches!(err, PlanError::Schema(_)));
    }

    #[test]
    fn test_route_with_unknown_endpoint_skipped() {
        let mut master = two_plant_master();
        master.routes.push(
            Route::new("IU-99", "GU-01", "Rail").with_trip(5.0, 100.0),
        );

        let data =
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).unwrap();
        assert_eq!(data.routes.len(), 1);
    }

    #[test]
    fn test_route_pairs_and_modes() {
        let mut master = two_plant_master();
        master.routes.push(
            Route::new("IU-01", "GU-01", "Rail")
                .with_trip(35.0, 120.0)
                .with_sbq(0.0),
        );

        let data =
            PlanningData::assemble(&months(&["2025-01"]), &master, DemandType::Fixed).unwrap();

        assert_eq!(
            data.route_pairs(),
            vec![("IU-01".to_string(), "GU-01".to_string())]
        );
        let mut modes = data.modes_between("IU-01", "GU-01");
        modes.sort();
        assert_eq!(modes, vec!["Rail".to_string(), "Road".to_string()]);
    }
}
