//! 模型約束建構
//!
//! 所有約束按 工廠/路線/期間（庫存類再按情境）展開。當下決策
//! （生產/發運/趟次/模式）在各情境間共用，庫存平衡對每個情境
//! 以該情境的需求乘數分別成立。

use good_lp::{constraint, Constraint, Expression};
use plan_core::{PlanningData, RouteKey};

use crate::{ModelVariables, PlanningMode};

/// 每條路線的趟次 big-M 上界
///
/// 取「最大情境總需求 / SBQ（SBQ 為 0 時取 1）」，由資料推導
/// 而非硬編碼常數，避免數值鬆弛。SBQ ≤ 每趟容量已在快照驗證
/// 保證，因此這個上界不會截掉可行趟次。
pub fn trip_big_m(data: &PlanningData, mode: &PlanningMode, route: &RouteKey) -> f64 {
    let max_multiplier = mode
        .scenarios()
        .iter()
        .map(|s| s.demand_multiplier)
        .fold(1.0_f64, f64::max);
    let scaled_total = data.total_base_demand() * max_multiplier;

    let sbq = data.sbq[route];
    let denominator = if sbq > 0.0 { sbq } else { 1.0 };

    (scaled_total / denominator).ceil().max(1.0)
}

/// 約束建構器
pub struct ConstraintBuilder<'a> {
    data: &'a PlanningData,
    mode: &'a PlanningMode,
    vars: &'a ModelVariables,
}

impl<'a> ConstraintBuilder<'a> {
    /// 創建新的約束建構器
    pub fn new(
        data: &'a PlanningData,
        mode: &'a PlanningMode,
        vars: &'a ModelVariables,
    ) -> Self {
        Self { data, mode, vars }
    }

    /// 建立全部約束
    pub fn build(&self) -> Vec<Constraint> {
        let mut out = Vec::new();

        self.production_capacity(&mut out);
        self.inventory_balance(&mut out);
        self.inventory_bounds(&mut out);
        self.trip_capacity(&mut out);
        self.minimum_batch(&mut out);
        self.route_enabled(&mut out);
        self.mode_exclusivity(&mut out);

        out
    }

    /// 生產不可超過月產能（非熟料廠已由變數邊界固定為 0）
    fn production_capacity(&self, out: &mut Vec<Constraint>) {
        for plant_id in &self.data.clinker_plants {
            let capacity = self.data.production_capacity[plant_id];
            for period in &self.data.periods {
                let prod = self.vars.production(plant_id, &period.label);
                out.push(constraint!(prod <= capacity));
            }
        }
    }

    /// 庫存平衡：inv[t] = inv[t-1] + 生產 + 進貨 − 出貨 − 需求×乘數
    ///
    /// 第一期以期初庫存起算；鬆弛運行時加入未滿足需求鬆弛項。
    fn inventory_balance(&self, out: &mut Vec<Constraint>) {
        for scenario in self.mode.scenarios() {
            for plant_id in &self.data.plant_ids {
                for (idx, period) in self.data.periods.iter().enumerate() {
                    let previous: Expression = if idx == 0 {
                        self.data.initial_inventory[plant_id].into()
                    } else {
                        let prev_label = &self.data.periods[idx - 1].label;
                        self.vars
                            .inventory(plant_id, prev_label, &scenario.name)
                            .into()
                    };

                    let mut supply = previous + self.vars.production(plant_id, &period.label);
                    for route in &self.data.routes {
                        if route.1 == *plant_id {
                            supply += self.vars.shipment(route, &period.label);
                        }
                        if route.0 == *plant_id {
                            supply -= self.vars.shipment(route, &period.label);
                        }
                    }

                    let demand =
                        self.data.demand_at(plant_id, &period.label) * scenario.demand_multiplier;
                    let inv = self.vars.inventory(plant_id, &period.label, &scenario.name);

                    match self.vars.demand_slack(plant_id, &period.label) {
                        Some(slack) => {
                            out.push(constraint!(inv == supply - demand + slack));
                        }
                        None => {
                            out.push(constraint!(inv == supply - demand));
                        }
                    }
                }
            }
        }
    }

    /// 安全庫存下限與最大庫存上限（每情境）
    fn inventory_bounds(&self, out: &mut Vec<Constraint>) {
        for scenario in self.mode.scenarios() {
            for plant_id in &self.data.plant_ids {
                let safety = self.data.safety_stock[plant_id];
                let max_inv = self.data.max_inventory[plant_id];
                for period in &self.data.periods {
                    let inv = self.vars.inventory(plant_id, &period.label, &scenario.name);
                    out.push(constraint!(inv >= safety));
                    out.push(constraint!(inv <= max_inv));
                }
            }
        }
    }

    /// 發運量不可超過趟次 × 每趟容量
    fn trip_capacity(&self, out: &mut Vec<Constraint>) {
        for route in &self.data.routes {
            let capacity = self.data.capacity_per_trip[route];
            for period in &self.data.periods {
                let ship = self.vars.shipment(route, &period.label);
                let trips = self.vars.trips(route, &period.label);
                out.push(constraint!(ship <= capacity * trips));
            }
        }
    }

    /// 最小發運批量：每趟至少裝載 SBQ（SBQ 為 0 時約束自然鬆弛，
    /// 不會把發運壓到 0）
    fn minimum_batch(&self, out: &mut Vec<Constraint>) {
        for route in &self.data.routes {
            let sbq = self.data.sbq[route];
            for period in &self.data.periods {
                let ship = self.vars.shipment(route, &period.label);
                let trips = self.vars.trips(route, &period.label);
                out.push(constraint!(ship >= sbq * trips));
            }
        }
    }

    /// 停用路線的發運/趟次/模式選擇全數固定為 0
    fn route_enabled(&self, out: &mut Vec<Constraint>) {
        for route in &self.data.routes {
            if self.data.route_enabled[route] {
                continue;
            }
            for period in &self.data.periods {
                let ship = self.vars.shipment(route, &period.label);
                let trips = self.vars.trips(route, &period.label);
                let selected = self.vars.mode_selected(route, &period.label);
                out.push(constraint!(ship == 0.0));
                out.push(constraint!(trips == 0.0));
                out.push(constraint!(selected == 0.0));
            }
        }
    }

    /// 模式互斥：每 (起點, 終點, 期間) 最多選一種運輸方式，
    /// 趟次以資料推導的 big-M 連動到模式選擇
    fn mode_exclusivity(&self, out: &mut Vec<Constraint>) {
        for (from, to) in self.data.route_pairs() {
            for period in &self.data.periods {
                let mut selected_total = Expression::from(0.0);
                for mode_name in self.data.modes_between(&from, &to) {
                    let key = (from.clone(), to.clone(), mode_name);
                    selected_total += self.vars.mode_selected(&key, &period.label);
                }
                out.push(constraint!(selected_total <= 1.0));
            }
        }

        for route in &self.data.routes {
            let big_m = trip_big_m(self.data, self.mode, route);
            for period in &self.data.periods {
                let trips = self.vars.trips(route, &period.label);
                let selected = self.vars.mode_selected(route, &period.label);
                out.push(constraint!(trips <= big_m * selected));
            }
        }
    }
}
