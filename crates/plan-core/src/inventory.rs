//! 庫存政策模型

use serde::{Deserialize, Serialize};

use crate::Plant;

/// 庫存政策
///
/// 工廠未提供政策時由 [`InventoryPolicy::derived_from_plant`] 推導預設值：
/// 安全庫存取工廠欄位、最大庫存取儲存容量、持有成本取 0。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryPolicy {
    /// 工廠ID
    pub plant_id: String,

    /// 安全庫存
    pub safety_stock: f64,

    /// 最大庫存
    pub max_inventory: f64,

    /// 每單位每期持有成本
    pub holding_cost_per_period: f64,
}

impl InventoryPolicy {
    /// 創建新的庫存政策
    pub fn new(plant_id: impl Into<String>) -> Self {
        Self {
            plant_id: plant_id.into(),
            safety_stock: 0.0,
            max_inventory: 0.0,
            holding_cost_per_period: 0.0,
        }
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, stock: f64) -> Self {
        self.safety_stock = stock;
        self
    }

    /// 建構器模式：設置最大庫存
    pub fn with_max_inventory(mut self, max: f64) -> Self {
        self.max_inventory = max;
        self
    }

    /// 建構器模式：設置持有成本
    pub fn with_holding_cost(mut self, cost: f64) -> Self {
        self.holding_cost_per_period = cost;
        self
    }

    /// 由工廠欄位推導預設政策
    pub fn derived_from_plant(plant: &Plant) -> Self {
        Self {
            plant_id: plant.id.clone(),
            safety_stock: plant.safety_stock,
            max_inventory: plant.storage_capacity,
            holding_cost_per_period: 0.0,
        }
    }
}
