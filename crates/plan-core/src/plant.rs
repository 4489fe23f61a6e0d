//! 工廠模型

use serde::{Deserialize, Serialize};

/// 工廠類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantKind {
    /// 熟料廠（IU 節點，具備生產能力）
    Clinker,
    /// 粉磨站（GU 節點，純需求端）
    Grinding,
}

/// 工廠
///
/// 每次運行視為不可變快照；主資料的修改由外部資料層在運行之間完成。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    /// 工廠ID
    pub id: String,

    /// 工廠名稱
    pub name: String,

    /// 工廠類型
    pub kind: PlantKind,

    /// 月產能（熟料廠必填；缺漏視為結構錯誤，不得以 0 代入）
    pub production_capacity: Option<f64>,

    /// 單位生產成本（熟料廠必填）
    pub production_cost: Option<f64>,

    /// 儲存容量
    pub storage_capacity: f64,

    /// 安全庫存
    pub safety_stock: f64,

    /// 期初庫存
    pub initial_inventory: f64,
}

impl Plant {
    /// 創建新的工廠
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: PlantKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            production_capacity: None,
            production_cost: None,
            storage_capacity: 0.0,
            safety_stock: 0.0,
            initial_inventory: 0.0,
        }
    }

    /// 建構器模式：設置產能與單位生產成本
    pub fn with_production(mut self, capacity: f64, cost: f64) -> Self {
        self.production_capacity = Some(capacity);
        self.production_cost = Some(cost);
        self
    }

    /// 建構器模式：設置儲存容量
    pub fn with_storage(mut self, capacity: f64) -> Self {
        self.storage_capacity = capacity;
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, stock: f64) -> Self {
        self.safety_stock = stock;
        self
    }

    /// 建構器模式：設置期初庫存
    pub fn with_initial_inventory(mut self, inventory: f64) -> Self {
        self.initial_inventory = inventory;
        self
    }

    /// 檢查是否為熟料廠
    pub fn is_clinker(&self) -> bool {
        self.kind == PlantKind::Clinker
    }
}
