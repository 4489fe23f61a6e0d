//! 需求記錄模型

use serde::{Deserialize, Serialize};

/// 需求類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandType {
    /// 確認需求（預設的優化對象）
    Fixed,
    /// 預測需求
    Forecast,
}

/// 需求記錄：某工廠在某期間的基準需求量
///
/// 情境的需求乘數在模型建構時套用到基準量上。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRecord {
    /// 工廠ID
    pub plant_id: String,

    /// 月份標籤
    pub period: String,

    /// 需求數量
    pub quantity: f64,

    /// 需求類型
    pub demand_type: DemandType,
}

impl DemandRecord {
    /// 創建新的需求記錄（預設為確認需求）
    pub fn new(plant_id: impl Into<String>, period: impl Into<String>, quantity: f64) -> Self {
        Self {
            plant_id: plant_id.into(),
            period: period.into(),
            quantity,
            demand_type: DemandType::Fixed,
        }
    }

    /// 建構器模式：設置需求類型
    pub fn with_demand_type(mut self, demand_type: DemandType) -> Self {
        self.demand_type = demand_type;
        self
    }

    /// 檢查是否為確認需求
    pub fn is_fixed(&self) -> bool {
        self.demand_type == DemandType::Fixed
    }
}
