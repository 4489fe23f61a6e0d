//! 運行結果報表模型

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 報表顯示精度（小數位數）
pub const DISPLAY_DECIMALS: u32 = 2;

/// 原始值轉顯示值（捨入到 [`DISPLAY_DECIMALS`] 位）
///
/// 原始未捨入值保留在各報表列上，供成本覆算與測試使用。
pub fn display_value(raw: f64) -> Decimal {
    Decimal::from_f64(raw)
        .unwrap_or(Decimal::ZERO)
        .round_dp(DISPLAY_DECIMALS)
}

/// 生產報表列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRow {
    /// 工廠ID
    pub plant_id: String,

    /// 工廠名稱
    pub plant_name: String,

    /// 月份標籤
    pub period: String,

    /// 產量（原始值）
    pub quantity: f64,

    /// 產量（顯示值）
    pub quantity_display: Decimal,

    /// 生產成本
    pub cost: f64,
}

/// 運輸報表列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportRow {
    /// 起點工廠ID
    pub from_plant: String,

    /// 終點工廠ID
    pub to_plant: String,

    /// 運輸方式
    pub mode: String,

    /// 月份標籤
    pub period: String,

    /// 發運量（原始值）
    pub shipment: f64,

    /// 發運量（顯示值）
    pub shipment_display: Decimal,

    /// 趟次
    pub trips: i64,

    /// 運輸成本
    pub cost: f64,
}

/// 庫存報表列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRow {
    /// 工廠ID
    pub plant_id: String,

    /// 工廠名稱
    pub plant_name: String,

    /// 月份標籤
    pub period: String,

    /// 情境標籤（隨機/穩健模式才有；生產與運輸為情境共享故無標籤）
    pub scenario: Option<String>,

    /// 期末庫存（原始值）
    pub level: f64,

    /// 期末庫存（顯示值）
    pub level_display: Decimal,

    /// 安全庫存
    pub safety_stock: f64,
}

/// 成本分解
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// 生產成本
    pub production: f64,

    /// 運輸成本
    pub transport: f64,

    /// 庫存持有成本（依模式聚合：單一情境 / 期望值 / 最壞情境）
    pub holding: f64,

    /// 未滿足需求罰金（僅鬆弛運行）
    pub penalty: f64,
}

impl CostBreakdown {
    /// 總成本；與目標函數值一致，可供人工覆算
    pub fn total(&self) -> f64 {
        self.production + self.transport + self.holding + self.penalty
    }
}
