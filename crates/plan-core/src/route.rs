//! 運輸路線模型

use serde::{Deserialize, Serialize};

/// 路線鍵：(起點, 終點, 運輸方式)
pub type RouteKey = (String, String, String);

/// 運輸路線
///
/// 停用的路線在模型中會把發運量與趟次固定為 0。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// 起點工廠ID
    pub from_plant: String,

    /// 終點工廠ID
    pub to_plant: String,

    /// 運輸方式（例如 Road / Rail / Sea）
    pub mode: String,

    /// 每趟運輸成本（必填；缺漏視為結構錯誤）
    pub cost_per_trip: Option<f64>,

    /// 每趟運輸容量（必填）
    pub capacity_per_trip: Option<f64>,

    /// 最小發運批量（SBQ）：每趟至少要裝載的數量
    pub sbq: f64,

    /// 是否啟用
    pub enabled: bool,
}

impl Route {
    /// 創建新的路線（預設啟用）
    pub fn new(
        from_plant: impl Into<String>,
        to_plant: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            from_plant: from_plant.into(),
            to_plant: to_plant.into(),
            mode: mode.into(),
            cost_per_trip: None,
            capacity_per_trip: None,
            sbq: 0.0,
            enabled: true,
        }
    }

    /// 建構器模式：設置每趟成本與容量
    pub fn with_trip(mut self, cost_per_trip: f64, capacity_per_trip: f64) -> Self {
        self.cost_per_trip = Some(cost_per_trip);
        self.capacity_per_trip = Some(capacity_per_trip);
        self
    }

    /// 建構器模式：設置最小發運批量
    pub fn with_sbq(mut self, sbq: f64) -> Self {
        self.sbq = sbq;
        self
    }

    /// 建構器模式：停用路線
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// 路線鍵
    pub fn key(&self) -> RouteKey {
        (
            self.from_plant.clone(),
            self.to_plant.clone(),
            self.mode.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_route() {
        let route = Route::new("IU-01", "GU-01", "Road")
            .with_trip(20.0, 50.0)
            .with_sbq(10.0);

        assert_eq!(route.key(), ("IU-01".into(), "GU-01".into(), "Road".into()));
        assert_eq!(route.cost_per_trip, Some(20.0));
        assert_eq!(route.capacity_per_trip, Some(50.0));
        assert!(route.enabled);
    }

    #[test]
    fn test_disabled_route() {
        let route = Route::new("IU-01", "GU-02", "Rail")
            .with_trip(35.0, 120.0)
            .disabled();

        assert!(!route.enabled);
    }
}
