//! 優化運行模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CostBreakdown, DemandType, InventoryRow, ProductionRow, TransportRow};

/// 優化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationMode {
    /// 確定性（單點需求）
    Deterministic,
    /// 隨機（期望成本）
    Stochastic,
    /// 穩健（最壞情況）
    Robust,
}

/// 運行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// 尚未求解
    Pending,
    /// 已證最優
    Optimal,
    /// 時限內找到可行解但未證最優（結果可用，需標注）
    FeasibleNotOptimal,
    /// 模型不可行（正常終端狀態，非錯誤）
    Infeasible,
    /// 求解器異常（細節僅寫入日誌）
    Error,
}

impl RunStatus {
    /// 結果表是否可用
    pub fn is_usable(&self) -> bool {
        matches!(self, RunStatus::Optimal | RunStatus::FeasibleNotOptimal)
    }

    /// 是否為終端狀態
    pub fn is_terminal(&self) -> bool {
        *self != RunStatus::Pending
    }
}

/// 不可行時的鬆弛政策
///
/// 啟用後在庫存平衡中加入未滿足需求的鬆弛變數，並以罰金計入
/// 目標函數。罰金大小是業務決策，因此作為參數而非常數。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationPolicy {
    /// 是否啟用鬆弛
    pub enabled: bool,

    /// 每單位未滿足需求的罰金
    pub penalty_per_unit: f64,
}

impl Default for RelaxationPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            penalty_per_unit: 10_000.0,
        }
    }
}

impl RelaxationPolicy {
    /// 以預設罰金啟用鬆弛
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// 運行請求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// 選定的月份標籤
    pub periods: Vec<String>,

    /// 優化模式
    pub mode: OptimizationMode,

    /// 納入優化的需求類型
    pub demand_type: DemandType,

    /// 偏好求解器名稱（不可用時依策略清單備援）
    pub solver: String,

    /// 求解時限（秒）
    pub time_limit_seconds: u64,

    /// MIP 相對最優間隙
    pub mip_gap: f64,

    /// 鬆弛政策
    pub relaxation: RelaxationPolicy,
}

impl RunRequest {
    /// 創建新的運行請求
    pub fn new(periods: Vec<String>, mode: OptimizationMode) -> Self {
        Self {
            periods,
            mode,
            demand_type: DemandType::Fixed,
            solver: "microlp".to_string(),
            time_limit_seconds: 60,
            mip_gap: 0.01,
            relaxation: RelaxationPolicy::default(),
        }
    }

    /// 建構器模式：設置求解器
    pub fn with_solver(mut self, solver: impl Into<String>) -> Self {
        self.solver = solver.into();
        self
    }

    /// 建構器模式：設置時限
    pub fn with_time_limit(mut self, seconds: u64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    /// 建構器模式：設置 MIP 間隙
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = gap;
        self
    }

    /// 建構器模式：設置鬆弛政策
    pub fn with_relaxation(mut self, relaxation: RelaxationPolicy) -> Self {
        self.relaxation = relaxation;
        self
    }
}

/// 優化運行結果
///
/// 每次運行是獨立的值，沿管線以所有權傳遞；不可行與求解器
/// 異常都以對應狀態回傳，呼叫端不會收到裸異常。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRun {
    /// 運行ID
    pub id: Uuid,

    /// 優化模式
    pub mode: OptimizationMode,

    /// 運行狀態
    pub status: RunStatus,

    /// 目標函數值（可用狀態才有）
    pub objective_value: Option<f64>,

    /// 成本分解
    pub cost_breakdown: CostBreakdown,

    /// 生產表
    pub production: Vec<ProductionRow>,

    /// 運輸表
    pub transport: Vec<TransportRow>,

    /// 庫存表（隨機/穩健模式附情境標籤）
    pub inventory: Vec<InventoryRow>,

    /// 實際使用的求解器
    pub solver_used: Option<String>,

    /// 求解耗時（秒）
    pub runtime_seconds: Option<f64>,

    /// 給使用者的訊息
    pub message: String,

    /// 建立時間
    pub created_at: DateTime<Utc>,
}

impl OptimizationRun {
    /// 創建待求解的運行
    pub fn pending(mode: OptimizationMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            status: RunStatus::Pending,
            objective_value: None,
            cost_breakdown: CostBreakdown::default(),
            production: Vec::new(),
            transport: Vec::new(),
            inventory: Vec::new(),
            solver_used: None,
            runtime_seconds: None,
            message: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_defaults() {
        let request = RunRequest::new(
            vec!["2025-01".to_string()],
            OptimizationMode::Deterministic,
        );

        assert_eq!(request.solver, "microlp");
        assert_eq!(request.time_limit_seconds, 60);
        assert!(!request.relaxation.enabled);
        assert_eq!(request.demand_type, DemandType::Fixed);
    }

    #[test]
    fn test_run_request_builder() {
        let request = RunRequest::new(vec!["2025-01".to_string()], OptimizationMode::Robust)
            .with_solver("cbc")
            .with_time_limit(120)
            .with_mip_gap(0.005)
            .with_relaxation(RelaxationPolicy::enabled());

        assert_eq!(request.solver, "cbc");
        assert_eq!(request.time_limit_seconds, 120);
        assert!(request.relaxation.enabled);
        assert_eq!(request.relaxation.penalty_per_unit, 10_000.0);
    }

    #[test]
    fn test_status_flags() {
        assert!(RunStatus::Optimal.is_usable());
        assert!(RunStatus::FeasibleNotOptimal.is_usable());
        assert!(!RunStatus::Infeasible.is_usable());
        assert!(RunStatus::Infeasible.is_terminal());
        assert!(!RunStatus::Pending.is_terminal());
    }

    #[test]
    fn test_pending_run_is_empty() {
        let run = OptimizationRun::pending(OptimizationMode::Stochastic);

        assert_eq!(run.status, RunStatus::Pending);
        assert!(run.production.is_empty());
        assert!(run.objective_value.is_none());
    }
}
