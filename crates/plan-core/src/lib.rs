//! # Plan Core
//!
//! 核心資料模型與類型定義

pub mod demand;
pub mod inventory;
pub mod period;
pub mod plant;
pub mod report;
pub mod route;
pub mod run;
pub mod scenario;
pub mod snapshot;

// Re-export 主要類型
pub use demand::{DemandRecord, DemandType};
pub use inventory::InventoryPolicy;
pub use period::Period;
pub use plant::{Plant, PlantKind};
pub use report::{display_value, CostBreakdown, InventoryRow, ProductionRow, TransportRow};
pub use route::{Route, RouteKey};
pub use run::{
    OptimizationMode, OptimizationRun, RelaxationPolicy, RunRequest, RunStatus,
};
pub use scenario::{Scenario, UncertaintyConfig, PROBABILITY_TOLERANCE};
pub use snapshot::{MasterData, PlanningData};

/// 規劃引擎錯誤類型
///
/// 不可行（Infeasible）與未證最優（FeasibleNotOptimal）是正常的
/// 終端運行狀態，不屬於錯誤，見 [`run::RunStatus`]。
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("情境配置錯誤: {0}")]
    Configuration(String),

    #[error("主資料缺少必要欄位: {0}")]
    Schema(String),

    #[error("沒有可用的求解器: {0}")]
    SolverUnavailable(String),

    #[error("求解器執行異常: {0}")]
    Solver(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
