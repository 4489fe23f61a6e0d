//! # Clinker Plan
//!
//! 多期熟料生產/運輸/庫存規劃引擎
//!
//! 管線：主資料快照 → 情境展開 → 模型建構 → 求解 → 結果萃取。
//! 需求不確定性支援三種處理方式：確定性（單點）、隨機（期望
//! 成本）、穩健（最壞情況）。數值求解交給外部 LP/MILP 後端，
//! 本引擎負責建構交給後端的模型。

pub mod pipeline;

pub use pipeline::run_optimization;

// Re-export 主要類型
pub use plan_core::{
    CostBreakdown, DemandRecord, DemandType, InventoryPolicy, InventoryRow, MasterData,
    OptimizationMode, OptimizationRun, Period, PlanError, Plant, PlantKind, PlanningData,
    ProductionRow, RelaxationPolicy, Result, Route, RunRequest, RunStatus, Scenario,
    TransportRow, UncertaintyConfig,
};
pub use plan_model::{ModelBuilder, PlanningMode, ScenarioGenerator};
pub use plan_solve::{ResultExtractor, SolveSettings, SolverAdapter, SolverKind, SolverStrategy};
