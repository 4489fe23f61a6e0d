//! # Plan Model
//!
//! 規劃模型建構引擎（決策變數、約束、目標函數）

pub mod builder;
pub mod constraints;
pub mod objective;
pub mod scenario;
pub mod variables;

// Re-export 主要類型
pub use builder::{BuiltModel, ModelBuilder};
pub use scenario::{PlanningMode, ScenarioGenerator};
pub use variables::ModelVariables;
