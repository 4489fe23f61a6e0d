//! # Plan Solve
//!
//! 求解器適配與結果萃取

pub mod adapter;
pub mod extract;

// Re-export 主要類型
pub use adapter::{
    RawSolution, SolveReport, SolveSettings, SolverAdapter, SolverKind, SolverStrategy,
};
pub use extract::{ExtractedResults, ResultExtractor};
