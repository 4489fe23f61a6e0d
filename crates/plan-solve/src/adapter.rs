//! 求解器適配層
//!
//! 把建構完成的模型提交給外部求解器後端。後端以特性旗標
//! 編譯進來：`microlp` 為純 Rust 後端永遠可用，`cbc` 需要
//! 系統安裝 Cbc 函式庫。偏好後端不可用屬於能力問題而非求解
//! 失敗，依策略清單自動備援並記錄實際使用的後端。

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Instant;

use good_lp::{ResolutionError, Solution, SolverModel};
use plan_core::{PlanError, Result, RouteKey, RunStatus};
use plan_model::{BuiltModel, ModelVariables};

/// 求解器種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    /// COIN-OR CBC（原生，需 `cbc` 特性）
    Cbc,
    /// microlp（純 Rust，預設後端）
    Microlp,
}

impl SolverKind {
    /// 後端名稱
    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::Cbc => "cbc",
            SolverKind::Microlp => "microlp",
        }
    }

    /// 此後端是否已編譯可用
    pub fn is_available(&self) -> bool {
        match self {
            SolverKind::Cbc => cfg!(feature = "cbc"),
            SolverKind::Microlp => true,
        }
    }

    /// 此後端是否支援時限參數
    pub fn supports_time_limit(&self) -> bool {
        matches!(self, SolverKind::Cbc)
    }
}

impl FromStr for SolverKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cbc" => Ok(SolverKind::Cbc),
            "microlp" => Ok(SolverKind::Microlp),
            other => Err(PlanError::Configuration(format!(
                "未知的求解器: {other}"
            ))),
        }
    }
}

/// 依偏好排序的求解策略
///
/// 偏好後端在前，其餘後端依序備援；新增後端只需要擴充
/// [`SolverStrategy::ALL`]，呼叫端不必改動。
#[derive(Debug, Clone)]
pub struct SolverStrategy {
    order: Vec<SolverKind>,
}

impl SolverStrategy {
    /// 全部已知後端（備援順序）
    pub const ALL: [SolverKind; 2] = [SolverKind::Cbc, SolverKind::Microlp];

    /// 偏好後端在前的策略
    pub fn with_preferred(preferred: SolverKind) -> Self {
        let mut order = vec![preferred];
        for kind in Self::ALL {
            if kind != preferred {
                order.push(kind);
            }
        }
        Self { order }
    }

    /// 由求解器名稱解析策略
    pub fn parse(name: &str) -> Result<Self> {
        SolverKind::from_str(name).map(Self::with_preferred)
    }

    /// 嘗試順序
    pub fn order(&self) -> &[SolverKind] {
        &self.order
    }

    /// 第一個可用的後端
    pub fn select(&self) -> Result<SolverKind> {
        for kind in &self.order {
            if kind.is_available() {
                return Ok(*kind);
            }
            tracing::warn!("求解器 {} 不可用，嘗試備援", kind.name());
        }
        Err(PlanError::SolverUnavailable(
            "所有後端都不可用，請啟用 cbc 特性或改用 microlp".to_string(),
        ))
    }
}

/// 求解參數
#[derive(Debug, Clone)]
pub struct SolveSettings {
    /// 時限（秒）
    pub time_limit_seconds: u64,

    /// MIP 相對最優間隙
    pub mip_gap: f64,
}

impl Default for SolveSettings {
    fn default() -> Self {
        Self {
            time_limit_seconds: 60,
            mip_gap: 0.01,
        }
    }
}

/// 求解後按語義鍵整理的原始變數值
///
/// 後端可能對 presolve 剪除的變數不回報值；缺漏鍵一律以 0
/// 讀出，不產生錯誤。
#[derive(Debug, Clone, Default)]
pub struct RawSolution {
    pub production: HashMap<(String, String), f64>,
    pub shipment: HashMap<(RouteKey, String), f64>,
    pub trips: HashMap<(RouteKey, String), f64>,
    pub inventory: HashMap<(String, String, String), f64>,
    pub demand_slack: HashMap<(String, String), f64>,
    pub worst_case_cost: Option<f64>,
}

/// 求解結果報告
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// 終端狀態（Optimal / FeasibleNotOptimal / Infeasible）
    pub status: RunStatus,

    /// 實際使用的後端
    pub solver_used: String,

    /// 求解耗時（秒）
    pub runtime_seconds: f64,

    /// 給呼叫端的訊息
    pub message: String,

    /// 變數值（不可行時為 None）
    pub solution: Option<RawSolution>,
}

/// 後端求解失敗的內部分類
enum SolveFailure {
    Infeasible,
    Unbounded,
    Backend(String),
}

fn classify(error: ResolutionError) -> SolveFailure {
    match error {
        ResolutionError::Infeasible => SolveFailure::Infeasible,
        ResolutionError::Unbounded => SolveFailure::Unbounded,
        other => SolveFailure::Backend(other.to_string()),
    }
}

/// 求解器適配器
pub struct SolverAdapter {
    strategy: SolverStrategy,
    settings: SolveSettings,
}

impl SolverAdapter {
    /// 創建新的適配器
    pub fn new(strategy: SolverStrategy, settings: SolveSettings) -> Self {
        Self { strategy, settings }
    }

    /// 提交模型求解
    ///
    /// 不可行是正常終端狀態，以 [`SolveReport`] 回傳；後端崩潰
    /// 以 [`PlanError::Solver`] 回傳並保留原始訊息供日誌使用。
    pub fn solve(&self, model: BuiltModel) -> Result<SolveReport> {
        let kind = self.strategy.select()?;
        tracing::info!(
            "使用求解器 {} 求解（時限 {} 秒，間隙 {}）",
            kind.name(),
            self.settings.time_limit_seconds,
            self.settings.mip_gap
        );

        let start = Instant::now();
        let outcome = match kind {
            SolverKind::Cbc => self.solve_cbc(model),
            SolverKind::Microlp => self.solve_microlp(model),
        };
        let runtime = start.elapsed().as_secs_f64();

        match outcome {
            Ok(raw) => {
                // 在時限附近結束的解視為可行但未證最優
                let hit_time_limit = kind.supports_time_limit()
                    && runtime >= self.settings.time_limit_seconds as f64;
                let status = if hit_time_limit {
                    RunStatus::FeasibleNotOptimal
                } else {
                    RunStatus::Optimal
                };

                tracing::info!("求解完成：{:?}，耗時 {:.3} 秒", status, runtime);
                Ok(SolveReport {
                    status,
                    solver_used: kind.name().to_string(),
                    runtime_seconds: runtime,
                    message: match status {
                        RunStatus::FeasibleNotOptimal => {
                            "時限內找到可行解，但未證明最優。".to_string()
                        }
                        _ => "優化求解成功。".to_string(),
                    },
                    solution: Some(raw),
                })
            }
            Err(SolveFailure::Infeasible) => {
                tracing::warn!("模型不可行（耗時 {:.3} 秒）", runtime);
                Ok(SolveReport {
                    status: RunStatus::Infeasible,
                    solver_used: kind.name().to_string(),
                    runtime_seconds: runtime,
                    message: "模型不可行：沒有滿足所有約束的計劃，請檢查輸入或啟用鬆弛。"
                        .to_string(),
                    solution: None,
                })
            }
            Err(SolveFailure::Unbounded) => Err(PlanError::Solver(format!(
                "{} 回報目標無界，模型成本係數可能有誤",
                kind.name()
            ))),
            Err(SolveFailure::Backend(message)) => Err(PlanError::Solver(message)),
        }
    }

    fn solve_microlp(
        &self,
        model: BuiltModel,
    ) -> std::result::Result<RawSolution, SolveFailure> {
        // microlp 不支援時限/間隙參數，僅記錄提醒
        tracing::debug!("microlp 後端忽略時限與 MIP 間隙參數");

        let BuiltModel {
            variables,
            objective,
            constraints,
            vars,
            ..
        } = model;

        let mut problem = good_lp::solvers::microlp::microlp(variables.minimise(objective));
        for constraint in constraints {
            problem = problem.with(constraint);
        }

        match problem.solve() {
            Ok(solution) => Ok(capture(&solution, &vars)),
            Err(error) => Err(classify(error)),
        }
    }

    #[cfg(feature = "cbc")]
    fn solve_cbc(&self, model: BuiltModel) -> std::result::Result<RawSolution, SolveFailure> {
        let BuiltModel {
            variables,
            objective,
            constraints,
            vars,
            ..
        } = model;

        let mut problem = good_lp::solvers::coin_cbc::coin_cbc(variables.minimise(objective));
        problem.set_parameter("sec", &self.settings.time_limit_seconds.to_string());
        problem.set_parameter("ratioGap", &self.settings.mip_gap.to_string());

        for constraint in constraints {
            problem = problem.with(constraint);
        }

        match problem.solve() {
            Ok(solution) => Ok(capture(&solution, &vars)),
            Err(error) => Err(classify(error)),
        }
    }

    #[cfg(not(feature = "cbc"))]
    fn solve_cbc(&self, _model: BuiltModel) -> std::result::Result<RawSolution, SolveFailure> {
        // select() 不會在未編譯 cbc 時選到這裡
        Err(SolveFailure::Backend(
            "cbc 後端未編譯".to_string(),
        ))
    }
}

/// 把求解器回報的變數值讀進語義映射；非有限值以 0 代入
fn capture<S: Solution>(solution: &S, vars: &ModelVariables) -> RawSolution {
    let mut raw = RawSolution::default();

    for (key, var) in &vars.production {
        raw.production.insert(key.clone(), finite(solution.value(*var)));
    }
    for (key, var) in &vars.shipment {
        raw.shipment.insert(key.clone(), finite(solution.value(*var)));
    }
    for (key, var) in &vars.trips {
        raw.trips.insert(key.clone(), finite(solution.value(*var)));
    }
    for (key, var) in &vars.inventory {
        raw.inventory.insert(key.clone(), finite(solution.value(*var)));
    }
    for (key, var) in &vars.demand_slack {
        raw.demand_slack
            .insert(key.clone(), finite(solution.value(*var)));
    }
    raw.worst_case_cost = vars.worst_case_cost.map(|var| finite(solution.value(var)));

    raw
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
