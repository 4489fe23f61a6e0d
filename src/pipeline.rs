//! 優化管線編排
//!
//! 每次運行是一個顯式的 [`OptimizationRun`] 值，沿管線傳遞，
//! 沒有全域的「當前運行」狀態。配置與主資料錯誤在建模之前
//! 直接回傳 `Err`；不可行與求解器崩潰是終端運行狀態，以
//! 對應狀態的運行值回傳，呼叫端永遠不會為此收到裸錯誤。

use plan_core::{
    MasterData, OptimizationRun, PlanError, PlanningData, Result, RunRequest, RunStatus,
    UncertaintyConfig,
};
use plan_model::{ModelBuilder, ScenarioGenerator};
use plan_solve::{ResultExtractor, SolveSettings, SolverAdapter, SolverStrategy};

/// 執行一次完整的優化運行
pub fn run_optimization(
    master: &MasterData,
    config: &UncertaintyConfig,
    request: &RunRequest,
) -> Result<OptimizationRun> {
    let mut run = OptimizationRun::pending(request.mode);
    tracing::info!(
        "開始優化運行 {}：模式 {:?}，{} 個月份",
        run.id,
        request.mode,
        request.periods.len()
    );
    let start_time = std::time::Instant::now();

    // Step 1: 主資料快照（含全部資料驗證）
    tracing::debug!("Step 1: 組裝主資料快照");
    let data = PlanningData::assemble(&request.periods, master, request.demand_type)?;

    // Step 2: 求解策略（未知求解器在建模前就擋下）
    tracing::debug!("Step 2: 解析求解策略");
    let strategy = SolverStrategy::parse(&request.solver)?;

    // Step 3: 情境展開
    tracing::debug!("Step 3: 情境展開");
    let mode = ScenarioGenerator::expand(request.mode, config)?;
    tracing::debug!("情境數量: {}", mode.scenarios().len());

    // Step 4: 模型建構（每次運行獨立建構，無共享模型狀態）
    tracing::debug!("Step 4: 模型建構");
    let model = ModelBuilder::new(&data)
        .with_relaxation(request.relaxation.clone())
        .build(mode.clone())?;

    // Step 5: 求解（唯一的長時間阻塞點，時限由後端參數控制）
    tracing::debug!("Step 5: 求解");
    let settings = SolveSettings {
        time_limit_seconds: request.time_limit_seconds,
        mip_gap: request.mip_gap,
    };
    let report = match SolverAdapter::new(strategy, settings).solve(model) {
        Ok(report) => report,
        Err(PlanError::Solver(raw_message)) => {
            // 原始錯誤只進日誌，使用者看到一般性訊息
            tracing::error!("求解器執行異常: {raw_message}");
            run.status = RunStatus::Error;
            run.message = "求解器執行失敗，請重試或更換求解器設定。".to_string();
            return Ok(run);
        }
        Err(other) => return Err(other),
    };

    run.status = report.status;
    run.solver_used = Some(report.solver_used.clone());
    run.runtime_seconds = Some(report.runtime_seconds);
    run.message = report.message.clone();

    // Step 6: 結果萃取（只有可用狀態才有結果表）
    if let Some(raw) = &report.solution {
        tracing::debug!("Step 6: 結果萃取");
        let results = ResultExtractor::new(&data).extract(&mode, raw, &request.relaxation);
        run.objective_value = Some(results.objective_value);
        run.cost_breakdown = results.cost_breakdown;
        run.production = results.production;
        run.transport = results.transport;
        run.inventory = results.inventory;
    }

    tracing::info!(
        "優化運行 {} 結束：{:?}，耗時 {:?}",
        run.id,
        run.status,
        start_time.elapsed()
    );

    Ok(run)
}
