//! 熟料規劃示例
//!
//! 兩座熟料廠、一條路線、單期需求 120 的小場景，分別以
//! 確定性與隨機模式運行並列印結果表。

use clinker_plan::{
    run_optimization, DemandRecord, InventoryPolicy, MasterData, OptimizationMode, Plant,
    PlantKind, Route, RunRequest, Scenario, UncertaintyConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== 熟料規劃示例 ===\n");

    let master = MasterData {
        plants: vec![
            Plant::new("IU-01", "North Clinker", PlantKind::Clinker)
                .with_production(100.0, 10.0)
                .with_storage(500.0),
            Plant::new("IU-02", "South Clinker", PlantKind::Clinker)
                .with_production(100.0, 5.0)
                .with_storage(500.0),
        ],
        routes: vec![Route::new("IU-01", "IU-02", "Road")
            .with_trip(20.0, 50.0)
            .with_sbq(10.0)],
        demands: vec![DemandRecord::new("IU-02", "2025-01", 120.0)],
        policies: vec![
            InventoryPolicy::new("IU-01")
                .with_max_inventory(500.0)
                .with_holding_cost(2.0),
            InventoryPolicy::new("IU-02")
                .with_max_inventory(500.0)
                .with_holding_cost(1.0),
        ],
    };

    // 確定性運行
    let request = RunRequest::new(
        vec!["2025-01".to_string()],
        OptimizationMode::Deterministic,
    );
    let run = run_optimization(&master, &UncertaintyConfig::default(), &request)?;

    println!("確定性運行：{:?}（{}）", run.status, run.message);
    println!("目標值: {:?}", run.objective_value);
    println!("成本分解: {:?}\n", run.cost_breakdown);

    println!("生產計劃:");
    for row in &run.production {
        println!(
            "  - {} {}: {} 噸（成本 {}）",
            row.plant_name, row.period, row.quantity_display, row.cost
        );
    }

    println!("運輸計劃:");
    for row in &run.transport {
        println!(
            "  - {} -> {} ({}) {}: {} 噸 / {} 趟",
            row.from_plant, row.to_plant, row.mode, row.period, row.shipment_display, row.trips
        );
    }

    // 隨機（期望成本）運行：Low/High 情境
    let config = UncertaintyConfig {
        enabled: true,
        scenarios: vec![
            Scenario::new("Low", 0.5, 0.8),
            Scenario::new("High", 0.5, 1.2),
        ],
    };
    let request = RunRequest::new(
        vec!["2025-01".to_string()],
        OptimizationMode::Stochastic,
    );
    let run = run_optimization(&master, &config, &request)?;

    println!("\n隨機運行：{:?}", run.status);
    println!("目標值: {:?}", run.objective_value);
    println!("情境庫存:");
    for row in &run.inventory {
        println!(
            "  - {} {} [{}]: {}",
            row.plant_name,
            row.period,
            row.scenario.as_deref().unwrap_or("-"),
            row.level_display
        );
    }

    Ok(())
}
