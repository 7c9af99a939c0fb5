//! analysis-runner: headless regional expansion analysis.
//!
//! Usage:
//!   analysis-runner --seed 42 --out-dir ./output
//!   analysis-runner --config scenario.json --db :memory: --no-charts
//!   analysis-runner --customers 2000 --transactions 10000

use anyhow::Result;
use expansion_core::{
    aggregate::Aggregates,
    charts,
    config::ScenarioConfig,
    db::{AnalysisDb, Table},
    engine::{AnalysisEngine, AnalysisRun},
    export,
    insights::{format_thousands, key_insights, RECOMMENDATIONS},
    modeling::{risk::RiskModelOutcome, ModelingReport},
    types::Tier,
};
use std::env;
use std::path::{Path, PathBuf};

const STEPS: usize = 8;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match flag_value(&args, "--config") {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.customer_count = parse_arg(&args, "--customers", config.customer_count);
    config.transaction_count = parse_arg(&args, "--transactions", config.transaction_count);
    let no_charts = args.iter().any(|a| a == "--no-charts");

    let out_dir = PathBuf::from(flag_value(&args, "--out-dir").unwrap_or("./output"));
    let db_path = flag_value(&args, "--db")
        .map(str::to_string)
        .unwrap_or_else(|| out_dir.join("analysis.db").display().to_string());

    let engine = AnalysisEngine::build(config);
    let run_id = engine.run_id.clone();

    println!("analysis-runner: regional expansion analysis");
    println!("  run_id:        {run_id}");
    println!("  seed:          {}", engine.seed());
    println!("  customers:     {}", engine.config().customer_count);
    println!("  transactions:  {}", engine.config().transaction_count);
    println!("  out_dir:       {}", out_dir.display());
    println!("  db:            {db_path}");
    println!();

    step(1, "GENERATING SIMULATION DATA");
    let dataset = engine.generate()?;
    let written = export::export_dataset(&dataset, &out_dir)?;
    println!("  {} CSV files written", written.len());

    let mut db = if db_path == ":memory:" {
        AnalysisDb::in_memory()?
    } else {
        AnalysisDb::open(&db_path)?
    };
    db.migrate()?;
    db.insert_run(&run_id, engine.seed(), env!("CARGO_PKG_VERSION"))?;
    db.insert_dataset(&run_id, &dataset)?;
    for table in Table::ALL {
        println!("  {:<10} {:>8} rows", table.sql_name(), db.count_rows(table, &run_id)?);
    }

    step(2, "EXPLORATORY DATA ANALYSIS");
    let aggregates = engine.aggregate(&dataset);
    print_regional(&aggregates);
    print_categories(&aggregates);
    print_behavior(&aggregates);

    step(3, "BUILDING PREDICTIVE MODELS");
    let models = engine.model(&dataset, &aggregates)?;
    print_models(&models);

    step(4, "CUSTOMER SEGMENTATION");
    print_segments(&models);

    step(5, "GENERATING VISUALIZATIONS");
    if no_charts {
        println!("  skipped (--no-charts)");
    } else {
        let charts = charts::render_all(&out_dir, &dataset, &aggregates, &models)?;
        for path in &charts {
            println!("  {}", display_name(path));
        }
    }

    let run = AnalysisRun {
        run_id: run_id.clone(),
        seed: engine.seed(),
        insights: key_insights(&aggregates),
        dataset,
        aggregates,
        models,
    };

    step(6, "KEY INSIGHTS");
    for (i, insight) in run.insights.iter().enumerate() {
        println!("  {}. {}: {}", i + 1, insight.title, insight.text);
    }

    step(7, "BUSINESS RECOMMENDATIONS");
    for rec in &RECOMMENDATIONS {
        println!("  {}", rec.heading);
        for action in rec.actions {
            println!("    • {action}");
        }
    }

    step(8, "ANALYSIS SUMMARY");
    print_summary(&run, &db)?;
    log::info!("runner: outputs in {}", out_dir.display());

    Ok(())
}

fn step(n: usize, title: &str) {
    println!();
    println!("[{n}/{STEPS}] {title}...");
}

fn print_regional(agg: &Aggregates) {
    println!("=== REGIONAL PERFORMANCE ===");
    println!(
        "  {:<8} {:>8} {:>14} {:>9} {:>9} {:>10} {:>10}",
        "tier", "txns", "revenue", "margin%", "cust", "delivery_h", "logistics"
    );
    for r in &agg.regional {
        println!(
            "  {:<8} {:>8} {:>14.2} {:>9.2} {:>9} {:>10.1} {:>10.2}",
            r.tier.label(),
            r.transactions,
            r.total_revenue,
            r.margin_pct,
            r.unique_customers,
            r.avg_delivery_hours,
            r.avg_logistics_cost,
        );
    }
}

fn print_categories(agg: &Aggregates) {
    println!();
    println!("=== CATEGORY MARGINS (top 3 by revenue per tier) ===");
    for tier in Tier::ALL {
        let rows = agg.categories.iter().filter(|c| c.tier == tier).take(3);
        for c in rows {
            println!(
                "  {:<8} {:<16} revenue {:>12.2}  margin {:>6.2}%",
                tier.label(),
                c.category,
                c.revenue,
                c.margin_pct
            );
        }
    }
}

fn print_behavior(agg: &Aggregates) {
    println!();
    println!("=== CUSTOMER BEHAVIOR ===");
    for b in &agg.behavior {
        println!(
            "  {:<8} customers {:>6}  avg purchases {:>5.2}  avg revenue {:>9.2}  repeat {:>5.1}%",
            b.tier.label(),
            b.customers,
            b.avg_purchases,
            b.avg_revenue,
            b.repeat_rate_pct
        );
    }
}

fn print_models(models: &ModelingReport) {
    println!("=== MARGIN RISK CLASSIFIER ===");
    match &models.risk {
        RiskModelOutcome::Trained(report) => {
            println!(
                "  high-risk stores: {}/{}  train {} / test {}  accuracy {:.3}",
                report.high_risk_stores,
                report.total_stores,
                report.train_size,
                report.test_size,
                report.accuracy
            );
            for c in &report.classes {
                println!(
                    "  {:<10} precision {:.2}  recall {:.2}  f1 {:.2}  support {}",
                    c.label, c.precision, c.recall, c.f1, c.support
                );
            }
            println!("  top features:");
            for (name, weight) in report.feature_importance.iter().take(5) {
                println!("    {name:<22} {weight:.4}");
            }
        }
        RiskModelOutcome::Skipped {
            high_risk_stores,
            total_stores,
        } => {
            println!(
                "  skipped: only one class present ({high_risk_stores}/{total_stores} high-risk stores)"
            );
        }
    }

    println!();
    println!("=== CUSTOMER LIFETIME VALUE ===");
    let clv = &models.clv;
    println!("  train {} / test {}", clv.train_size, clv.test_size);
    println!("  MAE: ₹{:.2}", clv.mae);
    println!("  R²:  {:.3}", clv.r2);
}

fn print_segments(models: &ModelingReport) {
    let seg = &models.segments;
    println!("=== ELBOW SWEEP ===");
    for p in &seg.elbow {
        println!("  k={}  inertia {:>12.2}  silhouette {:.3}", p.k, p.inertia, p.silhouette);
    }
    println!();
    println!("=== SEGMENTS (k = {}) ===", seg.k);
    for p in &seg.profiles {
        println!(
            "  [{}] {:<16} customers {:>6}  purchases {:>5.2}  revenue {:>9.2}  margin {:>8.2}",
            p.cluster, p.name, p.customers, p.avg_purchases, p.avg_revenue, p.avg_margin
        );
    }
    println!("  sample assignments:");
    for (customer_id, cluster) in seg.assignments.iter().take(5) {
        let name = seg.segment_name(*cluster).unwrap_or("?");
        println!("    {customer_id} -> {name}");
    }
}

fn print_summary(run: &AnalysisRun, db: &AnalysisDb) -> Result<()> {
    let h = &run.aggregates.headline;
    let overall_margin = if h.total_revenue > 0.0 {
        h.total_margin / h.total_revenue * 100.0
    } else {
        0.0
    };

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", run.run_id);
    println!("  seed:            {}", run.seed);
    println!("  transactions:    {}", format_thousands(h.transactions));
    println!("  total revenue:   ₹{:.2}", h.total_revenue);
    println!("  total margin:    ₹{:.2}", h.total_margin);
    println!("  overall margin:  {overall_margin:.2}%");
    println!("  customers:       {}", format_thousands(h.unique_customers));
    println!("  stores:          {}", h.stores);
    println!("  products:        {}", h.products);
    println!("  segments:        {}", run.models.segments.profiles.len());

    println!();
    println!("=== TIER TOTALS (SQLite) ===");
    for t in db.tier_totals(&run.run_id)? {
        println!(
            "  {:<8} txns {:>8}  revenue ₹{:>14.2}  margin ₹{:>12.2}",
            t.tier, t.transactions, t.revenue, t.margin
        );
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
