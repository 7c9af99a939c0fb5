//! Output sinks: SQLite persistence, CSV export and chart rendering.

use expansion_core::{
    charts,
    config::ScenarioConfig,
    db::{AnalysisDb, Table},
    engine::{AnalysisEngine, AnalysisRun},
    export,
};

const RUN_ID: &str = "db-test";

fn run() -> AnalysisRun {
    AnalysisEngine::new(RUN_ID.into(), ScenarioConfig::default_test())
        .run()
        .expect("engine run")
}

fn persisted(run: &AnalysisRun) -> AnalysisDb {
    let mut db = AnalysisDb::in_memory().expect("in-memory db");
    db.migrate().expect("migration");
    db.insert_run(&run.run_id, run.seed, "0.1.0-test").expect("insert run");
    db.insert_dataset(&run.run_id, &run.dataset).expect("insert dataset");
    db
}

// ── SQLite ─────────────────────────────────────────────────────

#[test]
fn row_counts_match_in_memory_tables() {
    let run = run();
    let db = persisted(&run);
    let ds = &run.dataset;
    let expected = [
        (Table::Stores, ds.stores.len()),
        (Table::Products, ds.products.len()),
        (Table::Customers, ds.customers.len()),
        (Table::Transactions, ds.transactions.len()),
        (Table::Inventory, ds.inventory.len()),
    ];
    for (table, n) in expected {
        assert_eq!(db.count_rows(table, RUN_ID).unwrap(), n as i64, "{}", table.sql_name());
    }
    assert_eq!(db.run_seed(RUN_ID).unwrap(), Some(run.seed));
}

#[test]
fn sql_tier_totals_match_aggregation() {
    let run = run();
    let db = persisted(&run);
    let totals = db.tier_totals(RUN_ID).unwrap();

    let regional: Vec<_> = run
        .aggregates
        .regional
        .iter()
        .filter(|r| r.transactions > 0)
        .collect();
    assert_eq!(totals.len(), regional.len());
    for (sql, agg) in totals.iter().zip(regional) {
        assert_eq!(sql.tier, agg.tier.label());
        assert_eq!(sql.transactions as usize, agg.transactions);
        assert!((sql.revenue - agg.total_revenue).abs() <= 1e-9 * agg.total_revenue.abs().max(1.0));
        assert!((sql.margin - agg.total_margin).abs() <= 1e-9 * agg.total_margin.abs().max(1.0));
    }
}

#[test]
fn two_runs_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.db");
    let run = run();

    let mut db = AnalysisDb::open(path.to_str().unwrap()).unwrap();
    db.migrate().unwrap();
    for run_id in ["first", "second"] {
        db.insert_run(run_id, run.seed, "0.1.0-test").unwrap();
        db.insert_dataset(run_id, &run.dataset).unwrap();
    }
    assert_eq!(
        db.count_rows(Table::Stores, "first").unwrap(),
        db.count_rows(Table::Stores, "second").unwrap()
    );
}

// ── Files ──────────────────────────────────────────────────────

#[test]
fn csv_export_writes_five_tables() {
    let dir = tempfile::tempdir().unwrap();
    let run = run();
    let paths = export::export_dataset(&run.dataset, dir.path()).unwrap();
    assert_eq!(paths.len(), 5);

    let text = std::fs::read_to_string(dir.path().join(export::TRANSACTIONS_CSV)).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("transaction_id,transaction_date,customer_id"));
    assert_eq!(text.lines().count(), run.dataset.transactions.len() + 1);
}

#[test]
fn charts_render_as_svg() {
    let dir = tempfile::tempdir().unwrap();
    let run = run();
    let paths = charts::render_all(dir.path(), &run.dataset, &run.aggregates, &run.models).unwrap();
    assert!(paths.len() >= 7);
    for path in paths {
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("<svg"), "{}", path.display());
    }
}

#[test]
fn dashboards_draw_every_reduction() {
    let dir = tempfile::tempdir().unwrap();
    let run = run();
    charts::render_all(dir.path(), &run.dataset, &run.aggregates, &run.models).unwrap();
    let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();

    let regional = read("regional_performance_dashboard.svg");
    for title in ["Payment Methods by Region", "Perishable vs Non-Perishable Sales", "Revenue per Customer"] {
        assert!(regional.contains(title), "regional dashboard lacks {title}");
    }
    let category = read("category_analysis.svg");
    assert!(category.contains("Products by Revenue"));
    assert!(category.contains("Impact of Discount on Margin"));
    let logistics = read("logistics_supply_chain.svg");
    for title in ["Delivery Distance Distribution", "Delivery Time vs Distance", "Cost Breakdown by Region"] {
        assert!(logistics.contains(title), "logistics chart lacks {title}");
    }
    let customers = read("customer_insights.svg");
    for title in ["Avg Revenue by Region", "Digital Literacy vs Purchase Frequency", "Repeat Purchase Rate"] {
        assert!(customers.contains(title), "customer chart lacks {title}");
    }
}
