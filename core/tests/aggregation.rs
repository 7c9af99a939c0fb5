//! Group-by reductions over a generated dataset.

use expansion_core::{
    aggregate::{Aggregates, LiteracyBracket, TOP_PRODUCT_LIMIT},
    config::ScenarioConfig,
    generator::{generate_dataset, Dataset},
    insights::key_insights,
    rng::RngBank,
    types::Tier,
};

fn dataset() -> (ScenarioConfig, Dataset) {
    let config = ScenarioConfig::default_test().with_seed(2024);
    let ds = generate_dataset(&config, &RngBank::new(config.seed)).expect("generate dataset");
    (config, ds)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * b.abs().max(1.0)
}

// ── Regional ───────────────────────────────────────────────────

#[test]
fn regional_rows_cover_all_tiers_and_sum_to_totals() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);

    assert_eq!(agg.regional.len(), 3);
    for (row, tier) in agg.regional.iter().zip(Tier::ALL) {
        assert_eq!(row.tier, tier);
    }

    let txns: usize = agg.regional.iter().map(|r| r.transactions).sum();
    let revenue: f64 = agg.regional.iter().map(|r| r.total_revenue).sum();
    let direct: f64 = ds.transactions.iter().map(|t| t.revenue).sum();
    assert_eq!(txns, ds.transactions.len());
    assert!(close(revenue, direct), "{revenue} vs {direct}");
    assert!(close(agg.headline.total_revenue, direct));
}

#[test]
fn metro_margin_beats_tier3() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);
    let metro = agg.regional_for(Tier::Metro);
    let tier3 = agg.regional_for(Tier::Tier3);
    assert!(metro.margin_pct > tier3.margin_pct);
    assert!(metro.avg_logistics_cost < tier3.avg_logistics_cost);
    assert!(metro.avg_delivery_hours < tier3.avg_delivery_hours);
}

// ── Customers and stores ───────────────────────────────────────

#[test]
fn behavior_counts_every_purchase_once() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);
    let purchases: u32 = agg.customers.iter().map(|c| c.purchase_count).sum();
    assert_eq!(purchases as usize, ds.transactions.len());

    let summarized: usize = agg.behavior.iter().map(|b| b.customers).sum();
    assert_eq!(summarized, agg.customers.len());
    for b in &agg.behavior {
        assert!((0.0..=100.0).contains(&b.repeat_rate_pct));
    }
}

#[test]
fn store_rows_only_for_stores_with_sales() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);
    assert!(!agg.stores.is_empty());
    assert!(agg.stores.len() <= ds.stores.len());
    for s in &agg.stores {
        assert!(s.transactions > 0);
        assert!((0.0..=1.0).contains(&s.perishable_share));
    }
    let txns: usize = agg.stores.iter().map(|s| s.transactions).sum();
    assert_eq!(txns, ds.transactions.len());
}

// ── Secondary tables ───────────────────────────────────────────

#[test]
fn fixed_shape_tables() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);
    assert_eq!(agg.payments.len(), 12);
    assert_eq!(agg.costs.len(), 3);
    assert_eq!(agg.perishables.len(), 3);
    assert_eq!(agg.stockouts.len(), 3);
    assert_eq!(agg.top_products.len(), TOP_PRODUCT_LIMIT);
    for pair in agg.top_products.windows(2) {
        assert!(pair[0].revenue >= pair[1].revenue);
    }
    for pair in agg.discounts.windows(2) {
        assert!(pair[0].discount_pct < pair[1].discount_pct);
    }
}

#[test]
fn demographic_tables_partition_buying_customers() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);
    assert_eq!(agg.income_revenue.len(), 15);
    assert_eq!(agg.literacy_purchases.len(), 9);

    for (summary, tier) in agg.behavior.iter().zip(Tier::ALL) {
        let by_income: usize = agg
            .income_revenue
            .iter()
            .filter(|r| r.tier == tier)
            .map(|r| r.customers)
            .sum();
        let by_literacy: usize = agg
            .literacy_purchases
            .iter()
            .filter(|r| r.tier == tier)
            .map(|r| r.customers)
            .sum();
        assert_eq!(by_income, summary.customers, "{tier}");
        assert_eq!(by_literacy, summary.customers, "{tier}");
    }
    let low_tier3 = agg
        .literacy_purchases
        .iter()
        .find(|r| r.tier == Tier::Tier3 && r.bracket == LiteracyBracket::Low)
        .unwrap();
    assert!(low_tier3.customers > 0);
}

#[test]
fn aggregation_is_idempotent() {
    let (config, ds) = dataset();
    let threshold = config.modeling.repeat_purchase_threshold;
    assert_eq!(Aggregates::compute(&ds, threshold), Aggregates::compute(&ds, threshold));
}

// ── Insights ───────────────────────────────────────────────────

#[test]
fn six_insights_in_fixed_order() {
    let (config, ds) = dataset();
    let agg = Aggregates::compute(&ds, config.modeling.repeat_purchase_threshold);
    let titles: Vec<&str> = key_insights(&agg).iter().map(|i| i.title).collect();
    assert_eq!(
        titles,
        vec![
            "Margin Gap",
            "Logistics Challenge",
            "Retention Gap",
            "Delivery Delay",
            "Spoilage Issue",
            "Growth Potential",
        ]
    );
}
