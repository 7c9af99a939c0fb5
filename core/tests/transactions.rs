//! Transaction-level invariants over a generated dataset.

use expansion_core::{
    config::ScenarioConfig,
    generator::{
        generate_dataset,
        transactions::{PricingInputs, TransactionFinancials, MAX_QUANTITY, MIN_QUANTITY},
        Dataset,
    },
    rng::RngBank,
    types::{round2, Tier},
};
use std::collections::{HashMap, HashSet};

fn dataset() -> Dataset {
    let config = ScenarioConfig::default_test();
    generate_dataset(&config, &RngBank::new(config.seed)).expect("generate dataset")
}

// ── Money ──────────────────────────────────────────────────────

#[test]
fn totals_reconcile_with_components() {
    let ds = dataset();
    assert_eq!(ds.transactions.len(), 4_000);
    for t in &ds.transactions {
        assert_eq!(
            t.total_cost,
            round2(t.product_cost + t.logistics_cost + t.spoilage_cost),
            "{}",
            t.transaction_id
        );
        assert_eq!(t.margin, round2(t.revenue - t.total_cost), "{}", t.transaction_id);
    }
}

#[test]
fn spoilage_only_on_perishables() {
    let ds = dataset();
    for t in ds.transactions.iter().filter(|t| !t.is_perishable) {
        assert_eq!(t.spoilage_cost, 0.0, "{}", t.transaction_id);
    }
}

#[test]
fn perishable_spoilage_follows_tier_cap() {
    let config = ScenarioConfig::default_test();
    let ds = dataset();
    for tier in Tier::ALL {
        let cap = config.tier(tier).spoilage_cap;
        let perishable: Vec<_> = ds
            .transactions
            .iter()
            .filter(|t| t.is_perishable && t.region_tier == tier)
            .collect();
        assert!(!perishable.is_empty(), "no perishable sales in {tier}");

        if cap == 0.0 {
            assert!(perishable.iter().all(|t| t.spoilage_cost == 0.0), "{tier} spoils");
            continue;
        }
        let spoiled = perishable.iter().filter(|t| t.spoilage_cost > 0.0).count();
        assert!(spoiled * 100 >= perishable.len() * 95, "{tier}: {spoiled}/{}", perishable.len());
        for t in &perishable {
            assert!(t.spoilage_cost <= t.product_cost * cap + 0.01, "{}", t.transaction_id);
        }
    }
}

#[test]
fn metro_worked_example_end_to_end() {
    let config = ScenarioConfig::default_test();
    let metro = config.tier(Tier::Metro);
    let f = TransactionFinancials::derive(&PricingInputs {
        list_price: 100.0,
        unit_cost: 40.0,
        discount_pct: 10,
        quantity: 2,
        delivery_distance_km: 10.0,
        logistics_rate_per_km: metro.logistics_rate_per_km,
        logistics_fixed_fee: metro.logistics_fixed_fee,
        spoilage_fraction: 0.0,
    });
    assert_eq!(f.unit_price, 90.0);
    assert_eq!(f.revenue, 180.0);
    assert_eq!(f.product_cost, 80.0);
    assert_eq!(f.logistics_cost, 40.0);
    assert_eq!(f.spoilage_cost, 0.0);
    assert_eq!(f.total_cost, 120.0);
    assert_eq!(f.margin, 60.0);
    assert_eq!(f.margin_pct, 33.33);
}

// ── Discrete fields ────────────────────────────────────────────

#[test]
fn quantity_and_discount_in_allowed_sets() {
    let ds = dataset();
    let discounts: HashSet<u32> = [0, 5, 10, 15, 20].into_iter().collect();
    for t in &ds.transactions {
        assert!((MIN_QUANTITY..=MAX_QUANTITY).contains(&t.quantity));
        assert!(discounts.contains(&t.discount_pct), "discount {}", t.discount_pct);
    }
}

#[test]
fn delivery_within_tier_ranges() {
    let config = ScenarioConfig::default_test();
    let ds = dataset();
    for t in &ds.transactions {
        let profile = config.tier(t.region_tier);
        let (lo, hi) = profile.delivery_hours;
        assert!(t.delivery_time_hours >= lo && t.delivery_time_hours <= hi);
        let (lo, hi) = profile.delivery_km;
        assert!(t.delivery_distance_km >= lo && t.delivery_distance_km <= hi);
    }
}

// ── References ─────────────────────────────────────────────────

#[test]
fn every_transaction_references_known_entities() {
    let ds = dataset();
    let store_tier: HashMap<&str, Tier> = ds
        .stores
        .iter()
        .map(|s| (s.store_id.as_str(), s.region_tier))
        .collect();
    let customer_tier: HashMap<&str, Tier> = ds
        .customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c.region_tier))
        .collect();
    let products: HashSet<&str> = ds.products.iter().map(|p| p.product_id.as_str()).collect();

    for t in &ds.transactions {
        assert!(products.contains(t.product_id.as_str()));
        assert_eq!(customer_tier.get(t.customer_id.as_str()), Some(&t.region_tier));
        assert_eq!(store_tier.get(t.store_id.as_str()), Some(&t.region_tier));
    }
}

#[test]
fn transactions_never_predate_registration() {
    let ds = dataset();
    let registered: HashMap<&str, _> = ds
        .customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c.registration_date))
        .collect();
    for t in &ds.transactions {
        let since = registered[t.customer_id.as_str()];
        assert!(
            t.transaction_date >= since,
            "{} on {} before registration {}",
            t.transaction_id,
            t.transaction_date,
            since
        );
    }
}
