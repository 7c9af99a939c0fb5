//! Scenario configuration: reference tables and every tier-dependent
//! sampling parameter, gathered into one explicit object that is passed
//! into the engine.

use crate::{
    error::{AnalysisError, AnalysisResult},
    types::{IncomeBracket, PaymentMethod, Tier},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Fewest customers (and transactions) the models can be fit on.
pub const MIN_MODEL_ROWS: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitySpec {
    pub name: String,
    pub state: String,
    pub population: u64,
    pub infrastructure_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySpec {
    pub name: String,
    pub items: Vec<String>,
    pub cost_range: (f64, f64),
    /// Target margin percentage range; the upper bound must stay below 100.
    pub margin_range: (f64, f64),
    pub perishable: bool,
    /// Big-ticket categories that lower tiers buy less of.
    #[serde(default)]
    pub discretionary: bool,
}

/// Every parameter that varies by tier. The generators look these up
/// instead of branching on the tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierProfile {
    pub tier: Tier,
    pub cities: Vec<CitySpec>,
    pub store_count: usize,
    pub customer_share: f64,
    pub warehouse_distance_km: (f64, f64),
    pub age_mean: f64,
    pub age_std: f64,
    pub income_brackets: Vec<(IncomeBracket, f64)>,
    pub digital_literacy: (f64, f64),
    /// Probability of drawing from discretionary categories.
    /// `None` draws uniformly from the whole catalog.
    pub discretionary_share: Option<f64>,
    pub quantity_log_mu: f64,
    pub quantity_log_sigma: f64,
    pub discount_weights: Vec<(u32, f64)>,
    pub delivery_hours: (f64, f64),
    pub delivery_km: (f64, f64),
    pub payment_weights: Vec<(PaymentMethod, f64)>,
    pub logistics_rate_per_km: f64,
    pub logistics_fixed_fee: f64,
    /// Upper bound of the spoilage fraction applied to perishable product cost.
    pub spoilage_cap: f64,
    /// Half-open integer range.
    pub stock_level: (i64, i64),
    pub reorder_fraction: f64,
    /// Half-open integer range.
    pub stockout_days: (i64, i64),
    /// Probability a discretionary product is stocked at all.
    pub discretionary_inventory_keep_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelingConfig {
    /// Stores whose mean margin % falls below this are labelled high risk.
    pub risk_margin_threshold: f64,
    pub test_fraction: f64,
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub cluster_count: usize,
    /// Inclusive k sweep for the elbow/silhouette report.
    pub elbow_k_min: usize,
    pub elbow_k_max: usize,
    pub kmeans_runs: usize,
    pub kmeans_max_iterations: u64,
    pub kmeans_tolerance: f64,
    pub silhouette_sample: usize,
    pub repeat_purchase_threshold: u32,
}

impl Default for ModelingConfig {
    fn default() -> Self {
        Self {
            risk_margin_threshold: 10.0,
            test_fraction: 0.25,
            forest_trees: 100,
            forest_max_depth: 8,
            cluster_count: 4,
            elbow_k_min: 2,
            elbow_k_max: 7,
            kmeans_runs: 10,
            kmeans_max_iterations: 300,
            kmeans_tolerance: 1e-4,
            silhouette_sample: 1_000,
            repeat_purchase_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub store_brand: String,
    /// One profile per tier, in `Tier::ALL` order.
    pub tiers: Vec<TierProfile>,
    pub categories: Vec<CategorySpec>,
    pub customer_count: usize,
    pub transaction_count: usize,
    pub home_store_probability: f64,
    pub store_opening_window_days: i64,
    pub registration_window_days: i64,
    pub transaction_lookback_days: i64,
    pub restock_days: (i64, i64),
    pub perishable_shelf_life_days: (i64, i64),
    pub shelf_stable_life_days: (i64, i64),
    pub modeling: ModelingConfig,
}

impl ScenarioConfig {
    /// Load a JSON scenario file. Missing fields fall back to the
    /// built-in defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ScenarioConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in scenario with reduced volumes for tests.
    /// Store counts and reference tables are unchanged.
    pub fn default_test() -> Self {
        Self {
            customer_count: 800,
            transaction_count: 4_000,
            modeling: ModelingConfig {
                forest_trees: 15,
                kmeans_runs: 3,
                silhouette_sample: 200,
                ..ModelingConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn tier(&self, tier: Tier) -> &TierProfile {
        &self.tiers[tier.code()]
    }

    pub fn total_store_count(&self) -> usize {
        self.tiers.iter().map(|t| t.store_count).sum()
    }

    pub fn total_item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn category(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Reject configurations the generators cannot sample from.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.tiers.len() != Tier::ALL.len() {
            return Err(AnalysisError::config(
                "tiers",
                format!("expected {} tier profiles, got {}", Tier::ALL.len(), self.tiers.len()),
            ));
        }
        for (profile, expected) in self.tiers.iter().zip(Tier::ALL) {
            if profile.tier != expected {
                return Err(AnalysisError::config(
                    "tiers",
                    format!("profile for {} found where {} was expected", profile.tier, expected),
                ));
            }
            validate_tier(profile)?;
        }

        let share_sum: f64 = self.tiers.iter().map(|t| t.customer_share).sum();
        if (share_sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AnalysisError::config(
                "tiers.customer_share",
                format!("shares sum to {share_sum}, expected 1"),
            ));
        }

        if self.categories.is_empty() {
            return Err(AnalysisError::config("categories", "catalog is empty"));
        }
        for cat in &self.categories {
            let field = format!("categories.{}", cat.name);
            if cat.items.is_empty() {
                return Err(AnalysisError::config(field, "no items"));
            }
            check_range(&field, "cost_range", cat.cost_range)?;
            check_range(&field, "margin_range", cat.margin_range)?;
            if cat.cost_range.0 <= 0.0 {
                return Err(AnalysisError::config(field, "unit cost must be positive"));
            }
            if cat.margin_range.1 >= 100.0 || cat.margin_range.0 < 0.0 {
                return Err(AnalysisError::config(field, "margin must lie in [0, 100)"));
            }
        }

        let uses_bias = self.tiers.iter().any(|t| t.discretionary_share.is_some());
        let has_discretionary = self.categories.iter().any(|c| c.discretionary);
        let has_staple = self.categories.iter().any(|c| !c.discretionary);
        if uses_bias && !(has_discretionary && has_staple) {
            return Err(AnalysisError::config(
                "categories",
                "category bias needs both discretionary and staple categories",
            ));
        }

        if self.customer_count == 0 {
            return Err(AnalysisError::config("customer_count", "must be positive"));
        }
        if self.transaction_count == 0 {
            return Err(AnalysisError::config("transaction_count", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.home_store_probability) {
            return Err(AnalysisError::config("home_store_probability", "must be a probability"));
        }
        for (name, days) in [
            ("store_opening_window_days", self.store_opening_window_days),
            ("registration_window_days", self.registration_window_days),
            ("transaction_lookback_days", self.transaction_lookback_days),
        ] {
            if days <= 0 {
                return Err(AnalysisError::config(name, "window must be positive"));
            }
        }
        check_int_range("config", "restock_days", self.restock_days)?;
        check_int_range("config", "perishable_shelf_life_days", self.perishable_shelf_life_days)?;
        check_int_range("config", "shelf_stable_life_days", self.shelf_stable_life_days)?;

        let m = &self.modeling;
        if m.cluster_count < 2 || m.elbow_k_min < 2 || m.elbow_k_min > m.elbow_k_max {
            return Err(AnalysisError::config("modeling", "cluster counts must be >= 2 and ordered"));
        }
        if !(0.0 < m.test_fraction && m.test_fraction < 1.0) {
            return Err(AnalysisError::config("modeling.test_fraction", "must lie in (0, 1)"));
        }
        if m.forest_trees == 0 {
            return Err(AnalysisError::config("modeling.forest_trees", "must be positive"));
        }
        let min_rows = MIN_MODEL_ROWS.max(m.cluster_count).max(m.elbow_k_max);
        for (name, count) in [
            ("customer_count", self.customer_count),
            ("transaction_count", self.transaction_count),
        ] {
            if count < min_rows {
                return Err(AnalysisError::config(
                    name,
                    format!("{count} is too few to fit the models, need at least {min_rows}"),
                ));
            }
        }
        Ok(())
    }
}

fn validate_tier(profile: &TierProfile) -> AnalysisResult<()> {
    let field = format!("tiers.{}", profile.tier);
    if profile.cities.is_empty() {
        return Err(AnalysisError::config(field, "no cities"));
    }
    if profile.store_count == 0 {
        return Err(AnalysisError::config(field, "store_count must be positive"));
    }
    check_range(&field, "warehouse_distance_km", profile.warehouse_distance_km)?;
    check_range(&field, "digital_literacy", profile.digital_literacy)?;
    check_range(&field, "delivery_hours", profile.delivery_hours)?;
    check_range(&field, "delivery_km", profile.delivery_km)?;
    check_int_range(&field, "stock_level", profile.stock_level)?;
    check_int_range(&field, "stockout_days", profile.stockout_days)?;
    check_weights(&field, "income_brackets", profile.income_brackets.iter().map(|(_, w)| *w))?;
    check_weights(&field, "discount_weights", profile.discount_weights.iter().map(|(_, w)| *w))?;
    check_weights(&field, "payment_weights", profile.payment_weights.iter().map(|(_, w)| *w))?;
    for (name, p) in [
        ("spoilage_cap", profile.spoilage_cap),
        ("reorder_fraction", profile.reorder_fraction),
        ("discretionary_inventory_keep_rate", profile.discretionary_inventory_keep_rate),
        ("discretionary_share", profile.discretionary_share.unwrap_or(0.0)),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(AnalysisError::config(format!("{field}.{name}"), "must be a probability"));
        }
    }
    if profile.discount_weights.iter().any(|(d, _)| *d >= 100) {
        return Err(AnalysisError::config(format!("{field}.discount_weights"), "discount must be < 100%"));
    }
    Ok(())
}

fn check_range(field: &str, name: &str, range: (f64, f64)) -> AnalysisResult<()> {
    if !(range.0.is_finite() && range.1.is_finite() && range.0 <= range.1) {
        return Err(AnalysisError::config(
            format!("{field}.{name}"),
            format!("invalid range [{}, {})", range.0, range.1),
        ));
    }
    Ok(())
}

fn check_int_range(field: &str, name: &str, range: (i64, i64)) -> AnalysisResult<()> {
    if range.0 >= range.1 || range.0 < 0 {
        return Err(AnalysisError::config(
            format!("{field}.{name}"),
            format!("invalid range [{}, {})", range.0, range.1),
        ));
    }
    Ok(())
}

fn check_weights(field: &str, name: &str, weights: impl Iterator<Item = f64>) -> AnalysisResult<()> {
    let mut sum = 0.0;
    let mut count = 0;
    for w in weights {
        if w < 0.0 {
            return Err(AnalysisError::config(format!("{field}.{name}"), "negative weight"));
        }
        sum += w;
        count += 1;
    }
    if count == 0 || (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(AnalysisError::config(
            format!("{field}.{name}"),
            format!("weights sum to {sum}, expected 1"),
        ));
    }
    Ok(())
}

// ── Built-in reference tables ──────────────────────────────────────

fn city(name: &str, state: &str, population: u64, infrastructure_score: f64) -> CitySpec {
    CitySpec {
        name: name.into(),
        state: state.into(),
        population,
        infrastructure_score,
    }
}

fn category(
    name: &str,
    items: &[&str],
    cost_range: (f64, f64),
    margin_range: (f64, f64),
    perishable: bool,
    discretionary: bool,
) -> CategorySpec {
    CategorySpec {
        name: name.into(),
        items: items.iter().map(|s| s.to_string()).collect(),
        cost_range,
        margin_range,
        perishable,
        discretionary,
    }
}

fn metro_cities() -> Vec<CitySpec> {
    vec![
        city("Mumbai", "Maharashtra", 20_400_000, 9.5),
        city("Delhi", "Delhi", 16_750_000, 9.2),
        city("Bangalore", "Karnataka", 12_330_000, 9.0),
        city("Hyderabad", "Telangana", 10_000_000, 8.8),
        city("Pune", "Maharashtra", 6_430_000, 8.5),
        city("Chennai", "Tamil Nadu", 10_970_000, 8.7),
    ]
}

fn tier2_cities() -> Vec<CitySpec> {
    vec![
        city("Jaipur", "Rajasthan", 3_050_000, 7.5),
        city("Lucknow", "Uttar Pradesh", 2_900_000, 7.2),
        city("Coimbatore", "Tamil Nadu", 2_150_000, 7.8),
        city("Indore", "Madhya Pradesh", 2_170_000, 7.4),
        city("Bhopal", "Madhya Pradesh", 1_800_000, 6.9),
        city("Nagpur", "Maharashtra", 2_400_000, 7.3),
        city("Vadodara", "Gujarat", 1_670_000, 7.6),
        city("Ludhiana", "Punjab", 1_620_000, 7.1),
        city("Visakhapatnam", "Andhra Pradesh", 1_730_000, 7.0),
    ]
}

fn tier3_cities() -> Vec<CitySpec> {
    vec![
        city("Raipur", "Chhattisgarh", 1_010_000, 6.2),
        city("Jamshedpur", "Jharkhand", 630_000, 6.5),
        city("Guwahati", "Assam", 960_000, 6.0),
        city("Ranchi", "Jharkhand", 1_070_000, 6.3),
        city("Agra", "Uttar Pradesh", 1_590_000, 5.8),
        city("Nashik", "Maharashtra", 1_480_000, 6.4),
        city("Udaipur", "Rajasthan", 475_000, 6.1),
        city("Ajmer", "Rajasthan", 550_000, 5.9),
        city("Mysore", "Karnataka", 920_000, 6.7),
    ]
}

fn product_categories() -> Vec<CategorySpec> {
    vec![
        category(
            "Groceries",
            &["Basmati Rice 5kg", "Wheat Flour 10kg", "Sunflower Oil 1L", "Sugar 1kg", "Toor Dal 1kg", "Spices Mix"],
            (40.0, 250.0), (12.0, 20.0), false, false,
        ),
        category(
            "Fresh Produce",
            &["Seasonal Vegetables", "Fresh Fruits", "Milk 1L", "Eggs Dozen", "Paneer 200g", "Fresh Chicken"],
            (30.0, 180.0), (18.0, 28.0), true, false,
        ),
        category(
            "Packaged Foods",
            &["Biscuits Assorted", "Namkeen Mix", "Instant Noodles", "Sauces", "Beverages", "Bread"],
            (25.0, 150.0), (15.0, 25.0), false, false,
        ),
        category(
            "Personal Care",
            &["Shampoo 200ml", "Soap Bar", "Toothpaste", "Face Wash", "Body Lotion", "Hair Oil"],
            (50.0, 300.0), (20.0, 35.0), false, false,
        ),
        category(
            "Home Care",
            &["Detergent 1kg", "Floor Cleaner", "Dishwash Liquid", "Toilet Cleaner", "Air Freshener"],
            (40.0, 200.0), (18.0, 28.0), false, false,
        ),
        category(
            "Electronics",
            &["Mobile Phones", "TWS Earbuds", "Phone Chargers", "Power Banks", "Smart Watches"],
            (500.0, 15_000.0), (8.0, 15.0), false, true,
        ),
        category(
            "Fashion",
            &["T-Shirts", "Jeans", "Footwear", "Accessories", "Kids Wear"],
            (200.0, 2_000.0), (25.0, 45.0), false, true,
        ),
    ]
}

fn metro_profile() -> TierProfile {
    use IncomeBracket::*;
    use PaymentMethod::*;
    TierProfile {
        tier: Tier::Metro,
        cities: metro_cities(),
        store_count: 40,
        customer_share: 0.55,
        warehouse_distance_km: (2.0, 8.0),
        age_mean: 32.0,
        age_std: 8.0,
        income_brackets: vec![(From25To50K, 0.3), (From50To75K, 0.4), (Above75K, 0.3)],
        digital_literacy: (4.0, 10.0),
        discretionary_share: None,
        quantity_log_mu: 1.2,
        quantity_log_sigma: 0.6,
        discount_weights: vec![(0, 0.60), (5, 0.25), (10, 0.10), (15, 0.05), (20, 0.0)],
        delivery_hours: (0.5, 3.0),
        delivery_km: (1.0, 15.0),
        payment_weights: vec![(Upi, 0.40), (Card, 0.35), (Wallet, 0.20), (Cod, 0.05)],
        logistics_rate_per_km: 2.5,
        logistics_fixed_fee: 15.0,
        spoilage_cap: 0.0,
        stock_level: (50, 300),
        reorder_fraction: 0.30,
        stockout_days: (0, 5),
        discretionary_inventory_keep_rate: 1.0,
    }
}

fn tier2_profile() -> TierProfile {
    use IncomeBracket::*;
    use PaymentMethod::*;
    TierProfile {
        tier: Tier::Tier2,
        cities: tier2_cities(),
        store_count: 45,
        customer_share: 0.30,
        warehouse_distance_km: (10.0, 40.0),
        age_mean: 35.0,
        age_std: 10.0,
        income_brackets: vec![(From15To25K, 0.4), (From25To50K, 0.4), (From50To75K, 0.2)],
        digital_literacy: (3.0, 8.0),
        discretionary_share: Some(0.2),
        quantity_log_mu: 0.9,
        quantity_log_sigma: 0.6,
        discount_weights: vec![(0, 0.40), (5, 0.30), (10, 0.15), (15, 0.10), (20, 0.05)],
        delivery_hours: (2.0, 8.0),
        delivery_km: (3.0, 30.0),
        payment_weights: vec![(Upi, 0.35), (Card, 0.20), (Wallet, 0.15), (Cod, 0.30)],
        logistics_rate_per_km: 3.5,
        logistics_fixed_fee: 25.0,
        spoilage_cap: 0.08,
        stock_level: (20, 150),
        reorder_fraction: 0.25,
        stockout_days: (0, 15),
        discretionary_inventory_keep_rate: 1.0,
    }
}

fn tier3_profile() -> TierProfile {
    use IncomeBracket::*;
    use PaymentMethod::*;
    TierProfile {
        tier: Tier::Tier3,
        cities: tier3_cities(),
        store_count: 35,
        customer_share: 0.15,
        warehouse_distance_km: (10.0, 40.0),
        age_mean: 37.0,
        age_std: 12.0,
        income_brackets: vec![(From10To15K, 0.5), (From15To25K, 0.4), (From25To50K, 0.1)],
        digital_literacy: (3.0, 8.0),
        discretionary_share: Some(0.1),
        quantity_log_mu: 0.7,
        quantity_log_sigma: 0.5,
        discount_weights: vec![(0, 0.30), (5, 0.25), (10, 0.20), (15, 0.15), (20, 0.10)],
        delivery_hours: (4.0, 16.0),
        delivery_km: (5.0, 60.0),
        payment_weights: vec![(Upi, 0.25), (Card, 0.10), (Wallet, 0.10), (Cod, 0.55)],
        logistics_rate_per_km: 4.5,
        logistics_fixed_fee: 35.0,
        spoilage_cap: 0.15,
        stock_level: (10, 80),
        reorder_fraction: 0.20,
        stockout_days: (0, 15),
        discretionary_inventory_keep_rate: 0.4,
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            store_brand: "JioMart".into(),
            tiers: vec![metro_profile(), tier2_profile(), tier3_profile()],
            categories: product_categories(),
            customer_count: 15_000,
            transaction_count: 50_000,
            home_store_probability: 0.8,
            store_opening_window_days: 365,
            registration_window_days: 450,
            transaction_lookback_days: 365,
            restock_days: (1, 30),
            perishable_shelf_life_days: (1, 7),
            shelf_stable_life_days: (180, 730),
            modeling: ModelingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ScenarioConfig::default().validate().unwrap();
        ScenarioConfig::default_test().validate().unwrap();
    }

    #[test]
    fn default_reference_tables_have_expected_sizes() {
        let cfg = ScenarioConfig::default();
        assert_eq!(cfg.total_store_count(), 120);
        assert_eq!(cfg.total_item_count(), 39);
        assert_eq!(cfg.categories.len(), 7);
        let discretionary: Vec<_> = cfg
            .categories
            .iter()
            .filter(|c| c.discretionary)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(discretionary, vec!["Electronics", "Fashion"]);
    }

    #[test]
    fn tier_lookup_matches_profile() {
        let cfg = ScenarioConfig::default();
        for tier in Tier::ALL {
            assert_eq!(cfg.tier(tier).tier, tier);
        }
        assert_eq!(cfg.tier(Tier::Tier3).logistics_fixed_fee, 35.0);
    }

    #[test]
    fn empty_or_tiny_runs_rejected() {
        let mut cfg = ScenarioConfig::default_test();
        cfg.transaction_count = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("transaction_count"), "{err}");

        let mut cfg = ScenarioConfig::default_test();
        cfg.customer_count = MIN_MODEL_ROWS - 1;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("customer_count"), "{err}");

        let mut cfg = ScenarioConfig::default_test();
        cfg.transaction_count = cfg.modeling.elbow_k_max - 1;
        assert!(cfg.validate().is_err());

        let mut cfg = ScenarioConfig::default_test();
        cfg.customer_count = MIN_MODEL_ROWS.max(cfg.modeling.elbow_k_max);
        cfg.transaction_count = cfg.customer_count;
        cfg.validate().unwrap();
    }

    #[test]
    fn margin_at_or_above_100_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.categories[0].margin_range = (12.0, 100.0);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig { .. }), "{err}");
    }

    #[test]
    fn unbalanced_weights_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.tiers[1].payment_weights[0].1 = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_city_list_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.tiers[2].cities.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_override_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, r#"{ "seed": 7, "customer_count": 100 }"#).unwrap();
        let cfg = ScenarioConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.customer_count, 100);
        assert_eq!(cfg.transaction_count, 50_000);
        assert_eq!(cfg.total_store_count(), 120);
    }
}
