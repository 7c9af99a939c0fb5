//! Product catalog generation: one product per category item.

use crate::{
    config::ScenarioConfig,
    rng::StageRng,
    types::{round2, EntityId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub product_id:          EntityId,
    pub product_name:        String,
    pub category:            String,
    pub unit_cost:           f64,
    pub list_price:          f64,
    pub target_margin_pct:   f64,
    pub is_perishable:       bool,
    pub avg_shelf_life_days: i64,
}

/// Price that yields `margin_pct` over `cost`. Config validation keeps
/// the margin below 100%.
pub fn list_price_for_margin(cost: f64, margin_pct: f64) -> f64 {
    cost / (1.0 - margin_pct / 100.0)
}

pub fn generate_products(config: &ScenarioConfig, rng: &mut StageRng) -> Vec<ProductRecord> {
    let mut products = Vec::with_capacity(config.total_item_count());
    let mut next_id = 1usize;

    for category in &config.categories {
        for item in &category.items {
            let cost = rng.uniform(category.cost_range.0, category.cost_range.1);
            let margin_pct = rng.uniform(category.margin_range.0, category.margin_range.1);
            let list_price = list_price_for_margin(cost, margin_pct);
            let (life_lo, life_hi) = if category.perishable {
                config.perishable_shelf_life_days
            } else {
                config.shelf_stable_life_days
            };

            products.push(ProductRecord {
                product_id: format!("PRD{next_id:04}"),
                product_name: item.clone(),
                category: category.name.clone(),
                unit_cost: round2(cost),
                list_price: round2(list_price),
                target_margin_pct: round2(margin_pct),
                is_perishable: category.perishable,
                avg_shelf_life_days: rng.int_between(life_lo, life_hi),
            });
            next_id += 1;
        }
    }

    log::info!(
        "products: created {} products across {} categories",
        products.len(),
        config.categories.len()
    );
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    #[test]
    fn list_price_realises_target_margin() {
        let price = list_price_for_margin(80.0, 20.0);
        assert!((price - 100.0).abs() < 1e-9);
        let realised = (price - 80.0) / price * 100.0;
        assert!((realised - 20.0).abs() < 1e-9);
    }

    #[test]
    fn shelf_life_depends_on_perishability() {
        let cfg = ScenarioConfig::default();
        let mut rng = RngBank::new(5).for_stage(StageSlot::Products);
        for p in generate_products(&cfg, &mut rng) {
            if p.is_perishable {
                assert!((1..7).contains(&p.avg_shelf_life_days), "{p:?}");
                assert_eq!(p.category, "Fresh Produce");
            } else {
                assert!((180..730).contains(&p.avg_shelf_life_days), "{p:?}");
            }
        }
    }
}
