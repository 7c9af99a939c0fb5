//! Inventory snapshot generation over every store × product pair.

use super::{products::ProductRecord, stores::StoreRecord};
use crate::{
    config::ScenarioConfig,
    rng::StageRng,
    types::{cutoff_date, round2, EntityId},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecord {
    pub inventory_id:             EntityId,
    pub store_id:                 EntityId,
    pub product_id:               EntityId,
    pub current_stock:            i64,
    pub reorder_point:            i64,
    pub stockout_days_last_month: i64,
    pub avg_daily_sales:          f64,
    pub last_restock_date:        NaiveDate,
}

pub fn generate_inventory(
    config: &ScenarioConfig,
    stores: &[StoreRecord],
    products: &[ProductRecord],
    rng: &mut StageRng,
) -> Vec<InventoryRecord> {
    let discretionary: Vec<bool> = products
        .iter()
        .map(|p| {
            config
                .category(&p.category)
                .map(|c| c.discretionary)
                .unwrap_or(false)
        })
        .collect();
    let cutoff = cutoff_date();
    let mut inventory = Vec::with_capacity(stores.len() * products.len());
    let mut skipped = 0usize;

    for store in stores {
        let profile = config.tier(store.region_tier);
        for (product, &is_discretionary) in products.iter().zip(&discretionary) {
            if is_discretionary && !rng.chance(profile.discretionary_inventory_keep_rate) {
                skipped += 1;
                continue;
            }

            let current_stock = rng.int_between(profile.stock_level.0, profile.stock_level.1);
            let stockout_days = rng.int_between(profile.stockout_days.0, profile.stockout_days.1);
            let restock_back = rng.int_between(config.restock_days.0, config.restock_days.1);

            inventory.push(InventoryRecord {
                inventory_id: format!("INV{:06}", inventory.len() + 1),
                store_id: store.store_id.clone(),
                product_id: product.product_id.clone(),
                current_stock,
                reorder_point: (current_stock as f64 * profile.reorder_fraction).trunc() as i64,
                stockout_days_last_month: stockout_days,
                avg_daily_sales: round2(current_stock as f64 / 30.0),
                last_restock_date: cutoff - Duration::days(restock_back),
            });
        }
    }

    log::info!(
        "inventory: created {} records ({} discretionary slots not stocked)",
        inventory.len(),
        skipped
    );
    inventory
}
