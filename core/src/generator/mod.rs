//! Synthetic dataset generation.
//!
//! Stages run in dependency order, each on its own RNG stream:
//!   1. stores
//!   2. products
//!   3. customers      (needs stores)
//!   4. transactions   (needs stores, products, customers)
//!   5. inventory      (needs stores, products)

pub mod customers;
pub mod inventory;
pub mod products;
pub mod stores;
pub mod transactions;

use crate::{
    config::ScenarioConfig,
    error::AnalysisResult,
    rng::{RngBank, StageRng, StageSlot},
    types::Tier,
};
use customers::CustomerRecord;
use inventory::InventoryRecord;
use products::ProductRecord;
use stores::StoreRecord;
use transactions::TransactionRecord;

/// The five generated tables. Write-once: nothing mutates a table after
/// its stage has produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub stores:       Vec<StoreRecord>,
    pub products:     Vec<ProductRecord>,
    pub customers:    Vec<CustomerRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub inventory:    Vec<InventoryRecord>,
}

/// Store positions grouped by tier, for uniform in-tier picks.
pub struct TierStoreIndex {
    by_tier: [Vec<usize>; 3],
}

impl TierStoreIndex {
    pub fn build(stores: &[StoreRecord]) -> Self {
        let mut by_tier: [Vec<usize>; 3] = Default::default();
        for (i, store) in stores.iter().enumerate() {
            by_tier[store.region_tier.code()].push(i);
        }
        Self { by_tier }
    }

    pub fn stores_in(&self, tier: Tier) -> &[usize] {
        &self.by_tier[tier.code()]
    }

    /// Uniform store position within `tier`; `None` if the tier has no stores.
    pub fn pick(&self, tier: Tier, rng: &mut StageRng) -> Option<usize> {
        rng.choose(self.stores_in(tier)).copied()
    }
}

pub fn generate_dataset(config: &ScenarioConfig, bank: &RngBank) -> AnalysisResult<Dataset> {
    config.validate()?;

    let stores = stores::generate_stores(config, &mut bank.for_stage(StageSlot::Stores));
    let products = products::generate_products(config, &mut bank.for_stage(StageSlot::Products));
    let customers =
        customers::generate_customers(config, &stores, &mut bank.for_stage(StageSlot::Customers))?;
    let transactions = transactions::generate_transactions(
        config,
        &stores,
        &products,
        &customers,
        &mut bank.for_stage(StageSlot::Transactions),
    )?;
    let inventory = inventory::generate_inventory(
        config,
        &stores,
        &products,
        &mut bank.for_stage(StageSlot::Inventory),
    );

    log::debug!(
        "dataset: seed={} stores={} products={} customers={} transactions={} inventory={}",
        bank.master_seed(),
        stores.len(),
        products.len(),
        customers.len(),
        transactions.len(),
        inventory.len()
    );

    Ok(Dataset {
        stores,
        products,
        customers,
        transactions,
        inventory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_index_groups_store_positions() {
        let cfg = ScenarioConfig::default();
        let stores = stores::generate_stores(&cfg, &mut RngBank::new(1).for_stage(StageSlot::Stores));
        let index = TierStoreIndex::build(&stores);
        assert_eq!(index.stores_in(Tier::Metro).len(), 40);
        assert_eq!(index.stores_in(Tier::Tier2).len(), 45);
        assert_eq!(index.stores_in(Tier::Tier3).len(), 35);

        let mut rng = RngBank::new(1).for_stage(StageSlot::Customers);
        for _ in 0..200 {
            let idx = index.pick(Tier::Tier3, &mut rng).unwrap();
            assert_eq!(stores[idx].region_tier, Tier::Tier3);
        }
    }
}
