//! Transaction history generation, the central generator.
//!
//! Each purchase event samples a customer, a serving store, a product
//! (with tier-dependent category bias), basket and delivery attributes,
//! then derives its financials deterministically from those draws.

use super::{
    customers::CustomerRecord, products::ProductRecord, stores::StoreRecord, TierStoreIndex,
};
use crate::{
    config::{ScenarioConfig, TierProfile},
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
    types::{cutoff_date, round2, EntityId, PaymentMethod, Tier},
};
use chrono::{Duration, NaiveDate};
use rand_distr::LogNormal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub transaction_id:       EntityId,
    pub transaction_date:     NaiveDate,
    pub customer_id:          EntityId,
    pub product_id:           EntityId,
    pub store_id:             EntityId,
    pub region_tier:          Tier,
    pub quantity:             u32,
    pub unit_price:           f64,
    pub revenue:              f64,
    pub product_cost:         f64,
    pub logistics_cost:       f64,
    pub spoilage_cost:        f64,
    pub total_cost:           f64,
    pub margin:               f64,
    pub margin_pct:           f64,
    pub discount_pct:         u32,
    pub delivery_time_hours:  f64,
    pub delivery_distance_km: f64,
    pub payment_method:       PaymentMethod,
    pub is_perishable:        bool,
}

/// Everything the financial derivation needs; all random draws happen
/// before this is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingInputs {
    pub list_price: f64,
    pub unit_cost: f64,
    pub discount_pct: u32,
    pub quantity: u32,
    pub delivery_distance_km: f64,
    pub logistics_rate_per_km: f64,
    pub logistics_fixed_fee: f64,
    /// Share of product cost lost to spoilage; 0 when not applicable.
    pub spoilage_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionFinancials {
    pub unit_price:     f64,
    pub revenue:        f64,
    pub product_cost:   f64,
    pub logistics_cost: f64,
    pub spoilage_cost:  f64,
    pub total_cost:     f64,
    pub margin:         f64,
    pub margin_pct:     f64,
}

impl TransactionFinancials {
    /// Derive every money field in order. Components are rounded to
    /// cents first and totals are built from the rounded components, so
    /// `total_cost` and `margin` reconcile exactly with the stored values.
    pub fn derive(inputs: &PricingInputs) -> Self {
        let qty = inputs.quantity as f64;
        let unit_price = inputs.list_price * (1.0 - inputs.discount_pct as f64 / 100.0);
        let revenue = round2(unit_price * qty);
        let raw_product_cost = inputs.unit_cost * qty;
        let product_cost = round2(raw_product_cost);
        let logistics_cost = round2(
            inputs.delivery_distance_km * inputs.logistics_rate_per_km + inputs.logistics_fixed_fee,
        );
        let spoilage_cost = round2(raw_product_cost * inputs.spoilage_fraction);
        let total_cost = round2(product_cost + logistics_cost + spoilage_cost);
        let margin = round2(revenue - total_cost);
        let margin_pct = if revenue > 0.0 {
            round2(margin / revenue * 100.0)
        } else {
            0.0
        };

        Self {
            unit_price: round2(unit_price),
            revenue,
            product_cost,
            logistics_cost,
            spoilage_cost,
            total_cost,
            margin,
            margin_pct,
        }
    }
}

/// Truncate a log-normal draw and clamp into the basket-size bounds.
pub fn clamp_quantity(raw: f64) -> u32 {
    (raw.trunc().max(0.0) as u32).clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// Product indices split by the category bias rule.
struct ProductPools {
    all: Vec<usize>,
    discretionary: Vec<usize>,
    staple: Vec<usize>,
}

impl ProductPools {
    fn build(config: &ScenarioConfig, products: &[ProductRecord]) -> Self {
        let mut pools = Self {
            all: Vec::with_capacity(products.len()),
            discretionary: Vec::new(),
            staple: Vec::new(),
        };
        for (i, p) in products.iter().enumerate() {
            pools.all.push(i);
            let discretionary = config
                .category(&p.category)
                .map(|c| c.discretionary)
                .unwrap_or(false);
            if discretionary {
                pools.discretionary.push(i);
            } else {
                pools.staple.push(i);
            }
        }
        pools
    }

    fn pick(&self, profile: &TierProfile, rng: &mut StageRng) -> Option<usize> {
        let pool = match profile.discretionary_share {
            None => &self.all,
            Some(share) if rng.chance(share) => &self.discretionary,
            Some(_) => &self.staple,
        };
        rng.choose(pool).copied()
    }
}

pub fn generate_transactions(
    config: &ScenarioConfig,
    stores: &[StoreRecord],
    products: &[ProductRecord],
    customers: &[CustomerRecord],
    rng: &mut StageRng,
) -> AnalysisResult<Vec<TransactionRecord>> {
    if customers.is_empty() || products.is_empty() {
        return Err(AnalysisError::config(
            "transaction_count",
            "transactions need at least one customer and one product",
        ));
    }

    let store_index = TierStoreIndex::build(stores);
    let store_by_id: HashMap<&str, usize> = stores
        .iter()
        .enumerate()
        .map(|(i, s)| (s.store_id.as_str(), i))
        .collect();
    let pools = ProductPools::build(config, products);
    let quantity_dists = Tier::ALL
        .iter()
        .map(|&t| {
            let p = config.tier(t);
            LogNormal::new(p.quantity_log_mu, p.quantity_log_sigma)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let cutoff = cutoff_date();

    let n = config.transaction_count;
    let mut transactions = Vec::with_capacity(n);

    for i in 1..=n {
        let customer = &customers[rng.index(customers.len())];
        let tier = customer.region_tier;
        let profile = config.tier(tier);

        let store_idx = if rng.chance(config.home_store_probability) {
            store_by_id.get(customer.primary_store_id.as_str()).copied()
        } else {
            store_index.pick(tier, rng)
        };
        let store = store_idx.map(|idx| &stores[idx]).ok_or_else(|| {
            AnalysisError::config(
                format!("tiers.{tier}"),
                format!("no store available for customer {}", customer.customer_id),
            )
        })?;

        let product = pools
            .pick(profile, rng)
            .map(|idx| &products[idx])
            .ok_or_else(|| AnalysisError::config("categories", format!("empty product pool for {tier}")))?;

        let quantity = clamp_quantity(rng.sample(&quantity_dists[tier.code()]));
        let discount_pct = rng.pick_weighted(&profile.discount_weights).unwrap_or(0);
        let delivery_time_hours = rng.uniform(profile.delivery_hours.0, profile.delivery_hours.1);
        let delivery_distance_km = rng.uniform(profile.delivery_km.0, profile.delivery_km.1);
        let payment_method = rng
            .pick_weighted(&profile.payment_weights)
            .ok_or_else(|| AnalysisError::config(format!("tiers.{tier}.payment_weights"), "empty"))?;

        let spoilage_fraction = if product.is_perishable && profile.spoilage_cap > 0.0 {
            rng.uniform(0.0, profile.spoilage_cap)
        } else {
            0.0
        };

        let financials = TransactionFinancials::derive(&PricingInputs {
            list_price: product.list_price,
            unit_cost: product.unit_cost,
            discount_pct,
            quantity,
            delivery_distance_km,
            logistics_rate_per_km: profile.logistics_rate_per_km,
            logistics_fixed_fee: profile.logistics_fixed_fee,
            spoilage_fraction,
        });

        let days_since_registration = (cutoff - customer.registration_date).num_days();
        let window = days_since_registration
            .min(config.transaction_lookback_days)
            .max(1);
        let days_back = rng.int_between(0, window);

        transactions.push(TransactionRecord {
            transaction_id: format!("TXN{i:07}"),
            transaction_date: cutoff - Duration::days(days_back),
            customer_id: customer.customer_id.clone(),
            product_id: product.product_id.clone(),
            store_id: store.store_id.clone(),
            region_tier: tier,
            quantity,
            unit_price: financials.unit_price,
            revenue: financials.revenue,
            product_cost: financials.product_cost,
            logistics_cost: financials.logistics_cost,
            spoilage_cost: financials.spoilage_cost,
            total_cost: financials.total_cost,
            margin: financials.margin,
            margin_pct: financials.margin_pct,
            discount_pct,
            delivery_time_hours: round2(delivery_time_hours),
            delivery_distance_km: round2(delivery_distance_km),
            payment_method,
            is_perishable: product.is_perishable,
        });
    }

    log::info!("transactions: created {} transactions", transactions.len());
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metro_inputs() -> PricingInputs {
        PricingInputs {
            list_price: 100.0,
            unit_cost: 40.0,
            discount_pct: 10,
            quantity: 2,
            delivery_distance_km: 10.0,
            logistics_rate_per_km: 2.5,
            logistics_fixed_fee: 15.0,
            spoilage_fraction: 0.0,
        }
    }

    #[test]
    fn metro_worked_example() {
        let f = TransactionFinancials::derive(&metro_inputs());
        assert_eq!(f.unit_price, 90.0);
        assert_eq!(f.revenue, 180.0);
        assert_eq!(f.product_cost, 80.0);
        assert_eq!(f.logistics_cost, 40.0);
        assert_eq!(f.spoilage_cost, 0.0);
        assert_eq!(f.total_cost, 120.0);
        assert_eq!(f.margin, 60.0);
        assert_eq!(f.margin_pct, 33.33);
    }

    #[test]
    fn spoilage_scales_product_cost() {
        let inputs = PricingInputs {
            spoilage_fraction: 0.1,
            logistics_rate_per_km: 4.5,
            logistics_fixed_fee: 35.0,
            ..metro_inputs()
        };
        let f = TransactionFinancials::derive(&inputs);
        assert_eq!(f.spoilage_cost, 8.0);
        assert_eq!(f.logistics_cost, 80.0);
        assert_eq!(f.total_cost, 168.0);
        assert_eq!(f.margin, 12.0);
        assert_eq!(f.margin_pct, 6.67);
    }

    #[test]
    fn zero_revenue_has_zero_margin_pct() {
        let inputs = PricingInputs {
            list_price: 0.0,
            ..metro_inputs()
        };
        let f = TransactionFinancials::derive(&inputs);
        assert_eq!(f.revenue, 0.0);
        assert_eq!(f.margin_pct, 0.0);
        assert_eq!(f.margin, -120.0);
    }

    #[test]
    fn quantity_clamped_to_basket_bounds() {
        assert_eq!(clamp_quantity(0.4), 1);
        assert_eq!(clamp_quantity(3.99), 3);
        assert_eq!(clamp_quantity(27.0), 10);
    }
}
