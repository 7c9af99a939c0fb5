//! Customer base generation. Each customer belongs to one tier and has
//! a home store inside it; demographics are sampled from the tier profile.

use super::{stores::StoreRecord, TierStoreIndex};
use crate::{
    config::ScenarioConfig,
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
    types::{window_start, EntityId, IncomeBracket, Tier},
};
use chrono::{Duration, NaiveDate};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 70;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub customer_id:            EntityId,
    pub primary_store_id:       EntityId,
    pub region_tier:            Tier,
    pub age:                    i64,
    pub income_bracket:         IncomeBracket,
    pub digital_literacy_score: f64,
    pub registration_date:      NaiveDate,
}

/// Truncate toward zero, then clamp into the adult range.
pub fn clamp_age(raw: f64) -> i64 {
    (raw.trunc() as i64).clamp(MIN_AGE, MAX_AGE)
}

pub fn generate_customers(
    config: &ScenarioConfig,
    stores: &[StoreRecord],
    rng: &mut StageRng,
) -> AnalysisResult<Vec<CustomerRecord>> {
    let index = TierStoreIndex::build(stores);
    let tier_weights: Vec<(Tier, f64)> = config
        .tiers
        .iter()
        .map(|p| (p.tier, p.customer_share))
        .collect();
    let age_dists = Tier::ALL
        .iter()
        .map(|&t| {
            let p = config.tier(t);
            Normal::new(p.age_mean, p.age_std)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let n = config.customer_count;
    let mut customers = Vec::with_capacity(n);

    for i in 1..=n {
        let tier = rng
            .pick_weighted(&tier_weights)
            .ok_or_else(|| AnalysisError::config("tiers", "no tier profiles"))?;
        let profile = config.tier(tier);
        let home = index
            .pick(tier, rng)
            .map(|idx| &stores[idx])
            .ok_or_else(|| AnalysisError::config(format!("tiers.{tier}"), "tier has no stores"))?;

        let age = clamp_age(rng.sample(&age_dists[tier.code()]));
        let income_bracket = rng
            .pick_weighted(&profile.income_brackets)
            .ok_or_else(|| AnalysisError::config(format!("tiers.{tier}.income_brackets"), "empty"))?;
        let (lit_lo, lit_hi) = profile.digital_literacy;
        let digital_literacy_score = rng.uniform(lit_lo, lit_hi);
        let registration_offset = rng.int_between(0, config.registration_window_days);

        customers.push(CustomerRecord {
            customer_id: format!("CUST{i:06}"),
            primary_store_id: home.store_id.clone(),
            region_tier: tier,
            age,
            income_bracket,
            digital_literacy_score,
            registration_date: window_start() + Duration::days(registration_offset),
        });
    }

    log::info!("customers: created {} customers", customers.len());
    Ok(customers)
}
